//! The default operational command set

use super::definition::{Category, CommandDefinition};

/// Built-in whitelisted commands, in listing order
pub fn default_commands() -> Vec<CommandDefinition> {
    use Category::*;

    vec![
        // System
        CommandDefinition::new("whoami", System, "Show the user commands run as", "whoami"),
        CommandDefinition::new("hostname", System, "Show the remote hostname", "hostname"),
        CommandDefinition::new(
            "uptime",
            System,
            "Show uptime, logged in users and load averages",
            "uptime",
        ),
        CommandDefinition::new(
            "system_info",
            System,
            "Kernel name, release and architecture",
            "uname -a",
        ),
        CommandDefinition::new(
            "os_release",
            System,
            "Operating system identification",
            "cat /etc/os-release",
        ),
        CommandDefinition::new(
            "memory_usage",
            System,
            "RAM and swap usage in human-readable units",
            "free -h",
        ),
        CommandDefinition::new("cpu_info", System, "CPU architecture details", "lscpu"),
        CommandDefinition::new(
            "load_average",
            System,
            "Raw 1/5/15 minute load averages",
            "cat /proc/loadavg",
        ),
        CommandDefinition::new("logged_in_users", System, "Who is logged in", "who"),
        // Disk
        CommandDefinition::new(
            "disk_usage",
            Disk,
            "Disk usage of all mounted filesystems",
            "df -h",
        ),
        CommandDefinition::new(
            "disk_usage_path",
            Disk,
            "Total size of a directory or file",
            "du -sh {path}",
        )
        .with_param("path", "Path to measure, e.g. /var/log")
        .with_example(r#"{"path": "/var/log"}"#),
        CommandDefinition::new("inode_usage", Disk, "Inode usage per filesystem", "df -i"),
        CommandDefinition::new("block_devices", Disk, "Block devices and partitions", "lsblk"),
        CommandDefinition::new(
            "list_directory",
            Disk,
            "Detailed listing of a directory",
            "ls -la {path}",
        )
        .with_param("path", "Directory to list, e.g. /etc")
        .with_example(r#"{"path": "/etc"}"#),
        // Network
        CommandDefinition::new(
            "network_interfaces",
            Network,
            "Network interfaces and addresses",
            "ip addr show",
        ),
        CommandDefinition::new(
            "listening_ports",
            Network,
            "Listening TCP and UDP sockets",
            "ss -tuln",
        ),
        CommandDefinition::new("routing_table", Network, "Kernel routing table", "ip route show"),
        CommandDefinition::new(
            "dns_config",
            Network,
            "Resolver configuration",
            "cat /etc/resolv.conf",
        ),
        CommandDefinition::new(
            "ping_host",
            Network,
            "Send four ICMP echo requests to a host",
            "ping -c 4 {host}",
        )
        .with_param("host", "Hostname or IP address to ping")
        .with_example(r#"{"host": "1.1.1.1"}"#),
        // Process
        CommandDefinition::new("process_list", Process, "All running processes", "ps aux"),
        CommandDefinition::new(
            "top_cpu_processes",
            Process,
            "Fifteen processes using the most CPU",
            "ps aux --sort=-%cpu | head -n 16",
        ),
        CommandDefinition::new(
            "top_memory_processes",
            Process,
            "Fifteen processes using the most memory",
            "ps aux --sort=-%mem | head -n 16",
        ),
        CommandDefinition::new(
            "find_process",
            Process,
            "Processes whose name matches a pattern",
            "pgrep -a {pattern}",
        )
        .with_param("pattern", "Process name to match, e.g. nginx")
        .with_example(r#"{"pattern": "nginx"}"#),
        // Service
        CommandDefinition::new(
            "service_status",
            Service,
            "Status of a systemd service",
            "systemctl status {service_name} --no-pager",
        )
        .with_param("service_name", "systemd unit name, e.g. nginx")
        .with_example(r#"{"service_name": "nginx"}"#),
        CommandDefinition::new(
            "failed_services",
            Service,
            "systemd units in a failed state",
            "systemctl --failed --no-pager",
        ),
        CommandDefinition::new(
            "running_services",
            Service,
            "Running systemd services",
            "systemctl list-units --type=service --state=running --no-pager",
        ),
        CommandDefinition::new(
            "service_logs",
            Service,
            "Recent journal entries for a service",
            "journalctl -u {service_name} -n {lines} --no-pager",
        )
        .with_param("service_name", "systemd unit name, e.g. nginx")
        .with_param("lines", "Number of lines to show, e.g. 50")
        .with_example(r#"{"service_name": "nginx", "lines": "50"}"#),
        // Docker
        CommandDefinition::new("docker_ps", Docker, "Running containers", "docker ps"),
        CommandDefinition::new(
            "docker_ps_all",
            Docker,
            "All containers including stopped ones",
            "docker ps -a",
        ),
        CommandDefinition::new("docker_images", Docker, "Local images", "docker images"),
        CommandDefinition::new(
            "docker_stats",
            Docker,
            "One-shot resource usage of running containers",
            "docker stats --no-stream",
        ),
        CommandDefinition::new(
            "docker_logs",
            Docker,
            "Recent log lines of a container",
            "docker logs --tail {lines} {container}",
        )
        .with_param("container", "Container name or ID")
        .with_param("lines", "Number of lines to show, e.g. 100")
        .with_example(r#"{"container": "web", "lines": "100"}"#),
        // Custom
        CommandDefinition::new(
            "tailscale_status",
            Custom,
            "Tailscale peers and connection state",
            "tailscale status",
        ),
    ]
}
