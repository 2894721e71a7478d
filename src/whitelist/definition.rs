//! Command definitions and categories

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("static pattern is valid"));

/// Category a whitelisted command belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    System,
    Disk,
    Network,
    Process,
    Service,
    Docker,
    Custom,
}

impl Category {
    /// All categories, in declaration order
    pub const ALL: [Category; 7] = [
        Category::System,
        Category::Disk,
        Category::Network,
        Category::Process,
        Category::Service,
        Category::Docker,
        Category::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::System => "system",
            Category::Disk => "disk",
            Category::Network => "network",
            Category::Process => "process",
            Category::Service => "service",
            Category::Docker => "docker",
            Category::Custom => "custom",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("Unknown category '{}'", s))
    }
}

/// A parameter accepted by a command template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub name: String,
    pub description: String,
}

/// A whitelisted command
///
/// Templates use `{name}` placeholders. Every placeholder must be a declared
/// parameter; [`Catalog::new`](super::Catalog::new) enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDefinition {
    pub name: String,
    pub category: Category,
    pub description: String,
    #[serde(rename = "template")]
    pub command_template: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParamSpec>,
    #[serde(rename = "example", skip_serializing_if = "Option::is_none")]
    pub example_usage: Option<String>,
}

impl CommandDefinition {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        description: impl Into<String>,
        command_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            description: description.into(),
            command_template: command_template.into(),
            parameters: Vec::new(),
            example_usage: None,
        }
    }

    /// Declare a parameter the template accepts
    pub fn with_param(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.parameters.push(ParamSpec {
            name: name.into(),
            description: description.into(),
        });
        self
    }

    /// Attach a usage example
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example_usage = Some(example.into());
        self
    }

    /// Declared parameter names, in declaration order
    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.name.clone()).collect()
    }

    pub fn declares(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    /// Placeholders in the template, in order of first occurrence, without duplicates
    pub fn placeholders(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for cap in PLACEHOLDER.captures_iter(&self.command_template) {
            if let Some(m) = cap.get(1) {
                if !seen.contains(&m.as_str()) {
                    seen.push(m.as_str());
                }
            }
        }
        seen
    }

    /// Replace every placeholder with its value from `values`
    ///
    /// Placeholders without a value are left as-is; callers check
    /// completeness first.
    pub(crate) fn substitute<'a>(&self, values: impl Fn(&str) -> Option<&'a str>) -> String {
        PLACEHOLDER
            .replace_all(&self.command_template, |cap: &regex::Captures<'_>| {
                match values(&cap[1]) {
                    Some(v) => v.to_string(),
                    None => cap[0].to_string(),
                }
            })
            .into_owned()
    }
}
