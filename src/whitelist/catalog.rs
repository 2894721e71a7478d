//! The command catalog
//!
//! An immutable, ordered registry of [`CommandDefinition`]s. Built once at
//! startup and shared read-only (behind `Arc`) by every request.

use std::collections::HashMap;

use super::defaults::default_commands;
use super::definition::{Category, CommandDefinition};
use crate::error::{GatewayError, Result};

/// Registry of whitelisted commands
#[derive(Debug, Clone)]
pub struct Catalog {
    commands: Vec<CommandDefinition>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, checking every entry once
    ///
    /// Fails if a name is empty or repeated, or if a template uses a
    /// placeholder that is not a declared parameter.
    pub fn new(commands: Vec<CommandDefinition>) -> Result<Self> {
        let mut index = HashMap::with_capacity(commands.len());

        for (position, def) in commands.iter().enumerate() {
            if def.name.is_empty() {
                return Err(GatewayError::catalog("command name cannot be empty"));
            }

            if let Some(undeclared) = def.placeholders().into_iter().find(|p| !def.declares(p)) {
                return Err(GatewayError::catalog(format!(
                    "command '{}' uses placeholder '{{{}}}' which is not a declared parameter",
                    def.name, undeclared
                )));
            }

            if index.insert(def.name.clone(), position).is_some() {
                return Err(GatewayError::catalog(format!(
                    "duplicate command name '{}'",
                    def.name
                )));
            }
        }

        Ok(Self { commands, index })
    }

    /// The built-in operational command set
    pub fn builtin() -> Result<Self> {
        Self::new(default_commands())
    }

    /// Find a command by exact, case-sensitive name
    pub fn lookup(&self, name: &str) -> Option<&CommandDefinition> {
        self.index.get(name).map(|&i| &self.commands[i])
    }

    /// Commands in registration order, optionally limited to one category
    pub fn list(&self, category: Option<Category>) -> Vec<&CommandDefinition> {
        self.commands
            .iter()
            .filter(|def| category.is_none_or(|c| def.category == c))
            .collect()
    }

    /// Command names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|def| def.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
