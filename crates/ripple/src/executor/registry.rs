//! Command registry
//!
//! Maps a command name to its handler. One singleton handler per name,
//! registered once at shell construction; lookups after that are read-only
//! and safe to share across stage tasks. An unknown name falls back to the
//! shared external-process handler, so every name is executable.

use std::collections::HashMap;
use std::sync::Arc;

use crate::commands::{Command, External};

pub struct Registry {
    commands: HashMap<String, Arc<dyn Command>>,
    external: Arc<dyn Command>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            external: Arc::new(External),
        }
    }

    /// Store a handler under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, command: Arc<dyn Command>) {
        self.commands.insert(name.into(), command);
    }

    /// Exact-match lookup; misses resolve to the external-process handler.
    pub fn get(&self, name: &str) -> Arc<dyn Command> {
        match self.commands.get(name) {
            Some(command) => Arc::clone(command),
            None => Arc::clone(&self.external),
        }
    }

    /// Whether `name` is a registered builtin (as opposed to an external
    /// fallback).
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
