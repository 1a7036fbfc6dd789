//! Two-tier shell variable store
//!
//! Global bindings persist for the lifetime of the shell; local bindings are
//! written by assignments that prefix a command (`VAR=val cmd`) and are
//! cleared after every processed line, whatever the outcome.
//!
//! The store is shared across pipeline stage tasks behind an `Arc`, so each
//! tier is guarded by its own mutex. Locks are held only for single map
//! operations and never across an await point.

use std::collections::HashMap;
use std::sync::Mutex;

/// Shell variable store with `local` and `global` tiers.
#[derive(Debug, Default)]
pub struct Environment {
    local: Mutex<HashMap<String, String>>,
    global: Mutex<HashMap<String, String>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_local(&self, name: impl Into<String>, value: impl Into<String>) {
        self.local.lock().unwrap().insert(name.into(), value.into());
    }

    pub fn set_global(&self, name: impl Into<String>, value: impl Into<String>) {
        self.global.lock().unwrap().insert(name.into(), value.into());
    }

    pub fn get_local(&self, name: &str) -> Option<String> {
        self.local.lock().unwrap().get(name).cloned()
    }

    pub fn get_global(&self, name: &str) -> Option<String> {
        self.global.lock().unwrap().get(name).cloned()
    }

    pub fn has_local(&self, name: &str) -> bool {
        self.local.lock().unwrap().contains_key(name)
    }

    pub fn has_global(&self, name: &str) -> bool {
        self.global.lock().unwrap().contains_key(name)
    }

    /// Look up a variable, local tier first.
    pub fn get_var(&self, name: &str) -> Option<String> {
        self.get_local(name).or_else(|| self.get_global(name))
    }

    /// Drop all local bindings. Runs after every processed line so
    /// per-statement overrides never leak into the next one.
    pub fn clear_local(&self) {
        self.local.lock().unwrap().clear();
    }

    /// Export the current bindings as `NAME=VALUE` pairs for an external
    /// process, local bindings shadowing global ones.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        let mut merged: HashMap<String, String> = self.global.lock().unwrap().clone();
        for (name, value) in self.local.lock().unwrap().iter() {
            merged.insert(name.clone(), value.clone());
        }
        merged.into_iter().collect()
    }
}
