use std::collections::HashMap;
use anyhow::{anyhow, Result};

use crate::model::task::Priority;

/// Metadata keys understood by `add`.
pub const TASK_KEYS: [&str; 8] = [
    "deadline",
    "book",
    "priority",
    "description",
    "folder",
    "every",
    "duration",
    "notify",
];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

/// Splits `Buy milk deadline:tomorrow book:life` into a title and `key:value`
/// pairs. Only purely alphabetic keys count, so "14:00" stays in the title.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphabetic()) {
                metadata.insert(key.to_lowercase(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

impl ParsedInput {
    /// Replaces abbreviated keys with their full names. Keys that cannot be
    /// expanded are dropped and reported back.
    pub fn normalize_keys(&mut self, candidates: &[&str]) -> Vec<String> {
        let mut warnings = Vec::new();
        let mut normalized = HashMap::new();
        for (key, value) in self.metadata.drain() {
            match expand_key(&key, candidates) {
                Ok(full_key) => {
                    normalized.insert(full_key, value);
                }
                Err(e) => warnings.push(e.to_string()),
            }
        }
        self.metadata = normalized;
        warnings.sort();
        warnings
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

pub fn parse_priority(value: &str) -> Result<Priority> {
    match value.to_lowercase().as_str() {
        "h" | "high" => Ok(Priority::High),
        "m" | "medium" | "med" => Ok(Priority::Medium),
        "l" | "low" => Ok(Priority::Low),
        other => Err(anyhow!("Unknown priority: '{}'", other)),
    }
}

pub fn parse_switch(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "on" | "yes" | "y" | "true" | "1" => Ok(true),
        "off" | "no" | "n" | "false" | "0" => Ok(false),
        other => Err(anyhow!("Expected on/off, got '{}'", other)),
    }
}
