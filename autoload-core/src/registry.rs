//! Namespace registry mapping normalized prefixes to ordered base directories.

use std::collections::HashMap;
use std::path::MAIN_SEPARATOR;
use tracing::debug;

use crate::error::{Error, Result};

/// Separator between namespace segments.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Normalize a namespace prefix to its canonical `Vendor\Sub\` form.
///
/// Returns `None` when nothing is left after stripping separators.
pub fn normalize_prefix(prefix: &str) -> Option<String> {
    let trimmed = prefix.trim_matches(NAMESPACE_SEPARATOR);
    if trimmed.is_empty() {
        return None;
    }
    let mut normalized = String::with_capacity(trimmed.len() + 1);
    normalized.push_str(trimmed);
    normalized.push(NAMESPACE_SEPARATOR);
    Some(normalized)
}

/// Normalize a base directory so it ends with exactly one `/`.
///
/// Only `/` and the platform separator are trimmed, so a trailing `\` is
/// kept on Unix where it is part of the name.
pub fn normalize_directory(directory: &str) -> String {
    let trimmed = directory.trim_end_matches(['/', MAIN_SEPARATOR]);
    format!("{}/", trimmed)
}

/// Ordered prefix -> directories table.
#[derive(Debug, Default, Clone)]
pub struct NamespaceRegistry {
    /// Directory lists by normalized prefix
    directories: HashMap<String, Vec<String>>,
    /// Prefixes in first-registration order
    order: Vec<String>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `directory` as a base directory for `prefix`.
    ///
    /// Existing directories for the prefix are kept; the new one goes to the
    /// end of the list, or to the front when `prepend` is set. An empty
    /// prefix (after trimming separators) or an empty directory is rejected
    /// with [`Error::InvalidInput`].
    pub fn register(&mut self, prefix: &str, directory: &str, prepend: bool) -> Result<()> {
        let prefix = normalize_prefix(prefix)
            .ok_or_else(|| Error::InvalidInput("namespace prefix must not be empty".to_string()))?;
        if directory.is_empty() {
            return Err(Error::InvalidInput(format!(
                "base directory for {} must not be empty",
                prefix
            )));
        }
        let directory = normalize_directory(directory);

        debug!(prefix = %prefix, directory = %directory, prepend, "registering namespace");

        if !self.directories.contains_key(&prefix) {
            self.order.push(prefix.clone());
        }
        let list = self.directories.entry(prefix).or_default();
        if prepend {
            list.insert(0, directory);
        } else {
            list.push(directory);
        }
        Ok(())
    }

    /// Directories registered for exactly this prefix, in probe order.
    pub fn directories_for(&self, prefix: &str) -> &[String] {
        match normalize_prefix(prefix) {
            Some(prefix) => self.lookup(&prefix),
            None => &[],
        }
    }

    /// Lookup for a prefix that is already in canonical form.
    pub(crate) fn lookup(&self, normalized_prefix: &str) -> &[String] {
        self.directories
            .get(normalized_prefix)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Registered prefixes, oldest first.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
