//! Longest-prefix resolution of namespaced names to source files.
//!
//! A name such as `Acme\Log\Handler\Stream` is split at each separator from
//! the right. The longest registered prefix is tried first; its relative
//! remainder (`Handler\Stream`) becomes `Handler/Stream.<ext>` under each of
//! the prefix's base directories. When none of them holds the file, the next
//! shorter prefix is tried.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::registry::{NamespaceRegistry, NAMESPACE_SEPARATOR};

/// Extension appended to the last segment of a name when none is configured.
pub const DEFAULT_EXTENSION: &str = "php";

/// Outcome of a lookup. Not finding a file is a normal result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(PathBuf),
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found(path) => Some(path),
            Self::NotFound => None,
        }
    }

    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            Self::Found(path) => Some(path),
            Self::NotFound => None,
        }
    }
}

/// Existence check used for every candidate path.
pub trait FileProbe: Send + Sync {
    /// Whether `path` names an existing regular file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn is_file(&self, path: &Path) -> bool {
        match fs::metadata(path) {
            Ok(metadata) => metadata.is_file(),
            Err(e) => {
                trace!(path = %path.display(), error = %e, "probe miss");
                false
            }
        }
    }
}

/// Resolves namespaced names against a registry of base directories.
pub struct Resolver {
    registry: RwLock<NamespaceRegistry>,
    extension: String,
    probe: Box<dyn FileProbe>,
}

impl Resolver {
    /// Create a resolver with an empty registry, the default extension and
    /// the filesystem probe.
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(NamespaceRegistry::new()),
            extension: DEFAULT_EXTENSION.to_string(),
            probe: Box::new(FsProbe),
        }
    }

    /// Use `extension` (with or without a leading dot) for resolved files.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Replace the existence check.
    pub fn with_probe(mut self, probe: impl FileProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Add a base directory for a namespace prefix.
    pub fn register(&self, prefix: &str, directory: &str, prepend: bool) -> Result<()> {
        self.write_registry().register(prefix, directory, prepend)
    }

    /// Register several `(prefix, directory, prepend)` entries under one write
    /// lock. If any entry is invalid the registry is left untouched.
    pub fn register_all<'a, I>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str, bool)>,
    {
        let mut registry = self.write_registry();
        let mut staged = registry.clone();
        for (prefix, directory, prepend) in entries {
            staged.register(prefix, directory, prepend)?;
        }
        *registry = staged;
        Ok(())
    }

    /// Directories registered for exactly this prefix, in probe order.
    pub fn directories_for(&self, prefix: &str) -> Vec<String> {
        self.read_registry().directories_for(prefix).to_vec()
    }

    /// Registered prefixes, oldest first.
    pub fn prefixes(&self) -> Vec<String> {
        self.read_registry().prefixes().map(String::from).collect()
    }

    /// Find the file for `symbolic_name`.
    ///
    /// Never fails: unregistered prefixes, missing files and unreadable
    /// directories all end up as [`Resolution::NotFound`].
    pub fn resolve(&self, symbolic_name: &str) -> Resolution {
        if symbolic_name.is_empty() {
            warn!("resolve called with an empty name");
            return Resolution::NotFound;
        }

        let found = self.walk(symbolic_name, |candidate| {
            trace!(candidate = %candidate.display(), "probing");
            self.probe.is_file(candidate)
        });

        match found {
            Some(path) => {
                debug!(name = symbolic_name, path = %path.display(), "resolved");
                Resolution::Found(path)
            }
            None => {
                debug!(name = symbolic_name, "not found");
                Resolution::NotFound
            }
        }
    }

    /// Every path [`Resolver::resolve`] would probe for `symbolic_name`, in
    /// order. The filesystem is not touched.
    pub fn candidates(&self, symbolic_name: &str) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        self.walk(symbolic_name, |candidate| {
            candidates.push(candidate.to_path_buf());
            false
        });
        candidates
    }

    /// Plain callable form for hosts that register loader functions.
    pub fn as_hook(&self) -> impl Fn(&str) -> Option<PathBuf> + '_ {
        move |symbolic_name: &str| self.resolve(symbolic_name).into_path()
    }

    /// Visit candidate paths from the longest registered prefix down, stopping
    /// at the first one `accept` takes.
    fn walk<F>(&self, symbolic_name: &str, mut accept: F) -> Option<PathBuf>
    where
        F: FnMut(&Path) -> bool,
    {
        let name = symbolic_name.trim_start_matches(NAMESPACE_SEPARATOR);
        let registry = self.read_registry();

        let mut end = name.len();
        while let Some(pos) = name[..end].rfind(NAMESPACE_SEPARATOR) {
            end = pos;
            let prefix = &name[..=pos];
            let relative = &name[pos + 1..];

            let directories = registry.lookup(prefix);
            if directories.is_empty() || !is_relative_identifier(relative) {
                continue;
            }

            let relative_path = self.relative_path(relative);
            for directory in directories {
                let candidate = PathBuf::from(format!("{}{}", directory, relative_path));
                if accept(&candidate) {
                    return Some(candidate);
                }
            }
        }

        None
    }

    /// `Handler\Stream` -> `Handler/Stream.<ext>`, case preserved.
    fn relative_path(&self, relative: &str) -> String {
        let mut path = relative.replace(NAMESPACE_SEPARATOR, "/");
        path.push('.');
        path.push_str(&self.extension);
        path
    }

    fn read_registry(&self) -> RwLockReadGuard<'_, NamespaceRegistry> {
        self.registry.read().unwrap_or_else(|poisoned| {
            warn!("namespace registry lock was poisoned, continuing");
            poisoned.into_inner()
        })
    }

    fn write_registry(&self) -> RwLockWriteGuard<'_, NamespaceRegistry> {
        self.registry.write().unwrap_or_else(|poisoned| {
            warn!("namespace registry lock was poisoned, continuing");
            poisoned.into_inner()
        })
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

fn is_relative_identifier(relative: &str) -> bool {
    !relative.is_empty() && relative.split(NAMESPACE_SEPARATOR).all(|segment| !segment.is_empty())
}
