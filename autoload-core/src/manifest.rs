use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::resolver::{Resolver, DEFAULT_EXTENSION};

/// Namespace mappings loaded from a TOML file.
///
/// ```toml
/// extension = "php"
///
/// [[namespace]]
/// prefix = "Acme\\Log"
/// directories = ["./src/log", "./lib/log"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default, rename = "namespace")]
    pub namespaces: Vec<NamespaceMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceMapping {
    pub prefix: String,
    pub directories: Vec<String>,
    #[serde(default)]
    pub prepend: bool,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            namespaces: Vec::new(),
        }
    }
}

impl Manifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        content.parse()
    }

    /// Build a resolver with this manifest's extension and mappings.
    pub fn into_resolver(self) -> Result<Resolver> {
        let resolver = Resolver::new().with_extension(self.extension.as_str());
        self.apply(&resolver)?;
        Ok(resolver)
    }

    /// Register every mapping, in document order, into `resolver`.
    ///
    /// The mappings are applied together: if one is invalid, none of them
    /// are registered.
    pub fn apply(&self, resolver: &Resolver) -> Result<()> {
        let mut entries = Vec::new();
        for mapping in &self.namespaces {
            if mapping.prepend {
                // Prepend in reverse so the listed order survives.
                for directory in mapping.directories.iter().rev() {
                    entries.push((mapping.prefix.as_str(), directory.as_str(), true));
                }
            } else {
                for directory in &mapping.directories {
                    entries.push((mapping.prefix.as_str(), directory.as_str(), false));
                }
            }
        }
        resolver.register_all(entries)
    }
}

impl FromStr for Manifest {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
