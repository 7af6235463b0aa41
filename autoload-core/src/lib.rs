//! Prefix-based resolution of namespaced names to source files on disk.
//!
//! Namespace prefixes map to ordered lists of base directories. Resolving a
//! name tries the longest registered prefix first and reports the first
//! existing file, falling back to shorter prefixes.

mod error;
pub mod hook;
pub mod manifest;
pub mod registry;
pub mod resolver;

pub use error::{Error, Result};
pub use hook::{Autoloader, FnLoader, LoaderChain};
pub use manifest::{Manifest, NamespaceMapping};
pub use registry::{normalize_directory, normalize_prefix, NamespaceRegistry, NAMESPACE_SEPARATOR};
pub use resolver::{FileProbe, FsProbe, Resolution, Resolver, DEFAULT_EXTENSION};

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::{
        Autoloader,
        Error,
        LoaderChain,
        Manifest,
        Resolution,
        Resolver,
        Result,
    };
}
