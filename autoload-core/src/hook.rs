use std::path::PathBuf;
use tracing::debug;

use crate::resolver::Resolver;

/// Interface a host loading mechanism calls to locate source files
pub trait Autoloader: Send + Sync {
    /// Name used when reporting which loader matched
    fn name(&self) -> &str;

    /// Locate the file defining `symbolic_name`, if this loader knows it
    fn autoload(&self, symbolic_name: &str) -> Option<PathBuf>;
}

impl Autoloader for Resolver {
    fn name(&self) -> &str {
        "namespace-resolver"
    }

    fn autoload(&self, symbolic_name: &str) -> Option<PathBuf> {
        self.resolve(symbolic_name).into_path()
    }
}

/// Loader built from a plain function, for hosts with their own lookup rules
pub struct FnLoader<F> {
    name: String,
    lookup: F,
}

impl<F> FnLoader<F>
where
    F: Fn(&str) -> Option<PathBuf> + Send + Sync,
{
    pub fn new(name: impl Into<String>, lookup: F) -> Self {
        Self {
            name: name.into(),
            lookup,
        }
    }
}

impl<F> Autoloader for FnLoader<F>
where
    F: Fn(&str) -> Option<PathBuf> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn autoload(&self, symbolic_name: &str) -> Option<PathBuf> {
        (self.lookup)(symbolic_name)
    }
}

/// Ordered list of loaders asked in turn until one finds a file
#[derive(Default)]
pub struct LoaderChain {
    loaders: Vec<Box<dyn Autoloader>>,
}

impl LoaderChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a loader after the existing ones
    pub fn push(&mut self, loader: impl Autoloader + 'static) {
        self.loaders.push(Box::new(loader));
    }

    /// Add a loader ahead of the existing ones
    pub fn prepend(&mut self, loader: impl Autoloader + 'static) {
        self.loaders.insert(0, Box::new(loader));
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// Ask each loader in order. Returns the matching loader's name and path.
    pub fn load(&self, symbolic_name: &str) -> Option<(&str, PathBuf)> {
        self.loaders.iter().find_map(|loader| {
            let path = loader.autoload(symbolic_name)?;
            debug!(loader = loader.name(), name = symbolic_name, "loader matched");
            Some((loader.name(), path))
        })
    }
}
