//! Command-line options for the `autoload` binary.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use autoload_core::{Manifest, Resolver};
use clap::{Parser, Subcommand};

/// Environment variable naming the default manifest.
pub const MANIFEST_ENV: &str = "AUTOLOAD_MANIFEST";

/// Verbosity of diagnostic output on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Normal,
    Quiet,
}

impl LogLevel {
    pub fn filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "autoload_cli=debug,autoload_core=trace",
            LogLevel::Normal => "warn",
            LogLevel::Quiet => "error",
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Resolve namespaced names to source files")]
pub struct CliOptions {
    /// TOML manifest with namespace mappings (defaults to $AUTOLOAD_MANIFEST)
    #[arg(short, long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Extra mapping appended after the manifest's, as PREFIX=DIR
    #[arg(long = "map", value_name = "PREFIX=DIR", global = true)]
    pub maps: Vec<String>,

    /// Extra mapping placed ahead of existing directories, as PREFIX=DIR
    #[arg(long = "prepend-map", value_name = "PREFIX=DIR", global = true)]
    pub prepend_maps: Vec<String>,

    /// Source file extension, overriding the manifest
    #[arg(short, long, global = true)]
    pub extension: Option<String>,

    /// Output compact JSON
    #[arg(long, default_value_t = false, global = true)]
    pub raw: bool,

    /// Log every probe to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve one or more names; exits with 1 if any is not found
    Resolve {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// List the paths that would be probed for a name, in order
    Candidates { name: String },
    /// Show registered prefixes and their directories
    Prefixes,
}

impl CliOptions {
    pub fn log_level(&self) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else if self.quiet {
            LogLevel::Quiet
        } else {
            LogLevel::Normal
        }
    }

    /// Manifest path from the flag, falling back to the environment.
    pub fn manifest_path(&self) -> Option<PathBuf> {
        self.manifest
            .clone()
            .or_else(|| std::env::var_os(MANIFEST_ENV).map(PathBuf::from))
    }

    /// Build the resolver from the manifest and inline mappings.
    pub fn build_resolver(&self) -> Result<Resolver> {
        let mut manifest = match self.manifest_path() {
            Some(path) => Manifest::load(&path)
                .with_context(|| format!("Failed to load manifest {}", path.display()))?,
            None => Manifest::default(),
        };
        if let Some(extension) = &self.extension {
            manifest.extension = extension.clone();
        }

        let resolver = manifest.into_resolver().context("Invalid namespace mapping in manifest")?;

        for mapping in &self.maps {
            let (prefix, directory) = parse_mapping(mapping)?;
            resolver
                .register(prefix, directory, false)
                .with_context(|| format!("Invalid --map {}", mapping))?;
        }
        for mapping in &self.prepend_maps {
            let (prefix, directory) = parse_mapping(mapping)?;
            resolver
                .register(prefix, directory, true)
                .with_context(|| format!("Invalid --prepend-map {}", mapping))?;
        }

        Ok(resolver)
    }
}

/// Split `PREFIX=DIR`.
pub fn parse_mapping(mapping: &str) -> Result<(&str, &str)> {
    let (prefix, directory) = mapping
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid mapping format. Use PREFIX=DIR: {}", mapping))?;
    if prefix.is_empty() || directory.is_empty() {
        return Err(anyhow!("Invalid mapping format. Use PREFIX=DIR: {}", mapping));
    }
    Ok((prefix, directory))
}
