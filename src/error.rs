use std::path::PathBuf;

use thiserror::Error;

/// A loaded table could not be typed into a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog has no '{0}' column")]
    MissingColumn(&'static str),
}

/// Every source in a fallback chain failed.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("no table sources configured")]
    NoSources,

    #[error("all table sources failed:\n{}", .attempts.join("\n"))]
    Exhausted { attempts: Vec<String> },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
