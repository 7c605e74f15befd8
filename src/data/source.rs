use std::path::PathBuf;

use anyhow::Result;

use super::loader::load_table;
use super::model::{Catalog, Table};
use crate::error::SourceError;

// ---------------------------------------------------------------------------
// TableSource – where catalog and curve tables come from
// ---------------------------------------------------------------------------

/// Something that can produce a fresh table on demand.
pub trait TableSource {
    /// Human-readable origin, used in logs and status messages.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Table>;
}

/// A single local (or mounted shared-drive) file.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Table> {
        load_table(&self.path)
    }
}

/// Tries each source in order and returns the first table that loads.
pub struct FallbackSource {
    sources: Vec<Box<dyn TableSource>>,
}

impl FallbackSource {
    pub fn new(sources: Vec<Box<dyn TableSource>>) -> Self {
        Self { sources }
    }

    /// A chain of file sources, in priority order.
    pub fn from_paths<P: Into<PathBuf> + Clone>(paths: &[P]) -> Self {
        Self::new(
            paths
                .iter()
                .map(|p| Box::new(FileSource::new(p.clone())) as Box<dyn TableSource>)
                .collect(),
        )
    }
}

impl TableSource for FallbackSource {
    fn describe(&self) -> String {
        self.sources
            .iter()
            .map(|s| s.describe())
            .collect::<Vec<_>>()
            .join(" → ")
    }

    fn load(&self) -> Result<Table> {
        if self.sources.is_empty() {
            return Err(SourceError::NoSources.into());
        }
        let mut attempts = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            match source.load() {
                Ok(table) => return Ok(table),
                Err(e) => {
                    log::warn!("Source {} failed, trying next: {e:#}", source.describe());
                    attempts.push(format!("{}: {e:#}", source.describe()));
                }
            }
        }
        Err(SourceError::Exhausted { attempts }.into())
    }
}

/// Load and type a catalog from any source.
pub fn load_catalog(source: &dyn TableSource) -> Result<Catalog> {
    let table = source.load()?;
    let catalog = Catalog::from_table(&table)?;
    log::info!(
        "Catalog from {}: {} pumps, categories {:?}",
        source.describe(),
        catalog.len(),
        catalog.categories
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct Failing;

    impl TableSource for Failing {
        fn describe(&self) -> String {
            "remote store".to_string()
        }

        fn load(&self) -> Result<Table> {
            anyhow::bail!("connection refused")
        }
    }

    fn catalog_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Model,Category,Rated Flow (LPM),Rated Head (M)").unwrap();
        writeln!(file, "A,Booster,120,20").unwrap();
        file
    }

    #[test]
    fn falls_back_to_the_next_source() {
        let file = catalog_file();
        let chain = FallbackSource::new(vec![
            Box::new(Failing),
            Box::new(FileSource::new(file.path())),
        ]);
        let catalog = load_catalog(&chain).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.pumps[0].rated_flow_lpm, 120.0);
    }

    #[test]
    fn exhausted_chain_lists_every_attempt() {
        let chain = FallbackSource::new(vec![
            Box::new(Failing),
            Box::new(FileSource::new("/nonexistent/pumps.csv")),
        ]);
        let err = chain.load().unwrap_err();
        let source_err = err.downcast_ref::<SourceError>().unwrap();
        let SourceError::Exhausted { attempts } = source_err else {
            panic!("expected exhausted chain");
        };
        assert_eq!(attempts.len(), 2);
        assert!(attempts[0].contains("connection refused"));
    }

    #[test]
    fn empty_chain_is_an_error() {
        let chain = FallbackSource::from_paths::<PathBuf>(&[]);
        assert!(chain.load().is_err());
    }

    #[test]
    fn describe_joins_sources() {
        let chain = FallbackSource::from_paths(&["a.csv", "b.parquet"]);
        assert_eq!(chain.describe(), "a.csv → b.parquet");
    }
}
