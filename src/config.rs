use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::paths::database_file_path;
use crate::progress::StepCatalog;

pub const DB_ENV: &str = "STEPTRACK_DB";
pub const CATALOG_ENV: &str = "STEPTRACK_CATALOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub catalog_path: Option<PathBuf>,
}

impl Settings {
    /// Command-line flags win over environment variables, which win over the
    /// per-user defaults.
    pub fn resolve(db_flag: Option<&Path>, catalog_flag: Option<&Path>) -> Result<Self> {
        Self::resolve_with(db_flag, catalog_flag, |key| env::var_os(key).map(PathBuf::from))
    }

    fn resolve_with(
        db_flag: Option<&Path>,
        catalog_flag: Option<&Path>,
        lookup: impl Fn(&str) -> Option<PathBuf>,
    ) -> Result<Self> {
        let non_empty = |path: PathBuf| (!path.as_os_str().is_empty()).then_some(path);

        let db_path = match db_flag
            .map(Path::to_path_buf)
            .or_else(|| lookup(DB_ENV).and_then(non_empty))
        {
            Some(path) => path,
            None => database_file_path()?,
        };
        let catalog_path = catalog_flag
            .map(Path::to_path_buf)
            .or_else(|| lookup(CATALOG_ENV).and_then(non_empty));

        Ok(Self {
            db_path,
            catalog_path,
        })
    }

    pub fn load_catalog(&self) -> Result<StepCatalog> {
        match &self.catalog_path {
            Some(path) => {
                let catalog = StepCatalog::from_file(path)?;
                tracing::info!(path = %path.display(), steps = catalog.len(), "loaded step catalog");
                Ok(catalog)
            }
            None => Ok(StepCatalog::builtin()),
        }
    }
}
