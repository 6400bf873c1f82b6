//! Named configuration lookup relative to a base directory.

use std::io;
use std::path::{Path, PathBuf};

use alt_domain::RunConfig;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// Extensions tried, in order, after the bare name.
const EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Errors from locating or reading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No candidate file exists.
    #[error("configuration '{name}' not found (tried {})", display_paths(.tried))]
    NotFound {
        /// The requested name.
        name: String,
        /// Every path that was checked.
        tried: Vec<PathBuf>,
    },

    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The file is not a valid test configuration.
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// YAML error, with location.
        #[source]
        source: serde_yaml::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses a YAML test configuration.
///
/// # Errors
///
/// Returns the YAML error if the text is malformed or does not have the
/// configuration shape.
pub fn parse_run_config(text: &str) -> Result<RunConfig, serde_yaml::Error> {
    serde_yaml::from_str(text)
}

/// Loads configurations by name.
#[derive(Debug, Clone, Default)]
pub struct ConfigFactory {
    base_dir: Option<PathBuf>,
}

impl ConfigFactory {
    /// Resolves names relative to `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Uses names as given, absolute or relative to the working directory.
    #[must_use]
    pub const fn absolute() -> Self {
        Self { base_dir: None }
    }

    /// The directory names resolve against, if any.
    #[must_use]
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Paths checked for `name`, in order: the name itself, then with each
    /// known extension appended.
    #[must_use]
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let base = match &self.base_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        };

        let mut candidates = vec![base.clone()];
        candidates.extend(EXTENSIONS.iter().map(|ext| {
            let mut path = base.clone().into_os_string();
            path.push(".");
            path.push(ext);
            PathBuf::from(path)
        }));
        candidates
    }

    /// Finds the first existing candidate for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] listing every candidate.
    pub async fn resolve(&self, name: &str) -> Result<PathBuf, ConfigError> {
        let candidates = self.candidates(name);
        for candidate in &candidates {
            if fs::metadata(candidate).await.is_ok_and(|m| m.is_file()) {
                return Ok(candidate.clone());
            }
        }
        Err(ConfigError::NotFound {
            name: name.to_string(),
            tried: candidates,
        })
    }

    /// Loads and parses the configuration called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if no file matches, it cannot be read, or it is not
    /// a valid configuration.
    pub async fn get(&self, name: &str) -> Result<RunConfig, ConfigError> {
        let path = self.resolve(name).await?;
        debug!("Loading test configuration from {}", path.display());

        let text = fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;

        parse_run_config(&text).map_err(|source| ConfigError::Parse { path, source })
    }
}
