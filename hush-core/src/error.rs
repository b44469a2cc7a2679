//! Error types for hush-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from catalog and state-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.hush/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The requested slug does not exist in the site catalog.
    #[error("site '{slug}' not found in catalog")]
    SiteNotFound { slug: String },
}
