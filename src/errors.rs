use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} answered with status {status}")]
    Status { path: String, status: u16 },
    #[error("could not decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid catalog url: {0}")]
    Url(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is not a valid key-value document: {0}")]
    Format(#[from] serde_json::Error),
    #[error("storage lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum CartError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("cart snapshot is not valid JSON: {0}")]
    Snapshot(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("environment variable {name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}
