use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown sql statement '{0}'")]
    UnknownStatement(String),
    #[error("Could not read statements file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Statements must be a JSON object of statement name -> template: {0}")]
    InvalidStatements(#[from] serde_json::Error),
}
