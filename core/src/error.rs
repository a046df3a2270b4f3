use thiserror::Error;

/// Failures at the JSON / metrics boundary. The scoring functions themselves
/// never fail.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid {what} at {path}: {source}")]
    InvalidInput {
        what: &'static str,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("metrics registry: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Deserialize with the JSON path of the first offending field.
pub fn parse_json<T>(what: &'static str, txt: &str) -> Result<T, EngineError>
where
    T: serde::de::DeserializeOwned,
{
    let mut de = serde_json::Deserializer::from_str(txt);
    serde_path_to_error::deserialize(&mut de).map_err(|e| {
        let path = e.path().to_string();
        EngineError::InvalidInput { what, path, source: e.into_inner() }
    })
}
