use thiserror::Error;

/// Errors raised while loading catalog data or running catalog queries.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A bundled or caller-supplied data set failed to parse.
    #[error("failed to load {collection}: {source}")]
    Data {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A sort preset name was not recognised.
    #[error("unknown sort preset '{0}'")]
    UnknownSort(String),

    /// The query engine rejected a query or schema.
    #[error(transparent)]
    Query(#[from] sift::SiftError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
