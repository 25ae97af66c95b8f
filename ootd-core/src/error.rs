use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes for the recommendation pipeline and the study-material
/// operations. The HTTP layer maps each variant to a status code and a
/// stable headline message; the payload carried here becomes the `details`
/// field of the error body.
#[derive(Debug, Error)]
pub enum Error {
    /// Latitude or longitude missing, non-numeric, or out of range.
    #[error("{0}")]
    InvalidCoordinate(String),

    /// Malformed request body or a missing required field.
    #[error("{0}")]
    InvalidInput(String),

    /// The weather service could not be reached or rejected the lookup.
    #[error("{0}")]
    WeatherUnavailable(String),

    /// The clothing catalog could not be read, or came back unusable.
    #[error("{0}")]
    CatalogUnavailable(String),

    /// A study-material store operation failed.
    #[error("{0}")]
    StoreUnavailable(String),

    /// The language model could not be reached or returned no reply.
    #[error("{0}")]
    ModelUnavailable(String),

    /// The model reply carried no parseable JSON.
    #[error("{0}")]
    ModelResponseMalformed(String),

    /// The model reply parsed but lacked the expected top-level data.
    #[error("{0}")]
    ModelResponseIncomplete(String),

    /// The model reply had the wrong shape or referenced unknown items.
    #[error("{0}")]
    ModelResponseInvalid(String),

    #[error("{0}")]
    Internal(String),
}
