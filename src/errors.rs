// errors.rs
use astra::Response;
use thiserror::Error;

/// Errors originating from request handling or from the layers underneath it
/// (dataset, scaler, walkscore scraping).
///
/// The first five variants are client errors and are reported with HTTP 422.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown {field}: '{value}'")]
    InvalidInput { field: &'static str, value: String },

    #[error("No data found for {city}, {state}")]
    NotFound { city: String, state: String },

    #[error("Walkscore not found for {city}, {state}")]
    ScoreUnavailable { city: String, state: String },

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not Found")]
    UnknownRoute,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Database error: {0}")]
    Db(String),

    #[error("Dataset invariant violated: {0}")]
    DatasetInvariant(String),

    #[error("Scaler error: {0}")]
    Scaler(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::InvalidInput { .. }
            | ServerError::NotFound { .. }
            | ServerError::ScoreUnavailable { .. }
            | ServerError::InvalidWeights(_)
            | ServerError::InvalidBody(_) => 422,
            ServerError::BadRequest(_) => 400,
            ServerError::UnknownRoute => 404,
            ServerError::MethodNotAllowed => 405,
            ServerError::Db(_)
            | ServerError::DatasetInvariant(_)
            | ServerError::Scaler(_)
            | ServerError::Config(_)
            | ServerError::Internal(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status() < 500
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::Db(e.to_string())
    }
}
