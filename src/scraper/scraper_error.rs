use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("HTML parse error: {0}")]
    HtmlParse(String),
    #[error("Invalid walkscore URL: {0}")]
    Url(String),
    #[error("No score badges on page")]
    NoBadges,
}

impl From<reqwest::Error> for ScraperError {
    fn from(e: reqwest::Error) -> Self {
        ScraperError::Network(e.to_string())
    }
}
