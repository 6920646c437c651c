mod models;
mod scraper;
mod scraper_error;

pub use models::WalkScoreTriple;
pub use self::scraper::{ScoreProvider, WalkScoreScraper};
pub use scraper_error::ScraperError;
