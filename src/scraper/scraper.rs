// scraper.rs
use crate::domain::city::CityKey;
use crate::errors::ServerError;
use crate::scraper::{ScraperError, WalkScoreTriple};
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

const BADGE_SELECTOR: &str = ".block-header-badge img";

/// Anything that can produce a walk score triple for a city.
pub trait ScoreProvider: Send + Sync {
    fn fetch_walkscore(&self, key: &CityKey) -> Result<WalkScoreTriple, ServerError>;
}

/// Scrapes the public walkscore.com city page. One request per call, no
/// caching, no retry.
pub struct WalkScoreScraper {
    client: Client,
    base_url: Url,
}

impl WalkScoreScraper {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ScraperError> {
        let base_url = Url::parse(base_url).map_err(|e| ScraperError::Url(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ScraperError::Url(format!("{base_url} cannot be a base URL")));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// `{base}/{state}/{city}`, with each segment percent-encoded.
    pub fn page_url(&self, key: &CityKey) -> Result<Url, ScraperError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ScraperError::Url(self.base_url.to_string()))?;
            segments.pop_if_empty().push(key.state()).push(key.city());
        }
        Ok(url)
    }

    pub fn fetch_html(&self, url: &Url) -> Result<String, ScraperError> {
        let start = Instant::now();
        let resp = self.client.get(url.clone()).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScraperError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = resp.text()?;
        debug!(%url, elapsed = ?start.elapsed(), bytes = text.len(), "walkscore page fetched");
        Ok(text)
    }

    pub fn fetch_scores(&self, key: &CityKey) -> Result<WalkScoreTriple, ScraperError> {
        let url = self.page_url(key)?;
        let html = self.fetch_html(&url)?;
        let scores = parse_badges(&html)?;
        WalkScoreTriple::try_from(scores.as_slice())
    }
}

impl ScoreProvider for WalkScoreScraper {
    fn fetch_walkscore(&self, key: &CityKey) -> Result<WalkScoreTriple, ServerError> {
        self.fetch_scores(key).map_err(|e| {
            warn!(city = key.city(), state = key.state(), "walkscore unavailable: {e}");
            key.score_unavailable()
        })
    }
}

/// Pull the badge scores out of a walkscore page, in page order.
///
/// A page without badges yields an empty list.
pub fn parse_badges(html: &str) -> Result<Vec<u8>, ScraperError> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse(BADGE_SELECTOR).map_err(|e| ScraperError::HtmlParse(e.to_string()))?;

    document
        .select(&selector)
        .map(|img| {
            badge_score(img).ok_or_else(|| {
                ScraperError::HtmlParse(format!("unreadable score badge: {}", img.html()))
            })
        })
        .collect()
}

// The score leads the alt text ("87 Walk Score of ..."); older markup only
// carries it in the image file name (".../score/87.svg").
fn badge_score(img: ElementRef<'_>) -> Option<u8> {
    let el = img.value();

    el.attr("alt")
        .and_then(leading_number)
        .or_else(|| {
            el.attr("src")
                .and_then(|src| src.rsplit('/').next())
                .and_then(|file| file.split('.').next())
                .and_then(leading_number)
        })
}

fn leading_number(text: &str) -> Option<u8> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    text[..end].parse::<u8>().ok().filter(|score| *score <= 100)
}
