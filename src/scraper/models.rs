use crate::scraper::ScraperError;
use serde::Serialize;

/// (walk, bus, bike) as rendered by the walkscore badges, in that order.
///
/// Smaller towns often have no transit badge, so only the walk score is
/// guaranteed; trailing scores the page does not show stay empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalkScoreTriple {
    pub walk: u8,
    pub bus: Option<u8>,
    pub bike: Option<u8>,
}

impl TryFrom<&[u8]> for WalkScoreTriple {
    type Error = ScraperError;

    fn try_from(scores: &[u8]) -> Result<Self, Self::Error> {
        let (&walk, rest) = scores.split_first().ok_or(ScraperError::NoBadges)?;
        Ok(Self {
            walk,
            bus: rest.first().copied(),
            bike: rest.get(1).copied(),
        })
    }
}
