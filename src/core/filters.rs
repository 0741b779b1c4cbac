use serde::{Deserialize, Serialize};

use crate::models::{CandidateGame, ExclusionSet, GameRecord};

/// Outcome of screening one candidate from the global pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screening {
    Keep,
    /// Rank absent or zero
    Unranked,
    /// Rank beyond the configured maximum
    OutOfRange,
    /// Owned or previously owned
    Excluded,
    Expansion,
}

/// Screen a pool candidate before scoring
///
/// Checks run in order: rank, exclusion, expansion. The first failing
/// check decides the outcome.
#[inline]
pub fn screen_candidate(
    candidate: &CandidateGame,
    exclusions: &ExclusionSet,
    max_rank: u32,
) -> Screening {
    match candidate.global_rank {
        None | Some(0) => return Screening::Unranked,
        Some(rank) if rank > max_rank => return Screening::OutOfRange,
        Some(_) => {}
    }

    if exclusions.contains(&candidate.id) {
        return Screening::Excluded;
    }

    if candidate.is_expansion {
        return Screening::Expansion;
    }

    Screening::Keep
}

/// Complexity band for browsing (inclusive bounds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplexityBand {
    Light,
    Medium,
    Heavy,
}

impl ComplexityBand {
    pub fn contains(self, weight: f64) -> bool {
        let (lo, hi) = match self {
            ComplexityBand::Light => (1.0, 2.0),
            ComplexityBand::Medium => (2.0, 3.5),
            ComplexityBand::Heavy => (3.5, 5.0),
        };
        weight >= lo && weight <= hi
    }
}

/// Playing time band for browsing, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DurationBand {
    Quick,
    Medium,
    Long,
    VeryLong,
}

impl DurationBand {
    pub fn contains(self, minutes: u32) -> bool {
        match self {
            DurationBand::Quick => minutes <= 30,
            DurationBand::Medium => minutes > 30 && minutes <= 60,
            DurationBand::Long => minutes > 60 && minutes <= 90,
            DurationBand::VeryLong => minutes > 90,
        }
    }
}

/// Player count that the browse filter reads as "this many or more"
pub const OPEN_ENDED_PLAYER_COUNT: u32 = 6;

/// Filter applied when browsing a published game list
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrowseFilter {
    pub players: Option<u32>,
    pub complexity: Option<ComplexityBand>,
    pub duration: Option<DurationBand>,
}

impl BrowseFilter {
    pub fn matches(&self, game: &GameRecord) -> bool {
        if let Some(players) = self.players {
            if players == OPEN_ENDED_PLAYER_COUNT {
                if game.maxplayers < players {
                    return false;
                }
            } else if game.minplayers > players || game.maxplayers < players {
                return false;
            }
        }

        if let Some(band) = self.complexity {
            if !band.contains(game.avgweight) {
                return false;
            }
        }

        if let Some(band) = self.duration {
            if !band.contains(game.playingtime) {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&self, games: &'a [GameRecord]) -> Vec<&'a GameRecord> {
        games.iter().filter(|g| self.matches(g)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn create_candidate(id: &str, rank: Option<u32>, is_expansion: bool) -> CandidateGame {
        CandidateGame {
            id: id.to_string(),
            name: format!("Game {}", id),
            global_rank: rank,
            is_expansion,
            community_average: 7.2,
            publication_year: 2019,
            categories: BTreeSet::new(),
        }
    }

    fn create_record(min: u32, max: u32, weight: f64, time: u32) -> GameRecord {
        GameRecord {
            id: "1".to_string(),
            name: "Test".to_string(),
            rating: 0.0,
            numplays: None,
            avgweight: weight,
            minplayers: min,
            maxplayers: max,
            playingtime: time,
            yearpublished: "2020".to_string(),
            average: 7.0,
            itemtype: "boardgame".to_string(),
            bggbestplayers: String::new(),
            bggrecplayers: String::new(),
        }
    }

    #[test]
    fn test_screen_keeps_ranked_base_game() {
        let exclusions = ExclusionSet::new();
        assert_eq!(
            screen_candidate(&create_candidate("1", Some(1), false), &exclusions, 5000),
            Screening::Keep
        );
        assert_eq!(
            screen_candidate(&create_candidate("1", Some(5000), false), &exclusions, 5000),
            Screening::Keep
        );
    }

    #[test]
    fn test_screen_rank_checks() {
        let exclusions = ExclusionSet::new();
        assert_eq!(
            screen_candidate(&create_candidate("1", None, false), &exclusions, 5000),
            Screening::Unranked
        );
        assert_eq!(
            screen_candidate(&create_candidate("1", Some(0), false), &exclusions, 5000),
            Screening::Unranked
        );
        assert_eq!(
            screen_candidate(&create_candidate("1", Some(5001), false), &exclusions, 5000),
            Screening::OutOfRange
        );
    }

    #[test]
    fn test_screen_exclusion_before_expansion() {
        let exclusions: ExclusionSet = ["7"].into_iter().collect();
        assert_eq!(
            screen_candidate(&create_candidate("7", Some(10), true), &exclusions, 5000),
            Screening::Excluded
        );
        assert_eq!(
            screen_candidate(&create_candidate("8", Some(10), true), &exclusions, 5000),
            Screening::Expansion
        );
    }

    #[test]
    fn test_browse_player_count() {
        let filter = BrowseFilter {
            players: Some(2),
            ..Default::default()
        };
        assert!(filter.matches(&create_record(1, 4, 2.5, 60)));
        assert!(!filter.matches(&create_record(3, 5, 2.5, 60)));

        let six_plus = BrowseFilter {
            players: Some(6),
            ..Default::default()
        };
        assert!(six_plus.matches(&create_record(3, 8, 2.5, 60)));
        assert!(six_plus.matches(&create_record(7, 10, 2.5, 60)));
        assert!(!six_plus.matches(&create_record(1, 5, 2.5, 60)));
    }

    #[test]
    fn test_browse_only_six_is_open_ended() {
        let seven = BrowseFilter {
            players: Some(7),
            ..Default::default()
        };
        assert!(!seven.matches(&create_record(8, 10, 2.5, 60)));
        assert!(seven.matches(&create_record(2, 8, 2.5, 60)));
        assert!(!seven.matches(&create_record(2, 6, 2.5, 60)));
    }

    #[test]
    fn test_browse_bands_are_inclusive_at_edges() {
        assert!(ComplexityBand::Light.contains(2.0));
        assert!(ComplexityBand::Medium.contains(2.0));
        assert!(ComplexityBand::Heavy.contains(5.0));
        assert!(!ComplexityBand::Light.contains(0.5));

        assert!(DurationBand::Quick.contains(30));
        assert!(!DurationBand::Medium.contains(30));
        assert!(DurationBand::Long.contains(90));
        assert!(DurationBand::VeryLong.contains(91));
    }

    #[test]
    fn test_browse_combined() {
        let games = vec![
            create_record(2, 4, 3.8, 120),
            create_record(2, 4, 1.5, 20),
            create_record(1, 1, 4.0, 180),
        ];
        let filter = BrowseFilter {
            players: Some(2),
            complexity: Some(ComplexityBand::Heavy),
            duration: Some(DurationBand::VeryLong),
        };

        let matched = filter.apply(&games);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].avgweight, 3.8);
        assert!(BrowseFilter::default().apply(&games).len() == 3);
    }
}
