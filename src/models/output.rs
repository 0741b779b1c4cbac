use serde::{Deserialize, Serialize};
use crate::models::domain::ScoredCandidate;

/// Game record in the published output format
///
/// Shared by recommendation lists and the owned-games export. Internal
/// ranking fields (final score, global rank) are never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    pub name: String,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numplays: Option<u32>,
    pub avgweight: f64,
    pub minplayers: u32,
    pub maxplayers: u32,
    pub playingtime: u32,
    pub yearpublished: String,
    pub average: f64,
    pub itemtype: String,
    pub bggbestplayers: String,
    pub bggrecplayers: String,
}

impl From<&ScoredCandidate> for GameRecord {
    fn from(scored: &ScoredCandidate) -> Self {
        Self {
            id: scored.candidate.id.clone(),
            name: scored.candidate.name.clone(),
            rating: 0.0,
            numplays: None,
            avgweight: scored.attributes.complexity_weight,
            minplayers: scored.attributes.min_players,
            maxplayers: scored.attributes.max_players,
            playingtime: scored.attributes.playing_time,
            yearpublished: scored.candidate.publication_year.to_string(),
            average: scored.candidate.community_average,
            itemtype: "boardgame".to_string(),
            bggbestplayers: String::new(),
            bggrecplayers: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{AttributeEstimate, CandidateGame};
    use std::collections::BTreeSet;

    #[test]
    fn test_scored_candidate_strips_internal_fields() {
        let scored = ScoredCandidate {
            candidate: CandidateGame {
                id: "224517".to_string(),
                name: "Brass: Birmingham".to_string(),
                global_rank: Some(1),
                is_expansion: false,
                community_average: 8.6,
                publication_year: 2018,
                categories: BTreeSet::new(),
            },
            attributes: AttributeEstimate::default(),
            composite_score: 7.0,
            rank_boost: 0.5,
            final_score: 7.5,
        };

        let record = GameRecord::from(&scored);
        assert_eq!(record.rating, 0.0);
        assert_eq!(record.yearpublished, "2018");
        assert_eq!(record.itemtype, "boardgame");

        let json = serde_json::to_value(&record).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert!(!keys.iter().any(|k| k.contains("score") || k.as_str() == "rank"));
        assert!(json.get("numplays").is_none());
        assert_eq!(json["bggbestplayers"], "");
    }
}
