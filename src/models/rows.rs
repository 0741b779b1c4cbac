use serde::{Deserialize, Serialize};

/// Row of the user's collection export
///
/// Every column is kept as raw text; numeric parsing is lenient and happens
/// through the accessor methods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionRow {
    pub objectid: String,
    pub objectname: String,
    pub rating: String,
    pub numplays: String,
    pub avgweight: String,
    pub minplayers: String,
    pub maxplayers: String,
    pub playingtime: String,
    pub yearpublished: String,
    pub average: String,
    pub itemtype: String,
    pub bggbestplayers: String,
    pub bggrecplayers: String,
    pub own: String,
    pub prevowned: String,
    pub want: String,
    pub wanttobuy: String,
    pub wanttoplay: String,
    pub wishlist: String,
}

impl CollectionRow {
    pub fn rating(&self) -> f64 {
        parse_f64(&self.rating).unwrap_or(0.0)
    }

    pub fn owned(&self) -> bool {
        parse_flag(&self.own)
    }

    pub fn previously_owned(&self) -> bool {
        parse_flag(&self.prevowned)
    }

    /// Marked as wanted in any of the want/wishlist columns
    pub fn wanted(&self) -> bool {
        parse_flag(&self.want)
            || parse_flag(&self.wanttobuy)
            || parse_flag(&self.wanttoplay)
            || parse_flag(&self.wishlist)
    }
}

/// Row of the global rankings dump
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingRow {
    pub id: String,
    pub name: String,
    pub yearpublished: String,
    pub rank: String,
    pub bayesaverage: String,
    pub average: String,
    pub usersrated: String,
    pub is_expansion: String,
    pub abstracts_rank: String,
    pub cgs_rank: String,
    pub childrensgames_rank: String,
    pub familygames_rank: String,
    pub partygames_rank: String,
    pub strategygames_rank: String,
    pub thematic_rank: String,
    pub wargames_rank: String,
}

/// Row of the hand-maintained id corrections sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionRow {
    #[serde(rename = "Game Name")]
    pub name: String,
    /// Blank until someone looks the id up
    #[serde(rename = "Correct ID (fill this in)")]
    pub correct_id: String,
}

/// Parse a float, treating blank or malformed text as absent
pub fn parse_f64(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an unsigned integer, accepting float text such as `"60.0"`
pub fn parse_u32(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<u32>().ok().or_else(|| {
        parse_f64(trimmed)
            .filter(|v| *v >= 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
    })
}

pub fn parse_i32(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i32>().ok()
}

/// `1` is set, anything else is unset
#[inline]
pub fn parse_flag(raw: &str) -> bool {
    parse_u32(raw) == Some(1)
}
