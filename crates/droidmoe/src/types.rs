use std::{fmt::Display, str::FromStr};

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::mods::ModSet;

#[derive(Debug, thiserror::Error)]
#[error("Invalid score kind '{0}'. Accepted values: 'top', 'recent'")]
pub struct ScoreKindParseError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    Top,
    Recent,
}

impl FromStr for ScoreKind {
    type Err = ScoreKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(ScoreKind::Top),
            "recent" => Ok(ScoreKind::Recent),
            _ => Err(ScoreKindParseError(s.to_string())),
        }
    }
}

impl Display for ScoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreKind::Top => write!(f, "top"),
            ScoreKind::Recent => write!(f, "recent"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid grade '{0}'. Accepted values: XH, X, SH, S, A, B, C, D")]
pub struct GradeParseError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    XH,
    X,
    SH,
    S,
    A,
    B,
    C,
    D,
}

impl FromStr for Grade {
    type Err = GradeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "XH" => Ok(Grade::XH),
            "X" => Ok(Grade::X),
            "SH" => Ok(Grade::SH),
            "S" => Ok(Grade::S),
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            _ => Err(GradeParseError(s.to_string())),
        }
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::XH => "XH",
            Grade::X => "X",
            Grade::SH => "SH",
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub score: Option<u32>,
    pub dpp: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u32,
    pub username: String,
    pub avatar_url: String,
    pub country: String,
    pub rank: Rank,
    pub ranked_score: u64,
    pub dpp: f64,
    pub accuracy: f64,
    pub playcount: u32,
}

impl Display for UserProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌─ {} (uid {}) ─ {}", self.username, self.id, self.country)?;
        match self.rank.score {
            Some(rank) => writeln!(f, "│  Score rank: #{}", rank)?,
            None => writeln!(f, "│  Score rank: unranked")?,
        }
        match self.rank.dpp {
            Some(rank) => writeln!(f, "│  DPP rank:   #{}", rank)?,
            None => writeln!(f, "│  DPP rank:   unranked")?,
        }
        writeln!(f, "│  Ranked score: {}", self.ranked_score)?;
        writeln!(f, "│  DPP:          {:.2}", self.dpp)?;
        writeln!(f, "│  Accuracy:     {:.2}%", self.accuracy)?;
        writeln!(f, "│  Playcount:    {}", self.playcount)?;
        write!(f, "└─ {}", self.avatar_url)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub title: String,
    pub grade: Grade,
    pub score: u64,
    pub timestamp: i64,
    pub dpp: f64,
    pub accuracy: f64,
    pub mods: ModSet,
    pub combo: u32,
    pub misses: u32,
    pub hash: String,
    pub user: UserProfile,
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let when = DateTime::from_timestamp_millis(self.timestamp)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| format!("epoch {} ms", self.timestamp));
        writeln!(f, "┌─ {} [{}]", self.title, self.grade)?;
        writeln!(
            f,
            "│  score: {}  combo: {}x  miss: {}",
            self.score, self.combo, self.misses
        )?;
        writeln!(
            f,
            "│  accuracy: {:.2}%  pp: {:.2}  mods: {}",
            self.accuracy, self.dpp, self.mods
        )?;
        writeln!(f, "│  set on: {}", when)?;
        write!(f, "└─ hash: {}", self.hash)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserRequest {
    pub uid: u32,
    /// A payload previously returned by `fetch_profile_page`, to skip the network round trip.
    pub page: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScoreRequest {
    pub uid: u32,
    /// A payload previously returned by `fetch_profile_page`, to skip the network round trip.
    pub page: Option<String>,
    pub kind: ScoreKind,
    /// Caps the result count. 0 or more than the available count returns the full list.
    pub limit: Option<u32>,
}
