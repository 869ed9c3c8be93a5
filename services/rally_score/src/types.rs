use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::mode::Mode;

/// Which side a point, game or match belongs to. `None` means undecided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum TeamSide {
    None,
    Side1,
    Side2,
}

impl TeamSide {
    /// Maps a wire point value to the side that scored it. Only `1` and `2`
    /// are points; anything else is not.
    pub fn from_point(value: i64) -> Option<TeamSide> {
        match value {
            1 => Some(TeamSide::Side1),
            2 => Some(TeamSide::Side2),
            _ => None,
        }
    }

    pub fn index(self) -> Option<usize> {
        match self {
            TeamSide::None => None,
            TeamSide::Side1 => Some(0),
            TeamSide::Side2 => Some(1),
        }
    }

    pub fn from_index(index: usize) -> TeamSide {
        match index {
            0 => TeamSide::Side1,
            1 => TeamSide::Side2,
            _ => TeamSide::None,
        }
    }

    pub fn is_decided(self) -> bool {
        self != TeamSide::None
    }
}

impl From<TeamSide> for u8 {
    fn from(side: TeamSide) -> u8 {
        match side {
            TeamSide::None => 0,
            TeamSide::Side1 => 1,
            TeamSide::Side2 => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub country: String,
    #[serde(rename = "player")]
    pub name: String,
}

/// `info` block of a submitted document, as decoded and before any rule is
/// checked. Missing fields decode to their unset values so that they are
/// reported as rule violations rather than as malformed input.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMatchInfo {
    #[serde(default)]
    pub mode: i64,
    #[serde(default)]
    pub team1: Vec<Player>,
    #[serde(default)]
    pub team2: Vec<Player>,
    #[serde(with = "crate::unix_time", default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(with = "crate::unix_time", default)]
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGame {
    #[serde(default)]
    pub points: Vec<i64>,
}

/// A submitted match document. Computed fields of a previously validated
/// match are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMatch {
    pub info: RawMatchInfo,
    #[serde(default)]
    pub games: Vec<RawGame>,
}

/// Structurally valid match metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInfo {
    pub mode: Mode,
    pub side1: Vec<Player>,
    pub side2: Vec<Player>,
    pub start: DateTime<Utc>,
    /// Set once validation passes; defaults to the time of parsing for a
    /// match still being played.
    pub end: Option<DateTime<Utc>>,
    /// True when `end` was not submitted and was filled in at parse time.
    pub in_progress: bool,
}

impl MatchInfo {
    pub fn is_doubles(&self) -> bool {
        self.side1.len() == 2
    }

    pub fn side(&self, side: TeamSide) -> Option<&[Player]> {
        match side {
            TeamSide::None => None,
            TeamSide::Side1 => Some(&self.side1),
            TeamSide::Side2 => Some(&self.side2),
        }
    }
}

#[derive(Serialize)]
struct WireInfo<'a> {
    mode: Mode,
    team1: &'a [Player],
    team2: &'a [Player],
    #[serde(with = "crate::unix_time")]
    start: Option<DateTime<Utc>>,
    #[serde(with = "crate::unix_time")]
    end: Option<DateTime<Utc>>,
}

// A defaulted end time is not part of the submitted document, so it is
// written back as unset.
impl Serialize for MatchInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        WireInfo {
            mode: self.mode,
            team1: &self.side1,
            team2: &self.side2,
            start: Some(self.start),
            end: if self.in_progress { None } else { self.end },
        }
        .serialize(serializer)
    }
}

/// Per-side numbers for a game or a whole match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SideStats {
    pub points_won: u32,
    pub max_consecutive_points: u32,
    pub game_points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub points: Vec<TeamSide>,
    pub winner: TeamSide,
    pub points_played: u32,
    pub side1: SideStats,
    pub side2: SideStats,
}

impl Game {
    pub fn stats(&self, side: TeamSide) -> Option<&SideStats> {
        match side {
            TeamSide::None => None,
            TeamSide::Side1 => Some(&self.side1),
            TeamSide::Side2 => Some(&self.side2),
        }
    }
}

/// A validated match with every derived statistic filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub info: MatchInfo,
    pub games: Vec<Game>,
    pub winner: TeamSide,
    pub duration_minutes: i64,
    pub points_played: u32,
    pub side1: SideStats,
    pub side2: SideStats,
}

impl Match {
    pub fn games_won(&self, side: TeamSide) -> usize {
        self.games.iter().filter(|g| side.is_decided() && g.winner == side).count()
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_decided()
    }
}
