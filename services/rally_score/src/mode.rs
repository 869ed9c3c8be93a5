use serde::Serialize;

use crate::error::ValidationError;

/// Scoring mode of a match, encoded on the wire as the number of points
/// needed to win a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Mode {
    Mode11,
    Mode21,
}

/// Fixed rule parameters of a scoring mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRules {
    pub win_points: u32,
    /// Sudden-death score that ends a game regardless of the lead.
    pub cap_points: u32,
    pub games_to_win: u32,
    pub max_games: usize,
}

const MODE11_RULES: ModeRules = ModeRules {
    win_points: 11,
    cap_points: 15,
    games_to_win: 3,
    max_games: 5,
};

const MODE21_RULES: ModeRules = ModeRules {
    win_points: 21,
    cap_points: 30,
    games_to_win: 2,
    max_games: 3,
};

impl Mode {
    pub fn rules(self) -> ModeRules {
        match self {
            Mode::Mode11 => MODE11_RULES,
            Mode::Mode21 => MODE21_RULES,
        }
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> u8 {
        match mode {
            Mode::Mode11 => 11,
            Mode::Mode21 => 21,
        }
    }
}

impl TryFrom<i64> for Mode {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            11 => Ok(Mode::Mode11),
            21 => Ok(Mode::Mode21),
            _ => Err(ValidationError::InvalidMode),
        }
    }
}
