pub mod clock;
pub mod config;
pub mod country;
pub mod error;
pub mod game;
pub mod metrics;
pub mod mode;
pub mod parser;
pub mod render;
pub mod sequence;
pub mod stats;
pub mod store;
pub mod structure;
pub mod types;
pub mod unix_time;
pub mod web;

pub use error::{ParseError, ValidationError};
pub use mode::{Mode, ModeRules};
pub use parser::{parse, Parser};
pub use types::{Game, Match, MatchInfo, Player, SideStats, TeamSide};
