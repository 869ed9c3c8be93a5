use tracing::{debug, warn};

use crate::{
    clock::{Clock, SystemClock},
    country::{CountryRegistry, Iso3166},
    error::{ParseError, ValidationError},
    game::replay_game,
    sequence::{check_game_count, settle_end_time},
    stats::aggregate,
    structure::validate_info,
    types::{Game, Match, RawMatch},
};

/// Turns submitted match documents into validated [`Match`] records.
///
/// Holds no state between calls and can be shared across threads.
pub struct Parser {
    registry: Box<dyn CountryRegistry>,
    clock: Box<dyn Clock>,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            registry: Box::new(Iso3166),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_registry(mut self, registry: impl CountryRegistry + 'static) -> Self {
        self.registry = Box::new(registry);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Decodes and validates a match document. The first rule violation
    /// aborts the whole parse.
    pub fn parse(&self, raw: impl AsRef<[u8]>) -> Result<Match, ParseError> {
        let raw: RawMatch = serde_json::from_slice(raw.as_ref()).map_err(|e| {
            debug!("Could not decode match document: {}", e);
            ParseError::InvalidJson(e)
        })?;

        self.validate(raw).map_err(|cause| {
            warn!("Rejecting match: {}", cause);
            ParseError::InvalidMatch(cause)
        })
    }

    fn validate(&self, raw: RawMatch) -> Result<Match, ValidationError> {
        let mut info = validate_info(raw.info, self.registry.as_ref())?;
        let rules = info.mode.rules();
        check_game_count(raw.games.len(), rules)?;

        let games = raw
            .games
            .iter()
            .map(|game| replay_game(&game.points, rules))
            .collect::<Result<Vec<Game>, _>>()?;

        settle_end_time(&mut info, &games, self.clock.as_ref())?;

        Ok(aggregate(info, games))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses with the built-in ISO 3166 registry and the system clock.
pub fn parse(raw: impl AsRef<[u8]>) -> Result<Match, ParseError> {
    Parser::new().parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::FixedClock, types::TeamSide};
    use chrono::{TimeZone, Utc};

    fn document(mode: i64, end: i64, games: &[&[i64]]) -> String {
        serde_json::json!({
            "info": {
                "mode": mode,
                "team1": [{"country": "DE", "player": "A"}],
                "team2": [{"country": "DK", "player": "B"}],
                "start": 1700000000,
                "end": end,
            },
            "games": games.iter().map(|p| serde_json::json!({"points": p})).collect::<Vec<_>>(),
        })
        .to_string()
    }

    #[test]
    fn test_malformed_json() {
        let err = parse("{\"info\": ").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
        assert_eq!(err.violation(), None);
        assert!(err.to_string().starts_with("JSON is invalid"));
    }

    #[test]
    fn test_mistyped_fields() {
        let raw = r#"{"info": {"mode": "eleven"}, "games": []}"#;
        assert!(matches!(parse(raw), Err(ParseError::InvalidJson(_))));

        let raw = r#"{"info": {"mode": 11}, "games": [{"points": ["1"]}]}"#;
        assert!(matches!(parse(raw), Err(ParseError::InvalidJson(_))));
    }

    #[test]
    fn test_missing_fields_are_rule_violations() {
        let err = parse(r#"{"info": {}}"#).unwrap_err();
        assert_eq!(err.violation(), Some(ValidationError::InvalidMode));

        let err = parse(r#"{"info": {"mode": 21}}"#).unwrap_err();
        assert_eq!(err.violation(), Some(ValidationError::InvalidTeams));
    }

    #[test]
    fn test_structural_error_wins_over_game_error() {
        let raw = document(13, 0, &[&[7]]);
        assert_eq!(parse(raw).unwrap_err().violation(), Some(ValidationError::InvalidMode));
    }

    #[test]
    fn test_game_count_wins_over_point_error() {
        let raw = document(21, 1700003000, &[&[1], &[1], &[1], &[9]]);
        assert_eq!(parse(raw).unwrap_err().violation(), Some(ValidationError::InvalidGame));

        let raw = document(11, 0, &[&[0], &[1], &[1], &[1], &[1], &[1]]);
        assert_eq!(parse(raw).unwrap_err().violation(), Some(ValidationError::InvalidGame));
    }

    #[test]
    fn test_point_error_wins_over_sequence_error() {
        // an undecided game before the last is a sequence error, but the bad
        // point in the last game is found first
        let raw = document(21, 0, &[&[1], &[1], &[9]]);
        assert_eq!(parse(raw).unwrap_err().violation(), Some(ValidationError::InvalidPoint));
    }

    #[test]
    fn test_error_message() {
        let err = parse(document(21, 0, &[&[0]])).unwrap_err();
        assert_eq!(err.to_string(), "match is invalid: point is invalid");
    }

    #[test]
    fn test_injected_registry() {
        struct Nowhere;
        impl CountryRegistry for Nowhere {
            fn is_known(&self, _: &str) -> bool {
                false
            }
        }

        let parser = Parser::new().with_registry(Nowhere);
        let err = parser.parse(document(21, 0, &[])).unwrap_err();
        assert_eq!(err.violation(), Some(ValidationError::InvalidCountry));
    }

    #[test]
    fn test_pinned_clock_for_running_match() {
        let now = Utc.with_ymd_and_hms(2023, 11, 14, 23, 13, 20).unwrap();
        let parser = Parser::new().with_clock(FixedClock(now));

        let m = parser.parse(document(11, 0, &[&[1, 2, 2]])).unwrap();
        assert_eq!(m.winner, TeamSide::None);
        assert_eq!(m.info.end, Some(now));
        assert!(m.info.in_progress);
        // 1700000000 is 2023-11-14 22:13:20
        assert_eq!(m.duration_minutes, 60);
    }
}
