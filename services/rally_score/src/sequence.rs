use tracing::debug;

use crate::{
    clock::Clock,
    error::ValidationError,
    mode::ModeRules,
    types::{Game, MatchInfo},
};

/// Rejects a match with more games than its mode allows. Runs before any
/// game is replayed, so an oversized match is `InvalidGame` whatever its
/// points contain.
pub fn check_game_count(count: usize, rules: ModeRules) -> Result<(), ValidationError> {
    if count > rules.max_games {
        debug!("{} games exceed the limit of {}", count, rules.max_games);
        return Err(ValidationError::InvalidGame);
    }
    Ok(())
}

/// Checks that the individually valid games form a legal match:
///
/// - no more than `max_games` games;
/// - an undecided game only as the last game, and only while the match has
///   no end time;
/// - once a side has won `games_to_win` games nothing follows, and the match
///   has an end time.
pub fn check_sequence(info: &MatchInfo, games: &[Game]) -> Result<(), ValidationError> {
    let rules = info.mode.rules();

    check_game_count(games.len(), rules)?;

    let mut wins = [0u32; 2];
    for (i, game) in games.iter().enumerate() {
        let is_last = i + 1 == games.len();

        match game.winner.index() {
            Some(side) => wins[side] += 1,
            None if is_last && info.end.is_none() => {}
            None => {
                debug!("Game {} is undecided but is not the running game", i + 1);
                return Err(ValidationError::InvalidGame);
            }
        }

        if wins.iter().any(|&w| w >= rules.games_to_win) && (!is_last || info.end.is_none()) {
            debug!("Match was decided in game {} but is not complete", i + 1);
            return Err(ValidationError::InvalidGame);
        }
    }

    Ok(())
}

/// Runs [`check_sequence`] and, only if it passes, gives a match without an
/// end time the clock's current time so that its duration reads "as of now".
pub fn settle_end_time(
    info: &mut MatchInfo,
    games: &[Game],
    clock: &dyn Clock,
) -> Result<(), ValidationError> {
    check_sequence(info, games)?;

    if info.end.is_none() {
        info.end = Some(clock.now());
        info.in_progress = true;
    }
    Ok(())
}
