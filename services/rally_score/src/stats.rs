use chrono::{DateTime, Utc};

use crate::types::{Game, Match, MatchInfo, SideStats, TeamSide};

/// Rolls per-game numbers up into the match record. Assumes every game has
/// already been validated and the end time settled.
pub fn aggregate(info: MatchInfo, games: Vec<Game>) -> Match {
    let rules = info.mode.rules();

    let points_played: u32 = games.iter().map(|g| g.points_played).sum();
    let side1 = combine(games.iter().map(|g| &g.side1));
    let side2 = combine(games.iter().map(|g| &g.side2));

    let winner = [TeamSide::Side1, TeamSide::Side2]
        .into_iter()
        .find(|&side| games.iter().filter(|g| g.winner == side).count() == rules.games_to_win as usize)
        .unwrap_or(TeamSide::None);

    let duration_minutes = duration_minutes(info.start, info.end);

    Match {
        info,
        games,
        winner,
        duration_minutes,
        points_played,
        side1,
        side2,
    }
}

/// Points and game points add up across games; the longest run is the
/// longest of any single game.
fn combine<'a>(per_game: impl Iterator<Item = &'a SideStats>) -> SideStats {
    per_game.fold(SideStats::default(), |total, game| SideStats {
        points_won: total.points_won + game.points_won,
        max_consecutive_points: total.max_consecutive_points.max(game.max_consecutive_points),
        game_points: total.game_points + game.game_points,
    })
}

/// Whole minutes between start and end, rounded to the nearest minute and
/// never negative. A missing end counts as zero.
pub fn duration_minutes(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> i64 {
    let Some(end) = end else {
        return 0;
    };
    let seconds = (end - start).num_seconds();
    let minutes = (seconds as f64 / 60.0).round() as i64;
    minutes.max(0)
}
