use crate::{
    error::ValidationError,
    mode::ModeRules,
    types::{Game, SideStats, TeamSide},
};

/// Running state of one game, fed point by point.
#[derive(Debug, Clone)]
struct Scoreboard {
    rules: ModeRules,
    score: [u32; 2],
    run: [u32; 2],
    max_run: [u32; 2],
    game_points: [u32; 2],
}

impl Scoreboard {
    fn new(rules: ModeRules) -> Self {
        Self {
            rules,
            score: [0; 2],
            run: [0; 2],
            max_run: [0; 2],
            game_points: [0; 2],
        }
    }

    fn record(&mut self, scorer: usize) {
        let opponent = 1 - scorer;

        self.score[scorer] += 1;
        self.run[scorer] += 1;
        self.run[opponent] = 0;
        self.max_run[scorer] = self.max_run[scorer].max(self.run[scorer]);

        for side in 0..2 {
            if self.is_game_point(side) {
                self.game_points[side] += 1;
            }
        }
    }

    /// One point from winning. The two triggers are independent: reaching
    /// `win_points - 1` while ahead, or `cap_points - 1` while the opponent
    /// is still below the cap.
    fn is_game_point(&self, side: usize) -> bool {
        let own = self.score[side];
        let other = self.score[1 - side];

        let near_win = own + 1 == self.rules.win_points && other < own;
        let near_cap = own + 1 == self.rules.cap_points && other < self.rules.cap_points;

        near_win || near_cap
    }

    fn has_won(&self, side: usize) -> bool {
        let own = self.score[side];
        let other = self.score[1 - side];

        own == self.rules.cap_points || (own >= self.rules.win_points && own >= other + 2)
    }

    fn winner(&self) -> TeamSide {
        (0..2)
            .find(|&side| self.has_won(side))
            .map_or(TeamSide::None, TeamSide::from_index)
    }

    fn side_stats(&self, side: usize) -> SideStats {
        SideStats {
            points_won: self.score[side],
            max_consecutive_points: self.max_run[side],
            game_points: self.game_points[side],
        }
    }
}

/// Replays a game's recorded points and derives its winner and statistics.
///
/// The point that decides the game must be the last one recorded. A game
/// that nobody has won yet comes back with `winner == TeamSide::None`;
/// whether that is acceptable depends on its position in the match, which
/// [`crate::sequence`] checks.
pub fn replay_game(points: &[i64], rules: ModeRules) -> Result<Game, ValidationError> {
    let mut board = Scoreboard::new(rules);
    let mut sides = Vec::with_capacity(points.len());

    for (i, &value) in points.iter().enumerate() {
        let side = TeamSide::from_point(value).ok_or(ValidationError::InvalidPoint)?;
        let scorer = side.index().ok_or(ValidationError::InvalidPoint)?;

        board.record(scorer);
        sides.push(side);

        if board.has_won(scorer) && i + 1 != points.len() {
            return Err(ValidationError::InvalidPoint);
        }
    }

    Ok(Game {
        points: sides,
        winner: board.winner(),
        points_played: board.score[0] + board.score[1],
        side1: board.side_stats(0),
        side2: board.side_stats(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Mode;

    const AXELSEN_CHOU_GAME1: [i64; 31] = [
        1, 2, 1, 2, 2, 1, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 1, 2, 1, 2, 2, 1, 1, 2, 2, 2, 2, 2, 1, 1, 2,
    ];

    fn repeat(side: i64, n: usize) -> Vec<i64> {
        vec![side; n]
    }

    #[test]
    fn test_mode21_game() {
        let game = replay_game(&AXELSEN_CHOU_GAME1, Mode::Mode21.rules()).unwrap();

        assert_eq!(game.winner, TeamSide::Side2);
        assert_eq!(game.points_played, 31);
        assert_eq!(game.side1.points_won, 10);
        assert_eq!(game.side2.points_won, 21);
        assert_eq!(game.side1.max_consecutive_points, 2);
        assert_eq!(game.side2.max_consecutive_points, 5);
        assert_eq!(game.side1.game_points, 0);
        assert_eq!(game.side2.game_points, 3);
    }

    #[test]
    fn test_trailing_point_after_win() {
        let mut points = AXELSEN_CHOU_GAME1.to_vec();
        points.push(1);
        assert_eq!(
            replay_game(&points, Mode::Mode21.rules()),
            Err(ValidationError::InvalidPoint)
        );
    }

    #[test]
    fn test_invalid_point_values() {
        for bad in [0, 3, -1] {
            assert_eq!(
                replay_game(&[1, 2, bad], Mode::Mode11.rules()),
                Err(ValidationError::InvalidPoint)
            );
        }
    }

    #[test]
    fn test_unfinished_game() {
        let game = replay_game(&[1, 1, 2], Mode::Mode11.rules()).unwrap();
        assert_eq!(game.winner, TeamSide::None);
        assert_eq!(game.points_played, 3);

        let game = replay_game(&[], Mode::Mode11.rules()).unwrap();
        assert_eq!(game.winner, TeamSide::None);
        assert_eq!(game.points_played, 0);
        assert_eq!(game.side1, SideStats::default());
    }

    #[test]
    fn test_win_needs_two_point_lead() {
        // 10:10, then 11:10 is not a win
        let mut points = Vec::new();
        for _ in 0..10 {
            points.extend([1, 2]);
        }
        points.push(1);
        let game = replay_game(&points, Mode::Mode11.rules()).unwrap();
        assert_eq!(game.winner, TeamSide::None);

        points.push(1);
        let game = replay_game(&points, Mode::Mode11.rules()).unwrap();
        assert_eq!(game.winner, TeamSide::Side1);
        assert_eq!((game.side1.points_won, game.side2.points_won), (12, 10));
    }

    #[test]
    fn test_cap_ends_game_without_lead() {
        // 14:14, then 15:14 ends a mode 11 game
        let mut points = Vec::new();
        for _ in 0..14 {
            points.extend([2, 1]);
        }
        points.push(2);
        let game = replay_game(&points, Mode::Mode11.rules()).unwrap();
        assert_eq!(game.winner, TeamSide::Side2);
        assert_eq!((game.side1.points_won, game.side2.points_won), (14, 15));

        points.push(2);
        assert_eq!(
            replay_game(&points, Mode::Mode11.rules()),
            Err(ValidationError::InvalidPoint)
        );
    }

    #[test]
    fn test_trailing_run_counts() {
        let mut points = vec![1, 1, 2];
        points.extend(repeat(2, 10));
        let game = replay_game(&points, Mode::Mode21.rules()).unwrap();
        assert_eq!(game.winner, TeamSide::None);
        assert_eq!(game.side1.max_consecutive_points, 2);
        assert_eq!(game.side2.max_consecutive_points, 11);
    }

    #[test]
    fn test_game_point_counting() {
        // 10:0 is a game point for side 1, each point side 2 wins while
        // side 1 sits on 10 is another one
        let mut points = repeat(1, 10);
        points.extend(repeat(2, 3));
        points.push(1);
        let game = replay_game(&points, Mode::Mode11.rules()).unwrap();
        assert_eq!(game.winner, TeamSide::Side1);
        assert_eq!(game.side1.game_points, 4);
        assert_eq!(game.side2.game_points, 0);
    }

    #[test]
    fn test_game_point_near_cap() {
        // 13:13 -> 14:13 (cap - 1), 14:14 (both on cap - 1), 15:14
        let mut points = Vec::new();
        for _ in 0..13 {
            points.extend([1, 2]);
        }
        points.extend([1, 2, 1]);
        let game = replay_game(&points, Mode::Mode11.rules()).unwrap();
        assert_eq!(game.winner, TeamSide::Side1);
        // 10:9 once for side 1, 14:13 and 14:14 near the cap
        assert_eq!(game.side1.game_points, 3);
        // 14:14 near the cap
        assert_eq!(game.side2.game_points, 1);
    }
}
