//! Hard-coded mock competitors for the leaderboard.

use crate::shared::*;

fn rival(name: &str, points: u64) -> LeaderboardEntry {
    LeaderboardEntry {
        name: name.to_string(),
        points,
        is_player: false,
    }
}

pub fn populate_rivals(board: &mut Leaderboard) {
    board.rivals = vec![
        rival("Clover", 820),
        rival("Barley", 645),
        rival("Sorrel", 410),
        rival("Fennel", 290),
        rival("Thistle", 130),
        rival("Bramble", 45),
    ];
}
