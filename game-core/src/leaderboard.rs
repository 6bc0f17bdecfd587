use std::cmp::Ordering;

use game_types::User;

/// Leaderboard ordering: score descending, ties broken by name ascending.
/// This is the canonical order for every user list the service returns.
pub fn leaderboard_order(a: &User, b: &User) -> Ordering {
    b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name))
}

pub fn sort_leaderboard(users: &mut [User]) {
    users.sort_by(leaderboard_order);
}

/// 1-based rank of a user within an already-sorted leaderboard.
pub fn rank_of(users: &[User], user_id: &str) -> Option<usize> {
    users.iter().position(|u| u.id == user_id).map(|i| i + 1)
}
