use game_types::User;

/// Creates a test user with specified attributes
pub fn create_test_user(id: &str, name: &str, is_admin: bool) -> User {
    create_test_user_with_score(id, name, is_admin, 0)
}

/// Creates a test user with a specific score
pub fn create_test_user_with_score(id: &str, name: &str, is_admin: bool, score: i32) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        is_admin,
        score,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        updated_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

/// Creates the standard test roster: one admin plus two players
pub fn create_standard_roster() -> Vec<User> {
    vec![
        create_test_user("pete", "Pete", true),
        create_test_user("penny", "Penny", false),
        create_test_user("hannah", "Hannah", false),
    ]
}
