use serde::{Deserialize, Serialize};

use game_types::User;

/// Durable client-local session record: the remembered user id and admin
/// flag, persisted across restarts and re-validated against the server's
/// user list on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RememberedUser {
    pub user_id: String,
    pub is_admin: bool,
}

/// Client role state machine. Picking an admin user routes through a
/// password challenge; everything else signs in directly.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionRole {
    Anonymous,
    PendingAdminAuth { user: User },
    Authenticated { user: User },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Accepted,
    Rejected,
}

impl SessionRole {
    /// Selects a user from the roster. Unknown ids stay anonymous.
    pub fn pick_user(self, users: &[User], user_id: &str) -> SessionRole {
        match users.iter().find(|u| u.id == user_id) {
            Some(user) if user.is_admin => SessionRole::PendingAdminAuth { user: user.clone() },
            Some(user) => SessionRole::Authenticated { user: user.clone() },
            None => SessionRole::Anonymous,
        }
    }

    /// Resolves the password challenge. The shared password is compared
    /// client-side with no server enforcement, mirroring the observed
    /// behavior; this is a known security weakness, not an oversight.
    pub fn submit_password(self, entered: &str, expected: &str) -> (SessionRole, AuthOutcome) {
        match self {
            SessionRole::PendingAdminAuth { user } => {
                if entered == expected {
                    (SessionRole::Authenticated { user }, AuthOutcome::Accepted)
                } else {
                    (
                        SessionRole::PendingAdminAuth { user },
                        AuthOutcome::Rejected,
                    )
                }
            }
            other => (other, AuthOutcome::Rejected),
        }
    }

    /// Abandons a pending password challenge.
    pub fn cancel(self) -> SessionRole {
        match self {
            SessionRole::PendingAdminAuth { .. } => SessionRole::Anonymous,
            other => other,
        }
    }

    pub fn sign_out(self) -> SessionRole {
        SessionRole::Anonymous
    }

    /// Restores a remembered session against the latest user list. A stale
    /// id (user deleted server-side) clears back to anonymous.
    pub fn restore(remembered: &RememberedUser, users: &[User]) -> SessionRole {
        match users.iter().find(|u| u.id == remembered.user_id) {
            Some(user) => SessionRole::Authenticated { user: user.clone() },
            None => SessionRole::Anonymous,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        match self {
            SessionRole::Authenticated { user } => Some(user),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().map(|u| u.is_admin).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, is_admin: bool) -> User {
        User {
            id: id.to_string(),
            name: id.to_string(),
            is_admin,
            score: 0,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_non_admin_pick_signs_in_directly() {
        let users = vec![user("pete", true), user("penny", false)];
        let role = SessionRole::Anonymous.pick_user(&users, "penny");
        assert!(matches!(role, SessionRole::Authenticated { ref user } if user.id == "penny"));
    }

    #[test]
    fn test_admin_pick_requires_password() {
        let users = vec![user("pete", true)];
        let role = SessionRole::Anonymous.pick_user(&users, "pete");
        assert!(matches!(role, SessionRole::PendingAdminAuth { .. }));

        let (role, outcome) = role.submit_password("wrong", "secret");
        assert_eq!(outcome, AuthOutcome::Rejected);
        assert!(matches!(role, SessionRole::PendingAdminAuth { .. }));

        let (role, outcome) = role.submit_password("secret", "secret");
        assert_eq!(outcome, AuthOutcome::Accepted);
        assert!(role.is_admin());
    }

    #[test]
    fn test_cancel_returns_to_anonymous() {
        let users = vec![user("pete", true)];
        let role = SessionRole::Anonymous.pick_user(&users, "pete").cancel();
        assert_eq!(role, SessionRole::Anonymous);
    }

    #[test]
    fn test_unknown_pick_stays_anonymous() {
        let role = SessionRole::Anonymous.pick_user(&[], "ghost");
        assert_eq!(role, SessionRole::Anonymous);
    }

    #[test]
    fn test_restore_clears_stale_session() {
        let remembered = RememberedUser {
            user_id: "gone".to_string(),
            is_admin: false,
        };
        assert_eq!(
            SessionRole::restore(&remembered, &[user("pete", true)]),
            SessionRole::Anonymous
        );

        let remembered = RememberedUser {
            user_id: "pete".to_string(),
            is_admin: true,
        };
        let role = SessionRole::restore(&remembered, &[user("pete", true)]);
        assert!(matches!(role, SessionRole::Authenticated { .. }));
    }
}
