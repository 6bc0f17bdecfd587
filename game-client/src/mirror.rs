use anyhow::Result;

use crate::api::ApiClient;
use game_core::answers_locked;
use game_types::{Criteria, Prediction, User, ANSWERS_LOCKED_KEY};

/// Local mirror of the shared server state, replaced wholesale on every
/// refresh. A failed refresh leaves the previous mirror in place, so views
/// stay stale-but-consistent rather than going blank.
#[derive(Debug, Default)]
pub struct GameMirror {
    pub users: Vec<User>,
    pub criteria: Vec<Criteria>,
    pub predictions: Vec<Prediction>,
    pub answers_locked: bool,
}

impl GameMirror {
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<()> {
        // Fetch everything before touching the mirror
        let users = api.list_users().await?;
        let criteria = api.list_criteria().await?;
        let predictions = api.list_predictions().await?;
        let lock = api.get_setting(ANSWERS_LOCKED_KEY).await?;

        self.users = users;
        self.criteria = criteria;
        self.predictions = predictions;
        self.answers_locked = answers_locked(lock.value.as_deref());
        Ok(())
    }

    pub fn answer_for(&self, user_id: &str, criteria_id: &str) -> Option<&Prediction> {
        self.predictions
            .iter()
            .find(|p| p.user_id == user_id && p.criteria_id == criteria_id)
    }

    pub fn criteria_by_index(&self, index: usize) -> Option<&Criteria> {
        // 1-based, matching the rendered question numbers
        index.checked_sub(1).and_then(|i| self.criteria.get(i))
    }

    /// Applies a confirmed winner toggle to the local winner set, so the
    /// criteria view matches the score change without waiting for the next
    /// poll.
    pub fn apply_winner_toggle(&mut self, criteria_id: &str, user_id: &str) {
        if let Some(criteria) = self.criteria.iter_mut().find(|c| c.id == criteria_id) {
            match criteria.winners.iter().position(|w| w == user_id) {
                Some(i) => {
                    criteria.winners.remove(i);
                }
                None => criteria.winners.push(user_id.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(id: &str, winners: &[&str]) -> Criteria {
        Criteria {
            id: id.to_string(),
            question: "Q".to_string(),
            description: None,
            created_at: String::new(),
            winners: winners.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn test_apply_winner_toggle_is_symmetric() {
        let mut mirror = GameMirror {
            criteria: vec![criteria("c1", &[])],
            ..Default::default()
        };

        mirror.apply_winner_toggle("c1", "penny");
        assert_eq!(mirror.criteria[0].winners, vec!["penny".to_string()]);

        mirror.apply_winner_toggle("c1", "penny");
        assert!(mirror.criteria[0].winners.is_empty());
    }

    #[test]
    fn test_criteria_by_index_is_one_based() {
        let mirror = GameMirror {
            criteria: vec![criteria("c1", &[]), criteria("c2", &[])],
            ..Default::default()
        };

        assert_eq!(mirror.criteria_by_index(1).map(|c| c.id.as_str()), Some("c1"));
        assert_eq!(mirror.criteria_by_index(2).map(|c| c.id.as_str()), Some("c2"));
        assert!(mirror.criteria_by_index(0).is_none());
        assert!(mirror.criteria_by_index(3).is_none());
    }
}
