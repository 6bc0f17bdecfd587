use std::fmt::Write;

use crate::mirror::GameMirror;
use game_types::User;

/// Plain-text views over the mirror. Pure string builders so they are
/// testable without a terminal.

pub fn render_user_picker(users: &[User]) -> String {
    let mut out = String::from("Who are you?\n");
    for (i, user) in users.iter().enumerate() {
        let tag = if user.is_admin { " (admin)" } else { "" };
        let _ = writeln!(out, "  {}. {}{}", i + 1, user.name, tag);
    }
    out.push_str("Enter a number, or 'quit'.\n");
    out
}

pub fn render_questions(mirror: &GameMirror, user_id: &str) -> String {
    if mirror.criteria.is_empty() {
        return "No questions yet.\n".to_string();
    }

    let mut out = String::new();
    if mirror.answers_locked {
        out.push_str("Answers are locked; predictions can no longer be changed.\n");
    }
    for (i, criteria) in mirror.criteria.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, criteria.question);
        if let Some(description) = &criteria.description {
            if !description.is_empty() {
                let _ = writeln!(out, "   {}", description);
            }
        }
        match mirror.answer_for(user_id, &criteria.id) {
            Some(prediction) => {
                let _ = writeln!(out, "   your answer: {}", prediction.answer);
            }
            None => out.push_str("   your answer: (none yet)\n"),
        }
        if !criteria.winners.is_empty() {
            let names: Vec<String> = criteria
                .winners
                .iter()
                .map(|id| display_name(&mirror.users, id))
                .collect();
            let _ = writeln!(out, "   winners: {}", names.join(", "));
        }
    }
    out
}

pub fn render_leaderboard(users: &[User]) -> String {
    let mut out = String::from("Leaderboard\n");
    for (i, user) in users.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} - {}", i + 1, user.name, user.score);
    }
    out
}

pub fn render_help(is_admin: bool) -> String {
    let mut out = String::from(
        "Commands:\n\
         \x20 questions            show questions and your answers\n\
         \x20 board                show the leaderboard\n\
         \x20 predict <n> <text>   answer question number n\n\
         \x20 switch               switch user\n\
         \x20 quit                 exit\n",
    );
    if is_admin {
        out.push_str(
            "Admin commands:\n\
             \x20 addq <question> | <description>   create a question\n\
             \x20 win <n> <userId>                  toggle winner for question n\n\
             \x20 adduser <id> <name>               create a user\n\
             \x20 deluser <id>                      delete a user\n\
             \x20 lock / unlock                     toggle answer lock\n",
        );
    }
    out
}

fn display_name(users: &[User], user_id: &str) -> String {
    users
        .iter()
        .find(|u| u.id == user_id)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| user_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_types::{Criteria, Prediction};

    fn user(id: &str, name: &str, is_admin: bool, score: i32) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            is_admin,
            score,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_leaderboard_lists_in_given_order() {
        let users = vec![user("a", "Penny", false, 3), user("b", "Pete", true, 1)];
        let out = render_leaderboard(&users);

        assert!(out.contains("1. Penny - 3"));
        assert!(out.contains("2. Pete - 1"));
    }

    #[test]
    fn test_picker_marks_admin() {
        let users = vec![user("pete", "Pete", true, 0)];
        let out = render_user_picker(&users);
        assert!(out.contains("1. Pete (admin)"));
    }

    #[test]
    fn test_questions_show_own_answer_and_winners() {
        let mirror = GameMirror {
            users: vec![user("penny", "Penny", false, 1)],
            criteria: vec![Criteria {
                id: "c1".to_string(),
                question: "Who cries first?".to_string(),
                description: Some("At the ceremony".to_string()),
                created_at: String::new(),
                winners: vec!["penny".to_string()],
            }],
            predictions: vec![Prediction {
                id: "penny-c1".to_string(),
                user_id: "penny".to_string(),
                criteria_id: "c1".to_string(),
                answer: "Bride".to_string(),
                timestamp: 0,
                created_at: String::new(),
            }],
            answers_locked: true,
        };

        let out = render_questions(&mirror, "penny");
        assert!(out.contains("Answers are locked"));
        assert!(out.contains("1. Who cries first?"));
        assert!(out.contains("At the ceremony"));
        assert!(out.contains("your answer: Bride"));
        assert!(out.contains("winners: Penny"));
    }

    #[test]
    fn test_help_hides_admin_commands_for_players() {
        assert!(!render_help(false).contains("Admin commands"));
        assert!(render_help(true).contains("addq"));
    }
}
