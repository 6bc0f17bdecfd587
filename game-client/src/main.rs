use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use game_core::{AuthOutcome, RememberedUser, SessionRole};

mod api;
mod config;
mod mirror;
mod session;
mod ui;

use api::ApiClient;
use config::{Config, ADMIN_PASSWORD};
use game_types::ANSWERS_LOCKED_KEY;
use mirror::GameMirror;
use session::SessionStore;

struct App {
    api: ApiClient,
    mirror: GameMirror,
    store: SessionStore,
    role: SessionRole,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::new();
    let api = ApiClient::new(config.server_url.clone());

    let mut mirror = GameMirror::default();
    mirror.refresh(&api).await?;
    info!("Connected to {}", config.server_url);

    let store = SessionStore::new(config.session_file.clone());
    let role = match store.load() {
        Some(remembered) => {
            let restored = SessionRole::restore(&remembered, &mirror.users);
            if restored == SessionRole::Anonymous {
                // Remembered user no longer exists server-side
                store.clear();
            }
            restored
        }
        None => SessionRole::Anonymous,
    };

    let mut app = App {
        api,
        mirror,
        store,
        role,
    };
    app.print_view();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval =
        tokio::time::interval(std::time::Duration::from_secs(config.poll_interval_seconds));
    interval.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            _ = interval.tick() => {
                app.poll().await;
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !app.handle_line(line.trim()).await {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    Ok(())
}

impl App {
    /// Scheduled refresh. Failures keep the previous mirror; a vanished
    /// signed-in user clears the local session.
    async fn poll(&mut self) {
        if let Err(e) = self.mirror.refresh(&self.api).await {
            warn!("Refresh failed, keeping previous state: {}", e);
            return;
        }

        if let Some(user) = self.role.current_user() {
            if !self.mirror.users.iter().any(|u| u.id == user.id) {
                println!("Your user was removed; signing out.");
                self.store.clear();
                self.role = SessionRole::Anonymous;
                self.print_view();
            }
        }
    }

    fn print_view(&self) {
        match &self.role {
            SessionRole::Anonymous => print!("{}", ui::render_user_picker(&self.mirror.users)),
            SessionRole::PendingAdminAuth { user } => {
                println!("{} is an admin. Enter the password, or 'cancel'.", user.name)
            }
            SessionRole::Authenticated { user } => {
                println!("Signed in as {}.", user.name);
                print!("{}", ui::render_help(user.is_admin));
            }
        }
    }

    fn remember(&self) {
        if let Some(user) = self.role.current_user() {
            self.store.save(&RememberedUser {
                user_id: user.id.clone(),
                is_admin: user.is_admin,
            });
        }
    }

    /// Handles one input line. Returns false to quit.
    async fn handle_line(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return true;
        }
        if line == "quit" {
            return false;
        }

        match self.role.clone() {
            SessionRole::Anonymous => self.handle_picker(line),
            SessionRole::PendingAdminAuth { .. } => self.handle_password(line),
            SessionRole::Authenticated { user } => self.handle_command(&user.id, line).await,
        }
    }

    fn handle_picker(&mut self, line: &str) -> bool {
        let picked_id = match line.parse::<usize>() {
            Ok(n) if n >= 1 && n <= self.mirror.users.len() => self.mirror.users[n - 1].id.clone(),
            _ => {
                println!("Pick a number from the list.");
                return true;
            }
        };

        self.role = self.role.clone().pick_user(&self.mirror.users, &picked_id);
        self.remember();
        self.print_view();
        true
    }

    fn handle_password(&mut self, line: &str) -> bool {
        if line == "cancel" {
            self.role = self.role.clone().cancel();
            self.print_view();
            return true;
        }

        let (role, outcome) = self.role.clone().submit_password(line, ADMIN_PASSWORD);
        self.role = role;
        match outcome {
            AuthOutcome::Accepted => {
                self.remember();
                self.print_view();
            }
            AuthOutcome::Rejected => println!("Incorrect password."),
        }
        true
    }

    async fn handle_command(&mut self, user_id: &str, line: &str) -> bool {
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        let result = match command {
            "questions" => {
                print!("{}", ui::render_questions(&self.mirror, user_id));
                Ok(())
            }
            "board" => {
                print!("{}", ui::render_leaderboard(&self.mirror.users));
                Ok(())
            }
            "help" => {
                print!("{}", ui::render_help(self.role.is_admin()));
                Ok(())
            }
            "predict" => self.cmd_predict(user_id, rest).await,
            "switch" => {
                self.store.clear();
                self.role = SessionRole::Anonymous;
                self.print_view();
                Ok(())
            }
            "lock" if self.role.is_admin() => self.cmd_set_lock(true).await,
            "unlock" if self.role.is_admin() => self.cmd_set_lock(false).await,
            "addq" if self.role.is_admin() => self.cmd_add_question(rest).await,
            "win" if self.role.is_admin() => self.cmd_toggle_winner(rest).await,
            "adduser" if self.role.is_admin() => self.cmd_add_user(rest).await,
            "deluser" if self.role.is_admin() => self.cmd_delete_user(rest).await,
            _ => {
                println!("Unknown command; try 'help'.");
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("error: {}", e);
        }
        true
    }

    async fn cmd_predict(&mut self, user_id: &str, rest: &str) -> Result<()> {
        if self.mirror.answers_locked {
            println!("Answers are locked.");
            return Ok(());
        }
        let Some((index, answer)) = rest.split_once(' ') else {
            println!("Usage: predict <question number> <answer>");
            return Ok(());
        };
        let Some(criteria) = index
            .parse::<usize>()
            .ok()
            .and_then(|n| self.mirror.criteria_by_index(n))
        else {
            println!("No such question.");
            return Ok(());
        };

        let criteria_id = criteria.id.clone();
        self.mirror.predictions = self
            .api
            .submit_prediction(user_id, &criteria_id, answer.trim())
            .await?;
        println!("Answer saved.");
        Ok(())
    }

    async fn cmd_set_lock(&mut self, locked: bool) -> Result<()> {
        let value = if locked { "true" } else { "false" };
        self.api.set_setting(ANSWERS_LOCKED_KEY, value).await?;
        self.mirror.answers_locked = locked;
        println!(
            "Answers are now {}.",
            if locked { "locked" } else { "unlocked" }
        );
        Ok(())
    }

    async fn cmd_add_question(&mut self, rest: &str) -> Result<()> {
        let (question, description) = match rest.split_once('|') {
            Some((q, d)) => (q.trim(), Some(d.trim())),
            None => (rest, None),
        };
        if question.is_empty() {
            println!("Usage: addq <question> | <description>");
            return Ok(());
        }

        self.mirror.criteria = self.api.create_criteria(question, description).await?;
        println!("Question added.");
        Ok(())
    }

    async fn cmd_toggle_winner(&mut self, rest: &str) -> Result<()> {
        let Some((index, target)) = rest.split_once(' ') else {
            println!("Usage: win <question number> <user id>");
            return Ok(());
        };
        let Some(criteria) = index
            .parse::<usize>()
            .ok()
            .and_then(|n| self.mirror.criteria_by_index(n))
        else {
            println!("No such question.");
            return Ok(());
        };

        let criteria_id = criteria.id.clone();
        let target = target.trim().to_string();
        self.mirror.users = self.api.toggle_winner(&criteria_id, &target).await?;
        // Patch the local winner set from the confirmed toggle
        self.mirror.apply_winner_toggle(&criteria_id, &target);
        print!("{}", ui::render_leaderboard(&self.mirror.users));
        Ok(())
    }

    async fn cmd_add_user(&mut self, rest: &str) -> Result<()> {
        let Some((id, name)) = rest.split_once(' ') else {
            println!("Usage: adduser <id> <name>");
            return Ok(());
        };
        self.mirror.users = self.api.create_user(id, name.trim(), false).await?;
        println!("User '{}' added.", id);
        Ok(())
    }

    async fn cmd_delete_user(&mut self, rest: &str) -> Result<()> {
        if rest.is_empty() {
            println!("Usage: deluser <id>");
            return Ok(());
        }
        self.mirror.users = self.api.delete_user(rest).await?;
        println!("User '{}' deleted.", rest);
        Ok(())
    }
}
