pub mod leaderboard;
pub mod session;
pub mod validation;

// Re-export main components
pub use leaderboard::*;
pub use session::*;
pub use validation::*;
