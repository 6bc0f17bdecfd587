pub mod criteria;
pub mod game_settings;
pub mod predictions;
pub mod prelude;
pub mod users;
pub mod winners;
