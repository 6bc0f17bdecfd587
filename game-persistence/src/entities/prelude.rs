pub use super::criteria::Entity as Criteria;
pub use super::game_settings::Entity as GameSettings;
pub use super::predictions::Entity as Predictions;
pub use super::users::Entity as Users;
pub use super::winners::Entity as Winners;
