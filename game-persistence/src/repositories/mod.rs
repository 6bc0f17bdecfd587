pub mod criteria_repository;
pub mod prediction_repository;
pub mod settings_repository;
pub mod user_repository;
pub mod winner_repository;

pub use criteria_repository::CriteriaRepository;
pub use prediction_repository::PredictionRepository;
pub use settings_repository::SettingsRepository;
pub use user_repository::UserRepository;
pub use winner_repository::WinnerRepository;
