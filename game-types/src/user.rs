use serde::{Deserialize, Serialize};

pub type UserId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub is_admin: bool,
    pub score: i32,
    pub created_at: String, // ISO 8601 string for simplicity
    pub updated_at: String,
}
