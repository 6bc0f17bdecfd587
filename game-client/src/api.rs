use anyhow::{bail, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;

use game_types::{Criteria, GameSetting, Prediction, User};

/// Thin typed wrapper over the HTTP JSON API. Every mutating call returns
/// the server's refreshed collection, which callers feed straight into the
/// local mirror.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn expect_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let message = body
            .get("error")
            .and_then(|e| e.as_str())
            .unwrap_or("request failed");
        bail!("{} ({})", message, status)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let response = self.http.get(self.url("/users")).send().await?;
        Self::expect_json(response).await
    }

    pub async fn create_user(&self, id: &str, name: &str, is_admin: bool) -> Result<Vec<User>> {
        let response = self
            .http
            .post(self.url("/users"))
            .json(&serde_json::json!({"id": id, "name": name, "isAdmin": is_admin}))
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<Vec<User>> {
        let response = self
            .http
            .delete(self.url("/users"))
            .json(&serde_json::json!({"userId": user_id}))
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn list_criteria(&self) -> Result<Vec<Criteria>> {
        let response = self.http.get(self.url("/criteria")).send().await?;
        Self::expect_json(response).await
    }

    pub async fn create_criteria(
        &self,
        question: &str,
        description: Option<&str>,
    ) -> Result<Vec<Criteria>> {
        let response = self
            .http
            .post(self.url("/criteria"))
            .json(&serde_json::json!({"question": question, "description": description}))
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn list_predictions(&self) -> Result<Vec<Prediction>> {
        let response = self.http.get(self.url("/predictions")).send().await?;
        Self::expect_json(response).await
    }

    pub async fn submit_prediction(
        &self,
        user_id: &str,
        criteria_id: &str,
        answer: &str,
    ) -> Result<Vec<Prediction>> {
        let response = self
            .http
            .post(self.url("/predictions"))
            .json(&serde_json::json!({
                "userId": user_id,
                "criteriaId": criteria_id,
                "answer": answer,
            }))
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn toggle_winner(&self, criteria_id: &str, user_id: &str) -> Result<Vec<User>> {
        let response = self
            .http
            .post(self.url("/winners"))
            .json(&serde_json::json!({"criteriaId": criteria_id, "userId": user_id}))
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn get_setting(&self, key: &str) -> Result<GameSetting> {
        let response = self
            .http
            .get(self.url("/settings"))
            .query(&[("key", key)])
            .send()
            .await?;
        Self::expect_json(response).await
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<GameSetting> {
        let response = self
            .http
            .post(self.url("/settings"))
            .json(&serde_json::json!({"key": key, "value": value}))
            .send()
            .await?;
        Self::expect_json(response).await
    }
}
