use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serde::Deserialize;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::Filter;

use game_persistence::repositories::{
    CriteriaRepository, PredictionRepository, SettingsRepository, UserRepository, WinnerRepository,
};
use game_types::GameError;

pub mod config;

/// One repository per resource, all sharing the same connection pool.
pub struct Repositories {
    pub users: UserRepository,
    pub criteria: CriteriaRepository,
    pub predictions: PredictionRepository,
    pub winners: WinnerRepository,
    pub settings: SettingsRepository,
}

impl Repositories {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            criteria: CriteriaRepository::new(db.clone()),
            predictions: PredictionRepository::new(db.clone()),
            winners: WinnerRepository::new(db.clone()),
            settings: SettingsRepository::new(db),
        }
    }
}

#[derive(Deserialize)]
struct CreateUserRequest {
    id: Option<String>,
    name: Option<String>,
    #[serde(rename = "isAdmin")]
    is_admin: Option<bool>,
}

#[derive(Deserialize)]
struct UpdateScoreRequest {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    score: Option<i32>,
}

#[derive(Deserialize)]
struct DeleteUserRequest {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

#[derive(Deserialize)]
struct CreateCriteriaRequest {
    question: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct SubmitPredictionRequest {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    #[serde(rename = "criteriaId")]
    criteria_id: Option<String>,
    answer: Option<String>,
}

#[derive(Deserialize)]
struct ToggleWinnerRequest {
    #[serde(rename = "criteriaId")]
    criteria_id: Option<String>,
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

#[derive(Deserialize)]
struct SettingsQuery {
    key: Option<String>,
}

#[derive(Deserialize)]
struct SetSettingRequest {
    key: Option<String>,
    value: Option<String>,
}

pub fn create_routes(
    repositories: Arc<Repositories>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let repos = warp::any().map({
        let repositories = repositories.clone();
        move || repositories.clone()
    });

    let users = warp::path("users").and(warp::path::end()).and(
        warp::get()
            .and(repos.clone())
            .and_then(handle_list_users)
            .or(warp::post()
                .and(warp::body::bytes())
                .and(repos.clone())
                .and_then(handle_create_user))
            .or(warp::put()
                .and(warp::body::bytes())
                .and(repos.clone())
                .and_then(handle_update_score))
            .or(warp::delete()
                .and(warp::body::bytes())
                .and(repos.clone())
                .and_then(handle_delete_user))
            .or(warp::any().map(|| method_not_allowed("GET, POST, PUT, DELETE"))),
    );

    let criteria = warp::path("criteria").and(warp::path::end()).and(
        warp::get()
            .and(repos.clone())
            .and_then(handle_list_criteria)
            .or(warp::post()
                .and(warp::body::bytes())
                .and(repos.clone())
                .and_then(handle_create_criteria))
            .or(warp::any().map(|| method_not_allowed("GET, POST"))),
    );

    let predictions = warp::path("predictions").and(warp::path::end()).and(
        warp::get()
            .and(repos.clone())
            .and_then(handle_list_predictions)
            .or(warp::post()
                .and(warp::body::bytes())
                .and(repos.clone())
                .and_then(handle_submit_prediction))
            .or(warp::any().map(|| method_not_allowed("GET, POST"))),
    );

    let winners = warp::path("winners").and(warp::path::end()).and(
        warp::post()
            .and(warp::body::bytes())
            .and(repos.clone())
            .and_then(handle_toggle_winner)
            .or(warp::any().map(|| method_not_allowed("POST"))),
    );

    let settings = warp::path("settings").and(warp::path::end()).and(
        warp::get()
            .and(warp::query::<SettingsQuery>())
            .and(repos.clone())
            .and_then(handle_get_setting)
            .or(warp::post()
                .and(warp::body::bytes())
                .and(repos.clone())
                .and_then(handle_set_setting))
            .or(warp::any().map(|| method_not_allowed("GET, POST"))),
    );

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    users
        .or(criteria)
        .or(predictions)
        .or(winners)
        .or(settings)
        .or(health)
        .with(cors)
        .with(warp::log("prediction_server"))
}

type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

fn json_reply<T: serde::Serialize>(value: &T, status: StatusCode) -> JsonReply {
    warp::reply::with_status(warp::reply::json(value), status)
}

/// Translates a service error to its transport status. Internal details are
/// logged but never surfaced to the caller.
fn error_reply(err: GameError) -> JsonReply {
    let status = match &err {
        GameError::InvalidInput(_) | GameError::Conflict(_) | GameError::Forbidden(_) => {
            StatusCode::BAD_REQUEST
        }
        GameError::NotFound(_) => StatusCode::NOT_FOUND,
        GameError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match &err {
        GameError::Internal(detail) => {
            tracing::error!("request failed: {}", detail);
            "Internal server error".to_string()
        }
        other => other.to_string(),
    };
    json_reply(&serde_json::json!({ "error": message }), status)
}

fn method_not_allowed(allow: &'static str) -> impl warp::Reply {
    warp::reply::with_status(
        warp::reply::with_header(
            warp::reply::json(&serde_json::json!({ "error": "Method not allowed" })),
            "Allow",
            allow,
        ),
        StatusCode::METHOD_NOT_ALLOWED,
    )
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, GameError> {
    serde_json::from_slice(body).map_err(|_| GameError::invalid("Invalid JSON body"))
}

async fn handle_list_users(
    repos: Arc<Repositories>,
) -> Result<JsonReply, warp::Rejection> {
    Ok(match repos.users.list().await {
        Ok(users) => json_reply(&users, StatusCode::OK),
        Err(err) => error_reply(err),
    })
}

async fn handle_create_user(
    body: Bytes,
    repos: Arc<Repositories>,
) -> Result<JsonReply, warp::Rejection> {
    let req: CreateUserRequest = match parse_body(&body) {
        Ok(req) => req,
        Err(err) => return Ok(error_reply(err)),
    };
    let (Some(id), Some(name)) = (req.id, req.name) else {
        return Ok(error_reply(GameError::invalid("id and name are required")));
    };

    Ok(
        match repos
            .users
            .create(&id, &name, req.is_admin.unwrap_or(false))
            .await
        {
            Ok(users) => json_reply(&users, StatusCode::CREATED),
            Err(err) => error_reply(err),
        },
    )
}

async fn handle_update_score(
    body: Bytes,
    repos: Arc<Repositories>,
) -> Result<JsonReply, warp::Rejection> {
    let req: UpdateScoreRequest = match parse_body(&body) {
        Ok(req) => req,
        Err(err) => return Ok(error_reply(err)),
    };
    let (Some(user_id), Some(score)) = (req.user_id, req.score) else {
        return Ok(error_reply(GameError::invalid(
            "userId and score are required",
        )));
    };

    Ok(match repos.users.update_score(&user_id, score).await {
        Ok(users) => json_reply(&users, StatusCode::OK),
        Err(err) => error_reply(err),
    })
}

async fn handle_delete_user(
    body: Bytes,
    repos: Arc<Repositories>,
) -> Result<JsonReply, warp::Rejection> {
    let req: DeleteUserRequest = match parse_body(&body) {
        Ok(req) => req,
        Err(err) => return Ok(error_reply(err)),
    };
    let Some(user_id) = req.user_id else {
        return Ok(error_reply(GameError::invalid("userId is required")));
    };

    Ok(match repos.users.delete(&user_id).await {
        Ok(users) => json_reply(&users, StatusCode::OK),
        Err(err) => error_reply(err),
    })
}

async fn handle_list_criteria(
    repos: Arc<Repositories>,
) -> Result<JsonReply, warp::Rejection> {
    Ok(match repos.criteria.list().await {
        Ok(criteria) => json_reply(&criteria, StatusCode::OK),
        Err(err) => error_reply(err),
    })
}

async fn handle_create_criteria(
    body: Bytes,
    repos: Arc<Repositories>,
) -> Result<JsonReply, warp::Rejection> {
    let req: CreateCriteriaRequest = match parse_body(&body) {
        Ok(req) => req,
        Err(err) => return Ok(error_reply(err)),
    };
    let Some(question) = req.question else {
        return Ok(error_reply(GameError::invalid("question is required")));
    };

    Ok(
        match repos
            .criteria
            .create(&question, req.description.as_deref())
            .await
        {
            Ok(criteria) => json_reply(&criteria, StatusCode::CREATED),
            Err(err) => error_reply(err),
        },
    )
}

async fn handle_list_predictions(
    repos: Arc<Repositories>,
) -> Result<JsonReply, warp::Rejection> {
    Ok(match repos.predictions.list().await {
        Ok(predictions) => json_reply(&predictions, StatusCode::OK),
        Err(err) => error_reply(err),
    })
}

async fn handle_submit_prediction(
    body: Bytes,
    repos: Arc<Repositories>,
) -> Result<JsonReply, warp::Rejection> {
    let req: SubmitPredictionRequest = match parse_body(&body) {
        Ok(req) => req,
        Err(err) => return Ok(error_reply(err)),
    };
    let (Some(user_id), Some(criteria_id), Some(answer)) =
        (req.user_id, req.criteria_id, req.answer)
    else {
        return Ok(error_reply(GameError::invalid(
            "userId, criteriaId, and answer are required",
        )));
    };

    Ok(
        match repos
            .predictions
            .upsert(&user_id, &criteria_id, &answer)
            .await
        {
            Ok(predictions) => json_reply(&predictions, StatusCode::CREATED),
            Err(err) => error_reply(err),
        },
    )
}

async fn handle_toggle_winner(
    body: Bytes,
    repos: Arc<Repositories>,
) -> Result<JsonReply, warp::Rejection> {
    let req: ToggleWinnerRequest = match parse_body(&body) {
        Ok(req) => req,
        Err(err) => return Ok(error_reply(err)),
    };
    let (Some(criteria_id), Some(user_id)) = (req.criteria_id, req.user_id) else {
        return Ok(error_reply(GameError::invalid(
            "criteriaId and userId are required",
        )));
    };

    Ok(match repos.winners.toggle(&criteria_id, &user_id).await {
        Ok(users) => json_reply(&users, StatusCode::OK),
        Err(err) => error_reply(err),
    })
}

async fn handle_get_setting(
    query: SettingsQuery,
    repos: Arc<Repositories>,
) -> Result<JsonReply, warp::Rejection> {
    let Some(key) = query.key else {
        return Ok(error_reply(GameError::invalid("key parameter is required")));
    };

    Ok(match repos.settings.get(&key).await {
        Ok(setting) => json_reply(&setting, StatusCode::OK),
        Err(err) => error_reply(err),
    })
}

async fn handle_set_setting(
    body: Bytes,
    repos: Arc<Repositories>,
) -> Result<JsonReply, warp::Rejection> {
    let req: SetSettingRequest = match parse_body(&body) {
        Ok(req) => req,
        Err(err) => return Ok(error_reply(err)),
    };
    let (Some(key), Some(value)) = (req.key, req.value) else {
        return Ok(error_reply(GameError::invalid("key and value are required")));
    };

    Ok(match repos.settings.set(&key, &value).await {
        Ok(setting) => json_reply(&setting, StatusCode::OK),
        Err(err) => error_reply(err),
    })
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use game_persistence::{connection::connect_to_memory_database, seed::ensure_seed_data};
    use game_types::{Criteria, GameSetting, Prediction, User, ANSWERS_LOCKED_KEY};
    use migration::{Migrator, MigratorTrait};

    async fn create_test_app()
    -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        ensure_seed_data(&db).await.unwrap();
        create_routes(Arc::new(Repositories::new(db)))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("GET")
            .path("/health")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), "OK");
    }

    #[tokio::test]
    async fn test_get_users_returns_seeded_roster() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("GET")
            .path("/users")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 200);
        let users: Vec<User> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(users.len(), 11);
        assert_eq!(users.iter().filter(|u| u.is_admin).count(), 1);

        // All scores are 0, so the order is purely alphabetical by name
        let mut names: Vec<String> = users.iter().map(|u| u.name.clone()).collect();
        let sorted = {
            let mut s = names.clone();
            s.sort();
            s
        };
        assert_eq!(names, sorted);
        names.dedup();
        assert_eq!(names.len(), 11);
    }

    #[tokio::test]
    async fn test_create_user_and_duplicate_conflict() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("POST")
            .path("/users")
            .json(&serde_json::json!({"id": "zara", "name": "Zara"}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 201);
        let users: Vec<User> = serde_json::from_slice(response.body()).unwrap();
        assert!(users.iter().any(|u| u.id == "zara" && !u.is_admin));

        // Re-posting the seeded admin id must not touch the stored row
        let response = warp::test::request()
            .method("POST")
            .path("/users")
            .json(&serde_json::json!({"id": "pete", "name": "Impostor", "isAdmin": false}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 400);

        let response = warp::test::request()
            .method("GET")
            .path("/users")
            .reply(&app)
            .await;
        let users: Vec<User> = serde_json::from_slice(response.body()).unwrap();
        let pete = users.iter().find(|u| u.id == "pete").unwrap();
        assert_eq!(pete.name, "Pete");
        assert!(pete.is_admin);
    }

    #[tokio::test]
    async fn test_create_user_missing_fields() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("POST")
            .path("/users")
            .json(&serde_json::json!({"id": "zara"}))
            .reply(&app)
            .await;

        assert_eq!(response.status(), 400);
        let error: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(error["error"], "id and name are required");
    }

    #[tokio::test]
    async fn test_update_score_reorders_leaderboard() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("PUT")
            .path("/users")
            .json(&serde_json::json!({"userId": "penny", "score": 3}))
            .reply(&app)
            .await;

        assert_eq!(response.status(), 200);
        let users: Vec<User> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(users[0].id, "penny");
        assert_eq!(users[0].score, 3);
    }

    #[tokio::test]
    async fn test_delete_user_paths() {
        let app = create_test_app().await;

        // Non-admin deletes fine
        let response = warp::test::request()
            .method("DELETE")
            .path("/users")
            .json(&serde_json::json!({"userId": "penny"}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);
        let users: Vec<User> = serde_json::from_slice(response.body()).unwrap();
        assert!(!users.iter().any(|u| u.id == "penny"));

        // Admin is protected
        let response = warp::test::request()
            .method("DELETE")
            .path("/users")
            .json(&serde_json::json!({"userId": "pete"}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 400);

        // Unknown id
        let response = warp::test::request()
            .method("DELETE")
            .path("/users")
            .json(&serde_json::json!({"userId": "ghost"}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_unsupported_method_gets_allow_header() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("PATCH")
            .path("/users")
            .reply(&app)
            .await;
        assert_eq!(response.status(), 405);
        assert_eq!(response.headers()["allow"], "GET, POST, PUT, DELETE");

        let response = warp::test::request()
            .method("DELETE")
            .path("/winners")
            .reply(&app)
            .await;
        assert_eq!(response.status(), 405);
        assert_eq!(response.headers()["allow"], "POST");
    }

    #[tokio::test]
    async fn test_criteria_creation_and_validation() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("POST")
            .path("/criteria")
            .json(&serde_json::json!({"question": "Who cries first?", "description": "At the ceremony"}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 201);
        let criteria: Vec<Criteria> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(criteria.len(), 1);
        assert!(criteria[0].winners.is_empty());

        // Whitespace-only question is rejected and the list is unchanged
        let response = warp::test::request()
            .method("POST")
            .path("/criteria")
            .json(&serde_json::json!({"question": "   "}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 400);

        let response = warp::test::request()
            .method("GET")
            .path("/criteria")
            .reply(&app)
            .await;
        let criteria: Vec<Criteria> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(criteria.len(), 1);
    }

    #[tokio::test]
    async fn test_prediction_resubmission_replaces() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("POST")
            .path("/criteria")
            .json(&serde_json::json!({"question": "Who cries first?"}))
            .reply(&app)
            .await;
        let criteria: Vec<Criteria> = serde_json::from_slice(response.body()).unwrap();
        let criteria_id = criteria[0].id.clone();

        let response = warp::test::request()
            .method("POST")
            .path("/predictions")
            .json(&serde_json::json!({"userId": "penny", "criteriaId": criteria_id, "answer": "Bride"}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 201);

        let response = warp::test::request()
            .method("POST")
            .path("/predictions")
            .json(&serde_json::json!({"userId": "penny", "criteriaId": criteria_id, "answer": "Groom"}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 201);
        let predictions: Vec<Prediction> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].answer, "Groom");
    }

    #[tokio::test]
    async fn test_winner_toggle_scenario() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("POST")
            .path("/criteria")
            .json(&serde_json::json!({"question": "Who cries first?"}))
            .reply(&app)
            .await;
        let criteria: Vec<Criteria> = serde_json::from_slice(response.body()).unwrap();
        let criteria_id = criteria[0].id.clone();

        for (user, answer) in [("penny", "Bride"), ("jack", "Groom")] {
            let response = warp::test::request()
                .method("POST")
                .path("/predictions")
                .json(&serde_json::json!({"userId": user, "criteriaId": criteria_id, "answer": answer}))
                .reply(&app)
                .await;
            assert_eq!(response.status(), 201);
        }

        let response = warp::test::request()
            .method("POST")
            .path("/winners")
            .json(&serde_json::json!({"criteriaId": criteria_id, "userId": "penny"}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);
        let users: Vec<User> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(users[0].id, "penny");
        assert_eq!(users[0].score, 1);
        assert_eq!(users.iter().find(|u| u.id == "jack").unwrap().score, 0);

        let response = warp::test::request()
            .method("GET")
            .path("/criteria")
            .reply(&app)
            .await;
        let criteria: Vec<Criteria> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(criteria[0].winners, vec!["penny".to_string()]);

        // Toggling again is symmetric
        let response = warp::test::request()
            .method("POST")
            .path("/winners")
            .json(&serde_json::json!({"criteriaId": criteria_id, "userId": "penny"}))
            .reply(&app)
            .await;
        let users: Vec<User> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(users.iter().find(|u| u.id == "penny").unwrap().score, 0);
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("GET")
            .path("/settings?key=answers_locked")
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);
        let setting: GameSetting = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(setting.value.as_deref(), Some("false"));

        let response = warp::test::request()
            .method("POST")
            .path("/settings")
            .json(&serde_json::json!({"key": ANSWERS_LOCKED_KEY, "value": "true"}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 200);

        let response = warp::test::request()
            .method("GET")
            .path("/settings?key=answers_locked")
            .reply(&app)
            .await;
        let setting: GameSetting = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(setting.key, ANSWERS_LOCKED_KEY);
        assert_eq!(setting.value.as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn test_settings_missing_key_param() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("GET")
            .path("/settings")
            .reply(&app)
            .await;
        assert_eq!(response.status(), 400);

        let response = warp::test::request()
            .method("POST")
            .path("/settings")
            .json(&serde_json::json!({"key": "answers_locked"}))
            .reply(&app)
            .await;
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_invalid_json_body_is_bad_request() {
        let app = create_test_app().await;

        let response = warp::test::request()
            .method("POST")
            .path("/users")
            .body("not json")
            .reply(&app)
            .await;
        assert_eq!(response.status(), 400);
    }
}
