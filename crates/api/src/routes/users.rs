//! User CRUD and search routes.
//!
//! Status-code contract:
//! - list/search always answer 200, degrading to an empty list when the
//!   store is unreachable
//! - create answers 201, 400 on validation, 409 on any persistence
//!   failure, and 500 only when the request body cannot be read at all
//! - update folds "row not found" and "email conflict" into one 409
//! - get/delete answer 404 both for a missing row and a failed operation

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use validator::Validate;

use domain::models::User;
use persistence::StoreError;

use crate::app::AppState;
use crate::error::ApiError;

/// Incoming user payload for create and update, with the wire field
/// names the frontend sends.
///
/// `edad` is kept as a raw JSON value because clients send it both as a
/// number and as a numeric string; [`UserPayload::into_fields`] applies
/// the integer coercion.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserPayload {
    #[serde(rename = "nombre", default)]
    #[validate(
        required(message = "nombre is required"),
        length(min = 1, message = "nombre must not be empty")
    )]
    pub name: Option<String>,

    #[serde(rename = "correo", default)]
    #[validate(
        required(message = "correo is required"),
        length(min = 1, message = "correo must not be empty")
    )]
    pub email: Option<String>,

    #[serde(rename = "edad", default)]
    pub age: Option<serde_json::Value>,
}

impl UserPayload {
    /// Validates the payload and returns the (name, email, age) triple,
    /// or the 400 the caller should answer with.
    pub fn into_fields(self) -> Result<(String, String, i32), ApiError> {
        self.validate()?;
        let age = parse_age(self.age.as_ref())?;
        Ok((
            self.name.unwrap_or_default(),
            self.email.unwrap_or_default(),
            age,
        ))
    }
}

fn parse_age(age: Option<&serde_json::Value>) -> Result<i32, ApiError> {
    let not_integer = || ApiError::Validation("edad must be an integer".to_string());

    match age {
        None | Some(serde_json::Value::Null) => Err(ApiError::Validation(
            "missing required fields (nombre, correo, edad)".to_string(),
        )),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(not_integer),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i32>().map_err(|_| not_integer()),
        Some(_) => Err(not_integer()),
    }
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Confirmation message for destructive operations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List all users, newest first.
///
/// GET /api/users
///
/// An unreachable store degrades to an empty list rather than an error;
/// the failure is logged server-side.
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    let users = match state.users.list_all().await {
        Ok(entities) => entities.into_iter().map(User::from).collect(),
        Err(err) => {
            error!(error = %err, "listing users failed, answering with an empty list");
            Vec::new()
        }
    };

    Json(users)
}

/// Create a user.
///
/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    payload: Option<Json<UserPayload>>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    // An unreadable body is the one failure the create path reports as a
    // generic 500 instead of a validation error.
    let Some(Json(payload)) = payload else {
        return Err(ApiError::Internal(
            "request body could not be read as JSON".to_string(),
        ));
    };

    let (name, email, age) = payload.into_fields()?;

    match state.users.insert(&name, &email, age).await {
        Ok(entity) => {
            info!(user_id = entity.id, "user created");
            Ok((StatusCode::CREATED, Json(entity.into())))
        }
        Err(StoreError::DuplicateEmail) => Err(ApiError::Conflict(format!(
            "email '{email}' is already registered"
        ))),
        Err(err) => {
            warn!(error = %err, "user creation failed");
            Err(ApiError::Conflict(
                "user could not be created".to_string(),
            ))
        }
    }
}

/// Fetch a single user.
///
/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<User>, ApiError> {
    match state.users.find_by_id(id).await {
        Ok(Some(entity)) => Ok(Json(entity.into())),
        Ok(None) => Err(ApiError::NotFound(format!("user {id} not found"))),
        Err(err) => {
            warn!(error = %err, user_id = id, "user lookup failed");
            Err(ApiError::NotFound(format!("user {id} not found")))
        }
    }
}

/// Replace all fields of a user.
///
/// PUT /api/users/{id}
///
/// A missing row and an email collision are both answered with 409; the
/// store does not distinguish them for this operation.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<User>, ApiError> {
    let (name, email, age) = payload.into_fields()?;

    match state.users.update(id, &name, &email, age).await {
        Ok(Some(entity)) => {
            info!(user_id = id, "user updated");
            Ok(Json(entity.into()))
        }
        Ok(None) => Err(ApiError::Conflict(format!(
            "user {id} not found or conflicting data"
        ))),
        Err(StoreError::DuplicateEmail) => Err(ApiError::Conflict(format!(
            "email '{email}' is already registered"
        ))),
        Err(err) => {
            warn!(error = %err, user_id = id, "user update failed");
            Err(ApiError::Conflict(format!(
                "user {id} not found or conflicting data"
            )))
        }
    }
}

/// Delete a user.
///
/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    match state.users.delete(id).await {
        Ok(true) => {
            info!(user_id = id, "user deleted");
            Ok(Json(MessageResponse {
                message: format!("user {id} deleted"),
            }))
        }
        Ok(false) => Err(ApiError::NotFound(format!(
            "user {id} not found or could not be deleted"
        ))),
        Err(err) => {
            warn!(error = %err, user_id = id, "user deletion failed");
            Err(ApiError::NotFound(format!(
                "user {id} not found or could not be deleted"
            )))
        }
    }
}

/// Case-insensitive substring search on name or email.
///
/// GET /api/users/search?q=<text>
///
/// A missing or empty `q` is rejected before touching the store; a
/// store failure degrades to an empty result list.
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<User>>, ApiError> {
    let query = params.q.unwrap_or_default();
    if query.is_empty() {
        return Err(ApiError::Validation(
            "missing search parameter 'q'".to_string(),
        ));
    }

    let users = match state.users.search(&query).await {
        Ok(entities) => entities.into_iter().map(User::from).collect(),
        Err(err) => {
            error!(error = %err, "user search failed, answering with an empty list");
            Vec::new()
        }
    };

    Ok(Json(users))
}
