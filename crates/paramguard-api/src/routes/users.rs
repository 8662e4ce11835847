//! # Demo User Routes
//!
//! A small read-only surface exercising the schema guard end to end:
//! exact routes, single-variable and two-variable templates.
//!
//! Handlers parse their own inputs as well, so they stay correct when
//! validation is disabled or the configuration omits a route.

use std::str::FromStr;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

/// Account status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Yes,
    No,
    Unknown,
}

impl FromStr for UserStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "YES" => Ok(Self::Yes),
            "NO" => Ok(Self::No),
            "UNKNOWN" => Ok(Self::Unknown),
            _ => Err(AppError::BadRequest(format!("unknown user status '{s}'"))),
        }
    }
}

/// Query string of `GET /api/users`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub page_num: Option<String>,
    pub page_size: Option<String>,
    pub status: Option<String>,
    pub user_ids: Option<String>,
}

/// Query string carrying only a status filter.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

/// Build the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/{userId}/orders/{orderId}", get(get_user_order))
        .route("/api/users/{userId}", get(get_user))
}

/// GET /api/users: paged listing.
async fn list_users(
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<&'static str, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let page_num = required_int("pageNum", query.page_num.as_deref())?;
    let page_size = required_int("pageSize", query.page_size.as_deref())?;
    let status = parse_status(query.status.as_deref())?;
    let user_ids = parse_ids(query.user_ids.as_deref())?;

    tracing::info!(page_num, page_size, ?status, ?user_ids, "list users");
    Ok("OK")
}

/// GET /api/users/{userId}/orders/{orderId}: one order of a user.
async fn get_user_order(
    path: Result<Path<(u64, u64)>, PathRejection>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<&'static str, AppError> {
    let Path((user_id, order_id)) = path.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let status = parse_status(query.status.as_deref())?;

    tracing::info!(user_id, order_id, ?status, "get user order");
    Ok("OK")
}

/// GET /api/users/{userId}: user detail.
async fn get_user(
    path: Result<Path<u64>, PathRejection>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<&'static str, AppError> {
    let Path(user_id) = path.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let status = parse_status(query.status.as_deref())?;

    tracing::info!(user_id, ?status, "get user");
    Ok("OK")
}

fn required_int(name: &str, value: Option<&str>) -> Result<u32, AppError> {
    let value = value.ok_or_else(|| AppError::BadRequest(format!("missing parameter '{name}'")))?;
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("parameter '{name}' must be an integer")))
}

fn parse_status(value: Option<&str>) -> Result<Option<UserStatus>, AppError> {
    value.map(UserStatus::from_str).transpose()
}

fn parse_ids(value: Option<&str>) -> Result<Vec<u64>, AppError> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(Vec::new());
    };
    value
        .split(',')
        .map(|id| {
            id.trim()
                .parse()
                .map_err(|_| AppError::BadRequest(format!("invalid user id '{id}'")))
        })
        .collect()
}
