//! User Routes
//!
//! - GET /users?q= - Searchable user list with status counts
//! - POST /users - Create a user (kept locally when the remote refuses)

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::client::{NewUser, UserStatus};
use crate::session::Identity;
use crate::shell::Route;
use crate::web::error::WebResult;
use crate::web::pages::{render, user_cards, UserRow, UsersTemplate};
use crate::web::routes::{load, respond};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    #[serde(default)]
    pub q: String,
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewUserForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: String,
}

/// Outcome of the last create, carried back through the redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Created,
    SavedLocally,
    Invalid,
}

impl Notice {
    pub fn as_str(self) -> &'static str {
        match self {
            Notice::Created => "created",
            Notice::SavedLocally => "saved-locally",
            Notice::Invalid => "invalid",
        }
    }

    pub fn parse(s: &str) -> Option<Notice> {
        match s {
            "created" => Some(Notice::Created),
            "saved-locally" => Some(Notice::SavedLocally),
            "invalid" => Some(Notice::Invalid),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::Created => "User created.",
            Notice::SavedLocally => "The remote API did not accept the user; it was saved locally.",
            Notice::Invalid => "Name and email are required.",
        }
    }
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<UsersQuery>,
) -> WebResult<Response> {
    let directory = state.directory.clone();
    let view = load(async move { directory.load_page().await }).await;

    let retry = format!("/users?q={}", urlencoding::encode(&query.q));
    let notice = query
        .notice
        .as_deref()
        .and_then(Notice::parse)
        .map(Notice::message)
        .unwrap_or_default();

    let shell = state.shell(Route::Users, &identity.email);
    respond(view, shell, retry, |page, shell| {
        render(&UsersTemplate {
            shell,
            cards: user_cards(&page.status_counts()),
            users: page.filter(&query.q).into_iter().map(UserRow::from).collect(),
            search: query.q.clone(),
            notice: notice.to_string(),
        })
    })
}

/// POST /users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NewUserForm>,
) -> WebResult<Response> {
    let name = form.name.trim();
    let email = form.email.trim();
    if name.is_empty() || email.is_empty() {
        return Ok(redirect_with(Notice::Invalid));
    }

    let payload = NewUser {
        name: name.to_string(),
        email: email.to_string(),
        status: form.status.parse().unwrap_or(UserStatus::Active),
    };

    let outcome = state.directory.create(payload).await?;
    let notice = if outcome.is_local() {
        Notice::SavedLocally
    } else {
        Notice::Created
    };
    Ok(redirect_with(notice))
}

fn redirect_with(notice: Notice) -> Response {
    Redirect::to(&format!("{}?notice={}", Route::Users.path(), notice.as_str())).into_response()
}
