// Data models for the signed-in user and app navigation

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// Where the caller should navigate next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    Auth,
    Translate,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Auth => "/auth",
            Route::Translate => "/translate",
            Route::Dashboard => "/dashboard",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Auth service unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
}

pub type AuthResult<T> = Result<T, AuthError>;
