use axum::{extract::FromRequestParts, http::request::Parts, response::Redirect};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::error;

use crate::web::{USER, route::Route};

pub const EMPLOYEE: &str = "Employee";

/// The signed-in user, stored as JSON under the `user` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "type")]
    pub user_type: String,
    pub email: String,
}

impl SessionUser {
    pub fn employee(email: &str) -> Self {
        Self {
            user_type: EMPLOYEE.to_owned(),
            email: email.to_owned(),
        }
    }

    pub fn is_employee(&self) -> bool {
        self.user_type == EMPLOYEE
    }
}

/// String key-value storage scoped to the browser session
#[derive(Debug, Clone)]
pub struct LocalStorage(Session);

impl LocalStorage {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    pub async fn get_item(&self, key: &str) -> Result<Option<String>, anyhow::Error> {
        Ok(self.0.get::<String>(key).await?)
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        self.0.insert(key, value).await?;
        Ok(())
    }

    pub async fn user(&self) -> Result<Option<SessionUser>, anyhow::Error> {
        match self.get_item(USER).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub async fn set_user(&self, user: &SessionUser) -> Result<(), anyhow::Error> {
        self.set_item(USER, &serde_json::to_string(user)?).await
    }
}

/// Extracts the signed-in employee, redirects to the login page otherwise
#[derive(Debug, Clone)]
pub struct Employee(pub SessionUser);

impl<S> FromRequestParts<S> for Employee
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| Redirect::to(Route::Login.path()))?;

        match LocalStorage::new(session).user().await {
            Ok(Some(user)) if user.is_employee() => Ok(Employee(user)),
            Ok(_) => Err(Redirect::to(Route::Login.path())),
            Err(e) => {
                error!("Error reading session user: {e}");
                Err(Redirect::to(Route::Login.path()))
            }
        }
    }
}
