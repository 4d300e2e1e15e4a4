use axum::{
    Form,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::error;

mod data;

use crate::web::{
    Result,
    csrf::{gen_csrf, verify_csrf},
    error::Error,
    route::{Route, VerticalLayout},
    session::{LocalStorage, SessionUser},
    templates::{HtmlTemplate, LoginTemplate},
    user::data::LoginData,
};

#[tracing::instrument(level = tracing::Level::DEBUG, skip(session))]
pub async fn login(session: Session) -> Result<Response> {
    tracing::debug!("login called");
    let user = LocalStorage::new(session.clone()).user().await.map_err(|e| {
        error!("error reading session user: {e}");
        Error::Internal
    })?;
    if user.is_some_and(|u| u.is_employee()) {
        return Ok(Redirect::to(Route::Bills.path()).into_response());
    }

    let template = LoginTemplate {
        nav: VerticalLayout::hidden(),
        csrf_token: gen_csrf(&session).await.map_err(|_| Error::Internal)?,
    };
    Ok(HtmlTemplate(template).into_response())
}

/// Signs the employee in. Credentials are checked by the backend, not here.
#[tracing::instrument(level = tracing::Level::DEBUG, skip(session, payload))]
pub async fn do_login(session: Session, Form(payload): Form<LoginData>) -> Result<impl IntoResponse> {
    tracing::debug!("do login called");
    verify_csrf(&payload.csrf_token, &session)
        .await
        .map_err(|_| Error::Unauthorized)?;
    if !payload.validate() {
        return Err(Error::BadRequest("invalid payload".to_string()));
    }

    // new session id on privilege change
    session.cycle_id().await.map_err(|e| {
        error!("error cycling session id: {e}");
        Error::Internal
    })?;

    LocalStorage::new(session)
        .set_user(&SessionUser::employee(payload.email.trim()))
        .await
        .map_err(|e| {
            error!("error putting user in session: {e}");
            Error::Internal
        })?;

    Ok(Redirect::to(Route::Bills.path()))
}

#[tracing::instrument(level = tracing::Level::DEBUG, skip(session))]
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    tracing::debug!("logout called");
    session.flush().await.map_err(|e| {
        error!("Error logging out: {e}");
        Error::Internal
    })?;
    Ok(Redirect::to(Route::Login.path()))
}
