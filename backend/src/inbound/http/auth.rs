//! Sign-in, sign-out, and acting-user resolution.
//!
//! ```text
//! POST /api/v1/login {"email":"ada@example.com","password":"s3cret"}
//! POST /api/v1/logout
//! GET /api/v1/me
//! ```
//!
//! The cookie only carries a user id. Every request re-loads that user so
//! role changes and deletions take effect immediately; an id whose record
//! is gone reads as anonymous and the session is cleared.
//!
//! Unlike [`SessionResolver`](crate::domain::SessionResolver), this adapter
//! keeps no per-session state: each login verifies credentials and resolves
//! the identity in one request. Both paths share credential parsing and
//! provider error mapping.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::identity::{map_provider_error, parse_credentials};
use crate::domain::ports::{CredentialVerifier, UserRepository};
use crate::domain::user_admin_service::map_user_error;
use crate::domain::{Capabilities, Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Signed-in user with the controls they may use.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: User,
    pub capabilities: Capabilities,
}

impl MeResponse {
    fn for_user(user: User) -> Self {
        let capabilities = Capabilities::for_user(Some(&user));
        Self { user, capabilities }
    }
}

/// Load the user bound to the session, if any.
pub async fn acting_user(state: &HttpState, session: &SessionContext) -> ApiResult<Option<User>> {
    let Some(id) = session.user_id()? else {
        return Ok(None);
    };
    let user = state.users.find_by_id(&id).await.map_err(map_user_error)?;
    if user.is_none() {
        tracing::debug!(user_id = %id, "session user no longer exists");
        session.clear();
    }
    Ok(user)
}

/// Like [`acting_user`] but anonymous callers get `401 Unauthorized`.
pub async fn require_user(state: &HttpState, session: &SessionContext) -> ApiResult<User> {
    acting_user(state, session)
        .await?
        .ok_or_else(|| Error::unauthorized("login required"))
}

/// Verify credentials and bind the resolved user to the session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = MeResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Malformed credentials", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Authentication provider unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<MeResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = parse_credentials(&email, &password)?;
    let identity = state
        .credentials
        .verify(&credentials)
        .await
        .map_err(map_provider_error)?;
    let user = state.identities.resolve(&identity).await;
    session.persist_user(user.id())?;
    Ok(web::Json(MeResponse::for_user(user)))
}

/// Drop the session. Signing out twice is fine.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Current user and capability matrix.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Signed-in user", body = MeResponse),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["auth"],
    operation_id = "me"
)]
#[get("/me")]
pub async fn me(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    let user = require_user(&state, &session).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(MeResponse::for_user(user)))
}
