//! Admin-only user management handlers.
//!
//! ```text
//! GET /api/v1/users
//! GET /api/v1/users/{id}
//! PATCH /api/v1/users/{id} {"role":"editor"}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{DisplayName, Error, Role, User, UserChanges};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::acting_user;
use crate::inbound::http::patch::nullable;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_user_id;

/// Body of `PATCH /api/v1/users/{id}`. Email and id cannot be changed.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    /// `null` removes the avatar.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub avatar: Option<Option<String>>,
}

impl TryFrom<UserUpdateRequest> for UserChanges {
    type Error = Error;

    fn try_from(value: UserUpdateRequest) -> Result<Self, Self::Error> {
        let name = value
            .name
            .map(DisplayName::new)
            .transpose()
            .map_err(|error| {
                Error::invalid_request(error.to_string())
                    .with_details(json!({ "field": "name", "code": "invalid_display_name" }))
            })?;
        Ok(Self {
            name,
            role: value.role,
            avatar: value.avatar,
        })
    }
}

/// Every user, newest account first.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 403, description = "Admins only", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<User>>> {
    let user = acting_user(&state, &session).await?;
    Ok(web::Json(state.user_admin.list(user.as_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 403, description = "Admins only", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path.into_inner())?;
    let user = acting_user(&state, &session).await?;
    Ok(web::Json(state.user_admin.get(&id, user.as_ref()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "Updated", body = User),
        (status = 400, description = "Invalid change", body = Error),
        (status = 403, description = "Admins only", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UserUpdateRequest>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path.into_inner())?;
    let changes = UserChanges::try_from(payload.into_inner())?;
    let user = acting_user(&state, &session).await?;
    let updated = state
        .user_admin
        .update(&id, changes, user.as_ref())
        .await?;
    Ok(web::Json(updated))
}

/// Remove a user record. Their session stops working on the next request.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Admins only", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path.into_inner())?;
    let user = acting_user(&state, &session).await?;
    state.user_admin.delete(&id, user.as_ref()).await?;
    Ok(HttpResponse::NoContent().finish())
}
