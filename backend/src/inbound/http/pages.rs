//! Static page HTTP handlers.
//!
//! ```text
//! GET /api/v1/pages
//! GET /api/v1/pages/about
//! POST /api/v1/pages {"title":"About","content":"...","order":1}
//! PATCH /api/v1/pages/{id} {"order":2}
//! DELETE /api/v1/pages/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Page, PageChanges, PageDraft, PageStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::acting_user;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_document_id;

/// Body of `POST /api/v1/pages`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub content: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub status: PageStatus,
}

impl From<PageRequest> for PageDraft {
    fn from(value: PageRequest) -> Self {
        Self {
            title: value.title,
            slug: value.slug,
            content: value.content,
            order: value.order,
            status: value.status,
        }
    }
}

/// Body of `PATCH /api/v1/pages/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageUpdateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub status: Option<PageStatus>,
}

impl From<PageUpdateRequest> for PageChanges {
    fn from(value: PageUpdateRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
            order: value.order,
            status: value.status,
        }
    }
}

/// Pages in navigation order.
#[utoipa::path(
    get,
    path = "/api/v1/pages",
    responses(
        (status = 200, description = "Pages", body = [Page]),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["pages"],
    operation_id = "listPages",
    security([])
)]
#[get("/pages")]
pub async fn list_pages(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Page>>> {
    Ok(web::Json(state.pages.list().await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/pages",
    request_body = PageRequest,
    responses(
        (status = 201, description = "Created", body = Page),
        (status = 400, description = "Invalid page", body = Error),
        (status = 403, description = "Not allowed to create pages", body = Error)
    ),
    tags = ["pages"],
    operation_id = "createPage"
)]
#[post("/pages")]
pub async fn create_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PageRequest>,
) -> ApiResult<HttpResponse> {
    let user = acting_user(&state, &session).await?;
    let page = state
        .pages
        .create(payload.into_inner().into(), user.as_ref())
        .await?;
    Ok(HttpResponse::Created().json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/pages/{slug}",
    params(("slug" = String, Path, description = "Page slug")),
    responses(
        (status = 200, description = "Page", body = Page),
        (status = 404, description = "No such slug", body = Error)
    ),
    tags = ["pages"],
    operation_id = "getPage",
    security([])
)]
#[get("/pages/{slug}")]
pub async fn get_page(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Page>> {
    let slug = path.into_inner();
    state
        .pages
        .get_by_slug(&slug)
        .await?
        .map(web::Json)
        .ok_or_else(|| Error::not_found(format!("no page with slug {slug}")))
}

#[utoipa::path(
    patch,
    path = "/api/v1/pages/{id}",
    params(("id" = String, Path, description = "Page id")),
    request_body = PageUpdateRequest,
    responses(
        (status = 200, description = "Updated", body = Page),
        (status = 400, description = "Invalid change", body = Error),
        (status = 403, description = "Not allowed to edit pages", body = Error),
        (status = 404, description = "Unknown page", body = Error)
    ),
    tags = ["pages"],
    operation_id = "updatePage"
)]
#[patch("/pages/{id}")]
pub async fn update_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<PageUpdateRequest>,
) -> ApiResult<web::Json<Page>> {
    let id = parse_document_id(&path.into_inner())?;
    let user = acting_user(&state, &session).await?;
    let page = state
        .pages
        .update(&id, payload.into_inner().into(), user.as_ref())
        .await?;
    Ok(web::Json(page))
}

#[utoipa::path(
    delete,
    path = "/api/v1/pages/{id}",
    params(("id" = String, Path, description = "Page id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not allowed to delete pages", body = Error)
    ),
    tags = ["pages"],
    operation_id = "deletePage"
)]
#[delete("/pages/{id}")]
pub async fn delete_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_document_id(&path.into_inner())?;
    let user = acting_user(&state, &session).await?;
    state.pages.delete(&id, user.as_ref()).await?;
    Ok(HttpResponse::NoContent().finish())
}
