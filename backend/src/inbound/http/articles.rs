//! Article HTTP handlers.
//!
//! ```text
//! GET /api/v1/articles
//! GET /api/v1/articles/hello-world
//! POST /api/v1/articles {"title":"Hello world","content":"# Hi"}
//! PATCH /api/v1/articles/{id} {"status":"published"}
//! DELETE /api/v1/articles/{id}
//! POST /api/v1/articles/hello-world/views
//! ```
//!
//! Reads are public. Mutations are decided by the domain permission rules
//! against the user bound to the session.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Article, ArticleChanges, ArticleDraft, ArticleStatus, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::acting_user;
use crate::inbound::http::patch::nullable;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_document_id;

/// Body of `POST /api/v1/articles`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRequest {
    pub title: String,
    /// Derived from the title when omitted.
    #[serde(default)]
    pub slug: Option<String>,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: ArticleStatus,
}

impl From<ArticleRequest> for ArticleDraft {
    fn from(value: ArticleRequest) -> Self {
        Self {
            title: value.title,
            slug: value.slug,
            content: value.content,
            excerpt: value.excerpt,
            cover_image: value.cover_image,
            tags: value.tags,
            category: value.category,
            status: value.status,
        }
    }
}

/// Body of `PATCH /api/v1/articles/{id}`. Absent fields stay unchanged;
/// `"coverImage": null` removes the cover.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleUpdateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub cover_image: Option<Option<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<ArticleStatus>,
}

impl From<ArticleUpdateRequest> for ArticleChanges {
    fn from(value: ArticleUpdateRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
            excerpt: value.excerpt,
            cover_image: value.cover_image,
            tags: value.tags,
            category: value.category,
            status: value.status,
        }
    }
}

/// Response of `POST /api/v1/articles/{slug}/views`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ViewCount {
    pub views: u64,
}

/// Every article in listing order.
#[utoipa::path(
    get,
    path = "/api/v1/articles",
    responses(
        (status = 200, description = "Articles", body = [Article]),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["articles"],
    operation_id = "listArticles",
    security([])
)]
#[get("/articles")]
pub async fn list_articles(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Article>>> {
    Ok(web::Json(state.articles.list().await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/articles",
    request_body = ArticleRequest,
    responses(
        (status = 201, description = "Created", body = Article),
        (status = 400, description = "Invalid article", body = Error),
        (status = 403, description = "Not allowed to create articles", body = Error)
    ),
    tags = ["articles"],
    operation_id = "createArticle"
)]
#[post("/articles")]
pub async fn create_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ArticleRequest>,
) -> ApiResult<HttpResponse> {
    let user = acting_user(&state, &session).await?;
    let article = state
        .articles
        .create(payload.into_inner().into(), user.as_ref())
        .await?;
    Ok(HttpResponse::Created().json(article))
}

/// Look an article up by slug.
#[utoipa::path(
    get,
    path = "/api/v1/articles/{slug}",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Article", body = Article),
        (status = 404, description = "No such slug", body = Error)
    ),
    tags = ["articles"],
    operation_id = "getArticle",
    security([])
)]
#[get("/articles/{slug}")]
pub async fn get_article(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Article>> {
    let slug = path.into_inner();
    state
        .articles
        .get_by_slug(&slug)
        .await?
        .map(web::Json)
        .ok_or_else(|| Error::not_found(format!("no article with slug {slug}")))
}

#[utoipa::path(
    patch,
    path = "/api/v1/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    request_body = ArticleUpdateRequest,
    responses(
        (status = 200, description = "Updated", body = Article),
        (status = 400, description = "Invalid change", body = Error),
        (status = 403, description = "Not allowed to edit this article", body = Error),
        (status = 404, description = "Unknown article", body = Error)
    ),
    tags = ["articles"],
    operation_id = "updateArticle"
)]
#[patch("/articles/{id}")]
pub async fn update_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ArticleUpdateRequest>,
) -> ApiResult<web::Json<Article>> {
    let id = parse_document_id(&path.into_inner())?;
    let user = acting_user(&state, &session).await?;
    let article = state
        .articles
        .update(&id, payload.into_inner().into(), user.as_ref())
        .await?;
    Ok(web::Json(article))
}

/// Delete an article. Unknown ids succeed.
#[utoipa::path(
    delete,
    path = "/api/v1/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not allowed to delete articles", body = Error)
    ),
    tags = ["articles"],
    operation_id = "deleteArticle"
)]
#[delete("/articles/{id}")]
pub async fn delete_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_document_id(&path.into_inner())?;
    let user = acting_user(&state, &session).await?;
    state.articles.delete(&id, user.as_ref()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Count one view of an article.
#[utoipa::path(
    post,
    path = "/api/v1/articles/{slug}/views",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "New view total", body = ViewCount),
        (status = 404, description = "No such slug", body = Error)
    ),
    tags = ["articles"],
    operation_id = "recordArticleView",
    security([])
)]
#[post("/articles/{slug}/views")]
pub async fn record_article_view(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ViewCount>> {
    let views = state.articles.record_view(&path.into_inner()).await?;
    Ok(web::Json(ViewCount { views }))
}
