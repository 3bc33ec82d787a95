//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP handler, the request and response bodies
//! they exchange, and the session cookie security scheme. The document backs
//! Swagger UI in debug builds and is printed by the `openapi-dump` binary.

use crate::domain::{
    Article, ArticleAuthor, ArticleStatus, Capabilities, Error, ErrorCode, Media, Page,
    PageStatus, Role, User,
};
use crate::inbound::http::articles::{ArticleRequest, ArticleUpdateRequest, ViewCount};
use crate::inbound::http::auth::{LoginRequest, MeResponse};
use crate::inbound::http::health::{Phase, ProbeStatus};
use crate::inbound::http::pages::{PageRequest, PageUpdateRequest};
use crate::inbound::http::users::UserUpdateRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Portfolio CMS API",
        description = "Session-authenticated content management for articles, pages, and media."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::articles::list_articles,
        crate::inbound::http::articles::create_article,
        crate::inbound::http::articles::get_article,
        crate::inbound::http::articles::update_article,
        crate::inbound::http::articles::delete_article,
        crate::inbound::http::articles::record_article_view,
        crate::inbound::http::pages::list_pages,
        crate::inbound::http::pages::create_page,
        crate::inbound::http::pages::get_page,
        crate::inbound::http::pages::update_page,
        crate::inbound::http::pages::delete_page,
        crate::inbound::http::media::list_media,
        crate::inbound::http::media::upload_media,
        crate::inbound::http::media::get_media,
        crate::inbound::http::media::delete_media,
        crate::inbound::http::media::media_content,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Role,
        Capabilities,
        MeResponse,
        LoginRequest,
        Article,
        ArticleAuthor,
        ArticleStatus,
        ArticleRequest,
        ArticleUpdateRequest,
        ViewCount,
        Page,
        PageStatus,
        PageRequest,
        PageUpdateRequest,
        Media,
        UserUpdateRequest,
        ProbeStatus,
        Phase,
    )),
    tags(
        (name = "auth", description = "Sign-in and the acting user"),
        (name = "articles", description = "Blog articles"),
        (name = "pages", description = "Static pages"),
        (name = "media", description = "Uploaded files"),
        (name = "users", description = "Account administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
