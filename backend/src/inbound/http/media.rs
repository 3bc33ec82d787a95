//! Media library HTTP handlers.
//!
//! ```text
//! GET /api/v1/media
//! POST /api/v1/media?filename=cat.png&altText=A%20cat   (body: raw bytes)
//! GET /api/v1/media/{id}
//! DELETE /api/v1/media/{id}
//! GET /media/{id}/cat.png
//! ```
//!
//! Uploads carry the file as the raw request body; its `Content-Type`
//! becomes the stored MIME type. Stored bytes are served publicly from the
//! URL recorded on the media record.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use serde::Deserialize;

use crate::domain::{Error, Media, MediaUpload};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::acting_user;
use crate::inbound::http::cache_control::immutable_content_header;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_document_id;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Query string of `POST /api/v1/media`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadQuery {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

/// MIME essence of the request body, without parameters such as `charset`.
fn content_type(req: &HttpRequest) -> &str {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or("", |value| {
            value.split_once(';').map_or(value, |(essence, _)| essence)
        })
}

/// Every media record, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/media",
    responses(
        (status = 200, description = "Media library", body = [Media]),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["media"],
    operation_id = "listMedia",
    security([])
)]
#[get("/media")]
pub async fn list_media(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Media>>> {
    Ok(web::Json(state.media.list().await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/media",
    params(
        ("filename" = String, Query, description = "Stored file name"),
        ("altText" = Option<String>, Query, description = "Alternative text"),
        ("caption" = Option<String>, Query, description = "Caption")
    ),
    request_body(content = Vec<u8>, description = "Raw file bytes", content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Uploaded", body = Media),
        (status = 400, description = "Invalid upload", body = Error),
        (status = 403, description = "Sign in required", body = Error)
    ),
    tags = ["media"],
    operation_id = "uploadMedia"
)]
#[post("/media")]
pub async fn upload_media(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let UploadQuery {
        filename,
        alt_text,
        caption,
    } = query.into_inner();
    let upload = MediaUpload::new(&filename, content_type(&req), body.to_vec())?
        .with_alt_text(alt_text)
        .with_caption(caption);
    let user = acting_user(&state, &session).await?;
    let media = state.media.upload(upload, user.as_ref()).await?;
    Ok(HttpResponse::Created().json(media))
}

#[utoipa::path(
    get,
    path = "/api/v1/media/{id}",
    params(("id" = String, Path, description = "Media id")),
    responses(
        (status = 200, description = "Media record", body = Media),
        (status = 404, description = "Unknown media", body = Error)
    ),
    tags = ["media"],
    operation_id = "getMedia",
    security([])
)]
#[get("/media/{id}")]
pub async fn get_media(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Media>> {
    let id = parse_document_id(&path.into_inner())?;
    state
        .media
        .get_by_id(&id)
        .await?
        .map(web::Json)
        .ok_or_else(|| Error::not_found(format!("media {id} not found")))
}

#[utoipa::path(
    delete,
    path = "/api/v1/media/{id}",
    params(("id" = String, Path, description = "Media id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not allowed to delete media", body = Error)
    ),
    tags = ["media"],
    operation_id = "deleteMedia"
)]
#[delete("/media/{id}")]
pub async fn delete_media(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_document_id(&path.into_inner())?;
    let user = acting_user(&state, &session).await?;
    state.media.delete(&id, user.as_ref()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Serve stored bytes. The filename must match the record.
#[utoipa::path(
    get,
    path = "/media/{id}/{filename}",
    params(
        ("id" = String, Path, description = "Media id"),
        ("filename" = String, Path, description = "Stored file name")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "Unknown media", body = Error)
    ),
    tags = ["media"],
    operation_id = "mediaContent",
    security([])
)]
#[get("/media/{id}/{filename}")]
pub async fn media_content(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (raw_id, filename) = path.into_inner();
    let id = parse_document_id(&raw_id)?;
    let not_found = || Error::not_found(format!("media {id} not found"));
    match state.media.get_by_id(&id).await? {
        Some(record) if record.filename == filename => {}
        _ => return Err(not_found()),
    }
    let content = state.media.content(&id).await?;
    Ok(HttpResponse::Ok()
        .content_type(content.mime_type)
        .insert_header(immutable_content_header())
        .body(content.bytes))
}
