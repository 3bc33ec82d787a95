//! HTTP inbound adapter exposing the CMS REST API.
//!
//! Handlers translate JSON and query parameters into domain inputs, load the
//! acting user from the session cookie, and delegate to the services held in
//! [`state::HttpState`]. Permission and validation decisions stay in the
//! domain.

pub mod articles;
pub mod auth;
mod cache_control;
pub mod error;
pub mod health;
pub mod media;
pub mod pages;
mod patch;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every API route under `/api/v1`, plus the public media
/// content route at `/media/{id}/{filename}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::PayloadConfig::new(media::MAX_UPLOAD_BYTES))
            .service(auth::login)
            .service(auth::logout)
            .service(auth::me)
            .service(articles::list_articles)
            .service(articles::create_article)
            .service(articles::get_article)
            .service(articles::update_article)
            .service(articles::delete_article)
            .service(articles::record_article_view)
            .service(pages::list_pages)
            .service(pages::create_page)
            .service(pages::get_page)
            .service(pages::update_page)
            .service(pages::delete_page)
            .service(media::list_media)
            .service(media::upload_media)
            .service(media::get_media)
            .service(media::delete_media)
            .service(users::list_users)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::delete_user),
    )
    .service(media::media_content);
}
