//! Cache-control policies shared by handlers.

/// Per-user responses must be revalidated before reuse.
pub const PRIVATE_NO_CACHE: &str = "private, no-cache, must-revalidate";

/// Media bytes never change under a given id, so caches may keep them.
pub const PUBLIC_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Header tuple for per-user API responses.
pub const fn private_no_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_CACHE)
}

/// Header tuple for stored media content.
pub const fn immutable_content_header() -> (&'static str, &'static str) {
    ("Cache-Control", PUBLIC_IMMUTABLE)
}
