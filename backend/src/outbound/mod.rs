//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local document and blob stores for articles,
//!   pages, media, and users.
//! - **auth**: an account directory that verifies credentials and a
//!   per-session provider built on top of it.
//!
//! Adapters translate between domain types and their storage shape. They
//! contain no permission or validation logic.

pub mod auth;
pub mod memory;
