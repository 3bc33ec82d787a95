//! Authentication adapters.
//!
//! [`AccountDirectory`] is the credential store: it maps normalised emails
//! to salted SHA-256 password digests and the profile the provider exposes.
//! [`DirectorySessionProvider`] wraps a directory as a per-session
//! [`AuthProvider`](crate::domain::ports::AuthProvider) that publishes the
//! signed-in identity over a watch channel.

mod account_directory;
mod session_provider;

pub use account_directory::{AccountDirectory, NewAccount};
pub use session_provider::DirectorySessionProvider;
