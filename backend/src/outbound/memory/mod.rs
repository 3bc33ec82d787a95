//! In-process stores backed by `tokio::sync::RwLock`.
//!
//! Each store keeps its documents in a map guarded by a single lock, so a
//! uniqueness check and the write it guards happen under one critical
//! section. Nothing survives a restart.

mod article_store;
mod media_store;
mod page_store;
mod user_store;

pub use article_store::MemoryArticleStore;
pub use media_store::MemoryMediaStore;
pub use page_store::MemoryPageStore;
pub use user_store::MemoryUserStore;

use std::collections::HashMap;

use crate::domain::DocumentId;

/// Pick an id not yet used in `documents`.
fn fresh_id<T>(documents: &HashMap<DocumentId, T>) -> DocumentId {
    loop {
        let candidate = DocumentId::random();
        if !documents.contains_key(&candidate) {
            return candidate;
        }
    }
}
