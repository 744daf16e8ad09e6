//! Application state management
//!
//! Contains shared state accessible across all handlers. Handlers keep no
//! mutable state of their own; consistency is left to the document store.

use crate::db::{Collection, DocumentStore, MemoryDocumentStore};
use crate::models::{
    ContactMessage, InquiryMessage, SiteSettings, COLLECTIONS, CONTACTS, MESSAGES, SITE_SETTINGS,
};
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Contact form submissions
    pub contacts: Collection<ContactMessage>,

    /// Inquiry form submissions
    pub inquiries: Collection<InquiryMessage>,

    /// The singleton site settings document
    pub site_settings: Collection<SiteSettings>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            contacts: Collection::new(Arc::clone(&store), CONTACTS.name),
            inquiries: Collection::new(Arc::clone(&store), MESSAGES.name),
            site_settings: Collection::new(store, SITE_SETTINGS.name),
        }
    }

    /// State over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryDocumentStore::new(COLLECTIONS)))
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
