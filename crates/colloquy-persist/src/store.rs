use async_trait::async_trait;

use crate::error::Result;
use crate::models::Thread;

/// Trait for thread persistence operations
///
/// The store keeps each thread as one document; writers persist the full
/// document.
#[async_trait]
pub trait ThreadStore: Send + Sync {
    /// Create a new empty thread with the given title
    async fn create_thread(&self, title: &str) -> Result<Thread>;

    /// All threads, newest `updated_at` first
    async fn list_threads(&self) -> Result<Vec<Thread>>;

    /// Get a thread by ID
    async fn get_thread(&self, thread_id: &str) -> Result<Option<Thread>>;

    /// Delete a thread, returning the deleted document
    async fn delete_thread(&self, thread_id: &str) -> Result<Option<Thread>>;

    /// Rename a thread, returning the updated document
    async fn update_title(&self, thread_id: &str, title: &str) -> Result<Option<Thread>>;

    /// Persist a thread in full (insert or replace)
    async fn save_thread(&self, thread: &Thread) -> Result<()>;
}
