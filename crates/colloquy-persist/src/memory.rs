use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::Thread;
use crate::store::ThreadStore;

/// In-process store backed by a map
///
/// Mirrors the Mongo store's observable behavior; used by tests and local
/// development without a database.
#[derive(Default)]
pub struct MemoryThreadStore {
    threads: RwLock<HashMap<String, Thread>>,
}

impl MemoryThreadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ThreadStore for MemoryThreadStore {
    async fn create_thread(&self, title: &str) -> Result<Thread> {
        let thread = Thread::new(title);
        self.threads
            .write()
            .await
            .insert(thread.id.to_hex(), thread.clone());
        Ok(thread)
    }

    async fn list_threads(&self) -> Result<Vec<Thread>> {
        let mut threads: Vec<Thread> = self.threads.read().await.values().cloned().collect();
        threads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(threads)
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        Ok(self.threads.read().await.get(thread_id).cloned())
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        Ok(self.threads.write().await.remove(thread_id))
    }

    async fn update_title(&self, thread_id: &str, title: &str) -> Result<Option<Thread>> {
        let mut threads = self.threads.write().await;
        let Some(thread) = threads.get_mut(thread_id) else {
            return Ok(None);
        };

        thread.title = title.to_string();
        thread.updated_at = Utc::now();
        Ok(Some(thread.clone()))
    }

    async fn save_thread(&self, thread: &Thread) -> Result<()> {
        self.threads
            .write()
            .await
            .insert(thread.id.to_hex(), thread.clone());
        Ok(())
    }
}
