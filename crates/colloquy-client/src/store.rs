use std::sync::Arc;

use chrono::Utc;

use crate::api::{SendMessage, ThreadsApi};
use crate::models::{MessageView, Role, ThreadView, PLACEHOLDER_TITLE};

/// Client-resident mirror of the thread list
///
/// Applies optimistic updates immediately and reconciles with the server
/// response, rolling back the optimistic message when a send fails. Owned by
/// a single event loop: operations take `&mut self` and every state
/// transition between awaits is applied atomically.
pub struct ChatStore {
    api: Arc<dyn ThreadsApi>,
    threads: Vec<ThreadView>,
    active: Option<ThreadView>,
    is_loading: bool,
    error: Option<String>,
}

impl ChatStore {
    pub fn new(api: Arc<dyn ThreadsApi>) -> Self {
        Self {
            api,
            threads: Vec::new(),
            active: None,
            is_loading: false,
            error: None,
        }
    }

    /// Threads in most-recent-activity order
    pub fn threads(&self) -> &[ThreadView] {
        &self.threads
    }

    pub fn active_thread(&self) -> Option<&ThreadView> {
        self.active.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch every thread and activate the most recent one.
    pub async fn load_threads(&mut self) {
        self.begin();
        let fetched = self.api.list_threads().await;
        match fetched {
            Ok(threads) => {
                self.active = threads.first().cloned();
                self.threads = threads;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self.is_loading = false;
    }

    /// Create a placeholder-titled thread and make it active.
    pub async fn create_thread(&mut self) {
        self.begin();
        let created = self.api.create_thread(PLACEHOLDER_TITLE).await;
        match created {
            Ok(thread) => {
                self.threads.insert(0, thread.clone());
                self.active = Some(thread);
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self.is_loading = false;
    }

    /// Fetch full detail for a thread and make it active.
    pub async fn select_thread(&mut self, thread_id: &str) {
        if self
            .active
            .as_ref()
            .is_some_and(|active| active.id == thread_id)
        {
            return;
        }

        self.begin();
        let fetched = self.api.fetch_thread(thread_id).await;
        match fetched {
            // Only the active view is replaced; the cached list copy stays.
            Ok(thread) => self.active = Some(thread),
            Err(err) => {
                self.error = Some(err.to_string());
                self.active = None;
            }
        }
        self.is_loading = false;
    }

    /// Delete remotely, then drop the local copies. Not optimistic: a remote
    /// failure leaves local state unmodified.
    pub async fn delete_thread(&mut self, thread_id: &str) {
        self.begin();
        let deleted = self.api.delete_thread(thread_id).await;
        match deleted {
            Ok(_) => {
                self.threads.retain(|thread| thread.id != thread_id);
                if self
                    .active
                    .as_ref()
                    .is_some_and(|active| active.id == thread_id)
                {
                    self.active = None;
                }
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self.is_loading = false;
    }

    /// Rename locally first, then remotely. An optimistic rename is never
    /// rolled back; a failure only surfaces in `error`.
    pub async fn update_title(&mut self, thread_id: &str, title: &str) {
        self.error = None;
        self.apply_title(thread_id, title);

        let renamed = self.api.update_title(thread_id, title).await;
        if let Err(err) = renamed {
            self.error = Some(err.to_string());
        }
    }

    /// Send one user turn on the active thread.
    ///
    /// The user message is visible before any network round trip; the
    /// assistant message appears only after the call resolves. On failure the
    /// optimistic message is removed from both the active view and the list.
    pub async fn send_message(&mut self, text: &str, image_base64: Option<String>) {
        self.error = None;

        let Some(active) = self.active.as_mut() else {
            self.error = Some("No active thread to send the message to.".to_string());
            return;
        };

        let thread_id = active.id.clone();
        let first_turn = active.messages.is_empty() || active.title == PLACEHOLDER_TITLE;
        let user_message = MessageView::local(Role::User, text);

        active.messages.push(user_message.clone());
        active.updated_at = Utc::now();
        let snapshot = active.clone();
        self.promote(snapshot);

        self.is_loading = true;
        let outcome = self
            .api
            .send_message(&SendMessage {
                thread_id: thread_id.clone(),
                message: text.to_string(),
                image_base64,
            })
            .await;

        match outcome {
            Ok(reply) => {
                self.append_message(
                    &thread_id,
                    MessageView::local(Role::Assistant, reply.assistant_message),
                );
                if first_turn {
                    self.confirm_title(&thread_id).await;
                }
            }
            Err(err) => {
                self.remove_message(&thread_id, &user_message.id);
                self.error = Some(err.to_string());
            }
        }
        self.is_loading = false;
    }

    fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Move a thread to the front of the most-recently-used list.
    fn promote(&mut self, thread: ThreadView) {
        self.threads.retain(|existing| existing.id != thread.id);
        self.threads.insert(0, thread);
    }

    fn apply_title(&mut self, thread_id: &str, title: &str) {
        if let Some(thread) = self.threads.iter_mut().find(|t| t.id == thread_id) {
            thread.title = title.to_string();
        }
        if let Some(active) = self.active.as_mut().filter(|a| a.id == thread_id) {
            active.title = title.to_string();
        }
    }

    fn append_message(&mut self, thread_id: &str, message: MessageView) {
        let now = Utc::now();
        if let Some(active) = self.active.as_mut().filter(|a| a.id == thread_id) {
            active.messages.push(message.clone());
            active.updated_at = now;
        }
        if let Some(thread) = self.threads.iter_mut().find(|t| t.id == thread_id) {
            thread.messages.push(message);
            thread.updated_at = now;
        }
    }

    fn remove_message(&mut self, thread_id: &str, message_id: &str) {
        if let Some(active) = self.active.as_mut().filter(|a| a.id == thread_id) {
            active.messages.retain(|m| m.id != message_id);
        }
        if let Some(thread) = self.threads.iter_mut().find(|t| t.id == thread_id) {
            thread.messages.retain(|m| m.id != message_id);
        }
    }

    /// Titles are derived server-side; after a first turn the placeholder is
    /// replaced with whatever the server persisted.
    async fn confirm_title(&mut self, thread_id: &str) {
        let confirmed = self.api.fetch_thread(thread_id).await;
        match confirmed {
            Ok(thread) => self.apply_title(thread_id, &thread.title),
            Err(err) => {
                tracing::debug!(thread_id, error = %err, "could not confirm server title");
            }
        }
    }
}
