use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use colloquy_client::{
    ChatStore, ClientError, MessageView, Role, SendMessage, ThreadView, ThreadsApi, TurnReply,
    PLACEHOLDER_TITLE,
};

/// Gateway double: each operation replays its own scripted queue and records
/// the call. Popping an empty queue is a test-wiring bug and panics.
#[derive(Default)]
struct ScriptedApi {
    lists: Mutex<VecDeque<Result<Vec<ThreadView>, String>>>,
    creates: Mutex<VecDeque<Result<ThreadView, String>>>,
    fetches: Mutex<VecDeque<Result<ThreadView, String>>>,
    deletes: Mutex<VecDeque<Result<ThreadView, String>>>,
    updates: Mutex<VecDeque<Result<ThreadView, String>>>,
    sends: Mutex<VecDeque<Result<TurnReply, String>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn pop<T>(queue: &Mutex<VecDeque<Result<T, String>>>, op: &str) -> Result<T, ClientError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted result for {op}"))
            .map_err(ClientError::Service)
    }
}

#[async_trait]
impl ThreadsApi for ScriptedApi {
    async fn list_threads(&self) -> Result<Vec<ThreadView>, ClientError> {
        self.calls.lock().unwrap().push("list".to_string());
        Self::pop(&self.lists, "list_threads")
    }

    async fn create_thread(&self, _title: &str) -> Result<ThreadView, ClientError> {
        self.calls.lock().unwrap().push("create".to_string());
        Self::pop(&self.creates, "create_thread")
    }

    async fn fetch_thread(&self, thread_id: &str) -> Result<ThreadView, ClientError> {
        self.calls.lock().unwrap().push(format!("fetch {thread_id}"));
        Self::pop(&self.fetches, "fetch_thread")
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<ThreadView, ClientError> {
        self.calls.lock().unwrap().push(format!("delete {thread_id}"));
        Self::pop(&self.deletes, "delete_thread")
    }

    async fn update_title(&self, thread_id: &str, title: &str) -> Result<ThreadView, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("update {thread_id} {title}"));
        Self::pop(&self.updates, "update_title")
    }

    async fn send_message(&self, message: &SendMessage) -> Result<TurnReply, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("send {}", message.thread_id));
        Self::pop(&self.sends, "send_message")
    }
}

fn thread(id: &str, title: &str, message_texts: &[&str]) -> ThreadView {
    let now = Utc::now();
    ThreadView {
        id: id.to_string(),
        title: title.to_string(),
        messages: message_texts
            .iter()
            .map(|text| MessageView::local(Role::User, *text))
            .collect(),
        created_at: now,
        updated_at: now,
    }
}

fn reply(thread_id: &str, assistant: &str) -> TurnReply {
    TurnReply {
        thread_id: thread_id.to_string(),
        user_message: "ignored".to_string(),
        assistant_message: assistant.to_string(),
    }
}

#[tokio::test]
async fn test_send_without_active_thread_reports_error() {
    let api = ScriptedApi::new();
    let mut store = ChatStore::new(api.clone());

    store.send_message("hello", None).await;

    assert!(store.error().is_some());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_load_threads_activates_most_recent() {
    let api = ScriptedApi::new();
    api.lists.lock().unwrap().push_back(Ok(vec![
        thread("a", "Alpha", &["hi"]),
        thread("b", "Beta", &["yo"]),
    ]));
    let mut store = ChatStore::new(api.clone());

    store.load_threads().await;

    assert_eq!(store.threads().len(), 2);
    assert_eq!(store.active_thread().unwrap().id, "a");
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_create_thread_prepends_and_activates() {
    let api = ScriptedApi::new();
    api.lists
        .lock()
        .unwrap()
        .push_back(Ok(vec![thread("a", "Alpha", &["hi"])]));
    api.creates
        .lock()
        .unwrap()
        .push_back(Ok(thread("b", PLACEHOLDER_TITLE, &[])));
    let mut store = ChatStore::new(api.clone());

    store.load_threads().await;
    store.create_thread().await;

    assert_eq!(store.threads()[0].id, "b");
    assert_eq!(store.threads()[1].id, "a");
    assert_eq!(store.active_thread().unwrap().id, "b");
}

#[tokio::test]
async fn test_optimistic_message_rolls_back_on_failure() {
    let api = ScriptedApi::new();
    api.lists
        .lock()
        .unwrap()
        .push_back(Ok(vec![thread("a", "Alpha", &["earlier"])]));
    api.sends
        .lock()
        .unwrap()
        .push_back(Err("send exploded".to_string()));
    let mut store = ChatStore::new(api.clone());

    store.load_threads().await;
    store.send_message("doomed", None).await;

    assert_eq!(store.error(), Some("send exploded"));
    assert_eq!(store.active_thread().unwrap().messages.len(), 1);
    assert_eq!(store.threads()[0].messages.len(), 1);
}

#[tokio::test]
async fn test_send_appends_assistant_and_confirms_title() {
    let api = ScriptedApi::new();
    api.lists
        .lock()
        .unwrap()
        .push_back(Ok(vec![thread("a", PLACEHOLDER_TITLE, &[])]));
    api.sends
        .lock()
        .unwrap()
        .push_back(Ok(reply("a", "Sure, happy to help!")));
    api.fetches
        .lock()
        .unwrap()
        .push_back(Ok(thread("a", "Generated Title", &["hello", "reply"])));
    let mut store = ChatStore::new(api.clone());

    store.load_threads().await;
    store.send_message("hello", None).await;

    let active = store.active_thread().unwrap();
    assert_eq!(active.messages.len(), 2);
    assert_eq!(active.messages[0].role, Role::User);
    assert_eq!(active.messages[1].role, Role::Assistant);
    assert_eq!(
        active.messages[1].content.as_text(),
        Some("Sure, happy to help!")
    );

    // The placeholder is replaced by the server-confirmed title everywhere.
    assert_eq!(active.title, "Generated Title");
    assert_eq!(store.threads()[0].title, "Generated Title");
    assert!(store.error().is_none());
    assert_eq!(api.calls(), vec!["list", "send a", "fetch a"]);
}

#[tokio::test]
async fn test_send_on_titled_thread_skips_confirmation() {
    let api = ScriptedApi::new();
    api.lists
        .lock()
        .unwrap()
        .push_back(Ok(vec![thread("a", "Alpha", &["earlier"])]));
    api.sends.lock().unwrap().push_back(Ok(reply("a", "more")));
    let mut store = ChatStore::new(api.clone());

    store.load_threads().await;
    store.send_message("again", None).await;

    assert_eq!(store.active_thread().unwrap().messages.len(), 3);
    assert_eq!(api.calls(), vec!["list", "send a"]);
}

#[tokio::test]
async fn test_send_promotes_thread_to_front() {
    let api = ScriptedApi::new();
    api.lists.lock().unwrap().push_back(Ok(vec![
        thread("a", "Alpha", &["hi"]),
        thread("b", "Beta", &["yo"]),
    ]));
    api.fetches
        .lock()
        .unwrap()
        .push_back(Ok(thread("b", "Beta", &["yo"])));
    api.sends.lock().unwrap().push_back(Ok(reply("b", "sup")));
    let mut store = ChatStore::new(api.clone());

    store.load_threads().await;
    store.select_thread("b").await;
    store.send_message("hello b", None).await;

    assert_eq!(store.threads()[0].id, "b");
    assert_eq!(store.threads()[1].id, "a");
}

#[tokio::test]
async fn test_select_active_thread_is_a_noop() {
    let api = ScriptedApi::new();
    api.lists
        .lock()
        .unwrap()
        .push_back(Ok(vec![thread("a", "Alpha", &["hi"])]));
    let mut store = ChatStore::new(api.clone());

    store.load_threads().await;
    store.select_thread("a").await;

    assert_eq!(api.calls(), vec!["list"]);
}

#[tokio::test]
async fn test_select_failure_clears_active() {
    let api = ScriptedApi::new();
    api.lists.lock().unwrap().push_back(Ok(vec![
        thread("a", "Alpha", &["hi"]),
        thread("b", "Beta", &["yo"]),
    ]));
    api.fetches
        .lock()
        .unwrap()
        .push_back(Err("fetch exploded".to_string()));
    let mut store = ChatStore::new(api.clone());

    store.load_threads().await;
    store.select_thread("b").await;

    assert!(store.active_thread().is_none());
    assert_eq!(store.error(), Some("fetch exploded"));
}

#[tokio::test]
async fn test_delete_removes_thread_and_clears_active() {
    let api = ScriptedApi::new();
    api.lists.lock().unwrap().push_back(Ok(vec![
        thread("a", "Alpha", &["hi"]),
        thread("b", "Beta", &["yo"]),
    ]));
    api.deletes
        .lock()
        .unwrap()
        .push_back(Ok(thread("a", "Alpha", &["hi"])));
    let mut store = ChatStore::new(api.clone());

    store.load_threads().await;
    store.delete_thread("a").await;

    assert_eq!(store.threads().len(), 1);
    assert_eq!(store.threads()[0].id, "b");
    assert!(store.active_thread().is_none());
}

#[tokio::test]
async fn test_delete_failure_leaves_state_untouched() {
    let api = ScriptedApi::new();
    api.lists
        .lock()
        .unwrap()
        .push_back(Ok(vec![thread("a", "Alpha", &["hi"])]));
    api.deletes
        .lock()
        .unwrap()
        .push_back(Err("delete exploded".to_string()));
    let mut store = ChatStore::new(api.clone());

    store.load_threads().await;
    store.delete_thread("a").await;

    assert_eq!(store.threads().len(), 1);
    assert!(store.active_thread().is_some());
    assert_eq!(store.error(), Some("delete exploded"));
}

#[tokio::test]
async fn test_failed_rename_is_not_rolled_back() {
    let api = ScriptedApi::new();
    api.lists
        .lock()
        .unwrap()
        .push_back(Ok(vec![thread("a", "Alpha", &["hi"])]));
    api.updates
        .lock()
        .unwrap()
        .push_back(Err("rename exploded".to_string()));
    let mut store = ChatStore::new(api.clone());

    store.load_threads().await;
    store.update_title("a", "Renamed").await;

    assert_eq!(store.threads()[0].title, "Renamed");
    assert_eq!(store.active_thread().unwrap().title, "Renamed");
    assert_eq!(store.error(), Some("rename exploded"));
}
