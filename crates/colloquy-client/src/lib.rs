//! Client-resident mirror of the conversation service.
//!
//! [`ChatStore`] owns the thread list and the active-thread pointer, applies
//! optimistic updates before the network resolves and reconciles (or rolls
//! back) afterwards. It talks to the service through the [`ThreadsApi`]
//! trait, so it can be driven by a scripted gateway in tests and by
//! [`HttpThreadsApi`] in an application.

pub mod api;
pub mod http;
pub mod models;
pub mod store;

pub use api::{ClientError, SendMessage, ThreadsApi, TurnReply};
pub use http::HttpThreadsApi;
pub use models::{MessageView, Role, ThreadView, PLACEHOLDER_TITLE};
pub use store::ChatStore;
