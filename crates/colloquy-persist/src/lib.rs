pub mod error;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod store;

pub use error::PersistError;
pub use memory::MemoryThreadStore;
pub use models::{MessageRole, StoredMessage, Thread, DEFAULT_TITLE};
pub use mongo::MongoThreadStore;
pub use store::ThreadStore;
