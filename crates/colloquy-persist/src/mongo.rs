use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};

use crate::error::{PersistError, Result};
use crate::models::Thread;
use crate::store::ThreadStore;

/// MongoDB-backed thread store (one document per thread)
pub struct MongoThreadStore {
    collection: Collection<Thread>,
}

impl MongoThreadStore {
    /// Connect to MongoDB and create the store
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        Ok(Self::new(&client, database))
    }

    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("threads");
        Self { collection }
    }

    fn parse_id(thread_id: &str) -> Result<ObjectId> {
        ObjectId::parse_str(thread_id).map_err(|e| PersistError::InvalidObjectId(e.to_string()))
    }
}

#[async_trait]
impl ThreadStore for MongoThreadStore {
    async fn create_thread(&self, title: &str) -> Result<Thread> {
        let thread = Thread::new(title);
        self.collection.insert_one(&thread).await?;
        Ok(thread)
    }

    async fn list_threads(&self) -> Result<Vec<Thread>> {
        let threads = self
            .collection
            .find(doc! {})
            .sort(doc! { "updated_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(threads)
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        let filter = doc! { "_id": Self::parse_id(thread_id)? };
        Ok(self.collection.find_one(filter).await?)
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<Option<Thread>> {
        let filter = doc! { "_id": Self::parse_id(thread_id)? };
        Ok(self.collection.find_one_and_delete(filter).await?)
    }

    async fn update_title(&self, thread_id: &str, title: &str) -> Result<Option<Thread>> {
        let filter = doc! { "_id": Self::parse_id(thread_id)? };
        let update = doc! {
            "$set": {
                "title": title,
                "updated_at": bson::DateTime::now(),
            }
        };

        Ok(self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn save_thread(&self, thread: &Thread) -> Result<()> {
        let filter = doc! { "_id": thread.id };
        self.collection
            .replace_one(filter, thread)
            .upsert(true)
            .await?;
        Ok(())
    }
}
