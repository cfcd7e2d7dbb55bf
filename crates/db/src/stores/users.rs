use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{from_document, from_documents, to_document, UserStore, USERS};
use crate::document::Database;
use crate::entities::User;
use crate::error::StoreResult;
use crate::ids::UserId;

/// [`UserStore`] over the `users` collection.
#[derive(Debug, Clone)]
pub struct DocumentUserStore {
    db: Database,
}

impl DocumentUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for DocumentUserStore {
    async fn get_all(&self) -> StoreResult<Vec<User>> {
        from_documents(self.db.all(USERS).await?)
    }

    async fn get_by_id(&self, id: &UserId) -> StoreResult<Option<User>> {
        self.db
            .get(USERS, id.as_str())
            .await?
            .map(from_document)
            .transpose()
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let mut filter = Map::new();
        filter.insert("email".to_string(), Value::String(email.to_string()));
        self.db
            .find_one(USERS, &filter)
            .await?
            .map(from_document)
            .transpose()
    }

    async fn create(&self, user: User) -> StoreResult<User> {
        self.db.insert(USERS, to_document(&user)?).await?;
        Ok(user)
    }

    async fn update(&self, user: &User) -> StoreResult<()> {
        self.db.replace(USERS, to_document(user)?).await
    }

    async fn delete(&self, id: &UserId) -> StoreResult<bool> {
        self.db.remove(USERS, id.as_str()).await
    }
}
