use async_trait::async_trait;

use super::{from_document, from_documents, to_document, to_filter, AdoptionStore, ADOPTIONS};
use crate::document::Database;
use crate::entities::{Adoption, AdoptionFilter};
use crate::error::StoreResult;

/// [`AdoptionStore`] over the `adoptions` collection.
#[derive(Debug, Clone)]
pub struct DocumentAdoptionStore {
    db: Database,
}

impl DocumentAdoptionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AdoptionStore for DocumentAdoptionStore {
    async fn get_all(&self) -> StoreResult<Vec<Adoption>> {
        from_documents(self.db.all(ADOPTIONS).await?)
    }

    async fn get_by(&self, filter: &AdoptionFilter) -> StoreResult<Option<Adoption>> {
        self.db
            .find_one(ADOPTIONS, &to_filter(filter)?)
            .await?
            .map(from_document)
            .transpose()
    }

    async fn create(&self, adoption: Adoption) -> StoreResult<Adoption> {
        self.db.insert(ADOPTIONS, to_document(&adoption)?).await?;
        Ok(adoption)
    }
}
