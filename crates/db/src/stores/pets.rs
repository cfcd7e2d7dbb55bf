use async_trait::async_trait;

use super::{from_document, from_documents, to_document, to_filter, PetStore, PETS};
use crate::document::Database;
use crate::entities::{Pet, PetFilter};
use crate::error::StoreResult;
use crate::ids::PetId;

/// [`PetStore`] over the `pets` collection.
#[derive(Debug, Clone)]
pub struct DocumentPetStore {
    db: Database,
}

impl DocumentPetStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PetStore for DocumentPetStore {
    async fn get_all(&self) -> StoreResult<Vec<Pet>> {
        from_documents(self.db.all(PETS).await?)
    }

    async fn get_by(&self, filter: &PetFilter) -> StoreResult<Option<Pet>> {
        self.db
            .find_one(PETS, &to_filter(filter)?)
            .await?
            .map(from_document)
            .transpose()
    }

    async fn create(&self, pet: Pet) -> StoreResult<Pet> {
        self.db.insert(PETS, to_document(&pet)?).await?;
        Ok(pet)
    }

    async fn update(&self, pet: &Pet) -> StoreResult<()> {
        self.db.replace(PETS, to_document(pet)?).await
    }

    async fn delete(&self, id: &PetId) -> StoreResult<bool> {
        self.db.remove(PETS, id.as_str()).await
    }
}
