//! Store ports consumed by the services, and their document-backed adapters.
//!
//! Each port is an async trait returning [`StoreResult`]. With the `mock`
//! feature enabled, mockall doubles (`MockUserStore`, ...) are generated for
//! use in service tests.

mod adoptions;
mod pets;
mod users;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::document::Database;
use crate::entities::{Adoption, AdoptionFilter, Pet, PetFilter, User};
use crate::error::{StoreError, StoreResult};
use crate::ids::{PetId, UserId};

pub use adoptions::DocumentAdoptionStore;
pub use pets::DocumentPetStore;
pub use users::DocumentUserStore;

pub const USERS: &str = "users";
pub const PETS: &str = "pets";
pub const ADOPTIONS: &str = "adoptions";

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_all(&self) -> StoreResult<Vec<User>>;

    async fn get_by_id(&self, id: &UserId) -> StoreResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn create(&self, user: User) -> StoreResult<User>;

    /// Replace the stored user. Fails with `Missing` when absent.
    async fn update(&self, user: &User) -> StoreResult<()>;

    /// Returns false when no user had this id.
    async fn delete(&self, id: &UserId) -> StoreResult<bool>;
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait PetStore: Send + Sync {
    async fn get_all(&self) -> StoreResult<Vec<Pet>>;

    /// First pet matching every set field of `filter`.
    async fn get_by(&self, filter: &PetFilter) -> StoreResult<Option<Pet>>;

    async fn create(&self, pet: Pet) -> StoreResult<Pet>;

    async fn update(&self, pet: &Pet) -> StoreResult<()>;

    async fn delete(&self, id: &PetId) -> StoreResult<bool>;
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait AdoptionStore: Send + Sync {
    async fn get_all(&self) -> StoreResult<Vec<Adoption>>;

    async fn get_by(&self, filter: &AdoptionFilter) -> StoreResult<Option<Adoption>>;

    async fn create(&self, adoption: Adoption) -> StoreResult<Adoption>;
}

/// The three stores, shared behind trait objects.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub pets: Arc<dyn PetStore>,
    pub adoptions: Arc<dyn AdoptionStore>,
}

impl Stores {
    /// Collections the document adapters read and write.
    pub const COLLECTIONS: [&'static str; 3] = [USERS, PETS, ADOPTIONS];

    /// Build document-backed stores over `db`.
    pub fn document(db: &Database) -> Self {
        Self {
            users: Arc::new(DocumentUserStore::new(db.clone())),
            pets: Arc::new(DocumentPetStore::new(db.clone())),
            adoptions: Arc::new(DocumentAdoptionStore::new(db.clone())),
        }
    }
}

fn to_document<T: Serialize>(entity: &T) -> StoreResult<Value> {
    Ok(serde_json::to_value(entity)?)
}

fn from_document<T: DeserializeOwned>(document: Value) -> StoreResult<T> {
    Ok(serde_json::from_value(document)?)
}

fn from_documents<T: DeserializeOwned>(documents: Vec<Value>) -> StoreResult<Vec<T>> {
    documents.into_iter().map(from_document).collect()
}

fn to_filter<T: Serialize>(filter: &T) -> StoreResult<Map<String, Value>> {
    match serde_json::to_value(filter)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(StoreError::invalid_document("filter must serialize to an object")),
    }
}
