//! Document store, entity types and store ports for the adoption API.
//!
//! The [`Database`] holds named collections of JSON documents. The typed
//! stores in [`stores`] sit on top of it and are what services depend on.

pub mod document;
pub mod entities;
pub mod error;
pub mod ids;
pub mod stores;

pub use document::Database;
pub use entities::{Adoption, AdoptionFilter, Pet, PetFilter, PetRef, Role, User};
pub use error::{StoreError, StoreResult};
pub use ids::{AdoptionId, PetId, UserId};
pub use stores::{AdoptionStore, PetStore, Stores, UserStore};
