use std::sync::Arc;

use adoptme_db::{Pet, PetStore, Stores, User, UserStore};
use adoptme_kernel::settings::MockSettings;

use super::models::{Batch, GenerateData, GeneratedData};
use crate::error::{ServiceError, ServiceResult};
use crate::utils::mocking::{generate_mock_pets, generate_mock_users};
use crate::utils::password::create_hash;

pub const MISSING_PARAMETERS: &str = "Provide at least one parameter: users or pets";

#[derive(Clone)]
pub struct MockService {
    users: Arc<dyn UserStore>,
    pets: Arc<dyn PetStore>,
    settings: MockSettings,
}

impl MockService {
    pub fn new(users: Arc<dyn UserStore>, pets: Arc<dyn PetStore>, settings: MockSettings) -> Self {
        Self {
            users,
            pets,
            settings,
        }
    }

    pub fn from_stores(stores: &Stores, settings: MockSettings) -> Self {
        Self::new(Arc::clone(&stores.users), Arc::clone(&stores.pets), settings)
    }

    /// A preview batch of the configured size; nothing is stored.
    pub fn preview_pets(&self) -> Vec<Pet> {
        generate_mock_pets(self.settings.quantity)
    }

    pub fn preview_users(&self) -> Vec<User> {
        generate_mock_users(self.settings.quantity, &create_hash(&self.settings.password))
    }

    /// Generate and store the requested batches.
    pub async fn generate(&self, request: GenerateData) -> ServiceResult<GeneratedData<User, Pet>> {
        if request.users().is_none() && request.pets().is_none() {
            return Err(ServiceError::validation(MISSING_PARAMETERS));
        }
        let max = self.settings.max_quantity;
        if request.users().into_iter().chain(request.pets()).any(|n| n > max) {
            return Err(ServiceError::validation(format!("Quantity must not exceed {max}")));
        }

        let users = match request.users() {
            Some(quantity) => Some(Batch::new(self.insert_users(quantity).await?)),
            None => None,
        };
        let pets = match request.pets() {
            Some(quantity) => Some(Batch::new(self.insert_pets(quantity).await?)),
            None => None,
        };

        tracing::info!(
            users = users.as_ref().map_or(0, |b| b.quantity),
            pets = pets.as_ref().map_or(0, |b| b.quantity),
            "mock data inserted"
        );
        Ok(GeneratedData { users, pets })
    }

    // Inserted straight through the store: mock emails are not checked for uniqueness.
    async fn insert_users(&self, quantity: usize) -> ServiceResult<Vec<User>> {
        let hash = create_hash(&self.settings.password);
        let mut inserted = Vec::with_capacity(quantity);
        for user in generate_mock_users(quantity, &hash) {
            inserted.push(self.users.create(user).await?);
        }
        Ok(inserted)
    }

    async fn insert_pets(&self, quantity: usize) -> ServiceResult<Vec<Pet>> {
        let mut inserted = Vec::with_capacity(quantity);
        for pet in generate_mock_pets(quantity) {
            inserted.push(self.pets.create(pet).await?);
        }
        Ok(inserted)
    }
}
