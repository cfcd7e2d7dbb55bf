use std::sync::Arc;

use adoptme_db::{Pet, PetFilter, PetId, PetStore};

use super::models::{CreatePet, UpdatePet};
use crate::error::{ServiceError, ServiceResult};
use crate::utils::gate::WriteGate;
use crate::utils::non_blank;

const PET_NOT_FOUND: &str = "Pet not found";

#[derive(Clone)]
pub struct PetService {
    pets: Arc<dyn PetStore>,
    gate: WriteGate,
}

impl PetService {
    pub fn new(pets: Arc<dyn PetStore>, gate: WriteGate) -> Self {
        Self { pets, gate }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Pet>> {
        Ok(self.pets.get_all().await?)
    }

    pub async fn get(&self, id: &PetId) -> ServiceResult<Pet> {
        self.pets
            .get_by(&PetFilter::by_id(id.clone()))
            .await?
            .ok_or_else(|| ServiceError::not_found(PET_NOT_FOUND))
    }

    pub async fn create(&self, input: CreatePet) -> ServiceResult<Pet> {
        let (Some(name), Some(specie), Some(birth_date)) = (
            non_blank(input.name),
            non_blank(input.specie),
            input.birth_date,
        ) else {
            return Err(ServiceError::validation("Incomplete values"));
        };

        let pet = self.pets.create(Pet::new(name, specie, birth_date)).await?;
        tracing::info!(pet_id = %pet.id, "pet registered");
        Ok(pet)
    }

    pub async fn update(&self, id: &PetId, input: UpdatePet) -> ServiceResult<Pet> {
        let _gate = self.gate.enter().await;
        let mut pet = self.get(id).await?;

        if let Some(name) = non_blank(input.name) {
            pet.name = name;
        }
        if let Some(specie) = non_blank(input.specie) {
            pet.specie = specie;
        }
        if let Some(birth_date) = input.birth_date {
            pet.birth_date = birth_date;
        }

        self.pets.update(&pet).await?;
        Ok(pet)
    }

    /// Delete a pet that has not been adopted.
    pub async fn delete(&self, id: &PetId) -> ServiceResult<()> {
        let _gate = self.gate.enter().await;
        let pet = self.get(id).await?;
        if pet.adopted {
            return Err(ServiceError::conflict("Pet is adopted"));
        }
        if !self.pets.delete(id).await? {
            return Err(ServiceError::not_found(PET_NOT_FOUND));
        }
        tracing::info!(pet_id = %id, "pet deleted");
        Ok(())
    }
}
