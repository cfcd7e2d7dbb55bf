//! Entity documents stored in the `users`, `pets` and `adoptions` collections.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{AdoptionId, PetId, UserId};

/// Access role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Ownership reference kept in a user's pets list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRef {
    pub pet: PetId,
    pub adoption: AdoptionId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Salted password hash, never the plain password.
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub pets: Vec<PetRef>,
}

impl User {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: UserId::generate(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password_hash.into(),
            role,
            pets: Vec::new(),
        }
    }

    /// Record ownership of `pet` through the adoption `adoption`.
    pub fn add_pet(&mut self, pet: PetId, adoption: AdoptionId) {
        self.pets.push(PetRef { pet, adoption });
    }

    pub fn owns(&self, pet: &PetId) -> bool {
        self.pets.iter().any(|entry| &entry.pet == pet)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    #[serde(rename = "_id")]
    pub id: PetId,
    pub name: String,
    pub specie: String,
    #[serde(rename = "birthDate")]
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub adopted: bool,
    #[serde(default)]
    pub owner: Option<UserId>,
}

impl Pet {
    pub fn new(name: impl Into<String>, specie: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            id: PetId::generate(),
            name: name.into(),
            specie: specie.into(),
            birth_date,
            adopted: false,
            owner: None,
        }
    }

    /// Flip the adoption flag and record the new owner.
    pub fn mark_adopted(&mut self, owner: UserId) {
        self.adopted = true;
        self.owner = Some(owner);
    }
}

/// Link between one user and one pet, written once per adoption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adoption {
    #[serde(rename = "_id")]
    pub id: AdoptionId,
    pub owner: UserId,
    pub pet: PetId,
}

impl Adoption {
    pub fn new(owner: UserId, pet: PetId) -> Self {
        Self {
            id: AdoptionId::generate(),
            owner,
            pet,
        }
    }
}

/// Field-equality filter over pet documents. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PetFilter {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<PetId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adopted: Option<bool>,
}

impl PetFilter {
    pub fn by_id(id: PetId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

/// Field-equality filter over adoption documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdoptionFilter {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<AdoptionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet: Option<PetId>,
}

impl AdoptionFilter {
    pub fn by_id(id: AdoptionId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_pet(pet: PetId) -> Self {
        Self {
            pet: Some(pet),
            ..Self::default()
        }
    }
}
