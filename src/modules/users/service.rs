use std::sync::Arc;

use adoptme_db::{User, UserId, UserStore};

use super::models::{CreateUser, UpdateUser};
use crate::error::{ServiceError, ServiceResult};
use crate::utils::gate::WriteGate;
use crate::utils::non_blank;
use crate::utils::password::create_hash;

const USER_NOT_FOUND: &str = "User not found";
const INCOMPLETE_VALUES: &str = "Incomplete values";

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    gate: WriteGate,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, gate: WriteGate) -> Self {
        Self { users, gate }
    }

    pub async fn list(&self) -> ServiceResult<Vec<User>> {
        Ok(self.users.get_all().await?)
    }

    pub async fn get(&self, id: &UserId) -> ServiceResult<User> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))
    }

    /// Register a user, hashing the supplied password.
    pub async fn create(&self, input: CreateUser) -> ServiceResult<User> {
        let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
            non_blank(input.first_name),
            non_blank(input.last_name),
            non_blank(input.email),
            non_blank(input.password),
        ) else {
            return Err(ServiceError::validation(INCOMPLETE_VALUES));
        };
        validate_email(&email)?;

        // Held until the insert so two registrations cannot share an email.
        let _gate = self.gate.enter().await;
        if self.users.get_by_email(&email).await?.is_some() {
            return Err(ServiceError::conflict("User already exists"));
        }

        let user = User::new(
            first_name,
            last_name,
            email,
            create_hash(&password),
            input.role.unwrap_or_default(),
        );
        let user = self.users.create(user).await?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub async fn update(&self, id: &UserId, input: UpdateUser) -> ServiceResult<User> {
        let _gate = self.gate.enter().await;
        let mut user = self.get(id).await?;

        if let Some(first_name) = non_blank(input.first_name) {
            user.first_name = first_name;
        }
        if let Some(last_name) = non_blank(input.last_name) {
            user.last_name = last_name;
        }
        if let Some(email) = non_blank(input.email) {
            validate_email(&email)?;
            if email != user.email && self.users.get_by_email(&email).await?.is_some() {
                return Err(ServiceError::conflict("User already exists"));
            }
            user.email = email;
        }
        if let Some(role) = input.role {
            user.role = role;
        }

        self.users.update(&user).await?;
        Ok(user)
    }

    /// Delete a user that owns no pets.
    pub async fn delete(&self, id: &UserId) -> ServiceResult<()> {
        let _gate = self.gate.enter().await;
        let user = self.get(id).await?;
        if !user.pets.is_empty() {
            return Err(ServiceError::conflict("User has adopted pets"));
        }
        if !self.users.delete(id).await? {
            return Err(ServiceError::not_found(USER_NOT_FOUND));
        }
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}

fn validate_email(email: &str) -> ServiceResult<()> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(ServiceError::validation("Invalid email"))
    }
}
