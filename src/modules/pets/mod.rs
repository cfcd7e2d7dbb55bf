pub mod models;
pub mod service;

use std::sync::Arc;

use adoptme_db::{stores::PETS, Pet, PetId};
use adoptme_http::{ApiResponse, AppError};
use adoptme_kernel::{InitCtx, Module};
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};

use models::{CreatePet, UpdatePet};
use service::PetService;

/// Pets module: pet registration and maintenance
pub struct PetsModule {
    service: PetService,
}

impl PetsModule {
    pub fn new(service: PetService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for PetsModule {
    fn name(&self) -> &'static str {
        "pets"
    }

    fn collections(&self) -> Vec<&'static str> {
        vec![PETS]
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "pets module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_pets).post(create_pet))
            .route("/{pid}", get(get_pet).put(update_pet).delete(delete_pet))
            .with_state(self.service.clone())
    }
}

async fn list_pets(State(service): State<PetService>) -> Result<ApiResponse<Vec<Pet>>, AppError> {
    Ok(ApiResponse::payload(service.list().await?))
}

async fn get_pet(
    State(service): State<PetService>,
    Path(pid): Path<String>,
) -> Result<ApiResponse<Pet>, AppError> {
    Ok(ApiResponse::payload(service.get(&PetId::from(pid)).await?))
}

async fn create_pet(
    State(service): State<PetService>,
    payload: Result<Json<CreatePet>, JsonRejection>,
) -> Result<ApiResponse<Pet>, AppError> {
    let Json(input) = payload?;
    let pet = service.create(input).await?;
    Ok(ApiResponse::payload(pet).with_message("Pet created"))
}

async fn update_pet(
    State(service): State<PetService>,
    Path(pid): Path<String>,
    payload: Result<Json<UpdatePet>, JsonRejection>,
) -> Result<ApiResponse, AppError> {
    let Json(input) = payload?;
    service.update(&PetId::from(pid), input).await?;
    Ok(ApiResponse::message("pet updated"))
}

async fn delete_pet(
    State(service): State<PetService>,
    Path(pid): Path<String>,
) -> Result<ApiResponse, AppError> {
    service.delete(&PetId::from(pid)).await?;
    Ok(ApiResponse::message("pet deleted"))
}

/// Create a new instance of the pets module
pub fn create_module(service: PetService) -> Arc<dyn Module> {
    Arc::new(PetsModule::new(service))
}
