pub mod models;
pub mod service;

use std::sync::Arc;

use adoptme_db::{
    stores::{PETS, USERS},
    Pet,
};
use adoptme_http::{ApiResponse, AppError};
use adoptme_kernel::{InitCtx, Module};
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};

use super::users::models::UserView;
use models::{Batch, GenerateData, GeneratedData};
use service::MockService;

/// Mocks module: fake users and pets for demos and seeding
pub struct MocksModule {
    service: MockService,
}

impl MocksModule {
    pub fn new(service: MockService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for MocksModule {
    fn name(&self) -> &'static str {
        "mocks"
    }

    fn collections(&self) -> Vec<&'static str> {
        vec![USERS, PETS]
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            quantity = ctx.settings.mocks.quantity,
            "mocks module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/mockingpets", get(mocking_pets))
            .route("/mockingusers", get(mocking_users))
            .route("/generateData", post(generate_data))
            .with_state(self.service.clone())
    }
}

async fn mocking_pets(State(service): State<MockService>) -> ApiResponse<Vec<Pet>> {
    ApiResponse::payload(service.preview_pets())
}

async fn mocking_users(State(service): State<MockService>) -> ApiResponse<Vec<UserView>> {
    ApiResponse::payload(
        service
            .preview_users()
            .into_iter()
            .map(UserView::from)
            .collect(),
    )
}

async fn generate_data(
    State(service): State<MockService>,
    payload: Result<Json<GenerateData>, JsonRejection>,
) -> Result<ApiResponse<GeneratedData<UserView, Pet>>, AppError> {
    let Json(request) = payload?;
    let generated = service.generate(request).await?;

    let users = generated
        .users
        .map(|batch| Batch::new(batch.data.into_iter().map(UserView::from).collect()));

    Ok(ApiResponse::payload(GeneratedData {
        users,
        pets: generated.pets,
    })
    .with_message("Mock data generated and inserted"))
}

/// Create a new instance of the mocks module
pub fn create_module(service: MockService) -> Arc<dyn Module> {
    Arc::new(MocksModule::new(service))
}
