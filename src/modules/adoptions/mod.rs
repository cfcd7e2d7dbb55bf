pub mod workflow;

use std::sync::Arc;

use adoptme_db::{
    stores::{ADOPTIONS, PETS, USERS},
    Adoption, AdoptionId, PetId, UserId,
};
use adoptme_http::{ApiResponse, AppError};
use adoptme_kernel::{InitCtx, Module};
use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};

use workflow::AdoptionWorkflow;

/// Adoptions module: links users to the pets they adopt
pub struct AdoptionsModule {
    workflow: Arc<AdoptionWorkflow>,
}

impl AdoptionsModule {
    pub fn new(workflow: AdoptionWorkflow) -> Self {
        Self {
            workflow: Arc::new(workflow),
        }
    }
}

#[async_trait]
impl Module for AdoptionsModule {
    fn name(&self) -> &'static str {
        "adoptions"
    }

    // Adopting writes to users and pets as well.
    fn collections(&self) -> Vec<&'static str> {
        vec![ADOPTIONS, USERS, PETS]
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "adoptions module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_adoptions))
            .route("/{aid}", get(get_adoption))
            .route("/{uid}/{pid}", post(create_adoption))
            .with_state(Arc::clone(&self.workflow))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "adoptions module stopped");
        Ok(())
    }
}

async fn list_adoptions(
    State(workflow): State<Arc<AdoptionWorkflow>>,
) -> Result<ApiResponse<Vec<Adoption>>, AppError> {
    Ok(ApiResponse::payload(workflow.list_all().await?))
}

async fn get_adoption(
    State(workflow): State<Arc<AdoptionWorkflow>>,
    Path(aid): Path<String>,
) -> Result<ApiResponse<Adoption>, AppError> {
    let adoption = workflow.get_by_id(&AdoptionId::from(aid)).await?;
    Ok(ApiResponse::payload(adoption))
}

async fn create_adoption(
    State(workflow): State<Arc<AdoptionWorkflow>>,
    Path((uid, pid)): Path<(String, String)>,
) -> Result<ApiResponse, AppError> {
    workflow
        .create(&UserId::from(uid), &PetId::from(pid))
        .await?;
    Ok(ApiResponse::message("Pet adopted"))
}

/// Create a new instance of the adoptions module
pub fn create_module(workflow: AdoptionWorkflow) -> Arc<dyn Module> {
    Arc::new(AdoptionsModule::new(workflow))
}
