pub mod models;
pub mod service;

use std::sync::Arc;

use adoptme_db::{stores::USERS, UserId};
use adoptme_http::{ApiResponse, AppError};
use adoptme_kernel::{InitCtx, Module};
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};

use models::{CreateUser, UpdateUser, UserView};
use service::UserService;

/// Users module: account listing and maintenance
pub struct UsersModule {
    service: UserService,
}

impl UsersModule {
    pub fn new(service: UserService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    fn collections(&self) -> Vec<&'static str> {
        vec![USERS]
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "users module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_users).post(create_user))
            .route(
                "/{uid}",
                get(get_user).put(update_user).delete(delete_user),
            )
            .with_state(self.service.clone())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module stopped");
        Ok(())
    }
}

async fn list_users(
    State(service): State<UserService>,
) -> Result<ApiResponse<Vec<UserView>>, AppError> {
    let users = service.list().await?;
    Ok(ApiResponse::payload(
        users.into_iter().map(UserView::from).collect(),
    ))
}

async fn get_user(
    State(service): State<UserService>,
    Path(uid): Path<String>,
) -> Result<ApiResponse<UserView>, AppError> {
    let user = service.get(&UserId::from(uid)).await?;
    Ok(ApiResponse::payload(user.into()))
}

async fn create_user(
    State(service): State<UserService>,
    payload: Result<Json<CreateUser>, JsonRejection>,
) -> Result<ApiResponse<UserView>, AppError> {
    let Json(input) = payload?;
    let user = service.create(input).await?;
    Ok(ApiResponse::payload(UserView::from(user)).with_message("User created"))
}

async fn update_user(
    State(service): State<UserService>,
    Path(uid): Path<String>,
    payload: Result<Json<UpdateUser>, JsonRejection>,
) -> Result<ApiResponse, AppError> {
    let Json(input) = payload?;
    service.update(&UserId::from(uid), input).await?;
    Ok(ApiResponse::message("User updated"))
}

async fn delete_user(
    State(service): State<UserService>,
    Path(uid): Path<String>,
) -> Result<ApiResponse, AppError> {
    service.delete(&UserId::from(uid)).await?;
    Ok(ApiResponse::message("User deleted"))
}

/// Create a new instance of the users module
pub fn create_module(service: UserService) -> Arc<dyn Module> {
    Arc::new(UsersModule::new(service))
}
