use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{error, info};

use crate::auth::gate;
use crate::error::AppError;
use crate::AppState;

fn default_is_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn create_user(
    req: web::Json<CreateUserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for email: {}", req.email);
    match state.user_service.register(req.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Created().json(user)),
        Err(e) => {
            error!("Registration failed: {}", e);
            Err(e)
        }
    }
}

/// Admin only.
pub async fn list_users(
    req: HttpRequest,
    query: web::Query<ListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    gate::current_superuser(&req, &state).await?;

    let skip = query.skip.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(100).max(0);

    let users = state.user_service.list(skip, limit).await?;
    Ok(HttpResponse::Ok().json(users))
}

pub async fn get_user(
    path: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn update_user(
    path: web::Path<i32>,
    req: web::Json<UpdateUserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .user_service
        .update(path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Admin only.
pub async fn delete_user(
    req: HttpRequest,
    path: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    gate::current_superuser(&req, &state).await?;

    state.user_service.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
