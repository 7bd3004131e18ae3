use actix_web::{web, HttpRequest, HttpResponse};

use crate::auth::gate;
use crate::error::AppError;
use crate::users::handlers::UpdateUserRequest;
use crate::AppState;

pub async fn get_me(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = gate::current_user(&req, &state).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn update_me(
    req: HttpRequest,
    body: web::Json<UpdateUserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = gate::current_user(&req, &state).await?;

    let updated = state.user_service.update(user.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_me(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = gate::current_user(&req, &state).await?;

    state.user_service.delete(user.id).await?;
    Ok(HttpResponse::NoContent().finish())
}
