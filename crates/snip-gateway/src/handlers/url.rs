use crate::error::{ApiError, Result};
use crate::model::{
    CreateShortUrlRequest, DeleteShortUrlResponse, ShortUrlResponse, UpdateShortUrlResponse,
};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use snip_core::ShortCode;

pub async fn create_url_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateShortUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortUrlResponse>)> {
    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let created = state.shortener().create(&request.original_url).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn get_url_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ShortUrlResponse>> {
    let code = parse_code(&short_url)?;
    let resolved = state.shortener().resolve(&code).await?;
    Ok(Json(resolved.into()))
}

pub async fn update_url_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<UpdateShortUrlResponse>)> {
    let code = parse_code(&short_url)?;
    let new_code = state.shortener().regenerate(&code).await?;
    Ok((
        StatusCode::CREATED,
        Json(UpdateShortUrlResponse {
            updated_short_url: new_code.to_string(),
        }),
    ))
}

pub async fn delete_url_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteShortUrlResponse>> {
    let code = parse_code(&short_url)?;
    state.shortener().delete(&code).await?;
    Ok(Json(DeleteShortUrlResponse {
        message: "deletion successful".to_owned(),
    }))
}

fn parse_code(raw: &str) -> Result<ShortCode> {
    ShortCode::new(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}
