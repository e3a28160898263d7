//! User routes for registration, login and the caller's own profile

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::AuthMiddleware;
use crate::auth::models::{AuthUser, LoginRequest, LoginResponse};
use crate::routes::error::{ApiError, FieldErrors};
use crate::server::AppState;
use crate::services::ProfileUpdate;
use crate::users::validation;
use crate::users::{UserId, ValidationError};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub phone_number: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: UserId,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub name: String,
    pub phone_number: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

fn check_phone_number(phone_number: &str, errors: &mut FieldErrors) {
    if !validation::valid_phone_number_length(phone_number) {
        errors.add(ValidationError::PhoneNumberLength);
    }
    if !validation::valid_phone_number_prefix(phone_number) {
        errors.add(ValidationError::PhoneNumberPrefix);
    }
}

fn check_full_name(full_name: &str, errors: &mut FieldErrors) {
    if !validation::valid_full_name_length(full_name) {
        errors.add(ValidationError::FullNameLength);
    }
}

/// Report every failing field at once.
fn validate_registration(form: &RegisterRequest) -> FieldErrors {
    let mut errors = FieldErrors::default();
    check_phone_number(&form.phone_number, &mut errors);
    check_full_name(&form.full_name, &mut errors);
    if !validation::valid_password_strength(&form.password) {
        errors.add(ValidationError::WeakPassword);
    }
    errors
}

fn validate_profile_form(form: &ProfileForm) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if let Some(full_name) = &form.full_name {
        check_full_name(full_name, &mut errors);
    }
    if let Some(phone_number) = &form.phone_number {
        check_phone_number(phone_number, &mut errors);
    }
    errors
}

pub async fn register(
    State(app_state): State<AppState>,
    Json(form): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    validate_registration(&form).into_result()?;

    let account = app_state
        .users
        .register(&form.phone_number, &form.full_name, &form.password)
        .await?;

    Ok(Json(RegisterResponse { id: account.id() }))
}

pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let account = app_state
        .auth
        .authenticate(&payload.phone_number, &payload.password)
        .await?;

    let access_token = app_state.token_issuer.issue(&account)?;
    tracing::info!("User {} logged in", account.id());

    Ok(Json(LoginResponse {
        id: account.id(),
        access_token,
    }))
}

pub async fn get_my_profile(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let account = app_state
        .users
        .get_profile(&user.id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(ProfileResponse {
        name: account.full_name().to_string(),
        phone_number: account.phone_number().to_string(),
    }))
}

pub async fn update_my_profile(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(form): Json<ProfileForm>,
) -> Result<StatusCode, ApiError> {
    validate_profile_form(&form).into_result()?;

    app_state
        .users
        .update_profile(
            &user.id,
            ProfileUpdate {
                full_name: form.full_name,
                phone_number: form.phone_number,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn create_user_routes(app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/users/me", get(get_my_profile).put(update_my_profile))
        .route_layer(middleware::from_fn_with_state(
            app_state.token_verifier.clone(),
            AuthMiddleware::validate_token,
        ));

    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .merge(protected)
}
