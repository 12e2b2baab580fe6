use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{RegisterRequest, RegisterResponse},
  errors::ApiError,
};
use crate::application::registration::{RegisterUserCommand, RegisterUserUseCase};

/// Handler for account registration
///
/// POST /api/v1/users
/// Body: RegisterRequest (JSON)
/// Response: RegisterResponse (JSON) with status 201
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  use_case: web::Data<Arc<RegisterUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let RegisterRequest {
    username,
    email,
    password,
  } = request.into_inner();

  let response = use_case
    .execute(RegisterUserCommand {
      username,
      email,
      password,
    })
    .await?;

  Ok(HttpResponse::Created().json(RegisterResponse {
    user_id: response.user_id,
    username: response.username,
    email: response.email,
  }))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::http::dtos::ErrorResponse;
  use crate::adapters::http::routes::configure_registration_routes;
  use crate::domain::registration::test_doubles::{Call, Fixture};
  use actix_web::{App, http::StatusCode, test};
  use serde_json::json;

  async fn post_register(fixture: &Fixture, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
    let use_case = Arc::new(RegisterUserUseCase::new(Arc::new(fixture.service())));
    let app = test::init_service(
      App::new()
        .service(web::scope("/api/v1").configure(|cfg| configure_registration_routes(cfg, use_case))),
    )
    .await;

    let req = test::TestRequest::post()
      .uri("/api/v1/users")
      .set_json(body)
      .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;

    (status, bytes.to_vec())
  }

  #[actix_web::test]
  async fn test_register_returns_201() {
    let fixture = Fixture::new();

    let (status, body) = post_register(
      &fixture,
      json!({"username": "user", "email": "user@email.com", "password": "User1234"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let body: RegisterResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(body.username, "user");
    assert_eq!(body.email, "user@email.com");
    assert_eq!(fixture.log.count(|c| matches!(c, Call::Commit)), 1);
  }

  #[actix_web::test]
  async fn test_invalid_body_returns_400_without_side_effects() {
    let fixture = Fixture::new();

    let (status, body) = post_register(
      &fixture,
      json!({"username": "ab", "email": "user@email.com", "password": "User1234"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(body.error, "VALIDATION_ERROR");
    assert!(fixture.log.calls().is_empty());
  }

  #[actix_web::test]
  async fn test_taken_username_returns_409() {
    let fixture = Fixture::new().with_existing_username("user");

    let (status, body) = post_register(
      &fixture,
      json!({"username": "user", "email": "user@email.com", "password": "User1234"}),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(body.error, "USERNAME_EXISTS");
  }

  #[actix_web::test]
  async fn test_mail_failure_returns_opaque_500() {
    let fixture = Fixture::new().with_failing_notifier();

    let (status, body) = post_register(
      &fixture,
      json!({"username": "user", "email": "user@email.com", "password": "User1234"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(body.error, "NOTIFICATION_FAILURE");
    assert!(!body.message.contains("Email sending error"));
    assert_eq!(fixture.log.count(|c| matches!(c, Call::Rollback)), 1);
  }
}
