use actix_web::web;
use std::sync::Arc;

use crate::application::registration::RegisterUserUseCase;

use super::handlers::registration::register_handler;

/// Configure registration routes
///
/// Mounts the account endpoints under the provided scope (e.g. /api/v1).
///
/// # Routes
///
/// - POST /users - Register a new account and send its verification email
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// use std::sync::Arc;
/// # use registrar::application::registration::RegisterUserUseCase;
/// # use registrar::adapters::http::routes::configure_registration_routes;
///
/// # fn example(register_use_case: Arc<RegisterUserUseCase>) {
/// let app = App::new().service(
///   web::scope("/api/v1").configure(|cfg| configure_registration_routes(cfg, register_use_case)),
/// );
/// # }
/// ```
pub fn configure_registration_routes(
  cfg: &mut web::ServiceConfig,
  register_use_case: Arc<RegisterUserUseCase>,
) {
  cfg
    .app_data(web::Data::new(register_use_case))
    .route("/users", web::post().to(register_handler));
}
