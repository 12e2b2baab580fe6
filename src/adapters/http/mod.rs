pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{ErrorResponse, RegisterRequest, RegisterResponse};
pub use errors::ApiError;
pub use handlers::registration::register_handler;
pub use middleware::SecurityHeadersMiddleware;
pub use routes::configure_registration_routes;
