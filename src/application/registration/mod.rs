//! Registration use cases
//!
//! Turns raw registration input into validated value objects and hands it to the
//! registration service.

mod register_user;

pub use register_user::{
  RegisterUserCommand, RegisterUserError, RegisterUserResponse, RegisterUserUseCase,
};
