//! Adapter-side input validation.

pub mod validator;

pub use validator::{MessageValidator, Rejection, Validation};
