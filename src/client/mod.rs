// File: ./src/client/mod.rs
// re-exports the REST client modules
pub mod cert;
pub mod core;
pub mod error;

pub use self::core::{ApiClient, MealQuery};
pub use self::error::ApiError;
