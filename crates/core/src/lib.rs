pub mod config;
pub mod demo;
pub mod directory;
pub mod error;
pub mod types;

pub use config::{AppConfig, ZeroValuePolicy};
pub use directory::CustomerDirectory;
pub use error::{AudienceError, AudienceResult};
pub use types::{Customer, CustomerField};
