pub mod config;
pub mod error;
pub mod logger;

// Re-export commonly used types
pub use config::{AppConfig, EmbeddingBackend, StoreBackend};
pub use error::SemsortError;
pub type Result<T> = std::result::Result<T, SemsortError>;
