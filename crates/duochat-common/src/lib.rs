pub mod errors;
pub mod id;

pub use errors::{ConfigError, DuochatError};
pub use id::SessionId;

pub type Result<T> = std::result::Result<T, DuochatError>;
