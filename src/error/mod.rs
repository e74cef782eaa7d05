mod types;

pub use types::{AppError, AppResult, ErrorKind};
