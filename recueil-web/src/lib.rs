pub mod app_state;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod openapi;

pub use app_state::AppState;
pub use error::{ApiError, ErrorBody};
pub use extractors::ApiQuery;
pub use handlers::*;
pub use openapi::{openapi_json, ApiDoc};
