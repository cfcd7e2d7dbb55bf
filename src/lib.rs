//! Pet adoption API: users, pets and adoptions served over HTTP.

pub mod app;
pub mod error;
pub mod modules;
pub mod utils;

pub use app::App;
pub use error::{ServiceError, ServiceResult};
