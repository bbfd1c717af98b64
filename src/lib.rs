pub mod cli;
pub mod config;
pub mod error;
pub mod migrate;
pub mod model;
pub mod ops;
pub mod queries;
pub mod store;
pub mod validation;

pub use config::Settings;
pub use error::{TrackerError, TrackerResult};
pub use store::Workspace;
