pub mod dataset;
pub mod document;
pub mod history;
pub mod workspace;

pub use dataset::Dataset;
pub use history::{Change, History};
pub use workspace::Workspace;
