// Application layer - use cases and orchestration over the expense store

pub mod error;
pub mod reporting;
pub mod service;
pub mod state;

pub use error::*;
pub use reporting::*;
pub use service::*;
pub use state::*;
