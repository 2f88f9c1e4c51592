pub mod aggregate;
pub mod form;
pub mod queries;
pub mod types;

pub use queries::*;
pub use types::*;
