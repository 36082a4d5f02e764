pub mod dataset;
pub mod models;
pub mod traits;

pub use dataset::*;
pub use models::*;
pub use traits::*;
