pub mod error;
pub mod geom;

pub use error::{GeomError, Result};
