//! Table exporters

mod image;
mod literal;
mod npy;

// Re-export
pub use self::image::*;
pub use literal::*;
pub use npy::*;
