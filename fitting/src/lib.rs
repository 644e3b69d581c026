//! Fitting of linearly transformed cosines to volumetric sheen

#[macro_use]
extern crate log;

mod controller;
mod directions;
mod grid;
mod nelder_mead;
mod objective;
mod params;
mod reference;
mod settings;
mod table;

pub mod export;

// Re-export
pub use controller::*;
pub use directions::*;
pub use grid::*;
pub use nelder_mead::*;
pub use objective::*;
pub use params::*;
pub use reference::*;
pub use settings::*;
pub use table::*;
