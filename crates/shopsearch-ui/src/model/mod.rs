//! Surface model types.
//!
//! These types are toolkit-independent to enable testing and clear separation.

mod selection;
mod view;
mod viewport;

pub use selection::{NavigableSelection, SelectionEffect, SurfacePhase};
pub use view::SurfaceView;
pub use viewport::{ScrollHandle, Viewport};
