//! Navigation paths
//!
//! Declared paths are decoded from scene configuration and handed to
//! whatever builds the navigation graph.

mod path;
mod set;

pub use path::{DecodeError, Orientation, PathDescriptor, next_waypoint};
pub use set::{PathSet, PathSetError};
