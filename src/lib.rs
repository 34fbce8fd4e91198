//! Steering goals and navigation paths for 2D arcade agents
//!
//! This crate provides:
//! - Steering goals and weighted goal descriptors
//! - Composite behaviors that fold goals into one steering output
//! - Navigation path descriptors decoded from scene configuration
//! - JSON and RON loaders for scene paths and agent goals

pub mod ai;
pub mod core;
pub mod nav;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{
        AgentId, AgentState, CompositeBehavior, GoalDescriptor, GoalName, SteeringContext,
        SteeringGoal, SteeringOutput,
    };
    pub use crate::core::{AgentConfig, ConfigError, SceneError};
    pub use crate::nav::{DecodeError, Orientation, PathDescriptor, PathSet};
    pub use glam::Vec2;
}
