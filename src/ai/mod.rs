//! Steering AI
//!
//! Provides steering goals, the descriptors that name and weight them, and
//! the composite behavior that folds them into one steering decision.

mod behavior;
mod goal;
mod steering;

pub use behavior::CompositeBehavior;
pub use goal::{GoalDescriptor, GoalName, UnknownGoalName};
pub use steering::{
    AgentId, AgentState, AlignWith, Avoid, CohereWith, FleeAgent, Follow, InterceptAgent, Obstacle,
    ReachTargetSpeed, SeekAgent, SeparateFrom, StayOn, SteeringContext, SteeringGoal,
    SteeringOutput, Stop, Wander,
};
