//! Weighted combination of goals for one agent

use super::goal::{GoalDescriptor, GoalName};
use super::steering::{SteeringContext, SteeringOutput};

/// The goals one agent is currently pursuing, folded into a single steering
/// decision per frame.
#[derive(Debug, Clone, Default)]
pub struct CompositeBehavior {
    goals: Vec<GoalDescriptor>,
    /// Upper bound on the combined linear acceleration
    max_acceleration: Option<f32>,
}

impl CompositeBehavior {
    /// Create an empty behavior
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the combined linear acceleration
    #[must_use]
    pub fn with_max_acceleration(mut self, max_acceleration: f32) -> Self {
        self.max_acceleration = Some(max_acceleration);
        self
    }

    /// Add a goal, builder style
    #[must_use]
    pub fn with_goal(mut self, goal: GoalDescriptor) -> Self {
        self.add(goal);
        self
    }

    /// Add a goal.
    ///
    /// Returns `false` and leaves the behavior unchanged when an identical
    /// descriptor is already present.
    pub fn add(&mut self, goal: GoalDescriptor) -> bool {
        if self.goals.contains(&goal) {
            log::warn!("Ignoring duplicate `{}` goal", goal.name());
            return false;
        }
        self.goals.push(goal);
        true
    }

    /// Drop every goal called `name`, then add `goal`.
    ///
    /// Returns how many goals were dropped. If an identical descriptor
    /// survives the drop, `goal` is not added a second time.
    pub fn replace(&mut self, name: GoalName, goal: GoalDescriptor) -> usize {
        let before = self.goals.len();
        self.goals.retain(|existing| existing.name() != name);
        let dropped = before - self.goals.len();
        self.add(goal);
        dropped
    }

    /// Remove a specific descriptor
    pub fn remove(&mut self, goal: &GoalDescriptor) -> bool {
        match self.goals.iter().position(|existing| existing == goal) {
            Some(index) => {
                self.goals.remove(index);
                true
            }
            None => false,
        }
    }

    /// Goals with the given name, in insertion order
    pub fn goals_named(&self, name: GoalName) -> impl Iterator<Item = &GoalDescriptor> {
        self.goals.iter().filter(move |goal| goal.name() == name)
    }

    /// Summed weight of every goal called `name`
    #[must_use]
    pub fn weight_of(&self, name: GoalName) -> f32 {
        self.goals_named(name).map(GoalDescriptor::weight).sum()
    }

    /// Summed weight of every goal
    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.goals.iter().map(GoalDescriptor::weight).sum()
    }

    /// Goals in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &GoalDescriptor> {
        self.goals.iter()
    }

    /// Number of goals
    #[must_use]
    pub fn len(&self) -> usize {
        self.goals.len()
    }

    /// Whether no goals are present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Weighted sum of every goal's steering
    #[must_use]
    pub fn calculate(&self, ctx: &SteeringContext<'_>) -> SteeringOutput {
        let combined = self.goals.iter().fold(SteeringOutput::ZERO, |acc, goal| {
            acc.combine(goal.goal().calculate(ctx).scale(goal.weight()))
        });

        match self.max_acceleration {
            Some(max) => combined.clamp_linear(max),
            None => combined,
        }
    }
}
