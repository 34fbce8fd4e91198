//! Steering goals for autonomous agents
//!
//! Every goal is immutable once built, so one goal can be shared between
//! descriptors and threads. Anything that changes per frame (the agent's own
//! motion, the other agents, random jitter) arrives through
//! [`SteeringContext`].

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::goal::GoalName;
use crate::nav::{PathDescriptor, next_waypoint};

/// Output from a steering goal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringOutput {
    /// Linear acceleration
    pub linear: Vec2,
    /// Angular acceleration
    pub angular: f32,
}

impl SteeringOutput {
    /// Zero steering
    pub const ZERO: Self = Self {
        linear: Vec2::ZERO,
        angular: 0.0,
    };

    /// Accelerate along `direction` at full strength
    #[must_use]
    pub fn towards(direction: Vec2, max_acceleration: f32) -> Self {
        Self {
            linear: direction.normalize_or_zero() * max_acceleration,
            angular: 0.0,
        }
    }

    /// Combine with another steering output
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            linear: self.linear + other.linear,
            angular: self.angular + other.angular,
        }
    }

    /// Scale the output
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        Self {
            linear: self.linear * factor,
            angular: self.angular * factor,
        }
    }

    /// Limit the linear part to `max` length
    #[must_use]
    pub fn clamp_linear(self, max: f32) -> Self {
        Self {
            linear: self.linear.clamp_length_max(max),
            angular: self.angular,
        }
    }
}

/// Identifies an agent within a [`SteeringContext`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Motion state of one agent for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentState {
    pub id: AgentId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Collision radius
    pub radius: f32,
}

impl AgentState {
    /// Create agent state with the default radius
    #[must_use]
    pub fn new(id: AgentId, position: Vec2, velocity: Vec2) -> Self {
        Self {
            id,
            position,
            velocity,
            radius: 0.5,
        }
    }

    /// Set the collision radius
    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Current speed
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// A circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: Vec2,
    pub radius: f32,
}

impl Obstacle {
    /// Create a circular obstacle
    #[must_use]
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Everything a goal may look at while computing one frame of steering
#[derive(Debug, Clone, Copy)]
pub struct SteeringContext<'a> {
    /// The agent being steered
    pub agent: &'a AgentState,
    /// Other agents goals may refer to by id
    pub agents: &'a [AgentState],
    /// Random sample in `[0, 1)` for this frame
    pub noise: f32,
}

impl<'a> SteeringContext<'a> {
    /// Create a context with neutral noise
    #[must_use]
    pub fn new(agent: &'a AgentState, agents: &'a [AgentState]) -> Self {
        Self {
            agent,
            agents,
            noise: 0.5,
        }
    }

    /// Set the random sample for this frame
    #[must_use]
    pub fn with_noise(mut self, noise: f32) -> Self {
        self.noise = noise;
        self
    }

    /// Look up another agent by id
    #[must_use]
    pub fn agent_by_id(&self, id: AgentId) -> Option<&'a AgentState> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    /// Members of `group` other than the steered agent within `max_distance`
    fn neighbors<'g>(
        &'g self,
        group: &'g [AgentId],
        max_distance: f32,
    ) -> impl Iterator<Item = &'a AgentState> + 'g {
        let me = self.agent;
        group
            .iter()
            .filter(move |id| **id != me.id)
            .filter_map(move |id| self.agent_by_id(*id))
            .filter(move |other| other.position.distance(me.position) <= max_distance)
    }
}

/// A unit of motion intent.
///
/// Implementations report the [`GoalName`] they fulfil through `kind` so
/// descriptors can be checked against them; foreign goals may leave it
/// unreported.
pub trait SteeringGoal: fmt::Debug + Send + Sync {
    /// Calculate steering for the context's agent
    fn calculate(&self, ctx: &SteeringContext<'_>) -> SteeringOutput;

    /// Intent this goal implements, if it knows
    fn kind(&self) -> Option<GoalName> {
        None
    }
}

/// Seek - move towards another agent
#[derive(Debug, Clone)]
pub struct SeekAgent {
    pub target: AgentId,
    pub max_acceleration: f32,
}

impl SeekAgent {
    /// Create a new seek-agent goal
    #[must_use]
    pub fn new(target: AgentId, max_acceleration: f32) -> Self {
        Self {
            target,
            max_acceleration,
        }
    }
}

impl SteeringGoal for SeekAgent {
    fn calculate(&self, ctx: &SteeringContext<'_>) -> SteeringOutput {
        match ctx.agent_by_id(self.target) {
            Some(target) => SteeringOutput::towards(
                target.position - ctx.agent.position,
                self.max_acceleration,
            ),
            None => SteeringOutput::ZERO,
        }
    }

    fn kind(&self) -> Option<GoalName> {
        Some(GoalName::SeekAgent)
    }
}

/// Flee - move away from another agent
#[derive(Debug, Clone)]
pub struct FleeAgent {
    pub target: AgentId,
    pub max_acceleration: f32,
}

impl FleeAgent {
    /// Create a new flee-agent goal
    #[must_use]
    pub fn new(target: AgentId, max_acceleration: f32) -> Self {
        Self {
            target,
            max_acceleration,
        }
    }
}

impl SteeringGoal for FleeAgent {
    fn calculate(&self, ctx: &SteeringContext<'_>) -> SteeringOutput {
        match ctx.agent_by_id(self.target) {
            Some(target) => SteeringOutput::towards(
                ctx.agent.position - target.position,
                self.max_acceleration,
            ),
            None => SteeringOutput::ZERO,
        }
    }

    fn kind(&self) -> Option<GoalName> {
        Some(GoalName::FleeAgent)
    }
}

/// Avoid - steer around static obstacles ahead
#[derive(Debug, Clone)]
pub struct Avoid {
    pub obstacles: Vec<Obstacle>,
    /// How far ahead to look, in seconds of current velocity
    pub look_ahead: f32,
    pub max_acceleration: f32,
}

impl Avoid {
    /// Create a new avoid goal
    #[must_use]
    pub fn new(obstacles: Vec<Obstacle>, look_ahead: f32, max_acceleration: f32) -> Self {
        Self {
            obstacles,
            look_ahead,
            max_acceleration,
        }
    }
}

impl SteeringGoal for Avoid {
    fn calculate(&self, ctx: &SteeringContext<'_>) -> SteeringOutput {
        let agent = ctx.agent;
        let ahead = agent.position + agent.velocity * self.look_ahead;

        let threat = self
            .obstacles
            .iter()
            .filter(|o| ahead.distance(o.center) < o.radius + agent.radius)
            .min_by(|a, b| {
                let da = agent.position.distance_squared(a.center);
                let db = agent.position.distance_squared(b.center);
                da.total_cmp(&db)
            });

        match threat {
            Some(obstacle) => SteeringOutput::towards(ahead - obstacle.center, self.max_acceleration),
            None => SteeringOutput::ZERO,
        }
    }

    fn kind(&self) -> Option<GoalName> {
        Some(GoalName::Avoid)
    }
}

/// Separate - keep distance from nearby group members
#[derive(Debug, Clone)]
pub struct SeparateFrom {
    pub group: Vec<AgentId>,
    pub max_distance: f32,
    pub max_acceleration: f32,
}

impl SeparateFrom {
    /// Create a new separate-from goal
    #[must_use]
    pub fn new(group: Vec<AgentId>, max_distance: f32, max_acceleration: f32) -> Self {
        Self {
            group,
            max_distance,
            max_acceleration,
        }
    }
}

impl SteeringGoal for SeparateFrom {
    fn calculate(&self, ctx: &SteeringContext<'_>) -> SteeringOutput {
        let me = ctx.agent.position;
        let push = ctx
            .neighbors(&self.group, self.max_distance)
            .fold(Vec2::ZERO, |acc, other| {
                let offset = me - other.position;
                let distance_sq = offset.length_squared();
                if distance_sq > f32::EPSILON {
                    acc + offset / distance_sq
                } else {
                    acc
                }
            });

        SteeringOutput::towards(push, self.max_acceleration)
    }

    fn kind(&self) -> Option<GoalName> {
        Some(GoalName::SeparateFrom)
    }
}

/// Align - match the average heading of nearby group members
#[derive(Debug, Clone)]
pub struct AlignWith {
    pub group: Vec<AgentId>,
    pub max_distance: f32,
    pub max_acceleration: f32,
}

impl AlignWith {
    /// Create a new align-with goal
    #[must_use]
    pub fn new(group: Vec<AgentId>, max_distance: f32, max_acceleration: f32) -> Self {
        Self {
            group,
            max_distance,
            max_acceleration,
        }
    }
}

impl SteeringGoal for AlignWith {
    fn calculate(&self, ctx: &SteeringContext<'_>) -> SteeringOutput {
        let (sum, count) = ctx
            .neighbors(&self.group, self.max_distance)
            .fold((Vec2::ZERO, 0u32), |(sum, count), other| {
                (sum + other.velocity, count + 1)
            });

        if count == 0 {
            return SteeringOutput::ZERO;
        }

        let average = sum / count as f32;
        SteeringOutput {
            linear: (average - ctx.agent.velocity).clamp_length_max(self.max_acceleration),
            angular: 0.0,
        }
    }

    fn kind(&self) -> Option<GoalName> {
        Some(GoalName::AlignWith)
    }
}

/// Cohere - move towards the centre of nearby group members
#[derive(Debug, Clone)]
pub struct CohereWith {
    pub group: Vec<AgentId>,
    pub max_distance: f32,
    pub max_acceleration: f32,
}

impl CohereWith {
    /// Create a new cohere-with goal
    #[must_use]
    pub fn new(group: Vec<AgentId>, max_distance: f32, max_acceleration: f32) -> Self {
        Self {
            group,
            max_distance,
            max_acceleration,
        }
    }
}

impl SteeringGoal for CohereWith {
    fn calculate(&self, ctx: &SteeringContext<'_>) -> SteeringOutput {
        let (sum, count) = ctx
            .neighbors(&self.group, self.max_distance)
            .fold((Vec2::ZERO, 0u32), |(sum, count), other| {
                (sum + other.position, count + 1)
            });

        if count == 0 {
            return SteeringOutput::ZERO;
        }

        let centre = sum / count as f32;
        SteeringOutput::towards(centre - ctx.agent.position, self.max_acceleration)
    }

    fn kind(&self) -> Option<GoalName> {
        Some(GoalName::CohereWith)
    }
}

/// Reach target speed - speed up or slow down along the current heading
#[derive(Debug, Clone)]
pub struct ReachTargetSpeed {
    pub speed: f32,
    pub max_acceleration: f32,
}

impl ReachTargetSpeed {
    /// Create a new reach-target-speed goal
    #[must_use]
    pub fn new(speed: f32, max_acceleration: f32) -> Self {
        Self {
            speed,
            max_acceleration,
        }
    }
}

impl SteeringGoal for ReachTargetSpeed {
    fn calculate(&self, ctx: &SteeringContext<'_>) -> SteeringOutput {
        // A stationary agent has no heading to accelerate along
        let Some(heading) = ctx.agent.velocity.try_normalize() else {
            return SteeringOutput::ZERO;
        };

        let delta = self.speed - ctx.agent.speed();
        SteeringOutput {
            linear: (heading * delta).clamp_length_max(self.max_acceleration),
            angular: 0.0,
        }
    }

    fn kind(&self) -> Option<GoalName> {
        Some(GoalName::ReachTargetSpeed)
    }
}

/// Wander - random movement
#[derive(Debug, Clone)]
pub struct Wander {
    /// Wander circle distance
    pub offset: f32,
    /// Wander circle radius
    pub radius: f32,
    /// Maximum angle change per update
    pub rate: f32,
    /// Maximum acceleration
    pub max_acceleration: f32,
}

impl Wander {
    /// Create a new wander goal
    #[must_use]
    pub fn new(max_acceleration: f32) -> Self {
        Self {
            offset: 5.0,
            radius: 2.0,
            rate: 0.5,
            max_acceleration,
        }
    }
}

impl SteeringGoal for Wander {
    fn calculate(&self, ctx: &SteeringContext<'_>) -> SteeringOutput {
        let agent = ctx.agent;

        // Project wander circle in front of agent
        let forward = agent.velocity.try_normalize().unwrap_or(Vec2::X);
        let center = agent.position + forward * self.offset;

        let angle = forward.y.atan2(forward.x) + (ctx.noise - 0.5) * 2.0 * self.rate;
        let target = center + Vec2::from_angle(angle) * self.radius;

        SteeringOutput::towards(target - agent.position, self.max_acceleration)
    }

    fn kind(&self) -> Option<GoalName> {
        Some(GoalName::Wander)
    }
}

/// Intercept - seek where another agent is about to be
#[derive(Debug, Clone)]
pub struct InterceptAgent {
    pub target: AgentId,
    /// Upper bound on how far ahead to predict, in seconds
    pub max_prediction: f32,
    pub max_acceleration: f32,
}

impl InterceptAgent {
    /// Create a new intercept-agent goal
    #[must_use]
    pub fn new(target: AgentId, max_prediction: f32, max_acceleration: f32) -> Self {
        Self {
            target,
            max_prediction,
            max_acceleration,
        }
    }
}

impl SteeringGoal for InterceptAgent {
    fn calculate(&self, ctx: &SteeringContext<'_>) -> SteeringOutput {
        let Some(target) = ctx.agent_by_id(self.target) else {
            return SteeringOutput::ZERO;
        };

        let distance = target.position.distance(ctx.agent.position);
        let speed = ctx.agent.speed();
        let prediction = if speed <= distance / self.max_prediction {
            self.max_prediction
        } else {
            distance / speed
        };

        let predicted = target.position + target.velocity * prediction;
        SteeringOutput::towards(predicted - ctx.agent.position, self.max_acceleration)
    }

    fn kind(&self) -> Option<GoalName> {
        Some(GoalName::InterceptAgent)
    }
}

/// Follow - travel along an ordered list of points
#[derive(Debug, Clone)]
pub struct Follow {
    pub points: Vec<Vec2>,
    pub forward: bool,
    pub cyclical: bool,
    /// Distance at which the end of an open path counts as reached
    pub arrive_radius: f32,
    pub max_acceleration: f32,
}

impl Follow {
    /// Create a new follow goal
    #[must_use]
    pub fn new(points: Vec<Vec2>, forward: bool, cyclical: bool, max_acceleration: f32) -> Self {
        Self {
            points,
            forward,
            cyclical,
            arrive_radius: 0.5,
            max_acceleration,
        }
    }

    /// Follow `points` using a declared path's direction and looping
    #[must_use]
    pub fn along(path: &PathDescriptor, points: Vec<Vec2>, max_acceleration: f32) -> Self {
        Self::new(
            points,
            path.forward_direction(),
            path.is_cyclical(),
            max_acceleration,
        )
    }

    fn closest_point(&self, position: Vec2) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.distance_squared(position)
                    .total_cmp(&b.distance_squared(position))
            })
            .map(|(index, _)| index)
    }
}

impl SteeringGoal for Follow {
    fn calculate(&self, ctx: &SteeringContext<'_>) -> SteeringOutput {
        let position = ctx.agent.position;
        let Some(closest) = self.closest_point(position) else {
            return SteeringOutput::ZERO;
        };

        match next_waypoint(closest, self.points.len(), self.forward, self.cyclical) {
            Some(next) => {
                SteeringOutput::towards(self.points[next] - position, self.max_acceleration)
            }
            None => {
                let end = self.points[closest];
                if end.distance(position) <= self.arrive_radius {
                    SteeringOutput::ZERO
                } else {
                    SteeringOutput::towards(end - position, self.max_acceleration)
                }
            }
        }
    }

    fn kind(&self) -> Option<GoalName> {
        Some(GoalName::Follow)
    }
}

/// Stay on - pull back towards a path when drifting more than `radius` off it
#[derive(Debug, Clone)]
pub struct StayOn {
    pub points: Vec<Vec2>,
    pub cyclical: bool,
    pub radius: f32,
    pub max_acceleration: f32,
}

impl StayOn {
    /// Create a new stay-on goal
    #[must_use]
    pub fn new(points: Vec<Vec2>, cyclical: bool, radius: f32, max_acceleration: f32) -> Self {
        Self {
            points,
            cyclical,
            radius,
            max_acceleration,
        }
    }

    fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let closing = match (self.cyclical, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) if self.points.len() > 2 => Some((*last, *first)),
            _ => None,
        };
        self.points
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .chain(closing)
    }

    /// Nearest point on the path to `position`
    fn nearest_on_path(&self, position: Vec2) -> Option<Vec2> {
        if let [only] = self.points.as_slice() {
            return Some(*only);
        }

        self.segments()
            .map(|(a, b)| closest_on_segment(a, b, position))
            .min_by(|a, b| {
                a.distance_squared(position)
                    .total_cmp(&b.distance_squared(position))
            })
    }
}

fn closest_on_segment(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let ab = b - a;
    let length_sq = ab.length_squared();
    if length_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    a + ab * t
}

impl SteeringGoal for StayOn {
    fn calculate(&self, ctx: &SteeringContext<'_>) -> SteeringOutput {
        let position = ctx.agent.position;
        match self.nearest_on_path(position) {
            Some(nearest) if nearest.distance(position) > self.radius => {
                SteeringOutput::towards(nearest - position, self.max_acceleration)
            }
            _ => SteeringOutput::ZERO,
        }
    }

    fn kind(&self) -> Option<GoalName> {
        Some(GoalName::StayOn)
    }
}

/// Stop - brake to a standstill
#[derive(Debug, Clone)]
pub struct Stop {
    pub max_acceleration: f32,
}

impl Stop {
    /// Create a new stop goal
    #[must_use]
    pub fn new(max_acceleration: f32) -> Self {
        Self { max_acceleration }
    }
}

impl SteeringGoal for Stop {
    fn calculate(&self, ctx: &SteeringContext<'_>) -> SteeringOutput {
        SteeringOutput {
            linear: (-ctx.agent.velocity).clamp_length_max(self.max_acceleration),
            angular: 0.0,
        }
    }

    fn kind(&self) -> Option<GoalName> {
        Some(GoalName::Stop)
    }
}
