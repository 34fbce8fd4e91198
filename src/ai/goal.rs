//! Goal descriptors
//!
//! A [`GoalDescriptor`] names, weights and wraps one steering goal so a
//! [`CompositeBehavior`](super::CompositeBehavior) can combine it with others.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use super::steering::SteeringGoal;

/// Intent of a steering goal.
///
/// The set is closed; configuration files use the kebab-case spelling
/// returned by [`GoalName::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GoalName {
    SeekAgent,
    FleeAgent,
    Avoid,
    SeparateFrom,
    AlignWith,
    CohereWith,
    ReachTargetSpeed,
    Wander,
    InterceptAgent,
    Follow,
    StayOn,
    Stop,
}

impl GoalName {
    /// Every goal name, in declaration order
    pub const ALL: [GoalName; 12] = [
        GoalName::SeekAgent,
        GoalName::FleeAgent,
        GoalName::Avoid,
        GoalName::SeparateFrom,
        GoalName::AlignWith,
        GoalName::CohereWith,
        GoalName::ReachTargetSpeed,
        GoalName::Wander,
        GoalName::InterceptAgent,
        GoalName::Follow,
        GoalName::StayOn,
        GoalName::Stop,
    ];

    /// Wire spelling of the tag
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GoalName::SeekAgent => "seek-agent",
            GoalName::FleeAgent => "flee-agent",
            GoalName::Avoid => "avoid",
            GoalName::SeparateFrom => "separate-from",
            GoalName::AlignWith => "align-with",
            GoalName::CohereWith => "cohere-with",
            GoalName::ReachTargetSpeed => "reach-target-speed",
            GoalName::Wander => "wander",
            GoalName::InterceptAgent => "intercept-agent",
            GoalName::Follow => "follow",
            GoalName::StayOn => "stay-on",
            GoalName::Stop => "stop",
        }
    }
}

impl fmt::Display for GoalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a string that is not one of the goal tags
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown goal name `{0}`")]
pub struct UnknownGoalName(pub String);

impl FromStr for GoalName {
    type Err = UnknownGoalName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoalName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownGoalName(s.to_string()))
    }
}

impl Serialize for GoalName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Read as a plain string so RON files can spell tags like `"seek-agent"`
impl<'de> Deserialize<'de> for GoalName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(de::Error::custom)
    }
}

/// A named, weighted steering goal.
///
/// Callers must pair `name` with a goal of the matching kind; nothing checks
/// this unless [`GoalDescriptor::is_consistent`] is asked explicitly.
///
/// Two descriptors are equal when their names match, they wrap the same goal
/// allocation, and their weights have the same bit pattern.
#[derive(Debug, Clone)]
pub struct GoalDescriptor {
    name: GoalName,
    goal: Arc<dyn SteeringGoal>,
    weight: f32,
}

impl GoalDescriptor {
    /// Wrap a prebuilt goal
    #[must_use]
    pub fn new(name: GoalName, goal: Arc<dyn SteeringGoal>, weight: f32) -> Self {
        Self { name, goal, weight }
    }

    /// Intent tag
    #[must_use]
    pub fn name(&self) -> GoalName {
        self.name
    }

    /// The wrapped steering goal
    #[must_use]
    pub fn goal(&self) -> &Arc<dyn SteeringGoal> {
        &self.goal
    }

    /// Influence relative to other active goals
    #[must_use]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Whether the wrapped goal agrees with `name`.
    ///
    /// Goals that do not report a kind are taken on trust.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.goal.kind().is_none_or(|kind| kind == self.name)
    }

    fn goal_addr(&self) -> *const () {
        Arc::as_ptr(&self.goal).cast::<()>()
    }
}

impl PartialEq for GoalDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && std::ptr::eq(self.goal_addr(), other.goal_addr())
            && self.weight.to_bits() == other.weight.to_bits()
    }
}

impl Eq for GoalDescriptor {}

impl Hash for GoalDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.goal_addr().hash(state);
        self.weight.to_bits().hash(state);
    }
}
