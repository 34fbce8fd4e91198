//! Agent goal configuration
//!
//! An agent file lists the goals an agent pursues with their weights and
//! parameters. Building it yields a [`CompositeBehavior`] made of the
//! built-in steering goals.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::format::{FileFormat, extension_of};
use crate::ai::{
    AgentId, AlignWith, Avoid, CohereWith, CompositeBehavior, FleeAgent, Follow, GoalDescriptor,
    GoalName, InterceptAgent, Obstacle, ReachTargetSpeed, SeekAgent, SeparateFrom, StayOn,
    SteeringGoal, Stop, Wander,
};
use crate::nav::PathSet;

/// Errors that can occur while loading or building an agent configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("unsupported config file extension `{0}`")]
    UnsupportedFormat(String),
    #[error("`{goal}` goal needs `{parameter}`")]
    MissingParameter {
        goal: GoalName,
        parameter: &'static str,
    },
    #[error("`{goal}` goal does not take `{parameter}`")]
    UnexpectedParameter {
        goal: GoalName,
        parameter: &'static str,
    },
    #[error("`{goal}` goal refers to unknown path `{path}`")]
    UnknownPath { goal: GoalName, path: String },
}

fn default_weight() -> f32 {
    1.0
}

fn default_max_acceleration() -> f32 {
    10.0
}

fn default_forward() -> bool {
    true
}

/// One goal entry of an agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoalConfig {
    pub name: GoalName,
    #[serde(default = "default_weight")]
    pub weight: f32,
    #[serde(default = "default_max_acceleration")]
    pub max_acceleration: f32,
    /// Agent to seek, flee or intercept
    #[serde(default)]
    pub target: Option<AgentId>,
    /// Agents to separate from, align with or cohere with
    #[serde(default)]
    pub group: Vec<AgentId>,
    /// Neighbour range for group goals, or allowed drift for `stay-on`
    #[serde(default)]
    pub distance: Option<f32>,
    /// Speed for `reach-target-speed`
    #[serde(default)]
    pub speed: Option<f32>,
    /// Seconds to look ahead for `avoid` and `intercept-agent`
    #[serde(default)]
    pub look_ahead: Option<f32>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub points: Vec<Vec2>,
    /// Declared path supplying direction and looping for `follow`, or
    /// looping for `stay-on`
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_forward")]
    pub forward: bool,
    #[serde(default)]
    pub cyclical: bool,
}

impl GoalConfig {
    fn target(&self) -> Result<AgentId, ConfigError> {
        self.target.ok_or(ConfigError::MissingParameter {
            goal: self.name,
            parameter: "target",
        })
    }

    fn group(&self) -> Result<Vec<AgentId>, ConfigError> {
        if self.group.is_empty() {
            return Err(ConfigError::MissingParameter {
                goal: self.name,
                parameter: "group",
            });
        }
        Ok(self.group.clone())
    }

    fn points(&self) -> Result<Vec<Vec2>, ConfigError> {
        if self.points.is_empty() {
            return Err(ConfigError::MissingParameter {
                goal: self.name,
                parameter: "points",
            });
        }
        Ok(self.points.clone())
    }

    /// Direction and looping, from the named path when one is given
    fn traversal(&self, paths: Option<&PathSet>) -> Result<(bool, bool), ConfigError> {
        let Some(name) = &self.path else {
            return Ok((self.forward, self.cyclical));
        };
        let declared = paths.and_then(|set| set.get(name)).ok_or_else(|| {
            ConfigError::UnknownPath {
                goal: self.name,
                path: name.clone(),
            }
        })?;
        Ok((declared.forward_direction(), declared.is_cyclical()))
    }

    /// Construct the steering goal this entry describes
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingParameter`] when the goal lacks a
    /// parameter it cannot do without, [`ConfigError::UnexpectedParameter`]
    /// when a goal other than `follow` or `stay-on` names a path, and
    /// [`ConfigError::UnknownPath`] when it names a path that `paths` does
    /// not hold
    pub fn build_goal(&self, paths: Option<&PathSet>) -> Result<Arc<dyn SteeringGoal>, ConfigError> {
        if self.path.is_some() && !matches!(self.name, GoalName::Follow | GoalName::StayOn) {
            return Err(ConfigError::UnexpectedParameter {
                goal: self.name,
                parameter: "path",
            });
        }

        let accel = self.max_acceleration;
        let range = self.distance.unwrap_or(10.0);
        let look_ahead = self.look_ahead.unwrap_or(1.0);

        let goal: Arc<dyn SteeringGoal> = match self.name {
            GoalName::SeekAgent => Arc::new(SeekAgent::new(self.target()?, accel)),
            GoalName::FleeAgent => Arc::new(FleeAgent::new(self.target()?, accel)),
            GoalName::Avoid => Arc::new(Avoid::new(self.obstacles.clone(), look_ahead, accel)),
            GoalName::SeparateFrom => Arc::new(SeparateFrom::new(self.group()?, range, accel)),
            GoalName::AlignWith => Arc::new(AlignWith::new(self.group()?, range, accel)),
            GoalName::CohereWith => Arc::new(CohereWith::new(self.group()?, range, accel)),
            GoalName::ReachTargetSpeed => {
                let speed = self.speed.ok_or(ConfigError::MissingParameter {
                    goal: self.name,
                    parameter: "speed",
                })?;
                Arc::new(ReachTargetSpeed::new(speed, accel))
            }
            GoalName::Wander => Arc::new(Wander::new(accel)),
            GoalName::InterceptAgent => {
                Arc::new(InterceptAgent::new(self.target()?, look_ahead, accel))
            }
            GoalName::Follow => {
                let (forward, cyclical) = self.traversal(paths)?;
                Arc::new(Follow::new(self.points()?, forward, cyclical, accel))
            }
            GoalName::StayOn => {
                let (_, cyclical) = self.traversal(paths)?;
                let radius = self.distance.unwrap_or(1.0);
                Arc::new(StayOn::new(self.points()?, cyclical, radius, accel))
            }
            GoalName::Stop => Arc::new(Stop::new(accel)),
        };

        Ok(goal)
    }
}

/// Goals for one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub name: String,
    /// Limit on the combined steering, unbounded when absent
    #[serde(default)]
    pub max_acceleration: Option<f32>,
    #[serde(default)]
    pub goals: Vec<GoalConfig>,
}

impl AgentConfig {
    /// Parse a JSON agent configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a RON agent configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load from a `.json` or `.ron` file
    ///
    /// # Errors
    ///
    /// Returns an error for other extensions, unreadable files, or invalid
    /// configurations
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(extension_of(path)))?;
        let content = fs::read_to_string(path)?;
        let config = match format {
            FileFormat::Json => Self::from_json_str(&content)?,
            FileFormat::Ron => Self::from_ron_str(&content)?,
        };
        log::info!(
            "Loaded agent `{}` with {} goals from {}",
            config.name,
            config.goals.len(),
            path.display()
        );
        Ok(config)
    }

    /// Build the agent's behavior without any declared paths
    ///
    /// # Errors
    ///
    /// See [`GoalConfig::build_goal`]
    pub fn build_behavior(&self) -> Result<CompositeBehavior, ConfigError> {
        self.build(None)
    }

    /// Build the agent's behavior, resolving `follow` goals against `paths`
    ///
    /// # Errors
    ///
    /// See [`GoalConfig::build_goal`]
    pub fn build_behavior_with_paths(&self, paths: &PathSet) -> Result<CompositeBehavior, ConfigError> {
        self.build(Some(paths))
    }

    fn build(&self, paths: Option<&PathSet>) -> Result<CompositeBehavior, ConfigError> {
        let mut behavior = CompositeBehavior::new();
        if let Some(max) = self.max_acceleration {
            behavior = behavior.with_max_acceleration(max);
        }

        for entry in &self.goals {
            let goal = entry.build_goal(paths)?;
            behavior.add(GoalDescriptor::new(entry.name, goal, entry.weight));
        }

        log::debug!(
            "Built behavior for `{}` with total weight {}",
            self.name,
            behavior.total_weight()
        );
        Ok(behavior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AgentState, SteeringContext};
    use crate::core::paths_from_json_str;

    const GUARD: &str = r#"{
        "name": "Guard",
        "maxAcceleration": null,
        "goals": []
    }"#;

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(matches!(AgentConfig::from_json_str(GUARD), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_build_from_json() {
        let config = AgentConfig::from_json_str(
            r#"{
                "name": "Guard",
                "max_acceleration": 8.0,
                "goals": [
                    {"name": "seek-agent", "weight": 2.0, "target": 1},
                    {"name": "separate-from", "group": [2, 3], "distance": 4.0},
                    {"name": "wander", "weight": 0.25}
                ]
            }"#,
        )
        .unwrap();

        let behavior = config.build_behavior().unwrap();
        assert_eq!(behavior.len(), 3);
        assert!(behavior.iter().all(GoalDescriptor::is_consistent));
        assert!((behavior.weight_of(GoalName::SeekAgent) - 2.0).abs() < 1e-6);
        assert!((behavior.weight_of(GoalName::SeparateFrom) - 1.0).abs() < 1e-6);

        let me = AgentState::new(AgentId(0), Vec2::ZERO, Vec2::X);
        let others = [AgentState::new(AgentId(1), Vec2::new(0.0, 10.0), Vec2::ZERO)];
        let output = behavior.calculate(&SteeringContext::new(&me, &others));
        assert!(output.linear.length() <= 8.0 + 1e-4);
        assert!(output.linear.y > 0.0);
    }

    #[test]
    fn test_build_from_ron() {
        let config = AgentConfig::from_ron_str(
            r#"(
                name: "Patrol",
                goals: [
                    (name: "follow", points: [(0.0, 0.0), (10.0, 0.0)], cyclical: true),
                    (name: "stop", weight: 0.1),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(config.goals[0].name, GoalName::Follow);
        assert!(config.goals[0].forward);
        let behavior = config.build_behavior().unwrap();
        assert_eq!(behavior.len(), 2);
    }

    #[test]
    fn test_missing_parameter() {
        let config = AgentConfig::from_json_str(
            r#"{"name": "Hunter", "goals": [{"name": "intercept-agent"}]}"#,
        )
        .unwrap();

        assert!(matches!(
            config.build_behavior(),
            Err(ConfigError::MissingParameter {
                goal: GoalName::InterceptAgent,
                parameter: "target",
            })
        ));

        let config = AgentConfig::from_json_str(
            r#"{"name": "Cruiser", "goals": [{"name": "reach-target-speed"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            config.build_behavior(),
            Err(ConfigError::MissingParameter { parameter: "speed", .. })
        ));
    }

    #[test]
    fn test_follow_uses_declared_path() {
        let paths = PathSet::from_paths(
            paths_from_json_str(
                r#"[{"name": "Loop", "forwardDirection": false, "isCyclical": true, "orientation": "horizontal"}]"#,
            )
            .unwrap(),
        )
        .unwrap();

        let config = AgentConfig::from_json_str(
            r#"{"name": "Runner", "goals": [
                {"name": "follow", "path": "Loop", "points": [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]}
            ]}"#,
        )
        .unwrap();

        let behavior = config.build_behavior_with_paths(&paths).unwrap();

        // Reversed loop: from the first point the next stop is the last one
        let me = AgentState::new(AgentId(0), Vec2::new(0.0, 1.0), Vec2::ZERO);
        let output = behavior.calculate(&SteeringContext::new(&me, &[]));
        assert!(output.linear.x > 0.0);
        assert!(output.linear.y > 0.0);

        assert!(matches!(
            config.build_behavior(),
            Err(ConfigError::UnknownPath { path, .. }) if path == "Loop"
        ));
    }

    #[test]
    fn test_stay_on_resolves_declared_path() {
        let config = AgentConfig::from_json_str(
            r#"{"name": "Sentry", "goals": [
                {"name": "stay-on", "path": "NoSuchPath", "points": [[0.0, 0.0], [1.0, 0.0]]}
            ]}"#,
        )
        .unwrap();

        assert!(matches!(
            config.build_behavior_with_paths(&PathSet::new()),
            Err(ConfigError::UnknownPath { goal: GoalName::StayOn, path }) if path == "NoSuchPath"
        ));

        let paths = PathSet::from_paths(
            paths_from_json_str(
                r#"[{"name": "Ring", "forwardDirection": true, "isCyclical": true, "orientation": "diagonal"}]"#,
            )
            .unwrap(),
        )
        .unwrap();
        let config = AgentConfig::from_json_str(
            r#"{"name": "Sentry", "goals": [
                {"name": "stay-on", "path": "Ring", "distance": 0.5,
                 "points": [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]}
            ]}"#,
        )
        .unwrap();
        let behavior = config.build_behavior_with_paths(&paths).unwrap();

        // Close to the closing segment only, which exists because the path loops
        let me = AgentState::new(AgentId(0), Vec2::new(5.0, 5.2), Vec2::ZERO);
        let output = behavior.calculate(&SteeringContext::new(&me, &[]));
        assert_eq!(output, crate::ai::SteeringOutput::ZERO);
    }

    #[test]
    fn test_path_rejected_on_other_goals() {
        let config = AgentConfig::from_json_str(
            r#"{"name": "Hunter", "goals": [{"name": "seek-agent", "target": 1, "path": "MainHall"}]}"#,
        )
        .unwrap();

        assert!(matches!(
            config.build_behavior(),
            Err(ConfigError::UnexpectedParameter {
                goal: GoalName::SeekAgent,
                parameter: "path",
            })
        ));
    }

    #[test]
    fn test_demo_guard() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
        let paths = crate::core::load_path_set(demos.join("level1.json")).unwrap();
        let config = AgentConfig::load(demos.join("guard.ron")).unwrap();

        let behavior = config.build_behavior_with_paths(&paths).unwrap();
        assert_eq!(behavior.len(), 5);
        assert!(behavior.iter().all(GoalDescriptor::is_consistent));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        assert!(matches!(
            AgentConfig::load("guard.yaml"),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "yaml"
        ));
    }
}
