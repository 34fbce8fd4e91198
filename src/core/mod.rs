//! Configuration loading
//!
//! Scene path declarations and agent goal configurations, read from JSON or
//! RON files.

mod config;
mod format;
mod scene;

pub use config::{AgentConfig, ConfigError, GoalConfig};
pub use format::FileFormat;
pub use scene::{
    SceneError, decode_paths, load_path_set, load_paths, load_paths_json, load_paths_ron,
    paths_from_json_str, paths_from_ron_str,
};
