//! Scene-wide collection of declared paths

use rustc_hash::FxHashMap;

use super::path::{Orientation, PathDescriptor};

/// Errors building a [`PathSet`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathSetError {
    #[error("path `{0}` is declared more than once")]
    DuplicateName(String),
}

/// The paths one scene declares, in declaration order, addressable by name
#[derive(Debug, Clone, Default)]
pub struct PathSet {
    paths: Vec<PathDescriptor>,
    by_name: FxHashMap<String, usize>,
}

impl PathSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect decoded paths, rejecting repeated names
    ///
    /// # Errors
    ///
    /// Returns [`PathSetError::DuplicateName`] for the first repeated name
    pub fn from_paths(paths: impl IntoIterator<Item = PathDescriptor>) -> Result<Self, PathSetError> {
        let mut set = Self::new();
        for path in paths {
            set.insert(path)?;
        }
        Ok(set)
    }

    /// Add one path
    ///
    /// # Errors
    ///
    /// Returns [`PathSetError::DuplicateName`] if a path with the same name
    /// is already present
    pub fn insert(&mut self, path: PathDescriptor) -> Result<(), PathSetError> {
        if self.by_name.contains_key(path.name()) {
            log::warn!("Duplicate path name `{}`", path.name());
            return Err(PathSetError::DuplicateName(path.name().to_string()));
        }
        self.by_name.insert(path.name().to_string(), self.paths.len());
        self.paths.push(path);
        Ok(())
    }

    /// Look up a path by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PathDescriptor> {
        self.by_name.get(name).map(|&index| &self.paths[index])
    }

    /// Paths with the given orientation, in declaration order
    pub fn with_orientation(&self, orientation: Orientation) -> impl Iterator<Item = &PathDescriptor> {
        self.paths
            .iter()
            .filter(move |path| path.orientation() == orientation)
    }

    /// Paths in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &PathDescriptor> {
        self.paths.iter()
    }

    /// Number of paths
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no paths are declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
