//! Navigation path descriptors
//!
//! Paths are declared in scene configuration files and decoded record by
//! record. Decoding is all or nothing: a record either yields a complete
//! [`PathDescriptor`] or a [`DecodeError`] naming what was wrong.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::{Map, Value};

/// Dominant geometric alignment of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Spelled `verticle` in configuration files
    Vertical,
    Horizontal,
    Diagonal,
}

impl Orientation {
    /// Every orientation
    pub const ALL: [Orientation; 3] = [
        Orientation::Vertical,
        Orientation::Horizontal,
        Orientation::Diagonal,
    ];

    /// Tag as written in configuration files
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Vertical => "verticle",
            Orientation::Horizontal => "horizontal",
            Orientation::Diagonal => "diagonal",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Orientation::ALL
            .into_iter()
            .find(|orientation| orientation.as_str() == s)
            .ok_or_else(|| DecodeError::UnrecognizedOrientation(s.to_string()))
    }
}

impl Serialize for Orientation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Orientation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(de::Error::custom)
    }
}

/// Why a path record could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("path record is not a map")]
    NotARecord,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` should be a {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },
    #[error("unrecognized orientation `{0}`")]
    UnrecognizedOrientation(String),
}

impl DecodeError {
    /// The field at fault, if the error concerns one
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DecodeError::NotARecord => None,
            DecodeError::MissingField(field) | DecodeError::TypeMismatch { field, .. } => {
                Some(*field)
            }
            DecodeError::UnrecognizedOrientation(_) => Some(PathDescriptor::ORIENTATION),
        }
    }
}

/// A named navigation path declared by a scene
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Value")]
pub struct PathDescriptor {
    name: String,
    forward_direction: bool,
    is_cyclical: bool,
    orientation: Orientation,
}

impl PathDescriptor {
    // Wire field names
    pub const NAME: &'static str = "name";
    pub const FORWARD_DIRECTION: &'static str = "forwardDirection";
    pub const IS_CYCLICAL: &'static str = "isCyclical";
    pub const ORIENTATION: &'static str = "orientation";

    /// Decode one record.
    ///
    /// # Errors
    ///
    /// Fails if the record is not a map, if any of the four fields is
    /// missing or has the wrong type, or if the orientation is not a known
    /// tag. Unknown extra keys are ignored.
    pub fn decode(record: &Value) -> Result<Self, DecodeError> {
        let Value::Object(fields) = record else {
            return Err(DecodeError::NotARecord);
        };

        let name = string_field(fields, Self::NAME)?;
        let forward_direction = bool_field(fields, Self::FORWARD_DIRECTION)?;
        let is_cyclical = bool_field(fields, Self::IS_CYCLICAL)?;
        let orientation = string_field(fields, Self::ORIENTATION)?.parse()?;

        log::debug!("Decoded path `{name}` ({orientation})");

        Ok(Self {
            name: name.to_string(),
            forward_direction,
            is_cyclical,
            orientation,
        })
    }

    /// Name scene data refers to the path by
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether agents walk the points in declared order by default
    #[must_use]
    pub fn forward_direction(&self) -> bool {
        self.forward_direction
    }

    /// Whether the last point connects back to the first
    #[must_use]
    pub fn is_cyclical(&self) -> bool {
        self.is_cyclical
    }

    /// Dominant alignment of the path
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// First point index visited on a path of `len` points
    #[must_use]
    pub fn start_index(&self, len: usize) -> Option<usize> {
        match len {
            0 => None,
            _ if self.forward_direction => Some(0),
            _ => Some(len - 1),
        }
    }

    /// Point index visited after `current`, or `None` at the end of an open
    /// path
    #[must_use]
    pub fn next_index(&self, current: usize, len: usize) -> Option<usize> {
        next_waypoint(current, len, self.forward_direction, self.is_cyclical)
    }
}

fn field<'v>(fields: &'v Map<String, Value>, key: &'static str) -> Result<&'v Value, DecodeError> {
    fields.get(key).ok_or(DecodeError::MissingField(key))
}

fn string_field<'v>(fields: &'v Map<String, Value>, key: &'static str) -> Result<&'v str, DecodeError> {
    field(fields, key)?
        .as_str()
        .ok_or(DecodeError::TypeMismatch {
            field: key,
            expected: "string",
        })
}

fn bool_field(fields: &Map<String, Value>, key: &'static str) -> Result<bool, DecodeError> {
    field(fields, key)?
        .as_bool()
        .ok_or(DecodeError::TypeMismatch {
            field: key,
            expected: "boolean",
        })
}

impl TryFrom<Value> for PathDescriptor {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::decode(&value)
    }
}

/// Step from `current` along a path of `len` points.
///
/// Cyclical paths wrap around; open paths end with `None`. An out of range
/// `current` also yields `None`.
#[must_use]
pub fn next_waypoint(current: usize, len: usize, forward: bool, cyclical: bool) -> Option<usize> {
    if current >= len {
        return None;
    }

    if forward {
        match current + 1 {
            next if next < len => Some(next),
            _ if cyclical => Some(0),
            _ => None,
        }
    } else {
        current.checked_sub(1).or(cyclical.then(|| len - 1))
    }
}
