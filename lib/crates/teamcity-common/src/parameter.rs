//! Typed build parameters and their flat name-prefix encoding.
//!
//! The server stores every parameter as a single `{name, value}` property.
//! The kind is carried only by a prefix on the stored name:
//!
//! | kind                  | stored name      |
//! |-----------------------|------------------|
//! | `Configuration`       | `<name>`         |
//! | `System`              | `system.<name>`  |
//! | `EnvironmentVariable` | `env.<name>`     |
//!
//! Decoding is lossy: a configuration parameter literally named
//! `system.foo` is stored exactly like a system parameter named `foo`, and
//! reads back as the latter. That behaviour matches how the server
//! classifies stored properties and is kept as-is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// Stored-name prefix for system properties.
pub const SYSTEM_PREFIX: &str = "system.";

/// Stored-name prefix for environment variables.
pub const ENV_PREFIX: &str = "env.";

/// Semantic category of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    #[serde(rename = "configuration")]
    Configuration,
    #[serde(rename = "system")]
    System,
    #[serde(rename = "env")]
    EnvironmentVariable,
}

impl ParameterKind {
    pub const ALL: [Self; 3] = [Self::Configuration, Self::System, Self::EnvironmentVariable];

    /// Prefix prepended to the user-facing name when stored.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Configuration => "",
            Self::System => SYSTEM_PREFIX,
            Self::EnvironmentVariable => ENV_PREFIX,
        }
    }

    /// Stable textual tag (`configuration`, `system`, `env`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::System => "system",
            Self::EnvironmentVariable => "env",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterKind {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                ParameterError::InvalidArgument(format!(
                    "unknown parameter kind '{s}' (expected configuration, system or env)"
                ))
            })
    }
}

/// Compute the stored name for `(kind, name)`.
#[must_use]
pub fn encode(kind: ParameterKind, name: &str) -> String {
    format!("{}{name}", kind.prefix())
}

/// Classify a stored name by prefix and strip it.
///
/// `system.` is checked before `env.`; anything else is a configuration
/// parameter with the name unchanged. A bare prefix (`"system."`, `"env."`)
/// is itself a configuration name. This is a best-effort inverse of
/// [`encode`], not a true one.
#[must_use]
pub fn classify(stored_name: &str) -> (ParameterKind, &str) {
    for kind in [ParameterKind::System, ParameterKind::EnvironmentVariable] {
        match stored_name.strip_prefix(kind.prefix()) {
            Some(rest) if !rest.is_empty() => return (kind, rest),
            _ => {}
        }
    }
    (ParameterKind::Configuration, stored_name)
}

/// Rebuild a [`Parameter`] from its stored form.
///
/// # Errors
///
/// Returns [`ParameterError::InvalidArgument`] only for an empty stored name.
pub fn decode(stored_name: &str, value: impl Into<String>) -> Result<Parameter, ParameterError> {
    let (kind, name) = classify(stored_name);
    Parameter::new(kind, name, value)
}

/// A single flat `{name, value}` property as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// A typed build parameter. Immutable; use [`Parameter::with_value`] to
/// derive an updated copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Property", into = "Property")]
pub struct Parameter {
    kind: ParameterKind,
    name: String,
    value: String,
}

impl Parameter {
    /// Construct a parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::InvalidArgument`] if `name` is empty. The
    /// value is not validated.
    pub fn new(
        kind: ParameterKind,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ParameterError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ParameterError::InvalidArgument(format!(
                "{kind} parameter name must not be empty"
            )));
        }
        Ok(Self {
            kind,
            name,
            value: value.into(),
        })
    }

    /// Decode a stored property. See [`decode`].
    ///
    /// # Errors
    ///
    /// Same as [`decode`].
    pub fn from_property(property: &Property) -> Result<Self, ParameterError> {
        decode(&property.name, property.value.clone())
    }

    #[must_use]
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// Unprefixed, user-facing name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Name under which the server stores this parameter.
    #[must_use]
    pub fn encoded_name(&self) -> String {
        encode(self.kind, &self.name)
    }

    /// The `{name, value}` property this parameter serializes to.
    #[must_use]
    pub fn property(&self) -> Property {
        Property {
            name: self.encoded_name(),
            value: self.value.clone(),
        }
    }

    /// Copy of this parameter carrying a different value.
    #[must_use]
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self {
            kind: self.kind,
            name: self.name.clone(),
            value: value.into(),
        }
    }
}

impl TryFrom<Property> for Parameter {
    type Error = ParameterError;

    fn try_from(property: Property) -> Result<Self, Self::Error> {
        decode(&property.name, property.value)
    }
}

impl From<Parameter> for Property {
    fn from(parameter: Parameter) -> Self {
        Property {
            name: parameter.encoded_name(),
            value: parameter.value,
        }
    }
}
