//! Ordered, de-duplicated parameter collection.
//!
//! Entries are keyed by their *encoded* name, so `Configuration "system.x"`
//! and `System "x"` occupy the same slot. Replacing an entry keeps its
//! original position.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;
use crate::parameter::{Parameter, ParameterKind, Property, encode};

/// `{"count": N, "property": [...]}` as exchanged with the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PropertiesWire {
    #[serde(default)]
    count: usize,
    #[serde(default)]
    property: Vec<Property>,
}

/// Insertion-ordered parameters, at most one per encoded name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PropertiesWire", into = "PropertiesWire")]
pub struct ParameterCollection {
    items: Vec<Parameter>,
    index: HashMap<String, usize>,
}

impl ParameterCollection {
    /// An empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value stored under `encode(kind, name)`.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::InvalidArgument`] if `name` is empty.
    pub fn add_or_replace(
        &mut self,
        kind: ParameterKind,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ParameterError> {
        self.add_or_replace_parameter(Parameter::new(kind, name, value)?);
        Ok(())
    }

    /// Insert `parameter`, replacing any entry with the same encoded name in
    /// place.
    pub fn add_or_replace_parameter(&mut self, parameter: Parameter) {
        let key = parameter.encoded_name();
        match self.index.get(&key) {
            Some(&pos) => self.items[pos] = parameter,
            None => {
                self.index.insert(key, self.items.len());
                self.items.push(parameter);
            }
        }
    }

    /// Remove the entry stored under `encode(kind, name)`, keeping the order
    /// of everything else.
    pub fn remove(&mut self, kind: ParameterKind, name: &str) -> Option<Parameter> {
        let pos = self.index.remove(&encode(kind, name))?;
        let removed = self.items.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Entry stored under `encode(kind, name)`, if any.
    #[must_use]
    pub fn get(&self, kind: ParameterKind, name: &str) -> Option<&Parameter> {
        self.index
            .get(&encode(kind, name))
            .map(|&pos| &self.items[pos])
    }

    /// Add-or-replace every entry of `other` into `self`, in `other`'s order.
    pub fn concat(&mut self, other: &ParameterCollection) {
        for parameter in &other.items {
            self.add_or_replace_parameter(parameter.clone());
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stored properties in insertion order.
    #[must_use]
    pub fn properties(&self) -> Vec<Property> {
        self.items.iter().map(Parameter::property).collect()
    }

    /// Serialize to the server's wire form.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse the server's wire form. Each property is decoded with the
    /// prefix heuristic; `count` is not trusted.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or on a property whose name decodes to an
    /// empty parameter name.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

impl TryFrom<PropertiesWire> for ParameterCollection {
    type Error = ParameterError;

    fn try_from(wire: PropertiesWire) -> Result<Self, Self::Error> {
        let mut collection = Self::new();
        for property in wire.property {
            collection.add_or_replace_parameter(Parameter::try_from(property)?);
        }
        Ok(collection)
    }
}

impl From<ParameterCollection> for PropertiesWire {
    fn from(collection: ParameterCollection) -> Self {
        let property: Vec<Property> = collection.items.into_iter().map(Property::from).collect();
        Self {
            count: property.len(),
            property,
        }
    }
}

impl FromIterator<Parameter> for ParameterCollection {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl Extend<Parameter> for ParameterCollection {
    fn extend<I: IntoIterator<Item = Parameter>>(&mut self, iter: I) {
        for parameter in iter {
            self.add_or_replace_parameter(parameter);
        }
    }
}

impl<'a> IntoIterator for &'a ParameterCollection {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
