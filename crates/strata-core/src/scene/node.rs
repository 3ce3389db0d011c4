// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The persisted, encoding-independent representation of one component.

use super::{AssetReference, EntityReference, TypeKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A structurally invalid definition node.
///
/// Raised while reading a node back; it aborts the construction of that node
/// only, never the whole scene.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodeError {
    /// A field the type cannot do without is absent.
    #[error("node '{key}' is missing required field '{field}'")]
    MissingField {
        /// The key of the node being read.
        key: TypeKey,
        /// The missing field.
        field: String,
    },
    /// A field holds a value of the wrong kind.
    #[error("field '{field}' of node '{key}' should be {expected}, found {found}")]
    TypeMismatch {
        /// The key of the node being read.
        key: TypeKey,
        /// The offending field.
        field: String,
        /// The kind of value the reader expected.
        expected: &'static str,
        /// The kind of value that was found.
        found: &'static str,
    },
    /// The node is tagged with another type than the one reading it.
    #[error("expected a '{expected}' node, found '{found}'")]
    UnexpectedKey {
        /// The key the reader expected.
        expected: TypeKey,
        /// The key the node carries.
        found: TypeKey,
    },
    /// A field has the right kind but an unusable value.
    #[error("field '{field}' of node '{key}' is invalid: {reason}")]
    InvalidValue {
        /// The key of the node being read.
        key: TypeKey,
        /// The offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// A single value inside a [`DefinitionNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point scalar.
    Float(f64),
    /// A UTF-8 string.
    Text(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A nested node.
    Node(DefinitionNode),
    /// A relation to another entity of the same scene.
    Entity(EntityReference),
    /// A relation to a shared, externally loaded asset.
    Asset(AssetReference),
}

impl Value {
    /// A short name for the kind of value, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "a bool",
            Value::Int(_) => "an integer",
            Value::Float(_) => "a float",
            Value::Text(_) => "a string",
            Value::List(_) => "a list",
            Value::Node(_) => "a node",
            Value::Entity(_) => "an entity reference",
            Value::Asset(_) => "an asset reference",
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    // Numbers compare at the `f32` precision components store them with,
    // and an integral float is the same number as the integer it spells.
    fn canonical(&self) -> Value {
        match self {
            Value::Float(v) => {
                let narrowed = widen(*v as f32);
                if narrowed.fract() == 0.0 && narrowed.abs() < MAX_EXACT_INT {
                    Value::Int(narrowed as i64)
                } else {
                    Value::Float(narrowed)
                }
            }
            Value::List(items) => Value::List(items.iter().map(Value::canonical).collect()),
            Value::Node(node) => Value::Node(node.canonical()),
            other => other.clone(),
        }
    }
}

/// Integers up to this magnitude survive a trip through `f64`.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Widens an `f32` to the `f64` with the same shortest decimal spelling, so
/// `0.1f32` is written back as `0.1` rather than `0.10000000149011612`.
fn widen(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::from(value))
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(widen(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<const N: usize> From<[f32; N]> for Value {
    fn from(value: [f32; N]) -> Self {
        Value::List(value.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<DefinitionNode> for Value {
    fn from(value: DefinitionNode) -> Self {
        Value::Node(value)
    }
}

impl From<EntityReference> for Value {
    fn from(value: EntityReference) -> Self {
        Value::Entity(value)
    }
}

impl From<AssetReference> for Value {
    fn from(value: AssetReference) -> Self {
        Value::Asset(value)
    }
}

/// A named value inside a [`DefinitionNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// The field name.
    pub name: String,
    /// The field value.
    pub value: Value,
}

/// The persisted state of one component: an ordered list of named values,
/// tagged with the key of the type that wrote it.
///
/// Field order is preserved exactly as written. Two nodes that only differ in
/// field order are equivalent; compare their [`canonical`](Self::canonical)
/// forms when order should not matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionNode {
    /// The type this node belongs to.
    pub key: TypeKey,
    /// The ordered fields of the node.
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl DefinitionNode {
    /// Creates an empty node for the given type.
    pub fn new(key: impl Into<TypeKey>) -> Self {
        Self {
            key: key.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Writes a field, replacing any previous value under the same name.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(Field {
                name: name.to_owned(),
                value,
            }),
        }
    }

    /// Returns the value of a field, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.fields.iter().position(|f| f.name == name)?;
        Some(self.fields.remove(index).value)
    }

    /// The number of fields in this node.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the node has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fails with [`NodeError::UnexpectedKey`] unless this node is tagged `expected`.
    pub fn expect_key(&self, expected: &str) -> Result<(), NodeError> {
        if self.key == expected {
            Ok(())
        } else {
            Err(NodeError::UnexpectedKey {
                expected: expected.into(),
                found: self.key.clone(),
            })
        }
    }

    /// Returns the value of a field the reader cannot do without.
    pub fn require(&self, name: &str) -> Result<&Value, NodeError> {
        self.get(name).ok_or_else(|| NodeError::MissingField {
            key: self.key.clone(),
            field: name.to_owned(),
        })
    }

    /// Reads a required boolean.
    pub fn bool(&self, name: &str) -> Result<bool, NodeError> {
        match self.require(name)? {
            Value::Bool(v) => Ok(*v),
            other => Err(self.mismatch(name, "a bool", other)),
        }
    }

    /// Reads a required integer.
    pub fn i64(&self, name: &str) -> Result<i64, NodeError> {
        match self.require(name)? {
            Value::Int(v) => Ok(*v),
            other => Err(self.mismatch(name, "an integer", other)),
        }
    }

    /// Reads a required scalar. Integers are accepted and widened.
    pub fn f64(&self, name: &str) -> Result<f64, NodeError> {
        let value = self.require(name)?;
        value
            .as_number()
            .ok_or_else(|| self.mismatch(name, "a number", value))
    }

    /// Reads a required scalar as `f32`.
    pub fn f32(&self, name: &str) -> Result<f32, NodeError> {
        self.f64(name).map(|v| v as f32)
    }

    /// Reads a required string.
    pub fn text(&self, name: &str) -> Result<&str, NodeError> {
        match self.require(name)? {
            Value::Text(v) => Ok(v),
            other => Err(self.mismatch(name, "a string", other)),
        }
    }

    /// Reads a required list.
    pub fn list(&self, name: &str) -> Result<&[Value], NodeError> {
        match self.require(name)? {
            Value::List(v) => Ok(v),
            other => Err(self.mismatch(name, "a list", other)),
        }
    }

    /// Reads a required nested node.
    pub fn node(&self, name: &str) -> Result<&DefinitionNode, NodeError> {
        match self.require(name)? {
            Value::Node(v) => Ok(v),
            other => Err(self.mismatch(name, "a node", other)),
        }
    }

    /// Reads a required list of exactly `N` numbers.
    pub fn floats<const N: usize>(&self, name: &str) -> Result<[f32; N], NodeError> {
        let items = self.list(name)?;
        if items.len() != N {
            return Err(NodeError::InvalidValue {
                key: self.key.clone(),
                field: name.to_owned(),
                reason: format!("expected {N} components, found {}", items.len()),
            });
        }
        let mut out = [0.0; N];
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = item
                .as_number()
                .ok_or_else(|| self.mismatch(name, "a list of numbers", item))?
                as f32;
        }
        Ok(out)
    }

    /// Reads a three-component vector.
    pub fn vec3(&self, name: &str) -> Result<[f32; 3], NodeError> {
        self.floats::<3>(name)
    }

    /// Reads an optional boolean, falling back to `default` when absent.
    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool, NodeError> {
        self.or_default(name, default, Self::bool)
    }

    /// Reads an optional scalar, falling back to `default` when absent.
    pub fn f32_or(&self, name: &str, default: f32) -> Result<f32, NodeError> {
        self.or_default(name, default, Self::f32)
    }

    /// Reads an optional string, falling back to `default` when absent.
    pub fn text_or<'a>(&'a self, name: &str, default: &'a str) -> Result<&'a str, NodeError> {
        if self.get(name).is_none() {
            return Ok(default);
        }
        self.text(name)
    }

    /// Reads an optional list of `N` numbers, falling back to `default` when absent.
    pub fn floats_or<const N: usize>(
        &self,
        name: &str,
        default: [f32; N],
    ) -> Result<[f32; N], NodeError> {
        self.or_default(name, default, Self::floats::<N>)
    }

    /// Reads an optional entity reference.
    pub fn entity(&self, name: &str) -> Result<Option<EntityReference>, NodeError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Entity(reference)) => Ok(Some(*reference)),
            Some(other) => Err(self.mismatch(name, "an entity reference", other)),
        }
    }

    /// Reads an optional asset reference.
    pub fn asset(&self, name: &str) -> Result<Option<&AssetReference>, NodeError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Asset(reference)) => Ok(Some(reference)),
            Some(other) => Err(self.mismatch(name, "an asset reference", other)),
        }
    }

    /// Returns a copy of this node with fields sorted by name, recursively.
    ///
    /// List order is significant and is kept as is. Floats are rounded to
    /// `f32` precision and integral floats become integers, so a value
    /// written as `2`, `2.0` or `2.0000000001` has a single canonical form.
    pub fn canonical(&self) -> DefinitionNode {
        let mut fields: Vec<Field> = self
            .fields
            .iter()
            .map(|f| Field {
                name: f.name.clone(),
                value: f.value.canonical(),
            })
            .collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        DefinitionNode {
            key: self.key.clone(),
            fields,
        }
    }

    /// Visits every value of this node and of its nested nodes and lists.
    pub fn visit_values_mut(&mut self, visitor: &mut dyn FnMut(&mut Value)) {
        fn walk(value: &mut Value, visitor: &mut dyn FnMut(&mut Value)) {
            visitor(value);
            match value {
                Value::List(items) => items.iter_mut().for_each(|item| walk(item, visitor)),
                Value::Node(node) => node.visit_values_mut(visitor),
                _ => {}
            }
        }
        for field in &mut self.fields {
            walk(&mut field.value, visitor);
        }
    }

    fn or_default<T>(
        &self,
        name: &str,
        default: T,
        read: impl FnOnce(&Self, &str) -> Result<T, NodeError>,
    ) -> Result<T, NodeError> {
        if self.get(name).is_none() {
            Ok(default)
        } else {
            read(self, name)
        }
    }

    fn mismatch(&self, name: &str, expected: &'static str, found: &Value) -> NodeError {
        NodeError::TypeMismatch {
            key: self.key.clone(),
            field: name.to_owned(),
            expected,
            found: found.kind(),
        }
    }
}
