// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Rowflow

//! Enumerated domain types: named bijective mappings between symbolic keys
//! and an underlying base representation, with validated casts in both
//! directions.
//!
//! Integer-backed enums deliberately reuse the base integer representation
//! on the wire; a cast is a validation gate, not a transformation, so
//! downstream numeric operations on the column stay cheap. Symbolic meaning
//! is recovered on demand via the reverse lookup.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{
	error::{Diagnostic, Error, IntoDiagnostic},
	metadata::TypeMetadata,
	value::Value,
};

/// Failure of a key or value lookup against an enum definition.
///
/// Both kinds are user/data-level and never retryable; they always carry
/// the attempted input and the enum name. When exposed through a cast
/// surface, both render under the "invalid cast argument" label.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CastError {
	#[error("no key '{key}' in enum '{enum_name}'")]
	NoSuchKey {
		key: String,
		enum_name: String,
	},

	#[error("no value '{value}' in enum '{enum_name}'")]
	NoSuchValue {
		value: Value,
		enum_name: String,
	},
}

impl IntoDiagnostic for CastError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			CastError::NoSuchKey {
				key,
				enum_name,
			} => Diagnostic {
				code: "CAST_001".to_string(),
				message: format!("no key '{}' in enum '{}'", key, enum_name),
				label: Some("invalid cast argument".to_string()),
				help: Some(format!(
					"valid keys are the member names declared for enum '{}'",
					enum_name
				)),
				notes: vec![],
			},
			CastError::NoSuchValue {
				value,
				enum_name,
			} => Diagnostic {
				code: "CAST_002".to_string(),
				message: format!("no value '{}' in enum '{}'", value, enum_name),
				label: Some("invalid cast argument".to_string()),
				help: Some(
					"the raw value does not match any declared member; the writer and the enum definition may have drifted apart"
						.to_string(),
				),
				notes: vec![],
			},
		}
	}
}

impl From<CastError> for Error {
	fn from(err: CastError) -> Self {
		Error(err.into_diagnostic())
	}
}

/// Failure while constructing an enum definition.
///
/// These are authoring errors, surfaced immediately when the definition is
/// built rather than deferred to lookup time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnumDefError {
	#[error("duplicate value '{value}' in enum '{enum_name}'")]
	DuplicateValue {
		enum_name: String,
		value: String,
		first_key: String,
		second_key: String,
	},

	#[error("malformed enum definition document: {detail}")]
	Malformed {
		detail: String,
	},
}

impl IntoDiagnostic for EnumDefError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			EnumDefError::DuplicateValue {
				enum_name,
				value,
				first_key,
				second_key,
			} => Diagnostic {
				code: "ENUM_001".to_string(),
				message: format!(
					"duplicate value '{}' in enum '{}': keys '{}' and '{}'",
					value, enum_name, first_key, second_key
				),
				label: Some("enum definition is not a bijection".to_string()),
				help: Some(
					"every key and every value must be unique within one enum definition"
						.to_string(),
				),
				notes: vec![],
			},
			EnumDefError::Malformed {
				detail,
			} => Diagnostic {
				code: "ENUM_002".to_string(),
				message: format!("malformed enum definition document: {}", detail),
				label: Some("invalid enum definition".to_string()),
				help: Some(
					"expected a JSON object mapping enum names to objects of key/value entries"
						.to_string(),
				),
				notes: vec![],
			},
		}
	}
}

impl From<EnumDefError> for Error {
	fn from(err: EnumDefError) -> Self {
		Error(err.into_diagnostic())
	}
}

/// An integer-backed enum type definition.
///
/// Immutable after construction; the reverse index is built once so the
/// per-row reverse lookup during display decode stays O(1).
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerEnum {
	name: String,
	entries: IndexMap<String, i64>,
	reverse: HashMap<i64, String>,
}

impl IntegerEnum {
	pub fn new(name: impl Into<String>, entries: IndexMap<String, i64>) -> crate::Result<Self> {
		let name = name.into();
		let mut reverse = HashMap::with_capacity(entries.len());
		for (key, value) in &entries {
			if let Some(first_key) = reverse.insert(*value, key.clone()) {
				return Err(EnumDefError::DuplicateValue {
					enum_name: name,
					value: value.to_string(),
					first_key,
					second_key: key.clone(),
				}
				.into());
			}
		}
		Ok(Self {
			name,
			entries,
			reverse,
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn entries(&self) -> &IndexMap<String, i64> {
		&self.entries
	}

	/// Look up the underlying value of a symbolic key.
	pub fn key_to_value(&self, key: &str) -> crate::Result<i64> {
		self.entries.get(key).copied().ok_or_else(|| {
			CastError::NoSuchKey {
				key: key.to_string(),
				enum_name: self.name.clone(),
			}
			.into()
		})
	}

	/// Reverse lookup: the symbolic key of an underlying value.
	pub fn value_to_key(&self, value: i64) -> crate::Result<&str> {
		self.reverse.get(&value).map(String::as_str).ok_or_else(|| {
			CastError::NoSuchValue {
				value: Value::Int8(value),
				enum_name: self.name.clone(),
			}
			.into()
		})
	}

	/// Validation gate: returns the input unchanged iff it is a defined
	/// value. The wire representation of an integer-backed enum is the
	/// integer itself.
	pub fn cast_from_integer(&self, value: i64) -> crate::Result<i64> {
		self.value_to_key(value)?;
		Ok(value)
	}

	/// Cast a textual literal (a symbolic key) into the enum's storage
	/// representation.
	pub fn cast_from_string(&self, text: &str) -> crate::Result<i64> {
		self.key_to_value(text)
	}
}

/// A string-backed enum type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct StringEnum {
	name: String,
	entries: IndexMap<String, String>,
	reverse: HashMap<String, String>,
}

impl StringEnum {
	pub fn new(name: impl Into<String>, entries: IndexMap<String, String>) -> crate::Result<Self> {
		let name = name.into();
		let mut reverse = HashMap::with_capacity(entries.len());
		for (key, value) in &entries {
			if let Some(first_key) = reverse.insert(value.clone(), key.clone()) {
				return Err(EnumDefError::DuplicateValue {
					enum_name: name,
					value: value.clone(),
					first_key,
					second_key: key.clone(),
				}
				.into());
			}
		}
		Ok(Self {
			name,
			entries,
			reverse,
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn entries(&self) -> &IndexMap<String, String> {
		&self.entries
	}

	pub fn key_to_value(&self, key: &str) -> crate::Result<&str> {
		self.entries.get(key).map(String::as_str).ok_or_else(|| {
			CastError::NoSuchKey {
				key: key.to_string(),
				enum_name: self.name.clone(),
			}
			.into()
		})
	}

	pub fn value_to_key(&self, value: &str) -> crate::Result<&str> {
		self.reverse.get(value).map(String::as_str).ok_or_else(|| {
			CastError::NoSuchValue {
				value: Value::utf8(value),
				enum_name: self.name.clone(),
			}
			.into()
		})
	}

	/// Validation gate for a raw value already in storage representation.
	pub fn cast_from_value<'a>(&self, value: &'a str) -> crate::Result<&'a str> {
		self.value_to_key(value)?;
		Ok(value)
	}

	/// Cast a textual literal (a symbolic key) into the enum's storage
	/// representation.
	pub fn cast_from_string(&self, text: &str) -> crate::Result<&str> {
		self.key_to_value(text)
	}
}

/// An enum type of either base kind.
///
/// The variant tag selects the cast-method set at compile time; there is no
/// shared base or name-based dispatch. This is the seam used where the base
/// kind is only known at runtime (e.g. registry lookups), exposing a
/// [`Value`]-typed cast surface.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumType {
	Integer(IntegerEnum),
	String(StringEnum),
}

impl EnumType {
	pub fn name(&self) -> &str {
		match self {
			EnumType::Integer(e) => e.name(),
			EnumType::String(e) => e.name(),
		}
	}

	/// Cast a symbolic key into the enum's storage representation.
	pub fn cast_from_key(&self, key: &str) -> crate::Result<Value> {
		match self {
			EnumType::Integer(e) => e.cast_from_string(key).map(Value::Int8),
			EnumType::String(e) => e.cast_from_string(key).map(Value::utf8),
		}
	}

	/// Validation gate for a raw value already in storage representation.
	///
	/// A value of the wrong kind for this enum's base representation is by
	/// definition not among the defined members.
	pub fn cast_from_value(&self, value: &Value) -> crate::Result<Value> {
		match (self, value) {
			(EnumType::Integer(e), Value::Int8(v)) => {
				e.cast_from_integer(*v).map(Value::Int8)
			}
			(EnumType::String(e), Value::Utf8(v)) => {
				e.cast_from_value(v).map(Value::utf8)
			}
			_ => Err(CastError::NoSuchValue {
				value: value.clone(),
				enum_name: self.name().to_string(),
			}
			.into()),
		}
	}

	/// Reverse lookup: the symbolic key of a raw storage value.
	pub fn value_to_key(&self, value: &Value) -> crate::Result<&str> {
		match (self, value) {
			(EnumType::Integer(e), Value::Int8(v)) => e.value_to_key(*v),
			(EnumType::String(e), Value::Utf8(v)) => e.value_to_key(v),
			_ => Err(CastError::NoSuchValue {
				value: value.clone(),
				enum_name: self.name().to_string(),
			}
			.into()),
		}
	}

	/// The denormalized, display-only metadata payload sent alongside
	/// query results for columns of this type.
	pub fn type_metadata(&self) -> TypeMetadata {
		let entries = match self {
			EnumType::Integer(e) => e
				.entries()
				.iter()
				.map(|(key, value)| (key.clone(), Value::Int8(*value)))
				.collect(),
			EnumType::String(e) => e
				.entries()
				.iter()
				.map(|(key, value)| (key.clone(), Value::utf8(value.clone())))
				.collect(),
		};
		TypeMetadata::Enum {
			entries,
		}
	}
}

/// A name-keyed collection of enum type definitions.
#[derive(Debug, Clone, Default)]
pub struct EnumRegistry {
	enums: IndexMap<String, EnumType>,
}

impl EnumRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Load integer-backed enum definitions from a JSON document of shape
	/// `{ "EnumName": { "KEY": value, ... }, ... }`.
	pub fn from_json(json: &str) -> crate::Result<Self> {
		let document: IndexMap<String, IndexMap<String, i64>> = serde_json::from_str(json)
			.map_err(|err| EnumDefError::Malformed {
				detail: err.to_string(),
			})?;

		let mut registry = Self::new();
		for (name, entries) in document {
			registry.register(EnumType::Integer(IntegerEnum::new(name, entries)?));
		}
		Ok(registry)
	}

	pub fn register(&mut self, enum_type: EnumType) {
		self.enums.insert(enum_type.name().to_string(), enum_type);
	}

	pub fn get(&self, name: &str) -> Option<&EnumType> {
		self.enums.get(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &EnumType> {
		self.enums.values()
	}

	pub fn len(&self) -> usize {
		self.enums.len()
	}

	pub fn is_empty(&self) -> bool {
		self.enums.is_empty()
	}
}
