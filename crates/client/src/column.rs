// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Rowflow

use indexmap::IndexMap;
use rowflow_type::{EnumType, TypeMetadata, Value};
use serde::{Deserialize, Serialize};

use crate::error::ConsumeError;

/// A column descriptor carried alongside query results.
///
/// `metadata` is either absent or fully populated: when present and tagged
/// as enum-kind, `r#type` is that enum's name and the embedded entries are
/// the denormalized display copy sent over the wire, not the authoritative
/// definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
	pub name: String,
	#[serde(rename = "type")]
	pub r#type: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<TypeMetadata>,
}

impl Column {
	pub fn new(name: impl Into<String>, r#type: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			r#type: r#type.into(),
			metadata: None,
		}
	}

	/// A column of an enumerated type, with the denormalized metadata
	/// built from the authoritative definition.
	pub fn enumeration(name: impl Into<String>, enum_type: &EnumType) -> Self {
		Self {
			name: name.into(),
			r#type: enum_type.name().to_string(),
			metadata: Some(enum_type.type_metadata()),
		}
	}

	pub fn is_enum(&self) -> bool {
		self.enum_entries().is_some()
	}

	pub fn enum_entries(&self) -> Option<&IndexMap<String, Value>> {
		self.metadata.as_ref().and_then(TypeMetadata::enum_entries)
	}

	/// Resolve a raw wire value to its display form.
	///
	/// Enum-tagged columns map the raw value to `"<type>.<KEY>"` by reverse
	/// lookup in the embedded entries; everything else passes through
	/// unchanged. `Undefined` also passes through, null is never an enum
	/// member. A raw value absent from the entries means the source
	/// contradicts its own metadata and fails the row.
	pub fn decode_value(&self, value: &Value) -> crate::Result<Value> {
		let Some(entries) = self.enum_entries() else {
			return Ok(value.clone());
		};
		if value.is_undefined() {
			return Ok(Value::Undefined);
		}
		// Wire metadata is transient per page; a linear scan over the
		// small entry map beats building an index per column.
		match entries.iter().find(|(_, entry)| *entry == value) {
			Some((key, _)) => Ok(Value::utf8(format!("{}.{}", self.r#type, key))),
			None => Err(ConsumeError::InconsistentRowMetadata {
				column: self.name.clone(),
				r#type: self.r#type.clone(),
				value: value.clone(),
			}
			.into()),
		}
	}
}
