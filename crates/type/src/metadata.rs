// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Rowflow

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Per-column type metadata carried alongside query results.
///
/// This is a denormalized, serialization-friendly copy of the subset of a
/// type definition a client needs for display, not the authoritative
/// definition itself. The payload is tagged so further kinds can be added
/// without breaking the wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeMetadata {
	/// An enumerated domain type: symbolic key to underlying base value.
	///
	/// Uniqueness of keys and values is guaranteed by the authoritative
	/// definition; no ordering guarantee is required for correctness.
	Enum {
		entries: IndexMap<String, Value>,
	},
}

impl TypeMetadata {
	/// The embedded enum entries, when this metadata describes an enum.
	pub fn enum_entries(&self) -> Option<&IndexMap<String, Value>> {
		match self {
			TypeMetadata::Enum {
				entries,
			} => Some(entries),
		}
	}
}
