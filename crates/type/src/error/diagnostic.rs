// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Rowflow

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// A structured, user-facing description of a failure.
///
/// Diagnostics carry a stable string code so callers (and tests) can match
/// on the failure kind without parsing the message. They are serializable
/// because a remote engine may hand them over the wire as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
	/// Stable identifier of the failure kind, e.g. `CAST_001`.
	pub code: String,
	/// Human-readable description including the offending input.
	pub message: String,
	/// Short category label, e.g. "invalid cast argument".
	pub label: Option<String>,
	/// Suggestion for resolving the failure.
	pub help: Option<String>,
	/// Additional background, one note per line.
	pub notes: Vec<String>,
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.code, self.message)
	}
}
