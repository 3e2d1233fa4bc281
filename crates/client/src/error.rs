// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Rowflow

use rowflow_type::{Diagnostic, Error, IntoDiagnostic, Value};

/// Failure while decoding a row against its own column metadata.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConsumeError {
	/// The source sent a row value that is absent from its own column's
	/// enum entries. This flags protocol or data corruption upstream;
	/// emitting the raw value as if it were valid would silently corrupt
	/// results, so row processing aborts instead.
	#[error("value '{value}' is not declared in the enum entries of column '{column}'")]
	InconsistentRowMetadata {
		column: String,
		r#type: String,
		value: Value,
	},
}

impl IntoDiagnostic for ConsumeError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			ConsumeError::InconsistentRowMetadata {
				column,
				r#type,
				value,
			} => Diagnostic {
				code: "CONSUME_001".to_string(),
				message: format!(
					"value '{}' is not declared in the enum entries of column '{}' (type '{}')",
					value, column, r#type
				),
				label: Some("inconsistent row metadata".to_string()),
				help: Some(
					"the row value and the column's declared enum entries disagree; the result stream is corrupt or the enum definition drifted"
						.to_string(),
				),
				notes: vec![],
			},
		}
	}
}

impl From<ConsumeError> for Error {
	fn from(err: ConsumeError) -> Self {
		Error(err.into_diagnostic())
	}
}
