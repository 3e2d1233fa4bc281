// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Rowflow

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

mod diagnostic;

pub use diagnostic::Diagnostic;

/// Conversion of a typed error into its user-facing [`Diagnostic`] form.
pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}

/// The error type shared across the workspace: a [`Diagnostic`] wrapper.
///
/// All failures in this system are semantic, none are retryable, so a
/// single diagnostic-carrying error suffices; the code distinguishes the
/// failure kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Error(pub Diagnostic);

impl Error {
	pub fn diagnostic(&self) -> &Diagnostic {
		&self.0
	}

	pub fn code(&self) -> &str {
		&self.0.code
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
