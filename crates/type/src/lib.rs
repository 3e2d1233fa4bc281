// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Rowflow

//! Shared value and enum-type model for rowflow clients.
//!
//! This crate carries the leaf pieces of the result-consumption pipeline:
//! the wire [`Value`] representation, authoritative enum type definitions
//! with their validated casts, the denormalized [`TypeMetadata`] payload
//! that travels alongside query results, and the diagnostic-based error
//! machinery shared by every crate in the workspace.

pub mod error;

mod enumeration;
mod metadata;
mod value;

pub use enumeration::{CastError, EnumDefError, EnumRegistry, EnumType, IntegerEnum, StringEnum};
pub use error::{Diagnostic, Error, IntoDiagnostic, Result};
pub use metadata::TypeMetadata;
pub use value::Value;
