// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Rowflow

//! Buffered streaming consumer for paginated query results.
//!
//! Drains a pull-based, paginated result source into a sink, decoding
//! enum-typed columns to display form along the way and amortizing sink
//! invocations through a dual time/size buffering policy. The remote fetch
//! protocol and the concrete sink stay behind the [`PageSource`] and
//! [`BatchSink`] seams.

mod column;
mod consumer;
mod error;
mod sink;
mod source;

pub use column::Column;
pub use consumer::{ConsumerConfig, OutputConsumer};
pub use error::ConsumeError;
pub use rowflow_type::{Diagnostic, Error, IntoDiagnostic, Result, TypeMetadata, Value};
pub use sink::BatchSink;
pub use source::{PageSource, QueryPage, Row};
