// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Rowflow

use rowflow_type::Value;
use serde::{Deserialize, Serialize};

use crate::column::Column;

/// One result row: raw wire values before decode, display values after.
pub type Row = Vec<Value>;

/// A single page of a streamed result set, rows paired positionally with
/// their column descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPage {
	pub columns: Vec<Column>,
	pub rows: Vec<Row>,
}

/// Pull-based access to the remote, paginated result stream.
///
/// `advance` may block awaiting network I/O. A source that is exhausted or
/// has failed reports not-running; failure propagation stays on the source
/// side, the consumer only stops pulling.
pub trait PageSource {
	fn is_running(&self) -> bool;

	fn current_page(&self) -> Option<&QueryPage>;

	fn advance(&mut self);
}
