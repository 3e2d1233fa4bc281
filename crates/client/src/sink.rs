// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Rowflow

use crate::source::Row;

/// Receives decoded rows in batches.
///
/// `complete` marks the final batch of the stream. `on_finished` is called
/// exactly once, after the last batch, even when that batch was empty and
/// no `accept_batch` call preceded it.
pub trait BatchSink {
	fn accept_batch(&mut self, rows: &[Row], complete: bool) -> crate::Result<()>;

	fn on_finished(&mut self) -> crate::Result<()>;
}
