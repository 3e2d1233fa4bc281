// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Rowflow

use std::{
	sync::atomic::{AtomicBool, Ordering},
	time::{Duration, Instant},
};

use parking_lot::Mutex;
use rowflow_type::Value;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
	column::Column,
	sink::BatchSink,
	source::{PageSource, Row},
};

/// Buffering policy for the consumer.
///
/// Both thresholds are soft upper bounds checked at row-processing
/// granularity; there is no timer thread. The time check fires when a row
/// arrives or when the pull loop finishes a page, so worst-case flush
/// latency beyond `max_buffer_time` is one page-fetch round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
	/// Row-count threshold that triggers a flush.
	pub max_buffered_rows: usize,
	/// Elapsed time since the buffer's first row that triggers a flush.
	pub max_buffer_time: Duration,
}

impl Default for ConsumerConfig {
	fn default() -> Self {
		Self {
			max_buffered_rows: 10_000,
			max_buffer_time: Duration::from_secs(3),
		}
	}
}

struct Shared<S> {
	sink: S,
	buffer: Vec<Row>,
	buffer_start: Option<Instant>,
}

/// Drains a paginated result source into a sink, buffering rows and
/// decoding enum-typed columns to display form along the way.
///
/// Row append and flush are confined to whichever thread currently drives
/// the consumer; the mutex makes that contract explicit and lets `close`
/// race the drive loop from another thread. The closed flag is
/// single-writer-wins, so the final flush plus terminal notification
/// executes exactly once no matter which path gets there first.
pub struct OutputConsumer<S: BatchSink> {
	shared: Mutex<Shared<S>>,
	closed: AtomicBool,
	config: ConsumerConfig,
}

impl<S: BatchSink> OutputConsumer<S> {
	pub fn new(sink: S) -> Self {
		Self::with_config(sink, ConsumerConfig::default())
	}

	pub fn with_config(sink: S, config: ConsumerConfig) -> Self {
		Self {
			shared: Mutex::new(Shared {
				sink,
				buffer: Vec::with_capacity(config.max_buffered_rows),
				buffer_start: None,
			}),
			closed: AtomicBool::new(false),
			config,
		}
	}

	/// Decode one row against its column descriptors and append it to the
	/// buffer, flushing (non-final) when the row-count threshold is hit.
	///
	/// A decode failure aborts the row before anything is buffered; the
	/// buffer never exceeds `max_buffered_rows` at any observable point.
	pub fn process_row(&self, row: &[Value], columns: &[Column]) -> crate::Result<()> {
		let mut processed = Vec::with_capacity(row.len());
		for (index, value) in row.iter().enumerate() {
			match columns.get(index) {
				Some(column) => processed.push(column.decode_value(value)?),
				// value without a positional column passes through
				None => processed.push(value.clone()),
			}
		}

		let mut shared = self.shared.lock();
		if shared.buffer.is_empty() {
			shared.buffer_start = Some(Instant::now());
		}
		shared.buffer.push(processed);
		if shared.buffer.len() >= self.config.max_buffered_rows {
			self.flush(&mut shared, false)?;
		}
		Ok(())
	}

	/// Drive the pull loop until the source stops running.
	///
	/// Decode failures abort the loop; buffered-but-unflushed rows are left
	/// for the caller's recovery policy. The source owns failure
	/// propagation, a failed source simply reports not-running.
	pub fn process_rows<P: PageSource>(&self, source: &mut P) -> crate::Result<()> {
		while source.is_running() {
			if let Some(page) = source.current_page() {
				for row in &page.rows {
					self.process_row(row, &page.columns)?;
				}
			}
			self.flush_if_stale()?;
			source.advance();
		}
		Ok(())
	}

	/// Flush any buffered rows as the final batch and notify the sink that
	/// no further batches will arrive.
	///
	/// Idempotent: only the first call performs work, whether it comes
	/// from loop completion, an external cancellation path, or drop.
	pub fn close(&self) -> crate::Result<()> {
		if self
			.closed
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_err()
		{
			return Ok(());
		}
		let mut shared = self.shared.lock();
		self.flush(&mut shared, true)?;
		debug!("consumer closed");
		shared.sink.on_finished()
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::Acquire)
	}

	fn flush_if_stale(&self) -> crate::Result<()> {
		let mut shared = self.shared.lock();
		if let Some(start) = shared.buffer_start {
			if start.elapsed() >= self.config.max_buffer_time {
				self.flush(&mut shared, false)?;
			}
		}
		Ok(())
	}

	fn flush(&self, shared: &mut Shared<S>, complete: bool) -> crate::Result<()> {
		if shared.buffer.is_empty() {
			// the close path signals completion via on_finished, not
			// an empty batch
			return Ok(());
		}
		debug!(rows = shared.buffer.len(), complete, "flushing buffered rows");
		let Shared {
			sink,
			buffer,
			buffer_start,
		} = shared;
		sink.accept_batch(buffer, complete)?;
		buffer.clear();
		*buffer_start = None;
		Ok(())
	}
}

impl<S: BatchSink> Drop for OutputConsumer<S> {
	fn drop(&mut self) {
		let _ = self.close();
	}
}

#[cfg(test)]
mod tests {
	use std::{collections::VecDeque, sync::Arc};

	use indexmap::IndexMap;
	use rowflow_type::{EnumType, IntegerEnum};

	use super::*;
	use crate::source::QueryPage;

	#[derive(Clone, Default)]
	struct RecordingSink {
		state: Arc<Mutex<SinkState>>,
	}

	#[derive(Default)]
	struct SinkState {
		batches: Vec<(Vec<Row>, bool)>,
		finished: usize,
	}

	impl RecordingSink {
		fn batches(&self) -> Vec<(Vec<Row>, bool)> {
			self.state.lock().batches.clone()
		}

		fn finished(&self) -> usize {
			self.state.lock().finished
		}
	}

	impl BatchSink for RecordingSink {
		fn accept_batch(&mut self, rows: &[Row], complete: bool) -> crate::Result<()> {
			self.state.lock().batches.push((rows.to_vec(), complete));
			Ok(())
		}

		fn on_finished(&mut self) -> crate::Result<()> {
			self.state.lock().finished += 1;
			Ok(())
		}
	}

	struct PagedSource {
		pages: VecDeque<QueryPage>,
		current: Option<QueryPage>,
		running: bool,
	}

	impl PagedSource {
		fn new(pages: Vec<QueryPage>) -> Self {
			let mut pages: VecDeque<_> = pages.into();
			let current = pages.pop_front();
			Self {
				running: current.is_some(),
				current,
				pages,
			}
		}
	}

	impl PageSource for PagedSource {
		fn is_running(&self) -> bool {
			self.running
		}

		fn current_page(&self) -> Option<&QueryPage> {
			self.current.as_ref()
		}

		fn advance(&mut self) {
			self.current = self.pages.pop_front();
			if self.current.is_none() {
				self.running = false;
			}
		}
	}

	fn mood_column() -> Column {
		let mood = EnumType::Integer(
			IntegerEnum::new(
				"Mood",
				IndexMap::from([("HAPPY".to_string(), 0i64), ("SAD".to_string(), 1i64)]),
			)
			.unwrap(),
		);
		Column::enumeration("mood", &mood)
	}

	fn id_row(n: i64) -> Row {
		vec![Value::int8(n)]
	}

	fn small_config(max_buffered_rows: usize) -> ConsumerConfig {
		ConsumerConfig {
			max_buffered_rows,
			max_buffer_time: Duration::from_secs(3600),
		}
	}

	#[test]
	fn test_flushes_at_row_threshold() {
		let sink = RecordingSink::default();
		let consumer = OutputConsumer::with_config(sink.clone(), small_config(3));
		let columns = vec![Column::new("id", "bigint")];

		for n in 0..7 {
			consumer.process_row(&id_row(n), &columns).unwrap();
		}

		// automatic flushes after the 3rd and 6th row, one row left over
		let batches = sink.batches();
		assert_eq!(batches.len(), 2);
		assert_eq!(batches[0].0.len(), 3);
		assert_eq!(batches[1].0.len(), 3);
		assert!(!batches[0].1);
		assert!(!batches[1].1);

		consumer.close().unwrap();
		let batches = sink.batches();
		assert_eq!(batches.len(), 3);
		assert_eq!(batches[2].0.len(), 1);
		assert!(batches[2].1);
		assert_eq!(sink.finished(), 1);
	}

	#[test]
	fn test_buffer_never_exceeds_threshold() {
		let sink = RecordingSink::default();
		let consumer = OutputConsumer::with_config(sink.clone(), small_config(4));
		let columns = vec![Column::new("id", "bigint")];

		for n in 0..10 {
			consumer.process_row(&id_row(n), &columns).unwrap();
		}
		consumer.close().unwrap();

		for (rows, _) in sink.batches() {
			assert!(rows.len() <= 4);
		}
	}

	#[test]
	fn test_enum_column_decoded_to_display_form() {
		let sink = RecordingSink::default();
		let consumer = OutputConsumer::new(sink.clone());
		let columns = vec![mood_column()];

		consumer.process_row(&[Value::int8(1i64)], &columns).unwrap();
		consumer.close().unwrap();

		let batches = sink.batches();
		assert_eq!(batches.len(), 1);
		assert_eq!(batches[0].0, vec![vec![Value::utf8("Mood.SAD")]]);
		assert!(batches[0].1);
	}

	#[test]
	fn test_undefined_enum_value_passes_through() {
		let sink = RecordingSink::default();
		let consumer = OutputConsumer::new(sink.clone());

		consumer.process_row(&[Value::Undefined], &[mood_column()]).unwrap();
		consumer.close().unwrap();

		assert_eq!(sink.batches()[0].0, vec![vec![Value::Undefined]]);
	}

	#[test]
	fn test_inconsistent_enum_value_fails_row() {
		let sink = RecordingSink::default();
		let consumer = OutputConsumer::new(sink.clone());

		let err = consumer.process_row(&[Value::int8(7i64)], &[mood_column()]).unwrap_err();
		assert_eq!(err.code(), "CONSUME_001");

		// nothing was buffered for the failed row
		consumer.close().unwrap();
		assert!(sink.batches().is_empty());
		assert_eq!(sink.finished(), 1);
	}

	#[test]
	fn test_row_wider_than_columns_passes_extra_values() {
		let sink = RecordingSink::default();
		let consumer = OutputConsumer::new(sink.clone());

		consumer
			.process_row(&[Value::int8(1i64), Value::int8(9i64)], &[mood_column()])
			.unwrap();
		consumer.close().unwrap();

		assert_eq!(
			sink.batches()[0].0,
			vec![vec![Value::utf8("Mood.SAD"), Value::int8(9i64)]]
		);
	}

	#[test]
	fn test_process_rows_drains_all_pages() {
		let sink = RecordingSink::default();
		let consumer = OutputConsumer::with_config(sink.clone(), small_config(10));
		let columns = vec![Column::new("id", "bigint")];
		let mut source = PagedSource::new(vec![
			QueryPage {
				columns: columns.clone(),
				rows: vec![id_row(1), id_row(2)],
			},
			QueryPage {
				columns: columns.clone(),
				rows: vec![id_row(3), id_row(4)],
			},
		]);

		consumer.process_rows(&mut source).unwrap();
		consumer.close().unwrap();

		let batches = sink.batches();
		assert_eq!(batches.len(), 1);
		assert_eq!(batches[0].0.len(), 4);
		assert!(batches[0].1);
		assert_eq!(sink.finished(), 1);
	}

	#[test]
	fn test_elapsed_time_flushes_at_page_boundary() {
		let sink = RecordingSink::default();
		let config = ConsumerConfig {
			max_buffered_rows: 100,
			max_buffer_time: Duration::ZERO,
		};
		let consumer = OutputConsumer::with_config(sink.clone(), config);
		let columns = vec![Column::new("id", "bigint")];
		let mut source = PagedSource::new(vec![QueryPage {
			columns,
			rows: vec![id_row(1), id_row(2)],
		}]);

		consumer.process_rows(&mut source).unwrap();

		// flushed non-final at the page boundary, before close
		let batches = sink.batches();
		assert_eq!(batches.len(), 1);
		assert_eq!(batches[0].0.len(), 2);
		assert!(!batches[0].1);
	}

	#[test]
	fn test_close_is_idempotent() {
		let sink = RecordingSink::default();
		let consumer = OutputConsumer::with_config(sink.clone(), small_config(10));

		consumer.process_row(&id_row(1), &[Column::new("id", "bigint")]).unwrap();
		consumer.close().unwrap();
		consumer.close().unwrap();

		assert_eq!(sink.batches().len(), 1);
		assert_eq!(sink.finished(), 1);
		assert!(consumer.is_closed());
	}

	#[test]
	fn test_empty_source_still_signals_completion() {
		let sink = RecordingSink::default();
		let consumer = OutputConsumer::new(sink.clone());
		let mut source = PagedSource::new(vec![]);

		assert!(!source.is_running());
		consumer.process_rows(&mut source).unwrap();
		consumer.close().unwrap();

		assert!(sink.batches().is_empty());
		assert_eq!(sink.finished(), 1);
	}

	#[test]
	fn test_drop_closes_once() {
		let sink = RecordingSink::default();
		{
			let consumer = OutputConsumer::with_config(sink.clone(), small_config(10));
			consumer.process_row(&id_row(1), &[Column::new("id", "bigint")]).unwrap();
		}
		assert_eq!(sink.batches().len(), 1);
		assert!(sink.batches()[0].1);
		assert_eq!(sink.finished(), 1);
	}

	#[test]
	fn test_close_after_loop_is_a_no_op_when_loop_closed() {
		let sink = RecordingSink::default();
		let consumer = OutputConsumer::with_config(sink.clone(), small_config(10));

		consumer.process_row(&id_row(1), &[Column::new("id", "bigint")]).unwrap();
		// external cancellation path wins the closed flag
		consumer.close().unwrap();
		// normal completion path afterwards must not flush again
		consumer.close().unwrap();

		assert_eq!(sink.finished(), 1);
		assert_eq!(sink.batches().len(), 1);
	}
}
