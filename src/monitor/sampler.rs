//! Per-node sampler: one observation window, one summary.
//!
//! ```text
//! Uninitialized ──first report_input──► Observing ──elapsed > window──► Closed
//! ```
//!
//! The window opens on the first input and is checked on every input and
//! output event. The first check that finds more than [`OBSERVATION_WINDOW`]
//! elapsed computes rates and selectivity, emits the summary through the sink
//! if the node carries an `id`, and moves to `Closed` for good. A sampler is
//! driven from its node's own thread; wrap it in
//! [`SharedSampler`](crate::monitor::SharedSampler) if callbacks arrive from
//! several threads.

use crate::clock::{Clock, MonotonicClock};
use crate::config::JobConfig;
use crate::error::{MonitorError, Result};
use crate::monitor::selectivity::Selectivity;
use crate::monitor::summary::ObservationSummary;
use crate::pipeline::{shape_of, MonitoredNode, NodeKind, ScalarValue, TupleShape, WindowState};
use crate::sink::{self, ObservationSink, SinkMode};
use std::sync::Arc;
use std::time::Duration;

/// Length of a sampler's observation window, measured from its first input.
pub const OBSERVATION_WINDOW: Duration = Duration::from_secs(30);

const NANOS_PER_SEC: f64 = 1e9;

/// Creates the sink once the job configuration is known. Called again on
/// the next input if it fails.
pub type SinkOpener =
    Box<dyn FnMut(&JobConfig) -> Result<Box<dyn ObservationSink>> + Send + 'static>;

/// Lifecycle of a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// No input seen yet.
    Uninitialized,
    /// Window open since the first input.
    Observing,
    /// Window closed and summary handled. Terminal.
    Closed,
}

/// Runtime sampler attached to one pipeline node.
pub struct Sampler {
    summary: ObservationSummary,
    selectivity: Selectivity,
    state: SamplerState,
    start_nanos: u64,
    input_count: u64,
    output_count: u64,
    disabled: bool,
    sink_mode: Option<SinkMode>,
    sink: Option<Box<dyn ObservationSink>>,
    opener: Option<SinkOpener>,
    clock: Arc<dyn Clock>,
}

impl Sampler {
    /// Create a sampler for `node` with an empty description.
    pub fn new<N: MonitoredNode + ?Sized>(node: &N) -> Self {
        Self::with_description(node, Vec::<(String, ScalarValue)>::new())
    }

    /// Create a sampler for `node`, seeding the description (normally with
    /// at least an `id`).
    pub fn with_description<N, I, K>(node: &N, description: I) -> Self
    where
        N: MonitoredNode + ?Sized,
        I: IntoIterator<Item = (K, ScalarValue)>,
        K: Into<String>,
    {
        let kind = node.capabilities().kind();
        Self {
            summary: ObservationSummary::new(description, kind),
            selectivity: Selectivity::for_kind(kind),
            state: SamplerState::Uninitialized,
            start_nanos: 0,
            input_count: 0,
            output_count: 0,
            disabled: false,
            sink_mode: None,
            sink: None,
            opener: None,
            clock: Arc::new(MonotonicClock),
        }
    }

    /// Use `clock` instead of the process monotonic clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Open the sink with `opener` instead of [`sink::open_sink`]. The job
    /// configuration is still validated before the opener runs.
    pub fn with_sink_opener<F>(mut self, opener: F) -> Self
    where
        F: FnMut(&JobConfig) -> Result<Box<dyn ObservationSink>> + Send + 'static,
    {
        self.opener = Some(Box::new(opener));
        self
    }

    // ==================== Host callbacks ====================

    /// Record one input tuple. The first call opens the window.
    pub fn report_input<T: TupleShape + ?Sized>(
        &mut self,
        value: &T,
        config: &JobConfig,
    ) -> Result<()> {
        if self.disabled {
            return Ok(());
        }
        if self.state == SamplerState::Uninitialized {
            self.initialize(value, config)?;
        }
        self.input_count += 1;
        self.check_window()
    }

    /// Record one output tuple. Only the latest output's width is kept.
    ///
    /// Outputs seen before the first input are ignored.
    pub fn report_output<T: TupleShape + ?Sized>(&mut self, value: &T) -> Result<()> {
        if self.disabled || self.state == SamplerState::Uninitialized {
            return Ok(());
        }
        self.summary.tuple_width_out = shape_of(value);
        self.output_count += 1;
        self.check_window()
    }

    /// Record the cardinalities of one join. Joins with an empty side are
    /// skipped, as are reports to samplers of non-join nodes.
    pub fn report_join_selectivity(&mut self, left: u64, right: u64, matched: u64) {
        if self.disabled {
            return;
        }
        self.selectivity.record_join(left, right, matched);
    }

    /// Record the size of one materialized window.
    ///
    /// Fails with [`MonitorError::InvalidWindowState`] when `state` is
    /// neither a scalar nor a collection, whatever the node kind.
    pub fn report_window_length<S: WindowState + ?Sized>(&mut self, state: &S) -> Result<()> {
        if self.disabled {
            return Ok(());
        }
        let len = state.materialized_len()?;
        self.selectivity.record_window_length(len);
        Ok(())
    }

    // ==================== Lifecycle ====================

    fn initialize<T: TupleShape + ?Sized>(&mut self, value: &T, config: &JobConfig) -> Result<()> {
        let mode = config.resolve_sink_mode()?;
        let sink = match self.opener.as_mut() {
            Some(open) => open(config)?,
            None => sink::open_sink(config)?,
        };
        self.opener = None;

        tracing::debug!(
            kind = %self.selectivity.kind(),
            mode = %mode,
            sink = sink.name(),
            "sampler observing",
        );

        self.sink = Some(sink);
        self.sink_mode = Some(mode);
        self.start_nanos = self.clock.now_nanos();
        self.summary.tuple_width_in = shape_of(value);
        self.summary.tuple_width_out = -1;
        self.state = SamplerState::Observing;
        Ok(())
    }

    fn check_window(&mut self) -> Result<()> {
        if self.state != SamplerState::Observing {
            return Ok(());
        }
        let elapsed = self.clock.now_nanos().saturating_sub(self.start_nanos);
        if u128::from(elapsed) <= OBSERVATION_WINDOW.as_nanos() {
            return Ok(());
        }
        self.state = SamplerState::Closed;
        self.close(elapsed)
    }

    fn close(&mut self, elapsed_nanos: u64) -> Result<()> {
        let elapsed = elapsed_nanos as f64;
        self.summary.output_rate = Some(self.output_count as f64 * NANOS_PER_SEC / elapsed);
        self.summary.input_rate = Some(self.input_count as f64 * NANOS_PER_SEC / elapsed);
        if let Some(selectivity) = self
            .selectivity
            .compute(self.input_count, self.output_count)
        {
            self.summary.real_selectivity = Some(selectivity);
        }

        tracing::debug!(
            inputs = self.input_count,
            outputs = self.output_count,
            elapsed_ms = elapsed_nanos / 1_000_000,
            "observation window closed",
        );

        let Some(id) = self.summary.id() else {
            tracing::trace!("sampler has no id, discarding summary");
            return Ok(());
        };
        let context = format!("Failed to emit observation for node {}", id);

        let sink = self
            .sink
            .as_mut()
            .ok_or_else(|| MonitorError::Sink("sink was never opened".to_string()))?;
        sink.emit(&self.summary).map_err(|e| e.with_context(context))
    }

    // ==================== Accessors ====================

    /// Stop (or resume) reacting to host callbacks.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    /// Whether the first input has opened the window.
    pub fn is_initialized(&self) -> bool {
        self.state != SamplerState::Uninitialized
    }

    /// Whether the window has closed.
    pub fn observation_made(&self) -> bool {
        self.state == SamplerState::Closed
    }

    pub fn node_kind(&self) -> NodeKind {
        self.selectivity.kind()
    }

    /// Resolved on the first input.
    pub fn sink_mode(&self) -> Option<SinkMode> {
        self.sink_mode
    }

    pub fn input_count(&self) -> u64 {
        self.input_count
    }

    pub fn output_count(&self) -> u64 {
        self.output_count
    }

    pub fn join_selectivities(&self) -> &[f64] {
        self.selectivity.join_selectivities()
    }

    pub fn window_lengths(&self) -> &[u64] {
        self.selectivity.window_lengths()
    }

    /// The description as it stands. Rates and the final selectivity are
    /// filled in once the window closes.
    pub fn summary(&self) -> &ObservationSummary {
        &self.summary
    }
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler")
            .field("kind", &self.selectivity.kind())
            .field("state", &self.state)
            .field("input_count", &self.input_count)
            .field("output_count", &self.output_count)
            .field("disabled", &self.disabled)
            .field("sink_mode", &self.sink_mode)
            .finish()
    }
}
