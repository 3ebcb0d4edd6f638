use crate::log;

/// Where progress percentages go. Implementations must return quickly:
/// they are called synchronously from inside comparator invocations.
/// Returning `false` requests cancellation, which is advisory only: the
/// running sort completes and its outcome is merely flagged.
pub trait ProgressSink {
    fn report(&mut self, percent: u8) -> bool;
}

/// Sink that swallows every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&mut self, _percent: u8) -> bool {
        true
    }
}

/// Default and clamp range of the comparator-count factor. Empirical:
/// general-purpose sorts were observed to call their comparator roughly
/// `7.5 * n * log10(n)` times on random input, less on patterned input.
/// Best-effort estimates only; nothing correctness-bearing depends on
/// them.
pub const DEFAULT_FACTOR: f64 = 7.5;
const MIN_FACTOR: f64 = 4.0;
const SHRINK_RATE: f64 = 0.9;

/// Forward a report to the sink once per this many comparator calls, so
/// sampling cost stays amortized.
const REPORT_BATCH_MASK: u64 = 0xffff;

/// Predicts completion percentage for a comparison sort whose comparator
/// call count is unknown up front, and tunes its prediction factor from
/// one sort to the next. Owned by a `SortEngine`; `begin`/`tick`/`finish`
/// bracket each instrumented sort.
#[derive(Debug)]
pub struct ProgressEstimator {
    factor: f64,
    call_count: u64,
    predicted_calls: u64,
    window_base: u8,
    window_span: u8,
    cancel_requested: bool,
}

impl Default for ProgressEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressEstimator {
    pub fn new() -> Self {
        Self {
            factor: DEFAULT_FACTOR,
            call_count: 0,
            predicted_calls: 1,
            window_base: 0,
            window_span: 100,
            cancel_requested: false,
        }
    }

    /// Current adaptive factor (persisted across sorts).
    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel_requested
    }

    pub fn clear_cancel(&mut self) {
        self.cancel_requested = false;
    }

    pub(crate) fn flag_cancel(&mut self) {
        self.cancel_requested = true;
    }

    /// Arm the estimator for one sort of `n` elements. Reports are mapped
    /// into `[base, base + span]` so a multi-phase sort can hand each
    /// phase its own slice of the percentage range and keep the whole
    /// call monotonic.
    pub fn begin(&mut self, n: usize, base: u8, span: u8) {
        debug_assert!(base as u32 + span as u32 <= 100);
        self.call_count = 0;
        self.window_base = base;
        self.window_span = span;
        // Guard n <= 1: log10 would go to zero or negative territory and
        // the prediction must stay strictly positive.
        self.predicted_calls = if n <= 1 {
            1
        } else {
            let n = n as f64;
            (self.factor * n * n.log10()).max(1.0) as u64
        };
        log::debug(format!(
            "sort: n={n}, expected compares={}, factor={:.2}",
            self.predicted_calls, self.factor
        ));
    }

    /// Count one comparator call; every `REPORT_BATCH_MASK + 1`-th call
    /// forwards a clamped percentage to the sink.
    pub fn tick(&mut self, sink: &mut dyn ProgressSink) {
        self.call_count += 1;
        if (self.call_count & REPORT_BATCH_MASK) == 0 && !sink.report(self.percent()) {
            self.cancel_requested = true;
        }
    }

    /// Window-mapped percentage, never above the window end.
    pub fn percent(&self) -> u8 {
        let span = u64::from(self.window_span);
        let fraction = if self.call_count >= self.predicted_calls {
            span
        } else if self.predicted_calls > 1_000_000 {
            // Divide first so the multiply cannot overflow on huge lists.
            self.call_count / (self.predicted_calls / span.max(1))
        } else {
            self.call_count * span / self.predicted_calls
        };
        self.window_base + fraction.min(span) as u8
    }

    /// Adjust the factor from how the prediction held up, for the next
    /// sort on this engine. Overshoot of actual calls resets to the
    /// default; undershoot by more than 10% shrinks toward the floor.
    pub fn finish(&mut self) {
        log::debug(format!(
            "sort: expected compares={}, actual={}",
            self.predicted_calls, self.call_count
        ));
        let actual = self.call_count as f64 / self.predicted_calls as f64;
        if actual > 1.0 {
            self.factor = DEFAULT_FACTOR;
        } else if actual < SHRINK_RATE {
            self.factor *= SHRINK_RATE;
        }
        self.factor = self.factor.clamp(MIN_FACTOR, DEFAULT_FACTOR);
    }
}
