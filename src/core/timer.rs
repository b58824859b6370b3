// src/core/timer.rs

//! # Scoped Timer
//!
//! `ScopedTimer` measures wall-clock time for a block of code or for every call of a
//! decorated closure. It implements `Scope` itself, so the same instance can be used
//! as a guard (`timer.scope()`), around a closure (`timer.call(..)`), or as a
//! decorator (`timer.decorate(..)`).
//!
//! ```ignore
//! let timer = ScopedTimer::new("load index").with_precision(3)?;
//! {
//!     let _scope = timer.scope();
//!     load_index()?;
//! } // prints "[PERF ] execution time for codeblock 'load index': 0.012s"
//! let seconds = timer.get_time_taken(true)?;
//! ```

use crate::{
    constants::{DEFAULT_PRECISION, PERF_REPORT_PREFIX},
    core::scope::{Disposition, ExitOutcome, Scope, ScopeAdapter, ScopeGuard},
    models::TimerSettings,
};
use std::{
    cell::{Cell, RefCell},
    fmt,
    io::{self, Write},
    str::FromStr,
    time::{Duration, Instant},
};
use thiserror::Error;

/// Errors raised by `ScopedTimer` construction and reads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A precision below -1, or an unknown reading selector.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// A result was read before any scope completed.
    #[error("No measurement available: the timer has not completed a scope yet.")]
    NotYetMeasured,
}

// --- Precision ---

/// How many fractional digits the formatted elapsed time carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// No rounding: the shortest decimal that round-trips to the measured `f64`.
    Full,
    /// Fixed-point with exactly this many fractional digits.
    Digits(usize),
}

impl Precision {
    /// Formats `seconds` according to this precision.
    pub fn format(self, seconds: f64) -> String {
        match self {
            Self::Full => seconds.to_string(),
            Self::Digits(digits) => format!("{:.*}", digits, seconds),
        }
    }

    /// The integer form used in configuration: `-1` for `Full`.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Full => -1,
            Self::Digits(digits) => i32::try_from(digits).unwrap_or(i32::MAX),
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::Digits(DEFAULT_PRECISION)
    }
}

impl TryFrom<i32> for Precision {
    type Error = TimerError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Full),
            v if v >= 0 => usize::try_from(v)
                .map(Self::Digits)
                .map_err(|e| TimerError::InvalidArgument(e.to_string())),
            v => Err(TimerError::InvalidArgument(format!(
                "precision must be -1 or a non-negative integer, got {}",
                v
            ))),
        }
    }
}

// --- Reading selector ---

/// Which form of the last measurement to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reading {
    /// The figure parsed back from the precision-formatted string.
    #[default]
    Rounded,
    /// The unrounded measurement.
    Raw,
}

impl From<bool> for Reading {
    fn from(with_precision: bool) -> Self {
        if with_precision { Self::Rounded } else { Self::Raw }
    }
}

impl FromStr for Reading {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rounded" | "true" => Ok(Self::Rounded),
            "raw" | "false" => Ok(Self::Raw),
            other => Err(TimerError::InvalidArgument(format!(
                "unknown reading selector '{}' (expected 'rounded' or 'raw')",
                other
            ))),
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rounded => f.write_str("rounded"),
            Self::Raw => f.write_str("raw"),
        }
    }
}

// --- Timer ---

/// Lifecycle state of a `ScopedTimer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Never entered.
    Idle,
    /// Inside a scope.
    Running,
    /// At least one scope has completed and no new one is open.
    Measured,
}

#[derive(Debug, Clone)]
struct Measurement {
    elapsed: Duration,
    formatted: String,
}

/// A dual-mode timer: a scope around a block, or a decorator around a closure.
///
/// Each enter/exit cycle overwrites the previous measurement. The timer keeps its
/// state in `Cell`s, so it is not `Sync`; give each thread its own instance.
#[derive(Debug)]
pub struct ScopedTimer {
    label: String,
    precision: Precision,
    should_print: bool,
    start: Cell<Option<Instant>>,
    measurement: RefCell<Option<Measurement>>,
}

impl ScopedTimer {
    /// Creates a timer with the default precision (6 digits) that prints on exit.
    ///
    /// An empty `description` leaves the report line unlabeled.
    pub fn new(description: impl AsRef<str>) -> Self {
        let description = description.as_ref();
        let label = if description.is_empty() {
            String::new()
        } else {
            format!("for codeblock '{}'", description)
        };
        Self {
            label,
            precision: Precision::default(),
            should_print: true,
            start: Cell::new(None),
            measurement: RefCell::new(None),
        }
    }

    /// Creates a timer using the precision and print flag from `settings`.
    pub fn from_settings(
        description: impl AsRef<str>,
        settings: &TimerSettings,
    ) -> Result<Self, TimerError> {
        Ok(Self::new(description)
            .with_precision(settings.precision)?
            .with_print(settings.print))
    }

    /// Sets the formatting precision. `-1` disables rounding.
    ///
    /// # Errors
    /// Returns `TimerError::InvalidArgument` if `precision < -1`.
    pub fn with_precision(mut self, precision: i32) -> Result<Self, TimerError> {
        self.precision = Precision::try_from(precision)?;
        Ok(self)
    }

    /// Controls whether a report line is printed to stdout on every scope exit.
    pub fn with_print(mut self, should_print: bool) -> Self {
        self.should_print = should_print;
        self
    }

    /// The derived label (`"for codeblock '<description>'"`), or an empty string.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The configured formatting precision.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Whether a report line is printed on exit.
    pub fn should_print(&self) -> bool {
        self.should_print
    }

    /// Where the timer is in its `Idle -> Running -> Measured` cycle.
    pub fn state(&self) -> TimerState {
        if self.start.get().is_some() {
            TimerState::Running
        } else if self.measurement.borrow().is_some() {
            TimerState::Measured
        } else {
            TimerState::Idle
        }
    }

    // --- Scoped usage ---

    /// Starts timing; the measurement is taken when the guard is dropped.
    pub fn scope(&self) -> ScopeGuard<'_, Self> {
        ScopeGuard::enter(self)
    }

    /// Times a single call of `f` and returns its result unchanged.
    pub fn call<R>(&self, f: impl FnOnce() -> R) -> R {
        ScopeAdapter::new(self).call(f)
    }

    /// Times a fallible `f`. The error, if any, is returned untouched after the
    /// measurement has been recorded and reported.
    pub fn try_call<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: fmt::Display,
    {
        self.enter();
        let on_unwind = scopeguard::guard_on_unwind(self, |timer| {
            let _ = timer.exit(ExitOutcome::Unwinding);
        });
        let result = f();
        scopeguard::ScopeGuard::into_inner(on_unwind);

        let outcome: ExitOutcome<'_> = match &result {
            Ok(_) => ExitOutcome::Completed,
            Err(err) => ExitOutcome::Failed(err),
        };
        let _ = self.exit(outcome);
        result
    }

    /// Wraps `f` so that every call is timed by this instance.
    ///
    /// Only the most recent call's measurement is kept.
    pub fn decorate<'s, A, R, F>(&'s self, mut f: F) -> impl FnMut(A) -> R + 's
    where
        F: FnMut(A) -> R + 's,
    {
        let adapter = ScopeAdapter::new(self);
        move |args| adapter.call(|| f(args))
    }

    /// Wraps a fallible `f` so that every call is timed by this instance.
    ///
    /// Errors are reported to the timer as failures and returned unchanged.
    pub fn try_decorate<'s, A, T, E, F>(
        &'s self,
        mut f: F,
    ) -> impl FnMut(A) -> Result<T, E> + 's
    where
        F: FnMut(A) -> Result<T, E> + 's,
        E: fmt::Display,
    {
        move |args| self.try_call(|| f(args))
    }

    // --- Results ---

    /// Returns the elapsed seconds of the last completed scope.
    ///
    /// With `with_precision` the figure is parsed back from the formatted string,
    /// so it carries the configured rounding.
    ///
    /// # Errors
    /// Returns `TimerError::NotYetMeasured` before the first completed scope.
    pub fn get_time_taken(&self, with_precision: bool) -> Result<f64, TimerError> {
        self.reading(Reading::from(with_precision))
    }

    /// Same as `get_time_taken`, with an explicit selector.
    pub fn reading(&self, reading: Reading) -> Result<f64, TimerError> {
        let measurement = self.measurement.borrow();
        let measurement = measurement.as_ref().ok_or(TimerError::NotYetMeasured)?;
        match reading {
            Reading::Raw => Ok(measurement.elapsed.as_secs_f64()),
            Reading::Rounded => measurement.formatted.parse::<f64>().map_err(|e| {
                TimerError::InvalidArgument(format!(
                    "formatted value '{}' is not a number: {}",
                    measurement.formatted, e
                ))
            }),
        }
    }

    /// The raw duration of the last completed scope.
    pub fn elapsed(&self) -> Result<Duration, TimerError> {
        self.measurement
            .borrow()
            .as_ref()
            .map(|m| m.elapsed)
            .ok_or(TimerError::NotYetMeasured)
    }

    /// The precision-formatted elapsed seconds of the last completed scope.
    pub fn formatted_elapsed(&self) -> Result<String, TimerError> {
        self.measurement
            .borrow()
            .as_ref()
            .map(|m| m.formatted.clone())
            .ok_or(TimerError::NotYetMeasured)
    }

    /// The line printed on exit: `[PERF ] execution time <label>: <value>s`.
    pub fn report_line(&self) -> Result<String, TimerError> {
        let formatted = self.formatted_elapsed()?;
        Ok(format!(
            "{} execution time {}: {}s",
            PERF_REPORT_PREFIX, self.label, formatted
        ))
    }
}

impl Default for ScopedTimer {
    fn default() -> Self {
        Self::new("")
    }
}

impl Scope for ScopedTimer {
    fn enter(&self) {
        log::debug!("Timer started {}", self.label);
        self.start.set(Some(Instant::now()));
    }

    fn exit(&self, outcome: ExitOutcome<'_>) -> Disposition {
        self.exit_into(outcome, &mut io::stdout().lock())
    }
}

impl ScopedTimer {
    /// Records the measurement and writes the report line to `out` when printing is on.
    fn exit_into<W: Write>(&self, outcome: ExitOutcome<'_>, out: &mut W) -> Disposition {
        let now = Instant::now();
        let Some(start) = self.start.take() else {
            log::warn!("Timer exited without a matching enter; ignoring.");
            return Disposition::Propagate;
        };
        let elapsed = now.saturating_duration_since(start);
        let formatted = self.precision.format(elapsed.as_secs_f64());

        if outcome.is_failure() {
            log::debug!("Timed scope {} ended with {:?}", self.label, outcome);
        }
        *self.measurement.borrow_mut() = Some(Measurement { elapsed, formatted });

        if self.should_print {
            if let Ok(line) = self.report_line() {
                if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
                    log::warn!("Could not write timer report: {}", e);
                }
            }
        }
        Disposition::Propagate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const SLACK: f64 = 0.5;

    fn silent(precision: i32) -> ScopedTimer {
        ScopedTimer::new("test").with_precision(precision).unwrap().with_print(false)
    }

    #[test]
    fn test_label_derivation() {
        assert_eq!(ScopedTimer::new("load").label(), "for codeblock 'load'");
        assert_eq!(ScopedTimer::new("").label(), "");
    }

    #[test]
    fn test_precision_below_minus_one_is_rejected() {
        let err = ScopedTimer::new("x").with_precision(-2).unwrap_err();
        assert!(matches!(err, TimerError::InvalidArgument(_)));
    }

    #[test]
    fn test_precision_conversion() {
        assert_eq!(Precision::try_from(-1), Ok(Precision::Full));
        assert_eq!(Precision::try_from(0), Ok(Precision::Digits(0)));
        assert_eq!(Precision::try_from(15), Ok(Precision::Digits(15)));
        assert_eq!(Precision::Full.as_i32(), -1);
        assert_eq!(Precision::Digits(4).as_i32(), 4);
    }

    #[test]
    fn test_precision_formatting() {
        assert_eq!(Precision::Digits(2).format(0.126), "0.13");
        assert_eq!(Precision::Digits(0).format(1.4), "1");
        assert_eq!(Precision::Digits(3).format(2.0), "2.000");
        assert_eq!(Precision::Full.format(0.25), "0.25");
    }

    #[test]
    fn test_read_before_measure_fails() {
        let timer = silent(6);
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.get_time_taken(true), Err(TimerError::NotYetMeasured));
        assert_eq!(timer.get_time_taken(false), Err(TimerError::NotYetMeasured));
        assert_eq!(timer.report_line(), Err(TimerError::NotYetMeasured));
    }

    #[test]
    fn test_block_measures_sleep_for_every_precision() {
        let delay = Duration::from_millis(20);
        for precision in -1..=15 {
            let timer = silent(precision);
            {
                let _scope = timer.scope();
                assert_eq!(timer.state(), TimerState::Running);
                sleep(delay);
            }
            assert_eq!(timer.state(), TimerState::Measured);

            let raw = timer.get_time_taken(false).unwrap();
            assert!(raw >= delay.as_secs_f64(), "precision {}: {}", precision, raw);
            assert!(raw < delay.as_secs_f64() + SLACK, "precision {}: {}", precision, raw);
        }
    }

    #[test]
    fn test_rounded_reading_matches_precision() {
        let timer = silent(2);
        timer.call(|| sleep(Duration::from_millis(15)));

        let raw = timer.get_time_taken(false).unwrap();
        let rounded = timer.get_time_taken(true).unwrap();
        assert!((rounded - (raw * 100.0).round() / 100.0).abs() < 1e-9);
        assert_eq!(timer.formatted_elapsed().unwrap().split('.').nth(1).map(str::len), Some(2));
    }

    #[test]
    fn test_full_precision_round_trips() {
        let timer = silent(-1);
        timer.call(|| sleep(Duration::from_millis(1)));

        let raw = timer.get_time_taken(false).unwrap();
        assert_eq!(timer.get_time_taken(true).unwrap(), raw);
    }

    #[test]
    fn test_report_line_format() {
        let timer = silent(3);
        timer.call(|| ());
        let line = timer.report_line().unwrap();
        assert!(line.starts_with("[PERF ] execution time for codeblock 'test': "));
        assert!(line.ends_with('s'));

        let unlabeled = ScopedTimer::default().with_print(false);
        unlabeled.call(|| ());
        assert!(unlabeled.report_line().unwrap().starts_with("[PERF ] execution time : "));
    }

    #[test]
    fn test_decorated_error_propagates_and_is_timed() {
        #[derive(Debug, PartialEq)]
        struct ValueError(&'static str);
        impl fmt::Display for ValueError {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "ValueError: {}", self.0)
            }
        }

        let timer = silent(6);
        let mut checked = timer.decorate(|n: i32| {
            if n < 0 { Err(ValueError("negative")) } else { Ok(n) }
        });
        assert_eq!(checked(-1), Err(ValueError("negative")));

        let taken = timer.get_time_taken(true).unwrap();
        assert!(taken.is_finite());
        assert!(taken >= 0.0);
    }

    #[test]
    fn test_exit_prints_exact_line_when_enabled() {
        let timer = ScopedTimer::new("parse").with_precision(2).unwrap();
        let mut out = Vec::new();
        timer.enter();
        timer.exit_into(ExitOutcome::Completed, &mut out);

        let printed = String::from_utf8(out).unwrap();
        let expected = format!(
            "[PERF ] execution time for codeblock 'parse': {}s\n",
            timer.formatted_elapsed().unwrap()
        );
        assert_eq!(printed, expected);
        assert_eq!(printed.lines().count(), 1);
    }

    #[test]
    fn test_exit_prints_unlabeled_line() {
        let timer = ScopedTimer::default().with_precision(3).unwrap();
        let mut out = Vec::new();
        timer.enter();
        timer.exit_into(ExitOutcome::Completed, &mut out);

        let printed = String::from_utf8(out).unwrap();
        let expected = format!(
            "[PERF ] execution time : {}s\n",
            timer.formatted_elapsed().unwrap()
        );
        assert_eq!(printed, expected);
    }

    #[test]
    fn test_exit_is_silent_when_disabled() {
        let timer = silent(6);
        let mut out = Vec::new();
        timer.enter();
        let disposition = timer.exit_into(ExitOutcome::Failed(&"oops"), &mut out);

        assert!(out.is_empty());
        assert_eq!(disposition, Disposition::Propagate);
        assert!(timer.get_time_taken(false).is_ok());
    }

    #[test]
    fn test_try_decorated_error_is_timed_and_returned() {
        let timer = silent(6);
        let mut parse = timer.try_decorate(|raw: &str| raw.parse::<u32>().map_err(|e| e.to_string()));

        assert_eq!(parse("12"), Ok(12));
        assert!(parse("twelve").is_err());
        assert_eq!(timer.state(), TimerState::Measured);
        assert!(timer.get_time_taken(false).unwrap() >= 0.0);
    }

    #[test]
    fn test_try_call_returns_error_unchanged() {
        let timer = silent(6);
        let result: Result<(), String> = timer.try_call(|| Err("bad input".to_string()));

        assert_eq!(result, Err("bad input".to_string()));
        assert!(timer.get_time_taken(false).is_ok());
    }

    #[test]
    fn test_panic_path_still_records() {
        let timer = silent(6);
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            timer.call(|| -> u8 { panic!("boom") })
        }));

        assert!(outcome.is_err());
        assert_eq!(timer.state(), TimerState::Measured);
        assert!(timer.get_time_taken(false).unwrap() >= 0.0);
    }

    #[test]
    fn test_reuse_overwrites_previous_measurement() {
        let timer = silent(-1);

        timer.call(|| sleep(Duration::from_millis(120)));
        let first = timer.get_time_taken(false).unwrap();

        timer.call(|| sleep(Duration::from_millis(10)));
        let second = timer.get_time_taken(false).unwrap();

        assert!(first >= 0.12);
        assert!(second >= 0.01);
        assert!(second < first, "second={} first={}", second, first);
    }

    #[test]
    fn test_decorated_calls_are_timed_independently() {
        let timer = silent(-1);
        let mut nap = timer.decorate(|ms: u64| {
            sleep(Duration::from_millis(ms));
            ms
        });

        assert_eq!(nap(100), 100);
        let first = timer.get_time_taken(false).unwrap();
        assert_eq!(nap(5), 5);
        let second = timer.get_time_taken(false).unwrap();

        assert!(first >= 0.1);
        assert!(second < first);
    }

    #[test]
    fn test_reading_selector_parsing() {
        assert_eq!("rounded".parse::<Reading>(), Ok(Reading::Rounded));
        assert_eq!("TRUE".parse::<Reading>(), Ok(Reading::Rounded));
        assert_eq!("raw".parse::<Reading>(), Ok(Reading::Raw));
        assert_eq!("false".parse::<Reading>(), Ok(Reading::Raw));
        assert!(matches!(
            "maybe".parse::<Reading>(),
            Err(TimerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_from_settings() {
        let settings = TimerSettings {
            precision: 3,
            print: false,
        };
        let timer = ScopedTimer::from_settings("cfg", &settings).unwrap();
        assert_eq!(timer.precision(), Precision::Digits(3));
        assert!(!timer.should_print());

        let bad = TimerSettings {
            precision: -5,
            print: true,
        };
        assert!(ScopedTimer::from_settings("cfg", &bad).is_err());
    }
}
