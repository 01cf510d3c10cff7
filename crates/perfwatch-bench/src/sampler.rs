//! Sampler: times repeated probe calls, or reads a metric once.
//!
//! Every call runs under a [`TimerGuard`] inside `catch_unwind`, so a
//! failing or panicking probe still yields a sample with its elapsed time
//! and never aborts the remaining iterations. With a call timeout the calls
//! run on a dedicated worker thread; a call that overruns is recorded as a
//! failure and its worker is abandoned in favour of a fresh one.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, warn};

use perfwatch_core::errors::ProbeError;
use perfwatch_core::traits::{Clock, MetricProbe, MonotonicClock, Probe};
use perfwatch_core::types::Sample;

const NANOS_PER_MS: f64 = 1_000_000.0;

/// Scoped timer. Writes the elapsed milliseconds into its slot when
/// dropped, which includes unwinding out of a panicking probe.
pub struct TimerGuard<'a> {
    clock: &'a dyn Clock,
    start: u64,
    slot: &'a Cell<f64>,
}

impl<'a> TimerGuard<'a> {
    pub fn start(clock: &'a dyn Clock, slot: &'a Cell<f64>) -> Self {
        Self {
            clock,
            start: clock.now_nanos(),
            slot,
        }
    }
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        let elapsed = self.clock.now_nanos().saturating_sub(self.start);
        self.slot.set(elapsed as f64 / NANOS_PER_MS);
    }
}

#[derive(Debug)]
struct CallOutcome {
    elapsed_ms: f64,
    result: Result<(), ProbeError>,
}

impl CallOutcome {
    fn failed(message: &str) -> Self {
        Self {
            elapsed_ms: 0.0,
            result: Err(ProbeError::failed(message)),
        }
    }
}

fn timed_call(clock: &dyn Clock, probe: &dyn Probe) -> CallOutcome {
    let elapsed = Cell::new(0.0);
    let caught = panic::catch_unwind(AssertUnwindSafe(|| {
        let _timer = TimerGuard::start(clock, &elapsed);
        probe.call()
    }));
    let result = match caught {
        Ok(result) => result,
        Err(payload) => Err(ProbeError::Panicked {
            message: panic_message(payload.as_ref()),
        }),
    };
    CallOutcome {
        elapsed_ms: elapsed.get(),
        result,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// One worker thread serving calls strictly one at a time.
struct Worker {
    jobs: Sender<()>,
    outcomes: Receiver<CallOutcome>,
}

impl Worker {
    fn spawn(clock: Arc<dyn Clock>, probe: Arc<dyn Probe>) -> Result<Self, ProbeError> {
        let (jobs, job_rx) = bounded::<()>(1);
        let (outcome_tx, outcomes) = bounded::<CallOutcome>(1);
        thread::Builder::new()
            .name("perfwatch-sampler".to_string())
            .spawn(move || {
                for () in job_rx.iter() {
                    let outcome = timed_call(clock.as_ref(), probe.as_ref());
                    // Receiver gone: this worker was abandoned after a timeout.
                    if outcome_tx.send(outcome).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| ProbeError::failed(format!("could not spawn sampler worker: {e}")))?;
        Ok(Self { jobs, outcomes })
    }
}

/// Runs calls inline, or on a worker thread when a timeout is set.
struct CallExecutor {
    clock: Arc<dyn Clock>,
    probe: Arc<dyn Probe>,
    timeout: Option<Duration>,
    worker: Option<Worker>,
}

impl CallExecutor {
    fn new(clock: Arc<dyn Clock>, probe: Arc<dyn Probe>, timeout: Option<Duration>) -> Self {
        Self {
            clock,
            probe,
            timeout,
            worker: None,
        }
    }

    fn call(&mut self) -> CallOutcome {
        let Some(timeout) = self.timeout else {
            return timed_call(self.clock.as_ref(), self.probe.as_ref());
        };

        let worker = match self.worker.take() {
            Some(worker) => worker,
            None => match Worker::spawn(Arc::clone(&self.clock), Arc::clone(&self.probe)) {
                Ok(worker) => worker,
                Err(e) => {
                    return CallOutcome {
                        elapsed_ms: 0.0,
                        result: Err(e),
                    }
                }
            },
        };

        if worker.jobs.send(()).is_err() {
            return CallOutcome::failed("sampler worker exited");
        }
        match worker.outcomes.recv_timeout(timeout) {
            Ok(outcome) => {
                self.worker = Some(worker);
                outcome
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "probe call timed out, abandoning its worker"
                );
                CallOutcome {
                    elapsed_ms: timeout.as_secs_f64() * 1000.0,
                    result: Err(ProbeError::TimedOut { timeout }),
                }
            }
            Err(RecvTimeoutError::Disconnected) => CallOutcome::failed("sampler worker exited"),
        }
    }
}

/// Executes an operation repeatedly and records one sample per call.
///
/// Holds only configuration and an `Arc` clock, so independent runs can
/// each own a `Sampler` on their own thread.
#[derive(Clone)]
pub struct Sampler {
    clock: Arc<dyn Clock>,
    call_timeout: Option<Duration>,
}

impl Sampler {
    pub fn new(call_timeout: Option<Duration>) -> Self {
        Self::with_clock(Arc::new(MonotonicClock::new()), call_timeout)
    }

    pub fn with_clock(clock: Arc<dyn Clock>, call_timeout: Option<Duration>) -> Self {
        Self {
            clock,
            call_timeout,
        }
    }

    /// Run `warmup` discarded calls, then `iterations` measured calls.
    ///
    /// Returns exactly `iterations` samples in call order. Failed, panicked
    /// and timed-out calls are `ok = false` samples.
    pub fn sample(
        &self,
        operation: &str,
        probe: Arc<dyn Probe>,
        iterations: u32,
        warmup: u32,
    ) -> Vec<Sample> {
        let mut executor = CallExecutor::new(Arc::clone(&self.clock), probe, self.call_timeout);

        for call in 0..warmup {
            let outcome = executor.call();
            if let Err(e) = outcome.result {
                debug!(operation, call, error = %e, "warm-up call failed");
            }
        }

        let mut samples = Vec::with_capacity(iterations as usize);
        for iteration in 0..iterations {
            let outcome = executor.call();
            let timestamp = Utc::now();
            match outcome.result {
                Ok(()) => samples.push(Sample::success(operation, outcome.elapsed_ms, timestamp)),
                Err(e) => {
                    warn!(
                        operation,
                        iteration,
                        elapsed_ms = outcome.elapsed_ms,
                        error = %e,
                        "probe call failed"
                    );
                    samples.push(Sample::failure(operation, outcome.elapsed_ms, timestamp));
                }
            }
        }
        debug!(operation, iterations, warmup, "sampling complete");
        samples
    }
}

/// Read a live metric once. Non-finite and negative readings count as
/// unavailable, so they never reach the alert threshold.
pub fn read_metric(probe: &dyn MetricProbe) -> Result<Sample, ProbeError> {
    let value = probe.read()?;
    if !value.is_finite() || value < 0.0 {
        return Err(ProbeError::metric_unavailable(
            probe.metric(),
            format!("invalid reading {value}"),
        ));
    }
    Ok(Sample::success(probe.metric(), value, Utc::now()))
}

/// [`read_metric`] bounded by `timeout`.
///
/// With a timeout the read runs on its own thread. A read that overruns
/// is abandoned and reported as [`ProbeError::TimedOut`]; the caller is
/// released at the deadline even if the probe never returns.
pub fn read_metric_within(
    probe: Arc<dyn MetricProbe>,
    timeout: Option<Duration>,
) -> Result<Sample, ProbeError> {
    let Some(timeout) = timeout else {
        return read_metric(probe.as_ref());
    };

    let (tx, rx) = bounded(1);
    let reader = Arc::clone(&probe);
    thread::Builder::new()
        .name("perfwatch-metric".to_string())
        .spawn(move || {
            let caught = panic::catch_unwind(AssertUnwindSafe(|| read_metric(reader.as_ref())));
            let result = caught.unwrap_or_else(|payload| {
                Err(ProbeError::Panicked {
                    message: panic_message(payload.as_ref()),
                })
            });
            // Receiver gone: the read was abandoned after a timeout.
            let _ = tx.send(result);
        })
        .map_err(|e| ProbeError::failed(format!("could not spawn metric reader: {e}")))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            warn!(
                metric = probe.metric(),
                timeout_ms = timeout.as_millis() as u64,
                "metric read timed out, abandoning it"
            );
            Err(ProbeError::TimedOut { timeout })
        }
        Err(RecvTimeoutError::Disconnected) => Err(ProbeError::failed("metric reader exited")),
    }
}
