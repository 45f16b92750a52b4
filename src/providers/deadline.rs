use super::{FaceDetector, MrzExtractor, ProviderError};
use crate::models::{FaceRegion, RawImage};
use crossbeam_channel::RecvTimeoutError;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Worker threads one [`Deadline`] may have running at once by default
pub const DEFAULT_MAX_IN_FLIGHT: usize = 32;

/// Bound a provider call by a wall-clock deadline
///
/// The call runs on a worker thread with its own copy of the image. When the
/// deadline passes the caller gets [`ProviderError::Timeout`] and the worker
/// is left to finish on its own; its late answer is discarded. A panic inside
/// the provider is re-raised on the calling thread.
///
/// Timed-out workers cannot be stopped, so a provider that hangs keeps its
/// thread. Once `max_in_flight` workers are running, further calls fail
/// immediately with [`ProviderError::Failed`] instead of spawning more.
pub struct Deadline<P: ?Sized> {
    inner: Arc<P>,
    timeout: Duration,
    max_in_flight: usize,
    in_flight: Arc<AtomicUsize>,
}

impl<P: ?Sized> Deadline<P> {
    /// Wrap `inner` with a per-call `timeout`
    pub fn new(inner: Arc<P>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Change the cap on concurrently running worker threads (minimum 1)
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Worker threads currently running, including timed-out ones
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    fn call<T, F>(&self, call: F) -> Result<T, ProviderError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, ProviderError> + Send + 'static,
    {
        let running = self.in_flight.fetch_add(1, Ordering::AcqRel);
        let slot = InFlight(Arc::clone(&self.in_flight));
        if running >= self.max_in_flight {
            log::warn!("provider has {} calls still running, refusing new call", running);
            return Err(ProviderError::Failed(format!(
                "{} earlier provider calls still running",
                running
            )));
        }
        call_with_deadline(self.timeout, slot, call)
    }
}

/// Counts a running worker; released when the worker thread ends
struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

fn call_with_deadline<T, F>(
    timeout: Duration,
    slot: InFlight,
    call: F,
) -> Result<T, ProviderError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ProviderError> + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);
    let worker = thread::Builder::new()
        .name("provider-call".to_string())
        .spawn(move || {
            let _slot = slot;
            // Receiver is gone if the caller already timed out.
            let _ = tx.send(call());
        })
        .map_err(|err| ProviderError::Failed(format!("failed to start provider worker: {}", err)))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            log::warn!("provider call exceeded {:?}", timeout);
            Err(ProviderError::Timeout(timeout))
        }
        Err(RecvTimeoutError::Disconnected) => match worker.join() {
            Err(panic) => std::panic::resume_unwind(panic),
            Ok(()) => Err(ProviderError::Failed(
                "provider worker exited without a result".to_string(),
            )),
        },
    }
}

impl<P: MrzExtractor + ?Sized + 'static> MrzExtractor for Deadline<P> {
    fn extract_mrz_lines(&self, image: &RawImage) -> Result<Vec<String>, ProviderError> {
        let inner = Arc::clone(&self.inner);
        let image = image.clone();
        self.call(move || inner.extract_mrz_lines(&image))
    }
}

impl<P: FaceDetector + ?Sized + 'static> FaceDetector for Deadline<P> {
    fn detect_faces(&self, image: &RawImage) -> Result<Vec<FaceRegion>, ProviderError> {
        let inner = Arc::clone(&self.inner);
        let image = image.clone();
        self.call(move || inner.detect_faces(&image))
    }
}
