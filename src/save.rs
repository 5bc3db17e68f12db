use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, TryRecvError},
        Arc,
    },
    thread,
    time::Duration,
};

use tracing::{debug, warn};

use crate::sink::{CircuitRecord, RecordSink, SinkError};

#[derive(Debug)]
pub enum SaveOutcome {
    Saved(CircuitRecord),
    Failed(CircuitRecord, SinkError),
    Cancelled(CircuitRecord),
}

/// One sink call running on its own thread.
///
/// The result comes back over a channel; dropping the task or cancelling it
/// detaches the worker, which finishes on its own and has its result ignored.
pub struct SaveTask {
    record: CircuitRecord,
    rx: Receiver<Result<(), SinkError>>,
    cancel: Arc<AtomicBool>,
}

impl SaveTask {
    pub fn spawn(sink: Arc<dyn RecordSink>, record: CircuitRecord) -> Self {
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        let worker_record = record.clone();
        let worker_cancel = cancel.clone();
        let spawned = thread::Builder::new().name("circuit-save".into()).spawn(move || {
            if worker_cancel.load(Ordering::Relaxed) {
                debug!("save cancelled before the sink was called");
                return;
            }
            let result = sink.insert(&worker_record);
            // receiver gone means nobody is waiting anymore
            let _ = tx.send(result);
        });
        if let Err(err) = spawned {
            // the sender was moved into the failed closure and dropped, so
            // the first poll reports a lost worker
            warn!(%err, "could not spawn save worker");
        }

        Self { record, rx, cancel }
    }

    pub fn record(&self) -> &CircuitRecord {
        &self.record
    }

    /// Asks the worker to skip the sink call if it has not started yet. The
    /// task resolves to [`SaveOutcome::Cancelled`] either way.
    pub fn cancel(self) -> SaveOutcome {
        self.cancel.store(true, Ordering::Relaxed);
        SaveOutcome::Cancelled(self.record)
    }

    /// Non-blocking. Returns the task back while the worker is still busy.
    pub fn poll(self) -> Result<SaveOutcome, SaveTask> {
        match self.rx.try_recv() {
            Ok(result) => Ok(self.finish(result)),
            Err(TryRecvError::Empty) => Err(self),
            Err(TryRecvError::Disconnected) => Ok(self.finish(Err(SinkError::WorkerLost))),
        }
    }

    /// Blocks for at most `timeout`.
    pub fn wait(self, timeout: Duration) -> Result<SaveOutcome, SaveTask> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Ok(self.finish(result)),
            Err(RecvTimeoutError::Timeout) => Err(self),
            Err(RecvTimeoutError::Disconnected) => Ok(self.finish(Err(SinkError::WorkerLost))),
        }
    }

    fn finish(self, result: Result<(), SinkError>) -> SaveOutcome {
        match result {
            Ok(()) => SaveOutcome::Saved(self.record),
            Err(err) => SaveOutcome::Failed(self.record, err),
        }
    }
}
