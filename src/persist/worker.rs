use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use super::{Codec, PersistRequest, PersistResult};

/// Background thread that turns persistence requests into tokens.
///
/// Results come back in request order, each tagged with its sequence number.
pub struct EncodeWorker {
    requests: Option<Sender<PersistRequest>>,
    results: Receiver<PersistResult>,
    handle: Option<JoinHandle<()>>,
}

impl EncodeWorker {
    /// Start the worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<C>(codec: C) -> io::Result<Self>
    where
        C: Codec + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<PersistRequest>();
        let (result_tx, result_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("blockdown-encode".to_string())
            .spawn(move || {
                for request in request_rx {
                    let seq = request.seq;
                    let result = request.encode(&codec);
                    if result_tx.send(result).is_err() {
                        debug!(seq, "encode result receiver gone");
                        break;
                    }
                }
            })?;
        Ok(Self {
            requests: Some(request_tx),
            results: result_rx,
            handle: Some(handle),
        })
    }

    /// Queue a request. Returns `false` if the worker has stopped.
    pub fn submit(&self, request: PersistRequest) -> bool {
        let Some(tx) = &self.requests else {
            return false;
        };
        let seq = request.seq;
        if tx.send(request).is_err() {
            warn!(seq, "encode worker stopped; request dropped");
            return false;
        }
        true
    }

    /// Next finished result, without blocking.
    pub fn try_recv(&self) -> Option<PersistResult> {
        self.results.try_recv().ok()
    }

    /// Wait up to `timeout` for the next finished result.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PersistResult> {
        match self.results.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Stop accepting work, wait for queued requests, and return their results.
    pub fn finish(mut self) -> Vec<PersistResult> {
        self.shutdown();
        self.results.try_iter().collect()
    }

    fn shutdown(&mut self) {
        drop(self.requests.take());
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("encode worker panicked");
        }
    }
}

impl Drop for EncodeWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::GzipBase64Codec;

    fn request(seq: u64, content: &str) -> PersistRequest {
        PersistRequest {
            seq,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_results_carry_request_seq_in_order() {
        let worker = EncodeWorker::spawn(GzipBase64Codec::default()).unwrap();
        assert!(worker.submit(request(1, "one")));
        assert!(worker.submit(request(2, "two")));
        let results = worker.finish();
        let seqs: Vec<u64> = results.iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![1, 2]);
        assert!(results.iter().all(|r| r.token.is_ok()));
    }

    #[test]
    fn test_recv_timeout_returns_result() {
        let worker = EncodeWorker::spawn(GzipBase64Codec::default()).unwrap();
        worker.submit(request(7, "text"));
        let result = worker.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(result.seq, 7);
    }

    #[test]
    fn test_try_recv_empty_when_idle() {
        let worker = EncodeWorker::spawn(GzipBase64Codec::default()).unwrap();
        assert!(worker.try_recv().is_none());
    }
}
