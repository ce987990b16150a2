use std::pin::Pin;

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Network work for the controller: the song-list fetch and, with the
/// `audio` feature, track downloads.
///
/// Jobs are queued from the controller's thread and spawned onto a tokio
/// runtime owned by a dedicated thread. Dropping this closes the queue and
/// the runtime winds down with it.
pub struct TokioThread {
    jobs: tokio::sync::mpsc::Sender<Job>,
    _runtime_thread: std::thread::JoinHandle<()>,
}
impl TokioThread {
    const QUEUE_DEPTH: usize = 16;

    pub fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (jobs, mut queue) = tokio::sync::mpsc::channel::<Job>(Self::QUEUE_DEPTH);

        let runtime_thread = std::thread::Builder::new()
            .name("songrank-net".to_string())
            .spawn(move || {
                runtime.block_on(async {
                    while let Some(job) = queue.recv().await {
                        tokio::spawn(job);
                    }
                });
            })?;

        Ok(Self {
            jobs,
            _runtime_thread: runtime_thread,
        })
    }

    /// Queues `job`. Blocks while the queue is full, so call it from the
    /// controller's thread, never from inside a job.
    pub fn spawn(&self, job: impl Future<Output = ()> + Send + 'static) {
        if self.jobs.blocking_send(Box::pin(job)).is_err() {
            tracing::warn!("Network runtime has stopped; dropping job");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, time::Duration};

    use super::*;

    #[test]
    fn test_jobs_run_off_thread() {
        let thread = TokioThread::new().unwrap();
        let (tx, rx) = mpsc::channel();
        for i in 0..3 {
            let tx = tx.clone();
            thread.spawn(async move {
                tx.send(i).unwrap();
            });
        }

        let mut seen: Vec<i32> = (0..3)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        seen.sort();
        assert_eq!(seen, [0, 1, 2]);
    }
}
