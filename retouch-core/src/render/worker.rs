use std::{
    sync::{Arc, mpsc},
    thread::JoinHandle,
    time::Duration,
};

use crate::{
    adjust::state::AdjustmentState,
    foundation::{
        core::PixelBuffer,
        error::{RetouchError, RetouchResult},
    },
    render::pipeline::{PipelineOpts, render_with},
    session::opts::build_thread_pool,
};

/// Snapshot of everything a render needs, tagged with the engine generation it came from.
#[derive(Clone, Debug)]
pub struct RenderJob {
    pub generation: u64,
    pub original: Arc<PixelBuffer>,
    pub state: AdjustmentState,
    pub opts: PipelineOpts,
}

impl RenderJob {
    pub fn run(&self) -> RetouchResult<PixelBuffer> {
        render_with(&self.original, &self.state, &self.opts)
    }
}

/// Finished render for the job with the same `generation`.
#[derive(Debug)]
pub struct RenderOutput {
    pub generation: u64,
    pub result: RetouchResult<PixelBuffer>,
}

/// Background pipeline thread with latest-wins scheduling.
///
/// Jobs queued while a render is running are collapsed: only the newest is rendered, the rest
/// are dropped unrendered.
pub struct RenderWorker {
    jobs: Option<mpsc::Sender<RenderJob>>,
    results: mpsc::Receiver<RenderOutput>,
    handle: Option<JoinHandle<()>>,
}

impl RenderWorker {
    pub fn spawn(threads: Option<usize>) -> RetouchResult<Self> {
        let pool = build_thread_pool(threads)?;
        let (job_tx, job_rx) = mpsc::channel::<RenderJob>();
        let (out_tx, out_rx) = mpsc::channel::<RenderOutput>();

        let handle = std::thread::Builder::new()
            .name("retouch-render".to_string())
            .spawn(move || {
                while let Ok(mut job) = job_rx.recv() {
                    let mut skipped = 0u32;
                    while let Ok(newer) = job_rx.try_recv() {
                        job = newer;
                        skipped += 1;
                    }
                    if skipped > 0 {
                        tracing::debug!(skipped, generation = job.generation, "coalesced render jobs");
                    }
                    let result = pool.install(|| job.run());
                    let out = RenderOutput {
                        generation: job.generation,
                        result,
                    };
                    if out_tx.send(out).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| RetouchError::evaluation(format!("failed to spawn render thread: {e}")))?;

        Ok(Self {
            jobs: Some(job_tx),
            results: out_rx,
            handle: Some(handle),
        })
    }

    pub fn submit(&self, job: RenderJob) -> RetouchResult<()> {
        self.jobs
            .as_ref()
            .ok_or_else(|| RetouchError::evaluation("render worker is shut down"))?
            .send(job)
            .map_err(|_| RetouchError::evaluation("render worker is not accepting jobs"))
    }

    /// Newest finished output, discarding older ones. Never blocks.
    pub fn latest(&self) -> Option<RenderOutput> {
        let mut last = None;
        while let Ok(out) = self.results.try_recv() {
            last = Some(out);
        }
        last
    }

    /// Wait up to `timeout` for the next finished output.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RenderOutput> {
        self.results.recv_timeout(timeout).ok()
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/worker.rs"]
mod tests;
