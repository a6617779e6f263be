use super::*;
use crate::adjust::state::Adjust;

fn job(generation: u64, original: &Arc<PixelBuffer>, brightness: f32) -> RenderJob {
    RenderJob {
        generation,
        original: Arc::clone(original),
        state: AdjustmentState::default().with(Adjust::Brightness(brightness)),
        opts: PipelineOpts::default(),
    }
}

#[test]
fn renders_submitted_job() {
    let original = Arc::new(PixelBuffer::filled(8, 8, [100, 100, 100, 255]).unwrap());
    let worker = RenderWorker::spawn(Some(1)).unwrap();
    worker.submit(job(1, &original, 10.0)).unwrap();
    let out = worker.recv_timeout(Duration::from_secs(30)).unwrap();
    assert_eq!(out.generation, 1);
    let buf = out.result.unwrap();
    assert_eq!(buf.pixel(0, 0), Some([126, 126, 126, 255]));
}

#[test]
fn last_submission_always_wins() {
    let original = Arc::new(PixelBuffer::filled(64, 64, [50, 60, 70, 255]).unwrap());
    let worker = RenderWorker::spawn(Some(2)).unwrap();
    for g in 1..=10u64 {
        worker.submit(job(g, &original, g as f32)).unwrap();
    }

    let mut seen = Vec::new();
    while let Some(out) = worker.recv_timeout(Duration::from_secs(30)) {
        seen.push(out.generation);
        if out.generation == 10 {
            let expected = job(10, &original, 10.0).run().unwrap();
            assert_eq!(out.result.unwrap(), expected);
            break;
        }
    }
    assert_eq!(seen.last(), Some(&10));
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn invalid_state_comes_back_as_error() {
    let original = Arc::new(PixelBuffer::filled(2, 2, [0, 0, 0, 255]).unwrap());
    let worker = RenderWorker::spawn(None).unwrap();
    worker.submit(job(3, &original, 500.0)).unwrap();
    let out = worker.recv_timeout(Duration::from_secs(30)).unwrap();
    assert_eq!(out.generation, 3);
    assert!(out.result.is_err());
}

#[test]
fn latest_polls_without_blocking() {
    let original = Arc::new(PixelBuffer::filled(16, 16, [10, 20, 30, 255]).unwrap());
    let worker = RenderWorker::spawn(Some(1)).unwrap();
    for g in 1..=3u64 {
        worker.submit(job(g, &original, 5.0)).unwrap();
    }

    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    let mut seen = Vec::new();
    while std::time::Instant::now() < deadline {
        match worker.latest() {
            Some(out) => {
                seen.push(out.generation);
                if out.generation == 3 {
                    break;
                }
            }
            None => std::thread::sleep(Duration::from_millis(1)),
        }
    }
    assert_eq!(seen.last(), Some(&3));
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert!(worker.latest().is_none());
}
