use super::*;
use crate::adjust::state::Adjust;

fn photo() -> PixelBuffer {
    PixelBuffer::from_fn(16, 12, |x, y| {
        [
            (x * 16) as u8,
            (y * 20) as u8,
            ((x * y) % 256) as u8,
            255 - (x as u8),
        ]
    })
    .unwrap()
}

fn busy_state() -> AdjustmentState {
    AdjustmentState::default()
        .with(Adjust::Exposure(20.0))
        .with(Adjust::Contrast(15.0))
        .with(Adjust::Temperature(-30.0))
        .with(Adjust::Hue(45.0))
        .with(Adjust::Clarity(25.0))
        .with(Adjust::Sharpness(50.0))
        .with(Adjust::Blur(8.0))
        .with(Adjust::VignetteAmount(60.0))
        .with(Adjust::Grain(30.0))
}

#[test]
fn render_is_pure_and_repeatable() {
    let original = photo();
    let snapshot = original.clone();
    let a = render(&original, &busy_state()).unwrap();
    let b = render(&original, &busy_state()).unwrap();
    assert_eq!(a, b);
    assert_eq!(original, snapshot);
    assert_ne!(a, original);
}

#[test]
fn neutral_state_returns_input() {
    let original = photo();
    let out = render(&original, &AdjustmentState::default()).unwrap();
    assert_eq!(out, original);
}

#[test]
fn orientation_does_not_reach_pixels() {
    let original = photo();
    let adj = AdjustmentState::default()
        .rotate_cw()
        .with(Adjust::FlipHorizontal(true));
    assert_eq!(render(&original, &adj).unwrap(), original);
}

#[test]
fn alpha_survives_every_stage() {
    let original = photo();
    let out = render(&original, &busy_state()).unwrap();
    for (a, b) in out.data().chunks_exact(4).zip(original.data().chunks_exact(4)) {
        assert_eq!(a[3], b[3]);
    }
}

#[test]
fn grain_seed_changes_output() {
    let original = photo();
    let adj = AdjustmentState::default().with(Adjust::Grain(50.0));
    let a = render_with(&original, &adj, &PipelineOpts { grain_seed: 1 }).unwrap();
    let b = render_with(&original, &adj, &PipelineOpts { grain_seed: 2 }).unwrap();
    assert_ne!(a, b);
}

#[test]
fn invalid_state_is_rejected() {
    let adj = AdjustmentState::default().with(Adjust::Sharpness(-5.0));
    let err = render(&photo(), &adj).unwrap_err();
    assert!(err.to_string().contains("sharpness"));
}
