use super::*;
use crate::adjust::state::Adjust;

fn gradient(w: u32, h: u32) -> PixelBuffer {
    PixelBuffer::from_fn(w, h, |x, y| {
        [
            (x * 255 / w.max(1)) as u8,
            (y * 255 / h.max(1)) as u8,
            ((x + y) * 20 % 256) as u8,
            255,
        ]
    })
    .unwrap()
}

fn impulse(w: u32, h: u32, cx: u32, cy: u32) -> PixelBuffer {
    PixelBuffer::from_fn(w, h, |x, y| {
        if x == cx && y == cy {
            [255, 255, 255, 255]
        } else {
            [0, 0, 0, 255]
        }
    })
    .unwrap()
}

#[test]
fn zero_parameters_leave_buffer_byte_identical() {
    let mut buf = gradient(9, 7);
    let before = buf.clone();
    apply_spatial_in_place(&mut buf, &AdjustmentState::default());
    assert_eq!(buf, before);
}

#[test]
fn blur_of_constant_image_is_identity() {
    let mut buf = PixelBuffer::filled(6, 5, [10, 20, 30, 40]).unwrap();
    let before = buf.clone();
    box_blur_in_place(&mut buf, 35.0);
    assert_eq!(buf, before);
}

#[test]
fn blur_spreads_an_impulse_over_its_radius() {
    let mut buf = impulse(7, 7, 3, 3);
    // radius ceil(5 / 10) = 1 => 3x3 neighbourhood, 255 / 9 rounds to 28.
    box_blur_in_place(&mut buf, 5.0);
    assert_eq!(buf.pixel(3, 3), Some([28, 28, 28, 255]));
    assert_eq!(buf.pixel(2, 2), Some([28, 28, 28, 255]));
    assert_eq!(buf.pixel(1, 1), Some([0, 0, 0, 255]));
}

#[test]
fn blur_clamps_at_edges() {
    let mut buf = impulse(4, 4, 0, 0);
    box_blur_in_place(&mut buf, 10.0);
    // The corner pixel is sampled four times by the clamped 3x3 window at (0,0).
    assert_eq!(buf.pixel(0, 0), Some([113, 113, 113, 255]));
}

#[test]
fn sharpen_leaves_borders_and_flat_regions_alone() {
    let mut buf = PixelBuffer::filled(5, 5, [90, 90, 90, 255]).unwrap();
    let before = buf.clone();
    sharpen_in_place(&mut buf, 100.0);
    assert_eq!(buf, before);

    let mut buf = impulse(5, 5, 2, 2);
    for px in buf.data_mut().chunks_exact_mut(4) {
        if px[0] == 0 {
            px[..3].copy_from_slice(&[100, 100, 100]);
        } else {
            px[..3].copy_from_slice(&[150, 150, 150]);
        }
    }
    sharpen_in_place(&mut buf, 100.0);
    // center: 5*150 - 4*100 = 350 -> 255; cross neighbours: 500 - 150 - 300 = 50.
    assert_eq!(buf.pixel(2, 2), Some([255, 255, 255, 255]));
    assert_eq!(buf.pixel(2, 1), Some([50, 50, 50, 255]));
    assert_eq!(buf.pixel(0, 0), Some([100, 100, 100, 255]));
    assert_eq!(buf.pixel(2, 0), Some([100, 100, 100, 255]));
}

#[test]
fn sharpen_half_strength_blends() {
    let mut buf = PixelBuffer::from_fn(3, 3, |x, y| {
        if (x, y) == (1, 1) { [120, 120, 120, 255] } else { [100, 100, 100, 255] }
    })
    .unwrap();
    sharpen_in_place(&mut buf, 50.0);
    // conv = 600 - 400 = 200; 120 + (200 - 120) * 0.5 = 160.
    assert_eq!(buf.pixel(1, 1), Some([160, 160, 160, 255]));
}

#[test]
fn dehaze_darkens_haze_and_keeps_alpha() {
    let mut buf = PixelBuffer::filled(2, 2, [110, 220, 250, 77]).unwrap();
    dehaze_in_place(&mut buf, 100.0);
    // T = 0.5, veil = 110: (110-110)/0.5 = 0, (220-110)/0.5 = 220, (250-110)/0.5 = 280 -> 255.
    assert_eq!(buf.pixel(1, 1), Some([0, 220, 255, 77]));
}

#[test]
fn clarity_increases_local_contrast() {
    let mut buf = impulse(5, 5, 2, 2);
    for px in buf.data_mut().chunks_exact_mut(4) {
        if px[0] == 0 {
            px[..3].copy_from_slice(&[100, 100, 100]);
        } else {
            px[..3].copy_from_slice(&[125, 125, 125]);
        }
    }
    clarity_in_place(&mut buf, 100.0);
    // mean at center = (24*100 + 125) / 25 = 101; 125 + 24 = 149.
    assert_eq!(buf.pixel(2, 2), Some([149, 149, 149, 255]));
    let flat_before = [100u8, 100, 100, 255];
    assert_ne!(buf.pixel(1, 1), Some(flat_before));
}

#[test]
fn operators_run_on_frozen_inputs_in_order() {
    let adj = AdjustmentState::default()
        .with(Adjust::Clarity(30.0))
        .with(Adjust::Sharpness(40.0))
        .with(Adjust::Blur(12.0));
    let mut a = gradient(12, 10);
    let mut b = a.clone();
    apply_spatial_in_place(&mut a, &adj);

    clarity_in_place(&mut b, 30.0);
    sharpen_in_place(&mut b, 40.0);
    box_blur_in_place(&mut b, 12.0);
    assert_eq!(a, b);
}
