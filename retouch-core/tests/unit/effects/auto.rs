use super::*;

#[test]
fn white_balance_neutralizes_a_color_cast() {
    let src = PixelBuffer::from_fn(4, 4, |x, _| {
        let v = 60 + x as u8 * 20;
        [v, v / 2, v / 2, 255]
    })
    .unwrap();
    let out = auto_white_balance(&src);
    let s = crate::analysis::histogram::channel_stats(&out);
    assert!((s.mean[0] - s.mean[1]).abs() < 2.0);
    assert!((s.mean[1] - s.mean[2]).abs() < 2.0);
}

#[test]
fn white_balance_skips_zero_mean_channels() {
    let src = PixelBuffer::filled(3, 3, [120, 60, 0, 200]).unwrap();
    let out = auto_white_balance(&src);
    // gray = 60: red halves, green stays, blue has nothing to scale.
    assert_eq!(out.pixel(1, 1), Some([60, 60, 0, 200]));
}

#[test]
fn levels_stretch_to_full_range() {
    let src = PixelBuffer::from_fn(3, 1, |x, _| [50 + x as u8 * 50, 100, 10 + x as u8, 255]).unwrap();
    let out = auto_levels(&src);
    assert_eq!(out.pixel(0, 0).unwrap()[0], 0);
    assert!((127..=128).contains(&out.pixel(1, 0).unwrap()[0]));
    assert_eq!(out.pixel(2, 0).unwrap()[0], 255);
    assert_eq!(out.pixel(2, 0).unwrap()[2], 255);
    // Flat green channel is untouched.
    assert!(out.data().chunks_exact(4).all(|px| px[1] == 100));
}
