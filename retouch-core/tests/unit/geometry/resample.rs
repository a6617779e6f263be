use super::*;

fn numbered(w: u32, h: u32) -> PixelBuffer {
    PixelBuffer::from_fn(w, h, |x, y| [x as u8, y as u8, (x + y * w) as u8, 255]).unwrap()
}

#[test]
fn crop_extracts_and_rebases() {
    let src = numbered(6, 5);
    let out = crop(&src, CropRect::new(2, 1, 3, 2)).unwrap();
    assert_eq!(out.dimensions(), (3, 2));
    assert_eq!(out.pixel(0, 0), src.pixel(2, 1));
    assert_eq!(out.pixel(2, 1), src.pixel(4, 2));
}

#[test]
fn crop_out_of_bounds_is_rejected() {
    let src = numbered(4, 4);
    assert!(crop(&src, CropRect::new(2, 2, 3, 1)).is_err());
    assert!(crop(&src, CropRect::new(0, 0, 0, 1)).is_err());
    assert!(crop(&src, CropRect::new(u32::MAX, 0, 2, 1)).is_err());
    assert!(crop(&src, CropRect::new(0, 0, 4, 4)).is_ok());
}

#[test]
fn resize_exact_hits_target() {
    let src = numbered(8, 6);
    let out = resize(&src, ResizeSpec::exact(3, 7)).unwrap();
    assert_eq!(out.dimensions(), (3, 7));
}

#[test]
fn resize_fit_keeps_aspect() {
    assert_eq!(ResizeSpec::fit(100, 100).resolve(400, 200).unwrap(), (100, 50));
    assert_eq!(ResizeSpec::fit(300, 60).resolve(400, 200).unwrap(), (120, 60));
    assert_eq!(ResizeSpec::fit(1, 1).resolve(1000, 10).unwrap(), (1, 1));
}

#[test]
fn resize_same_size_is_identity() {
    let src = numbered(5, 5);
    assert_eq!(resize(&src, ResizeSpec::exact(5, 5)).unwrap(), src);
}

#[test]
fn resize_of_solid_stays_solid() {
    let src = PixelBuffer::filled(9, 9, [40, 80, 120, 255]).unwrap();
    let out = resize(&src, ResizeSpec::exact(4, 13)).unwrap();
    assert!(out.data().chunks_exact(4).all(|px| px == [40, 80, 120, 255]));
}

#[test]
fn zero_target_is_rejected() {
    assert!(resize(&numbered(3, 3), ResizeSpec::exact(0, 3)).is_err());
}
