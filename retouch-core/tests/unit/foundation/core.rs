use super::*;

#[test]
fn new_rejects_length_mismatch() {
    assert!(PixelBuffer::new(2, 2, vec![0; 15]).is_err());
    assert!(PixelBuffer::new(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn zero_dimensions_are_rejected() {
    assert!(PixelBuffer::filled(0, 4, [0, 0, 0, 255]).is_err());
    assert!(PixelBuffer::filled(4, 0, [0, 0, 0, 255]).is_err());
}

#[test]
fn from_fn_is_row_major() {
    let buf = PixelBuffer::from_fn(3, 2, |x, y| [x as u8, y as u8, 0, 255]).unwrap();
    assert_eq!(buf.pixel(2, 0), Some([2, 0, 0, 255]));
    assert_eq!(buf.pixel(0, 1), Some([0, 1, 0, 255]));
    assert_eq!(&buf.data()[4..8], &[1, 0, 0, 255]);
    assert_eq!(buf.pixel(3, 0), None);
}

#[test]
fn rgba_image_conversion_keeps_bytes() {
    let buf = PixelBuffer::filled(5, 3, [9, 8, 7, 6]).unwrap();
    let img = buf.to_rgba_image().unwrap();
    assert_eq!(img.dimensions(), (5, 3));
    let back = PixelBuffer::from_rgba_image(img).unwrap();
    assert_eq!(back, buf);
}
