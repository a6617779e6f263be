use std::io::Cursor;

use super::*;

#[test]
fn decode_png_keeps_straight_alpha() {
    let img = image::RgbaImage::from_raw(2, 1, vec![100, 50, 200, 128, 1, 2, 3, 255]).unwrap();
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();

    let buf = decode_image(&bytes).unwrap();
    assert_eq!(buf.dimensions(), (2, 1));
    assert_eq!(buf.pixel(0, 0), Some([100, 50, 200, 128]));
    assert_eq!(buf.pixel(1, 0), Some([1, 2, 3, 255]));
}

#[test]
fn garbage_is_a_codec_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(err.to_string().contains("codec error:"));
}

#[test]
fn missing_file_reports_path() {
    let err = load_image(Path::new("target/does-not-exist.png")).unwrap_err();
    assert!(err.to_string().contains("does-not-exist.png"));
}

#[test]
fn from_path_reads_file() {
    let path = std::env::temp_dir().join(format!("retouch-decode-{}.png", std::process::id()));
    image::RgbaImage::from_pixel(3, 2, image::Rgba([9, 8, 7, 255]))
        .save(&path)
        .unwrap();
    let buf = PixelBuffer::from_path(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(buf, PixelBuffer::filled(3, 2, [9, 8, 7, 255]).unwrap());
}
