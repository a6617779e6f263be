use std::{fmt, io::Cursor, str::FromStr};

use image::{ExtendedColorType, ImageEncoder as _};

use crate::{
    foundation::{
        core::PixelBuffer,
        error::{RetouchError, RetouchResult},
    },
    geometry::resample::resize_exact,
};

/// Output container requested by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    WebP,
    Avif,
    Bmp,
    /// Encoded as PNG.
    Gif,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png | Self::Gif => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
            Self::Avif => "avif",
            Self::Bmp => "bmp",
        }
    }

    /// Whether `quality` has any effect for this format.
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg | Self::Avif)
    }
}

impl FromStr for ExportFormat {
    type Err = RetouchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::WebP),
            "avif" => Ok(Self::Avif),
            "bmp" => Ok(Self::Bmp),
            "gif" => Ok(Self::Gif),
            other => Err(RetouchError::validation(format!(
                "unknown export format '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
            Self::Avif => "avif",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
        };
        f.write_str(name)
    }
}

/// What the caller wants out of an export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RenderRequest {
    pub format: ExportFormat,
    /// 0..=100, ignored by lossless formats.
    pub quality: u8,
    pub width: u32,
    pub height: u32,
    /// Opaque color used to flatten alpha for formats without it.
    #[serde(default = "default_background")]
    pub background: [u8; 3],
}

fn default_background() -> [u8; 3] {
    [255, 255, 255]
}

impl RenderRequest {
    pub fn new(format: ExportFormat, width: u32, height: u32) -> Self {
        Self {
            format,
            quality: 92,
            width,
            height,
            background: default_background(),
        }
    }

    pub fn validate(&self) -> RetouchResult<()> {
        if self.quality > 100 {
            return Err(RetouchError::validation(format!(
                "export quality must be within [0, 100], got {}",
                self.quality
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(RetouchError::validation("export size must be > 0"));
        }
        Ok(())
    }
}

/// Non-fatal notice attached to a successful export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportWarning {
    /// The encoder could not produce `requested`, so `used` was written instead.
    FormatFallback {
        requested: ExportFormat,
        used: ExportFormat,
    },
}

impl fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FormatFallback { requested, used } => {
                write!(f, "{requested} is not supported here; exported as {used} instead")
            }
        }
    }
}

/// Result of a successful export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exported {
    pub bytes: Vec<u8>,
    /// Format actually written.
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
    pub warning: Option<ExportWarning>,
}

/// Encoder capability consumed by export.
pub trait ExportEncoder {
    fn supports(&self, format: ExportFormat) -> bool;

    fn encode(
        &self,
        buf: &PixelBuffer,
        format: ExportFormat,
        quality: u8,
        background: [u8; 3],
    ) -> RetouchResult<Vec<u8>>;
}

/// Encoder backed by the `image` crate codecs compiled into this build.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCrateEncoder;

impl ExportEncoder for ImageCrateEncoder {
    fn supports(&self, format: ExportFormat) -> bool {
        match format {
            ExportFormat::Avif => cfg!(feature = "avif"),
            ExportFormat::Png
            | ExportFormat::Gif
            | ExportFormat::Jpeg
            | ExportFormat::WebP
            | ExportFormat::Bmp => true,
        }
    }

    fn encode(
        &self,
        buf: &PixelBuffer,
        format: ExportFormat,
        quality: u8,
        background: [u8; 3],
    ) -> RetouchResult<Vec<u8>> {
        let (w, h) = buf.dimensions();
        let mut out = Cursor::new(Vec::new());
        let res = match format {
            ExportFormat::Png | ExportFormat::Gif => image::codecs::png::PngEncoder::new(&mut out)
                .write_image(buf.data(), w, h, ExtendedColorType::Rgba8),
            ExportFormat::Jpeg => {
                let rgb = flatten_rgb(buf, background);
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
                    .write_image(&rgb, w, h, ExtendedColorType::Rgb8)
            }
            ExportFormat::WebP => image::codecs::webp::WebPEncoder::new_lossless(&mut out)
                .write_image(buf.data(), w, h, ExtendedColorType::Rgba8),
            ExportFormat::Bmp => image::codecs::bmp::BmpEncoder::new(&mut out)
                .write_image(buf.data(), w, h, ExtendedColorType::Rgba8),
            ExportFormat::Avif => encode_avif(&mut out, buf, quality),
        };
        res.map_err(|e| RetouchError::codec(format!("encode {format}: {e}")))?;
        Ok(out.into_inner())
    }
}

#[cfg(feature = "avif")]
fn encode_avif(
    out: &mut Cursor<Vec<u8>>,
    buf: &PixelBuffer,
    quality: u8,
) -> image::ImageResult<()> {
    image::codecs::avif::AvifEncoder::new_with_speed_quality(out, 6, quality.clamp(1, 100))
        .write_image(buf.data(), buf.width(), buf.height(), ExtendedColorType::Rgba8)
}

#[cfg(not(feature = "avif"))]
fn encode_avif(
    _out: &mut Cursor<Vec<u8>>,
    _buf: &PixelBuffer,
    _quality: u8,
) -> image::ImageResult<()> {
    Err(image::ImageError::Unsupported(
        image::error::UnsupportedError::from_format_and_kind(
            image::ImageFormat::Avif.into(),
            image::error::UnsupportedErrorKind::Format(image::ImageFormat::Avif.into()),
        ),
    ))
}

/// Composite straight RGBA over an opaque background, dropping alpha.
fn flatten_rgb(buf: &PixelBuffer, bg: [u8; 3]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(buf.pixel_count() as usize * 3);
    for px in buf.data().chunks_exact(4) {
        let a = u32::from(px[3]);
        for c in 0..3 {
            let v = u32::from(px[c]) * a + u32::from(bg[c]) * (255 - a);
            rgb.push(((v + 127) / 255) as u8);
        }
    }
    rgb
}

/// Resize `surface` to the requested size when needed and encode it.
///
/// When the encoder cannot produce the requested format the export falls back to WebP and
/// reports it through [`Exported::warning`]; only a failure of the fallback is an error.
#[tracing::instrument(skip(surface, encoder), fields(width = surface.width(), height = surface.height()))]
pub fn export(
    surface: &PixelBuffer,
    request: &RenderRequest,
    encoder: &dyn ExportEncoder,
) -> RetouchResult<Exported> {
    request.validate()?;
    let sized = resize_exact(surface, request.width, request.height)?;

    let (format, warning) = if encoder.supports(request.format) {
        (request.format, None)
    } else if encoder.supports(ExportFormat::WebP) {
        let warning = ExportWarning::FormatFallback {
            requested: request.format,
            used: ExportFormat::WebP,
        };
        tracing::warn!(%warning, "export format fallback");
        (ExportFormat::WebP, Some(warning))
    } else {
        return Err(RetouchError::codec(format!(
            "encoder supports neither {} nor the webp fallback",
            request.format
        )));
    };

    let bytes = encoder.encode(&sized, format, request.quality, request.background)?;
    tracing::debug!(bytes = bytes.len(), %format, "export encoded");
    Ok(Exported {
        bytes,
        format,
        width: sized.width(),
        height: sized.height(),
        warning,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/export.rs"]
mod tests;
