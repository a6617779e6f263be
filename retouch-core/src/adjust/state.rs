use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{RetouchError, RetouchResult};

/// Named tone, color, spatial and orientation adjustments.
///
/// Plain value type: every mutation produces a new state, so a captured state (history entry,
/// in-flight render job) never changes underneath its holder.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdjustmentState {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub exposure: f32,
    pub highlights: f32,
    pub shadows: f32,
    /// Degrees, -180..180.
    pub hue: f32,
    pub temperature: f32,
    pub tint: f32,
    pub vibrance: f32,
    pub sharpness: f32,
    pub blur: f32,
    pub clarity: f32,
    pub dehaze: f32,
    pub grain: f32,
    pub vignette_amount: f32,
    /// Fraction of the half-diagonal that stays untouched, 0..1.
    pub vignette_radius: f32,
    /// Degrees, applied at draw time only.
    pub rotation: f32,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl Default for AdjustmentState {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            exposure: 0.0,
            highlights: 0.0,
            shadows: 0.0,
            hue: 0.0,
            temperature: 0.0,
            tint: 0.0,
            vibrance: 0.0,
            sharpness: 0.0,
            blur: 0.0,
            clarity: 0.0,
            dehaze: 0.0,
            grain: 0.0,
            vignette_amount: 0.0,
            vignette_radius: 0.5,
            rotation: 0.0,
            flip_horizontal: false,
            flip_vertical: false,
        }
    }
}

/// A single field-level change to an [`AdjustmentState`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", tag = "field", content = "value")]
pub enum Adjust {
    Brightness(f32),
    Contrast(f32),
    Saturation(f32),
    Exposure(f32),
    Highlights(f32),
    Shadows(f32),
    Hue(f32),
    Temperature(f32),
    Tint(f32),
    Vibrance(f32),
    Sharpness(f32),
    Blur(f32),
    Clarity(f32),
    Dehaze(f32),
    Grain(f32),
    VignetteAmount(f32),
    VignetteRadius(f32),
    Rotation(f32),
    FlipHorizontal(bool),
    FlipVertical(bool),
}

/// Partial update: every `Some` field overrides the base state on merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AdjustmentPatch {
    pub brightness: Option<f32>,
    pub contrast: Option<f32>,
    pub saturation: Option<f32>,
    pub exposure: Option<f32>,
    pub highlights: Option<f32>,
    pub shadows: Option<f32>,
    pub hue: Option<f32>,
    pub temperature: Option<f32>,
    pub tint: Option<f32>,
    pub vibrance: Option<f32>,
    pub sharpness: Option<f32>,
    pub blur: Option<f32>,
    pub clarity: Option<f32>,
    pub dehaze: Option<f32>,
    pub grain: Option<f32>,
    pub vignette_amount: Option<f32>,
    pub vignette_radius: Option<f32>,
    pub rotation: Option<f32>,
    pub flip_horizontal: Option<bool>,
    pub flip_vertical: Option<bool>,
}

impl AdjustmentPatch {
    /// Parse a JSON object with camelCase keys. Unknown keys are rejected.
    pub fn from_json(s: &str) -> RetouchResult<Self> {
        serde_json::from_str(s).map_err(|e| RetouchError::serde(e.to_string()))
    }

    pub fn from_path(path: &Path) -> RetouchResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read adjustments '{}'", path.display()))?;
        Self::from_json(&s)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl AdjustmentState {
    /// Copy of `self` with one field replaced. Rotation is normalized into `[0, 360)`.
    #[must_use]
    pub fn with(mut self, adjust: Adjust) -> Self {
        match adjust {
            Adjust::Brightness(v) => self.brightness = v,
            Adjust::Contrast(v) => self.contrast = v,
            Adjust::Saturation(v) => self.saturation = v,
            Adjust::Exposure(v) => self.exposure = v,
            Adjust::Highlights(v) => self.highlights = v,
            Adjust::Shadows(v) => self.shadows = v,
            Adjust::Hue(v) => self.hue = v,
            Adjust::Temperature(v) => self.temperature = v,
            Adjust::Tint(v) => self.tint = v,
            Adjust::Vibrance(v) => self.vibrance = v,
            Adjust::Sharpness(v) => self.sharpness = v,
            Adjust::Blur(v) => self.blur = v,
            Adjust::Clarity(v) => self.clarity = v,
            Adjust::Dehaze(v) => self.dehaze = v,
            Adjust::Grain(v) => self.grain = v,
            Adjust::VignetteAmount(v) => self.vignette_amount = v,
            Adjust::VignetteRadius(v) => self.vignette_radius = v,
            Adjust::Rotation(v) => self.rotation = normalize_degrees(v),
            Adjust::FlipHorizontal(v) => self.flip_horizontal = v,
            Adjust::FlipVertical(v) => self.flip_vertical = v,
        }
        self
    }

    /// Copy of `self` with every `Some` field of `patch` applied.
    #[must_use]
    pub fn merged(self, patch: &AdjustmentPatch) -> Self {
        let fields = [
            patch.brightness.map(Adjust::Brightness),
            patch.contrast.map(Adjust::Contrast),
            patch.saturation.map(Adjust::Saturation),
            patch.exposure.map(Adjust::Exposure),
            patch.highlights.map(Adjust::Highlights),
            patch.shadows.map(Adjust::Shadows),
            patch.hue.map(Adjust::Hue),
            patch.temperature.map(Adjust::Temperature),
            patch.tint.map(Adjust::Tint),
            patch.vibrance.map(Adjust::Vibrance),
            patch.sharpness.map(Adjust::Sharpness),
            patch.blur.map(Adjust::Blur),
            patch.clarity.map(Adjust::Clarity),
            patch.dehaze.map(Adjust::Dehaze),
            patch.grain.map(Adjust::Grain),
            patch.vignette_amount.map(Adjust::VignetteAmount),
            patch.vignette_radius.map(Adjust::VignetteRadius),
            patch.rotation.map(Adjust::Rotation),
            patch.flip_horizontal.map(Adjust::FlipHorizontal),
            patch.flip_vertical.map(Adjust::FlipVertical),
        ];
        fields.into_iter().flatten().fold(self, Self::with)
    }

    #[must_use]
    pub fn rotate_cw(self) -> Self {
        self.with(Adjust::Rotation(self.rotation + 90.0))
    }

    #[must_use]
    pub fn rotate_ccw(self) -> Self {
        self.with(Adjust::Rotation(self.rotation - 90.0))
    }

    /// Check every field against its domain.
    pub fn validate(&self) -> RetouchResult<()> {
        let ranges = [
            ("brightness", self.brightness, -100.0, 100.0),
            ("contrast", self.contrast, -100.0, 100.0),
            ("saturation", self.saturation, -100.0, 100.0),
            ("exposure", self.exposure, -100.0, 100.0),
            ("highlights", self.highlights, -100.0, 100.0),
            ("shadows", self.shadows, -100.0, 100.0),
            ("hue", self.hue, -180.0, 180.0),
            ("temperature", self.temperature, -100.0, 100.0),
            ("tint", self.tint, -100.0, 100.0),
            ("vibrance", self.vibrance, -100.0, 100.0),
            ("sharpness", self.sharpness, 0.0, 100.0),
            ("blur", self.blur, 0.0, 100.0),
            ("clarity", self.clarity, 0.0, 100.0),
            ("dehaze", self.dehaze, 0.0, 100.0),
            ("grain", self.grain, 0.0, 100.0),
            ("vignetteAmount", self.vignette_amount, 0.0, 100.0),
            ("vignetteRadius", self.vignette_radius, 0.0, 1.0),
            ("rotation", self.rotation, 0.0, 360.0),
        ];
        for (name, v, lo, hi) in ranges {
            if !v.is_finite() {
                return Err(RetouchError::validation(format!("{name} must be finite")));
            }
            if v < lo || v > hi {
                return Err(RetouchError::validation(format!(
                    "{name} must be within [{lo}, {hi}], got {v}"
                )));
            }
        }
        Ok(())
    }

    /// True when the pixel pipeline would return its input unchanged.
    ///
    /// Orientation fields are ignored: they only affect drawing.
    pub fn is_pixel_identity(&self) -> bool {
        let neutral = Self {
            vignette_radius: self.vignette_radius,
            rotation: self.rotation,
            flip_horizontal: self.flip_horizontal,
            flip_vertical: self.flip_vertical,
            ..Self::default()
        };
        *self == neutral
    }

    pub fn from_json(s: &str) -> RetouchResult<Self> {
        let state: Self = serde_json::from_str(s).map_err(|e| RetouchError::serde(e.to_string()))?;
        state.validate()?;
        Ok(state)
    }

    pub fn to_json(&self) -> RetouchResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| RetouchError::serde(e.to_string()))
    }
}

fn normalize_degrees(v: f32) -> f32 {
    if !v.is_finite() {
        return v;
    }
    let r = v.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if r >= 360.0 { 0.0 } else { r }
}

#[cfg(test)]
#[path = "../../tests/unit/adjust/state.rs"]
mod tests;
