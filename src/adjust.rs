//! Brightness/contrast/saturation adjustment of the base image.
//!
//! Each adjustment is an independent percentage multiplier with CSS filter
//! semantics, applied in brightness → contrast → saturation order on
//! straight-alpha RGBA8. 100/100/100 is a byte-identical identity so a
//! neutral render reproduces the base image exactly.

/// Percentage multipliers, 100 = no change. Values are taken as-is; range
/// policy (the UI's 50–200 sliders) is the caller's concern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorAdjust {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl ColorAdjust {
    pub const NEUTRAL: ColorAdjust = ColorAdjust {
        brightness: 100.0,
        contrast: 100.0,
        saturation: 100.0,
    };

    pub fn is_neutral(self) -> bool {
        self == Self::NEUTRAL
    }
}

/// Apply the adjustment in place to straight-alpha RGBA8 pixels. Alpha is
/// untouched; color channels are clamped to [0, 255].
pub fn apply_in_place(rgba8: &mut [u8], adjust: ColorAdjust) {
    if adjust.is_neutral() {
        return;
    }

    let b = adjust.brightness / 100.0;
    let c = adjust.contrast / 100.0;
    let s = adjust.saturation / 100.0;

    for px in rgba8.chunks_exact_mut(4) {
        let mut r = f32::from(px[0]);
        let mut g = f32::from(px[1]);
        let mut bl = f32::from(px[2]);

        r *= b;
        g *= b;
        bl *= b;

        r = (r - 127.5) * c + 127.5;
        g = (g - 127.5) * c + 127.5;
        bl = (bl - 127.5) * c + 127.5;

        // Rec. 709 luma as the desaturation target.
        let luma = 0.2126 * r + 0.7152 * g + 0.0722 * bl;
        r = luma + (r - luma) * s;
        g = luma + (g - luma) * s;
        bl = luma + (bl - luma) * s;

        px[0] = r.clamp(0.0, 255.0).round() as u8;
        px[1] = g.clamp(0.0, 255.0).round() as u8;
        px[2] = bl.clamp(0.0, 255.0).round() as u8;
    }
}
