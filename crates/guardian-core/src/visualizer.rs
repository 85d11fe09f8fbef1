//! Stylized music bars drawn along the bottom edge while the finale track
//! plays. The shape is synthetic: it is driven by the frame counter, not by
//! spectrum data.

use crate::constants::*;
use crate::particles::Extent;

/// One vertical bar, anchored to the bottom of the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// HSL hue in degrees, 0..360
    pub hue: f32,
}

impl Bar {
    /// Top edge in canvas coordinates (y grows downward).
    pub fn top(&self, extent: Extent) -> f32 {
        extent.height - self.height
    }
}

/// Lay out `count` bars for `frame` into `out` (cleared first).
///
/// Heights are a sine wave over `(frame, index)` plus bounded jitter, and never
/// exceed `BAR_MAX_HEIGHT_FRACTION` of the surface height.
pub fn layout_bars(frame: u64, extent: Extent, count: usize, out: &mut Vec<Bar>) {
    out.clear();
    if count == 0 || extent.width <= 0.0 || extent.height <= 0.0 {
        return;
    }
    let slot = extent.width / count as f32;
    let max_h = extent.height * BAR_MAX_HEIGHT_FRACTION;
    let t = frame as f32;
    for i in 0..count {
        let phase = t * 0.08 + i as f32 * 0.35;
        let wave = phase.sin() * 0.5 + 0.5;
        let jitter = unit_noise(frame, i as u64);
        let level = wave * (1.0 - BAR_JITTER_FRACTION) + jitter * BAR_JITTER_FRACTION;
        out.push(Bar {
            x: i as f32 * slot,
            width: (slot - 2.0).max(1.0),
            height: level.clamp(0.0, 1.0) * max_h,
            hue: (t * BAR_HUE_SPEED + i as f32 * (360.0 / count as f32)) % 360.0,
        });
    }
}

// splitmix64 finalizer mapped to [0, 1)
#[inline]
fn unit_noise(frame: u64, index: u64) -> f32 {
    let mut z = frame
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(index.wrapping_mul(0xD1B5_4A32_D192_ED03));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 40) as f32 / (1u64 << 24) as f32
}
