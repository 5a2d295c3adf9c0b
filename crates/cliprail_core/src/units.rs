use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

pub const DEFAULT_PIXELS_PER_SECOND: f64 = 40.0;
pub const DEFAULT_FRAMES_PER_SECOND: f64 = 30.0;

/// Narrowest a clip may ever be on a track (2 s at the default scale).
pub const MIN_CLIP_WIDTH: Px = Px(80);

// ---------------------------------------------------------------------------
// Px
// ---------------------------------------------------------------------------

/// A horizontal offset or width on the timeline, in whole pixels.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct Px(pub i64);

impl Px {
    pub const ZERO: Self = Self(0);

    /// Clamp to the timeline origin.
    pub fn non_negative(self) -> Self {
        Self(self.0.max(0))
    }
}

impl Add for Px {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Px {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Px {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Px {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Px {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<i64> for Px {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<i64> for Px {
    type Output = Self;
    fn div(self, rhs: i64) -> Self {
        Self(self.0 / rhs)
    }
}

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

// ---------------------------------------------------------------------------
// Scale
// ---------------------------------------------------------------------------

/// Fixed pixel and frame density used to convert between timeline pixels,
/// seconds and frames.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Scale {
    pub pixels_per_second: f64,
    pub frames_per_second: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            pixels_per_second: DEFAULT_PIXELS_PER_SECOND,
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
        }
    }
}

impl Scale {
    pub fn new(pixels_per_second: f64, frames_per_second: f64) -> Self {
        Self {
            pixels_per_second,
            frames_per_second,
        }
    }

    pub fn px_to_seconds(&self, px: Px) -> f64 {
        px.0 as f64 / self.pixels_per_second
    }

    pub fn px_to_frames(&self, px: Px) -> i64 {
        (self.px_to_seconds(px) * self.frames_per_second).round() as i64
    }

    /// Rounded to the nearest whole pixel.
    pub fn seconds_to_px(&self, seconds: f64) -> Px {
        Px((seconds * self.pixels_per_second).round() as i64)
    }

    pub fn seconds_to_frames(&self, seconds: f64) -> i64 {
        (seconds * self.frames_per_second).round() as i64
    }

    pub fn frames_to_seconds(&self, frames: i64) -> f64 {
        frames as f64 / self.frames_per_second
    }
}
