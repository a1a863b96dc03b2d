//! Pan/zoom transform between screen space and image space.
//!
//! All graph geometry lives in image coordinates. The [`ViewTransform`] maps
//! those to screen coordinates as `screen = image * scale + (x, y)`, measured
//! from the canvas container's origin. Panning and zooming only ever replace
//! the transform; they never touch stored geometry.

use crate::config::EditorConfig;
use serde::{Deserialize, Serialize};

/// A 2D coordinate. Which space it lives in depends on who produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> f32 {
        self.distance_sq(other).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// Smallest and largest allowed scale.
pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 10.0;

/// Affine image→screen map: `screen = image * scale + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform { x: 0.0, y: 0.0, scale: 1.0 };

    pub fn new(x: f32, y: f32, scale: f32) -> Self {
        Self { x, y, scale }.sanitized()
    }

    /// Copy with the scale forced into `MIN_SCALE..=MAX_SCALE`. A non-finite
    /// component resets to the identity value.
    pub fn sanitized(&self) -> Self {
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        Self {
            x: finite_or(self.x, 0.0),
            y: finite_or(self.y, 0.0),
            scale: finite_or(self.scale, 1.0).clamp(MIN_SCALE, MAX_SCALE),
        }
    }

    /// Translation part of the transform.
    pub fn offset(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Map a pointer position to image coordinates.
    ///
    /// `origin` is the canvas container's top-left corner in the same space
    /// as `screen` (e.g. window coordinates).
    pub fn to_image_coords(&self, screen: Point, origin: Point) -> Point {
        let s = self.safe_scale();
        Point::new(
            (screen.x - origin.x - self.x) / s,
            (screen.y - origin.y - self.y) / s,
        )
    }

    /// Forward map, inverse of [`to_image_coords`](Self::to_image_coords).
    pub fn to_screen_coords(&self, image: Point, origin: Point) -> Point {
        Point::new(
            image.x * self.scale + self.x + origin.x,
            image.y * self.scale + self.y + origin.y,
        )
    }

    /// Convert a screen-space length (hit radius, stroke width) into image units.
    pub fn screen_len_to_image(&self, len: f32) -> f32 {
        len / self.safe_scale()
    }

    /// Zoom towards the pointer.
    ///
    /// `pointer` is relative to the canvas container. The image point under
    /// the pointer stays under the pointer after rescaling.
    pub fn zoomed(&self, pointer: Point, wheel_delta: f32, config: &EditorConfig) -> Self {
        let (min, max) = config.scale_limits();
        let new_scale = (self.scale * (1.0 - wheel_delta * config.zoom_sensitivity)).clamp(min, max);
        self.zoomed_to(pointer, new_scale)
    }

    /// Rescale to `new_scale` keeping the point under `pointer` fixed.
    pub fn zoomed_to(&self, pointer: Point, new_scale: f32) -> Self {
        if !new_scale.is_finite() || new_scale <= 0.0 || new_scale == self.scale {
            return *self;
        }
        let ratio = new_scale / self.safe_scale();
        Self {
            x: pointer.x - (pointer.x - self.x) * ratio,
            y: pointer.y - (pointer.y - self.y) * ratio,
            scale: new_scale,
        }
    }

    /// Translate by a screen-space delta. Scale is unchanged.
    pub fn panned(&self, delta: Point) -> Self {
        Self { x: self.x + delta.x, y: self.y + delta.y, scale: self.scale }
    }

    /// Transform that centers an image of `image_size` inside `viewport_size`,
    /// scaled down (or up) to fit, within the configured scale limits.
    pub fn fit_image(image_size: (f32, f32), viewport_size: (f32, f32), config: &EditorConfig) -> Self {
        let (iw, ih) = image_size;
        let (vw, vh) = viewport_size;
        if iw <= 0.0 || ih <= 0.0 || vw <= 0.0 || vh <= 0.0 {
            return Self::IDENTITY;
        }
        let (min, max) = config.scale_limits();
        let scale = (vw / iw).min(vh / ih).clamp(min, max);
        Self {
            x: (vw - iw * scale) / 2.0,
            y: (vh - ih * scale) / 2.0,
            scale,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    fn safe_scale(&self) -> f32 {
        if self.scale > 0.0 { self.scale } else { 1.0 }
    }
}
