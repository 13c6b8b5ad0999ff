use crate::layout::Extent;
use glam::{DVec2, DVec3};

/// Drawing surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn aspect(&self) -> f64 {
        if self.is_empty() {
            1.0
        } else {
            self.width / self.height
        }
    }

    /// Pixel position to normalized device coordinates (y up, -1..1).
    pub fn ndc(&self, pixel: DVec2) -> DVec2 {
        DVec2::new(
            pixel.x / self.width * 2.0 - 1.0,
            1.0 - pixel.y / self.height * 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Perspective camera looking down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: DVec3,
    /// Vertical field of view in radians.
    pub fov_y: f64,
}

impl Camera {
    pub fn new(position: DVec3, fov_degrees: f64) -> Self {
        Self {
            position,
            fov_y: fov_degrees.to_radians(),
        }
    }

    fn half_tan(&self) -> f64 {
        (self.fov_y / 2.0).tan()
    }

    /// World-space area visible on a plane `distance` in front of the camera.
    pub fn extent_at(&self, distance: f64, aspect: f64) -> Extent {
        let height = 2.0 * self.half_tan() * distance;
        Extent::new(height * aspect, height)
    }

    pub fn ray(&self, ndc: DVec2, aspect: f64) -> Ray {
        let t = self.half_tan();
        Ray {
            origin: self.position,
            direction: DVec3::new(ndc.x * t * aspect, ndc.y * t, -1.0).normalize(),
        }
    }

    /// World point to pixel position; `None` for points behind the camera.
    pub fn project(&self, point: DVec3, viewport: Viewport) -> Option<DVec2> {
        let depth = self.position.z - point.z;
        if depth <= f64::EPSILON || viewport.is_empty() {
            return None;
        }
        let scale = (viewport.height / 2.0) / (self.half_tan() * depth);
        Some(DVec2::new(
            viewport.width / 2.0 + (point.x - self.position.x) * scale,
            viewport.height / 2.0 - (point.y - self.position.y) * scale,
        ))
    }
}
