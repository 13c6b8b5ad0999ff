use crate::camera::Ray;
use crate::layout::PanelRef;
use glam::{DQuat, DVec2, DVec3};

/// A flat rectangle that can be clicked or dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegion {
    pub panel: PanelRef,
    pub center: DVec3,
    pub half_extents: DVec2,
    pub rotation: DQuat,
}

impl HitRegion {
    /// Distance along `ray` to the rectangle, if the ray crosses it.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let inverse = self.rotation.inverse();
        let origin = inverse * (ray.origin - self.center);
        let direction = inverse * ray.direction;

        if direction.z.abs() < 1e-12 {
            return None;
        }
        let t = -origin.z / direction.z;
        if t <= 0.0 {
            return None;
        }

        let local = origin + direction * t;
        (local.x.abs() <= self.half_extents.x && local.y.abs() <= self.half_extents.y).then_some(t)
    }
}

/// Every interactive panel in both layers, rebuilt whenever they move.
#[derive(Debug, Clone, Default)]
pub struct HitRegistry {
    regions: Vec<HitRegion>,
}

impl HitRegistry {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn register(&mut self, region: HitRegion) {
        self.regions.push(region);
    }

    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Nearest panel along the ray.
    pub fn ray_cast(&self, ray: &Ray) -> Option<PanelRef> {
        self.regions
            .iter()
            .filter_map(|region| region.intersect(ray).map(|t| (t, region.panel)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, panel)| panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(panel: PanelRef, center: DVec3) -> HitRegion {
        HitRegion {
            panel,
            center,
            half_extents: DVec2::new(0.5, 0.5),
            rotation: DQuat::IDENTITY,
        }
    }

    fn ray_from(x: f64, y: f64) -> Ray {
        Ray {
            origin: DVec3::new(x, y, 5.0),
            direction: DVec3::NEG_Z,
        }
    }

    #[test]
    fn test_nearest_region_wins() {
        let mut registry = HitRegistry::default();
        registry.register(region(PanelRef::back(0), DVec3::new(0.0, 0.0, -1.0)));
        registry.register(region(PanelRef::front(2), DVec3::ZERO));

        assert_eq!(registry.ray_cast(&ray_from(0.1, 0.1)), Some(PanelRef::front(2)));
        assert_eq!(registry.ray_cast(&ray_from(2.0, 0.0)), None);
    }

    #[test]
    fn test_rotated_region_narrows() {
        let mut r = region(PanelRef::front(0), DVec3::ZERO);
        r.rotation = DQuat::from_rotation_y(60f64.to_radians());

        // cos(60deg) halves the visible width
        assert!(r.intersect(&ray_from(0.2, 0.0)).is_some());
        assert!(r.intersect(&ray_from(0.3, 0.0)).is_none());
    }

    #[test]
    fn test_edge_on_region_is_missed() {
        let mut r = region(PanelRef::front(0), DVec3::ZERO);
        r.rotation = DQuat::from_rotation_y(90f64.to_radians());
        assert!(r.intersect(&ray_from(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_clear() {
        let mut registry = HitRegistry::default();
        registry.register(region(PanelRef::front(0), DVec3::ZERO));
        assert_eq!(registry.len(), 1);
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.ray_cast(&ray_from(0.0, 0.0)), None);
    }
}
