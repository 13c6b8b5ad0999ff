use crate::error::SceneError;
use crate::layout::PanelRef;
use glam::{DQuat, DVec3};

/// Two drag-accumulated angles in radians. Never wrapped or clamped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    /// Driven by horizontal drags; turns about the Y axis.
    pub horizontal: f64,
    /// Driven by vertical drags; turns about the X axis.
    pub vertical: f64,
}

impl Rotation {
    pub const IDENTITY: Self = Self {
        horizontal: 0.0,
        vertical: 0.0,
    };

    pub fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn accumulate(&mut self, dx: f64, dy: f64) {
        self.horizontal += dx;
        self.vertical += dy;
    }

    pub fn quat(&self) -> DQuat {
        DQuat::from_rotation_x(self.vertical) * DQuat::from_rotation_y(self.horizontal)
    }
}

/// How far a back panel swings away from its slot as its paired front
/// panel turns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackOffset {
    pub max_offset: f64,
    /// Constant depth that keeps back panels behind the front strip.
    pub depth: f64,
}

impl BackOffset {
    pub fn offset(&self, rotation: Rotation) -> DVec3 {
        DVec3::new(
            rotation.vertical.sin() * self.max_offset,
            rotation.horizontal.sin() * self.max_offset,
            self.depth,
        )
    }

    pub fn apply(&self, base: DVec3, rotation: Rotation) -> DVec3 {
        base + self.offset(rotation)
    }
}

/// Per-panel rotation state for the front layer.
#[derive(Debug, Clone, Default)]
pub struct RotationModel {
    rotations: Vec<Rotation>,
}

impl RotationModel {
    pub fn new(count: usize) -> Self {
        Self {
            rotations: vec![Rotation::IDENTITY; count],
        }
    }

    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rotation> {
        self.rotations.get(index).copied()
    }

    pub fn rotate(&mut self, index: usize, dx: f64, dy: f64) -> Result<Rotation, SceneError> {
        let rotation = self
            .rotations
            .get_mut(index)
            .ok_or(SceneError::NoSuchPanel(PanelRef::front(index)))?;
        rotation.accumulate(dx, dy);
        Ok(*rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_accumulates_without_loss() {
        let mut model = RotationModel::new(5);
        for _ in 0..10 {
            model.rotate(3, 0.1, 0.0).unwrap();
        }
        let r = model.get(3).unwrap();
        assert!((r.horizontal - 1.0).abs() < 1e-12);
        assert_eq!(r.vertical, 0.0);
        assert_eq!(model.get(2), Some(Rotation::IDENTITY));
    }

    #[test]
    fn test_rotation_is_never_wrapped() {
        let mut model = RotationModel::new(1);
        for _ in 0..100 {
            model.rotate(0, 0.5, -0.5).unwrap();
        }
        let r = model.get(0).unwrap();
        assert!((r.horizontal - 50.0).abs() < 1e-9);
        assert!((r.vertical + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_out_of_range() {
        let mut model = RotationModel::new(5);
        assert_eq!(
            model.rotate(5, 0.1, 0.1),
            Err(SceneError::NoSuchPanel(PanelRef::front(5)))
        );
    }

    #[test]
    fn test_back_position_follows_rotation() {
        let back = BackOffset {
            max_offset: 2.0,
            depth: -1.0,
        };
        let base = DVec3::new(0.5, -1.25, 0.0);
        let (rx, ry) = (0.7, -1.3);
        let derived = back.apply(base, Rotation::new(rx, ry));
        assert_eq!(
            derived,
            base + DVec3::new(ry.sin() * 2.0, rx.sin() * 2.0, -1.0)
        );
        assert_eq!(back.apply(base, Rotation::IDENTITY), base + DVec3::new(0.0, 0.0, -1.0));
    }
}
