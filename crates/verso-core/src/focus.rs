//! Camera focus: which panel the camera flies to, and the damped flight.

use crate::layout::{Layer, Orientation, PanelRef};
use crate::tuning::ByOrientation;
use glam::DVec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoomPreset {
    Overview,
    FrontLayer,
    BackLayer,
}

impl From<Layer> for ZoomPreset {
    fn from(layer: Layer) -> Self {
        match layer {
            Layer::Front => Self::FrontLayer,
            Layer::Back => Self::BackLayer,
        }
    }
}

/// Camera distances per preset. Every zoom reset reads from here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTable {
    pub overview: ByOrientation<f64>,
    pub front_layer: ByOrientation<f64>,
    pub back_layer: ByOrientation<f64>,
}

impl ZoomTable {
    pub fn zoom(&self, preset: ZoomPreset, orientation: Orientation) -> f64 {
        match preset {
            ZoomPreset::Overview => self.overview.get(orientation),
            ZoomPreset::FrontLayer => self.front_layer.get(orientation),
            ZoomPreset::BackLayer => self.back_layer.get(orientation),
        }
    }

    /// Wheel zoom bounds: a little closer than the front preset, a little
    /// further than the overview.
    pub fn wheel_range(&self, orientation: Orientation) -> (f64, f64) {
        (
            self.zoom(ZoomPreset::FrontLayer, orientation) - 0.5,
            self.zoom(ZoomPreset::Overview, orientation) + 1.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTuning {
    pub damping: f64,
    pub epsilon: f64,
    pub wheel_step: f64,
}

impl Default for AnimationTuning {
    fn default() -> Self {
        Self {
            damping: 0.1,
            epsilon: 0.01,
            wheel_step: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Focus {
    #[default]
    Unfocused,
    Focused(PanelRef),
}

impl Focus {
    pub fn panel(&self) -> Option<PanelRef> {
        match self {
            Self::Unfocused => None,
            Self::Focused(panel) => Some(*panel),
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.panel().map(|p| p.index)
    }

    pub fn layer(&self) -> Option<Layer> {
        self.panel().map(|p| p.layer)
    }

    pub fn is(&self, panel: PanelRef) -> bool {
        self.panel() == Some(panel)
    }

    fn preset(&self) -> ZoomPreset {
        self.layer().map_or(ZoomPreset::Overview, ZoomPreset::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTarget {
    pub position: DVec3,
    pub zoom: f64,
    pub animating: bool,
}

impl AnimationTarget {
    /// Where the camera ends up: the target's x/y at the target zoom.
    pub fn destination(&self) -> DVec3 {
        DVec3::new(self.position.x, self.position.y, self.zoom)
    }
}

pub struct FocusController {
    focus: Focus,
    target: AnimationTarget,
    camera: DVec3,
    zoom: ZoomTable,
    animation: AnimationTuning,
}

impl FocusController {
    pub fn new(zoom: ZoomTable, animation: AnimationTuning, orientation: Orientation) -> Self {
        let overview = zoom.zoom(ZoomPreset::Overview, orientation);
        Self {
            focus: Focus::Unfocused,
            target: AnimationTarget {
                position: DVec3::ZERO,
                zoom: overview,
                animating: false,
            },
            camera: DVec3::new(0.0, 0.0, overview),
            zoom,
            animation,
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn target(&self) -> &AnimationTarget {
        &self.target
    }

    pub fn camera(&self) -> DVec3 {
        self.camera
    }

    pub fn zoom_table(&self) -> &ZoomTable {
        &self.zoom
    }

    /// A click on a panel: focus it, toggle it off, or switch to it.
    pub fn activate(
        &mut self,
        panel: PanelRef,
        item_position: DVec3,
        orientation: Orientation,
    ) -> Focus {
        if self.focus.is(panel) {
            log::debug!("Unfocusing {panel}");
            self.overview(orientation);
        } else {
            log::debug!("Focusing {panel}");
            self.focus = Focus::Focused(panel);
            let zoom = self.zoom.zoom(panel.layer.into(), orientation);
            self.retarget(item_position, zoom);
        }
        self.focus
    }

    /// A click that hit nothing. Only honoured while interaction is enabled.
    pub fn background_click(&mut self, orientation: Orientation, interaction_enabled: bool) -> bool {
        if !interaction_enabled {
            return false;
        }
        if self.focus != Focus::Unfocused {
            log::debug!("Background click, back to overview");
        }
        self.overview(orientation);
        true
    }

    pub fn reset(&mut self, orientation: Orientation) {
        self.overview(orientation);
    }

    /// Recomputes the target after a layout change, keeping the focus.
    pub fn refresh(&mut self, item_position: Option<DVec3>, orientation: Orientation) {
        match (self.focus, item_position) {
            (Focus::Focused(_), Some(position)) => {
                let zoom = self.zoom.zoom(self.focus.preset(), orientation);
                self.retarget(position, zoom);
            }
            _ => self.overview(orientation),
        }
    }

    /// Jumps straight to the target, e.g. on the first layout pass.
    pub fn snap(&mut self) {
        self.camera = self.target.destination();
        self.target.animating = false;
    }

    fn overview(&mut self, orientation: Orientation) {
        self.focus = Focus::Unfocused;
        let zoom = self.zoom.zoom(ZoomPreset::Overview, orientation);
        self.retarget(DVec3::ZERO, zoom);
    }

    fn retarget(&mut self, position: DVec3, zoom: f64) {
        self.target = AnimationTarget {
            position,
            zoom,
            animating: true,
        };
    }

    /// One frame of camera flight. Returns whether the camera moved.
    pub fn step(&mut self) -> bool {
        if !self.target.animating {
            return false;
        }

        let destination = self.target.destination();
        self.camera = self.camera.lerp(destination, self.animation.damping);
        if self.camera.distance(destination) < self.animation.epsilon {
            self.target.animating = false;
        }
        true
    }

    /// Wheel zoom moves the camera directly, bypassing the flight target.
    pub fn wheel(&mut self, ticks: f64, orientation: Orientation, scene_rotating: bool) -> bool {
        if scene_rotating {
            return false;
        }
        let (near, far) = self.zoom.wheel_range(orientation);
        let z = (self.camera.z + ticks * self.animation.wheel_step).clamp(near, far);
        let changed = z != self.camera.z;
        self.camera.z = z;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Variant;

    fn controller() -> FocusController {
        let tuning = Variant::Gallery.tuning();
        FocusController::new(tuning.zoom, tuning.animation, Orientation::Landscape)
    }

    #[test]
    fn test_same_click_twice_returns_to_overview() {
        let mut fc = controller();
        let panel = PanelRef::front(2);

        fc.activate(panel, DVec3::new(1.0, 0.5, 0.0), Orientation::Landscape);
        assert_eq!(fc.focus(), Focus::Focused(panel));
        assert_eq!(fc.target().zoom, 3.0);

        fc.activate(panel, DVec3::new(1.0, 0.5, 0.0), Orientation::Landscape);
        assert_eq!(fc.focus(), Focus::Unfocused);
        assert_eq!(fc.focus().index(), None);
        assert_eq!(fc.focus().layer(), None);
        assert_eq!(fc.target().zoom, 5.0);
        assert_eq!(fc.target().position, DVec3::ZERO);
    }

    #[test]
    fn test_switching_focus_skips_overview() {
        let mut fc = controller();
        fc.activate(PanelRef::front(0), DVec3::new(-2.0, 0.0, 0.0), Orientation::Portrait);
        fc.activate(PanelRef::back(0), DVec3::new(3.0, 1.0, -1.0), Orientation::Portrait);

        assert_eq!(fc.focus(), Focus::Focused(PanelRef::back(0)));
        assert_eq!(fc.target().zoom, 6.0);
        assert_eq!(fc.target().position.x, 3.0);
    }

    #[test]
    fn test_focus_is_exclusive() {
        let mut fc = controller();
        let clicks = [
            PanelRef::front(1),
            PanelRef::back(1),
            PanelRef::back(1),
            PanelRef::front(4),
            PanelRef::front(3),
        ];
        for panel in clicks {
            let focus = fc.activate(panel, DVec3::ZERO, Orientation::Landscape);
            match focus {
                Focus::Unfocused => {}
                Focus::Focused(p) => assert_eq!(p, panel),
            }
        }
        assert_eq!(fc.focus(), Focus::Focused(PanelRef::front(3)));
    }

    #[test]
    fn test_background_click_needs_interaction() {
        let mut fc = controller();
        fc.activate(PanelRef::front(1), DVec3::ONE, Orientation::Landscape);

        assert!(!fc.background_click(Orientation::Landscape, false));
        assert_eq!(fc.focus(), Focus::Focused(PanelRef::front(1)));

        assert!(fc.background_click(Orientation::Landscape, true));
        assert_eq!(fc.focus(), Focus::Unfocused);
        assert_eq!(fc.target().zoom, 5.0);
    }

    #[test]
    fn test_animation_converges() {
        let mut fc = controller();
        fc.camera = DVec3::new(0.0, 0.0, 5.0);
        fc.retarget(DVec3::new(2.0, 3.0, 0.0), 5.0);

        let destination = DVec3::new(2.0, 3.0, 5.0);
        let mut last = fc.camera().distance(destination);
        let mut frames = 0;
        while fc.target().animating {
            assert!(fc.step());
            let d = fc.camera().distance(destination);
            assert!(d < last);
            last = d;
            frames += 1;
            assert!(frames <= 80, "still animating after {frames} frames");
        }

        assert!(last < 0.01);
        assert!(frames >= 50);
        assert!(!fc.step());
    }

    #[test]
    fn test_wheel_is_clamped_and_blocked_while_rotating() {
        let mut fc = controller();
        for _ in 0..20 {
            fc.wheel(1.0, Orientation::Landscape, false);
        }
        assert_eq!(fc.camera().z, 6.0);

        for _ in 0..20 {
            fc.wheel(-1.0, Orientation::Landscape, false);
        }
        assert_eq!(fc.camera().z, 2.5);

        assert!(!fc.wheel(1.0, Orientation::Landscape, true));
        assert_eq!(fc.camera().z, 2.5);
    }

    #[test]
    fn test_refresh_keeps_focus_and_uses_new_orientation() {
        let mut fc = controller();
        fc.activate(PanelRef::back(2), DVec3::ZERO, Orientation::Landscape);
        fc.refresh(Some(DVec3::new(0.5, 0.5, 0.0)), Orientation::Portrait);

        assert_eq!(fc.focus(), Focus::Focused(PanelRef::back(2)));
        assert_eq!(fc.target().zoom, 6.0);
        assert_eq!(fc.target().position, DVec3::new(0.5, 0.5, 0.0));
    }
}
