use crate::camera::{Camera, Viewport};
use crate::content::{AssetState, Panel, PanelContent};
use crate::error::SceneError;
use crate::focus::{Focus, FocusController, ZoomPreset};
use crate::gesture::{DragEffect, GestureClassifier, Interaction, Release};
use crate::input::PointerEvent;
use crate::layout::{self, DeviceClass, Layer, Orientation, PanelRef, Slot};
use crate::order::PentagonOrder;
use crate::registry::{HitRegion, HitRegistry};
use crate::rotation::{Rotation, RotationModel};
use crate::tuning::Tuning;
use glam::{DQuat, DVec2, DVec3};
use std::time::Duration;

/// One panel as the renderer should draw it, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemTransform {
    pub panel: PanelRef,
    pub position: DVec3,
    pub rotation: DQuat,
    pub width: f64,
    pub height: f64,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub camera: Camera,
    pub items: Vec<ItemTransform>,
}

/// Owns all shared interaction state: both layers read focus, camera and
/// device class from here.
pub struct Scene {
    tuning: Tuning,
    front: Vec<Panel>,
    back: Vec<Panel>,
    order: PentagonOrder,
    rotations: RotationModel,
    scene_rotation: Rotation,
    focus: FocusController,
    gestures: GestureClassifier,
    registry: HitRegistry,
    /// Set when a double-click lands mid-press; the matching release is not a click.
    swallow_release: bool,
    viewport: Viewport,
    device: DeviceClass,
    front_slots: Vec<Slot>,
    back_slots: Vec<Slot>,
}

impl Scene {
    pub fn new(
        front: Vec<PanelContent>,
        back: Vec<PanelContent>,
        order: PentagonOrder,
        tuning: Tuning,
    ) -> Result<Self, SceneError> {
        if front.len() != back.len() {
            return Err(SceneError::CountMismatch {
                front: front.len(),
                back: back.len(),
            });
        }
        if order.len() != front.len() {
            return Err(SceneError::NotAPermutation {
                order: order.to_vec(),
                len: front.len(),
            });
        }

        let count = front.len();
        let focus = FocusController::new(tuning.zoom, tuning.animation, Orientation::Landscape);
        let gestures = GestureClassifier::new(tuning.gesture, DeviceClass::Desktop);

        Ok(Self {
            front: front.into_iter().map(Panel::new).collect(),
            back: back.into_iter().map(Panel::new).collect(),
            order,
            rotations: RotationModel::new(count),
            scene_rotation: Rotation::IDENTITY,
            focus,
            gestures,
            registry: HitRegistry::default(),
            swallow_release: false,
            viewport: Viewport::default(),
            device: DeviceClass::Desktop,
            front_slots: Vec::new(),
            back_slots: Vec::new(),
            tuning,
        })
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn len(&self) -> usize {
        self.front.len()
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_empty()
    }

    pub fn panels(&self, layer: Layer) -> &[Panel] {
        match layer {
            Layer::Front => &self.front,
            Layer::Back => &self.back,
        }
    }

    pub fn panel(&self, panel: PanelRef) -> Option<&Panel> {
        self.panels(panel.layer).get(panel.index)
    }

    pub fn order(&self) -> &PentagonOrder {
        &self.order
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn orientation(&self) -> Orientation {
        if self.viewport.width > self.viewport.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus.focus()
    }

    pub fn focus_controller(&self) -> &FocusController {
        &self.focus
    }

    pub fn interaction(&self) -> Interaction {
        self.gestures.interaction()
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.focus.camera(), self.tuning.fov_degrees)
    }

    pub fn scene_rotation(&self) -> Rotation {
        self.scene_rotation
    }

    pub fn rotation(&self, index: usize) -> Option<Rotation> {
        self.rotations.get(index)
    }

    pub fn registry(&self) -> &HitRegistry {
        &self.registry
    }

    /// A layer draws nothing until every one of its assets has resolved.
    pub fn is_ready(&self, layer: Layer) -> bool {
        self.panels(layer).iter().all(|p| p.asset.is_ready())
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        let first = self.viewport.is_empty();
        self.viewport = Viewport::new(width, height);
        self.device = DeviceClass::from_width(width, self.tuning.breakpoint);
        self.gestures.set_device(self.device);
        self.relayout();

        let focused = self.focus().panel().and_then(|p| self.item_position(p));
        self.focus.refresh(focused, self.orientation());
        if first {
            self.focus.snap();
        }
    }

    pub fn set_asset(&mut self, panel: PanelRef, state: AssetState) -> Result<(), SceneError> {
        let target = match panel.layer {
            Layer::Front => self.front.get_mut(panel.index),
            Layer::Back => self.back.get_mut(panel.index),
        }
        .ok_or(SceneError::NoSuchPanel(panel))?;

        if state == AssetState::Failed {
            log::warn!("Asset for {panel} failed to load, layer stays hidden");
        }
        target.asset = state;
        self.relayout();
        Ok(())
    }

    fn aspects(&self, layer: Layer) -> Option<Vec<f64>> {
        self.panels(layer).iter().map(|p| p.asset.aspect()).collect()
    }

    fn relayout(&mut self) {
        if self.viewport.is_empty() {
            return;
        }
        let overview = self
            .focus
            .zoom_table()
            .zoom(ZoomPreset::Overview, self.orientation());
        let extent = self
            .camera()
            .extent_at(overview, self.viewport.aspect());

        for layer in [Layer::Front, Layer::Back] {
            let slots = self
                .aspects(layer)
                .map(|aspects| {
                    layout::compute_layout(&aspects, extent, self.device, layer, &self.tuning.layout)
                })
                .unwrap_or_default();
            match layer {
                Layer::Front => self.front_slots = slots,
                Layer::Back => self.back_slots = slots,
            }
        }
        self.rebuild_registry();
    }

    /// Back slot position before scene rotation, following its paired front
    /// panel's rotation.
    fn back_local_position(&self, slot: usize) -> Option<DVec3> {
        let base = self.back_slots.get(slot)?.position;
        let rotation = self
            .order
            .front_of(slot)
            .and_then(|front| self.rotations.get(front))
            .unwrap_or_default();
        Some(self.tuning.back.apply(base, rotation))
    }

    fn transform(&self, panel: PanelRef) -> Option<ItemTransform> {
        let world = self.scene_rotation.quat();
        let (slot, local_position, local_rotation) = match panel.layer {
            Layer::Front => {
                let slot = *self.front_slots.get(panel.index)?;
                let rotation = self.rotations.get(panel.index)?.quat();
                (slot, slot.position, rotation)
            }
            Layer::Back => {
                let slot = *self.back_slots.get(panel.index)?;
                (slot, self.back_local_position(panel.index)?, DQuat::IDENTITY)
            }
        };

        Some(ItemTransform {
            panel,
            position: world * local_position,
            rotation: world * local_rotation,
            width: slot.width,
            height: slot.height,
            focused: self.focus.focus().is(panel),
        })
    }

    pub fn item_position(&self, panel: PanelRef) -> Option<DVec3> {
        self.transform(panel).map(|t| t.position)
    }

    fn transforms(&self) -> Vec<ItemTransform> {
        let back = (0..self.back_slots.len()).map(PanelRef::back);
        let front = (0..self.front_slots.len()).map(PanelRef::front);
        back.chain(front)
            .filter_map(|panel| self.transform(panel))
            .collect()
    }

    fn rebuild_registry(&mut self) {
        self.registry.clear();
        for t in self.transforms() {
            self.registry.register(HitRegion {
                panel: t.panel,
                center: t.position,
                half_extents: DVec2::new(t.width, t.height) / 2.0,
                rotation: t.rotation,
            });
        }
    }

    /// Back panels first so the front strip paints over them.
    pub fn frame(&self) -> Frame {
        Frame {
            camera: self.camera(),
            items: self.transforms(),
        }
    }

    pub fn hit_test(&self, pixel: DVec2) -> Option<PanelRef> {
        if self.viewport.is_empty() {
            return None;
        }
        let ray = self
            .camera()
            .ray(self.viewport.ndc(pixel), self.viewport.aspect());
        self.registry.ray_cast(&ray)
    }

    /// Advances timers and camera flight. Returns whether a redraw is due.
    pub fn tick(&mut self, now: Duration) -> bool {
        let enabled = self.gestures.tick(now);
        if enabled {
            log::debug!("Interaction enabled again");
        }
        let moved = self.focus.step();
        moved || enabled
    }

    /// Feeds one input event. Returns whether a redraw is due.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { position, time } => {
                let hit = self.hit_test(position);
                self.swallow_release = false;
                self.gestures.press(position, time, hit);
                false
            }
            PointerEvent::Move { position } => self.drag(position),
            PointerEvent::Up { time } => self.release(time),
            PointerEvent::DoubleClick => {
                // the second press of the pair is still down
                self.swallow_release = self.gestures.state().dragging;
                self.reset();
                true
            }
            PointerEvent::Wheel { ticks } => {
                let rotating = self.gestures.is_rotating_scene();
                self.focus.wheel(ticks, self.orientation(), rotating)
            }
        }
    }

    fn drag(&mut self, position: DVec2) -> bool {
        match self.gestures.drag(position) {
            DragEffect::None => false,
            DragEffect::RotatePanel { panel, delta } => {
                if let Err(e) = self.rotations.rotate(panel.index, delta.x, delta.y) {
                    log::error!("Failed to rotate panel: {e}");
                    return false;
                }
                self.rebuild_registry();
                true
            }
            DragEffect::RotateScene { delta } => {
                self.scene_rotation.accumulate(delta.x, delta.y);
                self.rebuild_registry();
                true
            }
        }
    }

    fn release(&mut self, time: Duration) -> bool {
        let orientation = self.orientation();
        let release = self.gestures.release(time);
        if std::mem::take(&mut self.swallow_release) {
            log::debug!("Release after double-click, not a click");
            return false;
        }
        match release {
            Release::Click {
                target: Some(panel),
                honored: true,
            } => match self.item_position(panel) {
                Some(position) => {
                    self.focus.activate(panel, position, orientation);
                    true
                }
                None => false,
            },
            Release::Click {
                target: None,
                honored,
            } => self.focus.background_click(orientation, honored),
            Release::Click { target, .. } => {
                log::debug!("Ignoring click on {target:?} during scene rotation");
                false
            }
            Release::Drag { .. } | Release::Ignored => false,
        }
    }

    /// Scene rotation back to identity, focus cleared, camera to overview.
    pub fn reset(&mut self) {
        self.scene_rotation = Rotation::IDENTITY;
        self.focus.reset(self.orientation());
        self.rebuild_registry();
    }
}
