//! Tells clicks, panel drags and scene drags apart.
//!
//! A press records which panel (if any) was under the pointer. Moves on a
//! front panel turn that panel; anything else turns the whole scene once the
//! pointer has travelled past a small threshold. Turning the scene disables
//! click interaction until a short cooldown after release, so letting go of a
//! drag never reads as a click.

use crate::layout::{DeviceClass, Layer, PanelRef};
use crate::tuning::ByDevice;
use glam::DVec2;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureTuning {
    /// Travel (px) before a background drag starts turning the scene.
    pub rotate_threshold: ByDevice<f64>,
    /// A release only counts as a click below this travel (px).
    pub click_distance: ByDevice<f64>,
    pub click_duration: Duration,
    pub cooldown: Duration,
    /// Radians per pixel of drag.
    pub sensitivity: f64,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            // touch gets the smaller rotate threshold and the larger click slop
            rotate_threshold: ByDevice::new(5.0, 2.0),
            click_distance: ByDevice::new(10.0, 15.0),
            click_duration: Duration::from_millis(200),
            cooldown: Duration::from_millis(300),
            sensitivity: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Rotating,
    Cooldown {
        until: Duration,
    },
}

impl Interaction {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true when the cooldown just ran out.
    fn advance(&mut self, now: Duration) -> bool {
        match *self {
            Self::Cooldown { until } if now >= until => {
                *self = Self::Idle;
                true
            }
            _ => false,
        }
    }
}

/// Per press/release cycle. Reset in place on every press.
#[derive(Debug, Clone, Default)]
pub struct GestureState {
    pub dragging: bool,
    pub active: Option<PanelRef>,
    pub last_position: DVec2,
    pub started_at: Duration,
    /// Summed absolute travel per axis.
    pub distance: DVec2,
    pub rotating_scene: bool,
    pub pressed_while_enabled: bool,
}

impl GestureState {
    fn begin(&mut self, position: DVec2, time: Duration, active: Option<PanelRef>, enabled: bool) {
        self.dragging = true;
        self.active = active;
        self.last_position = position;
        self.started_at = time;
        self.distance = DVec2::ZERO;
        self.rotating_scene = false;
        self.pressed_while_enabled = enabled;
    }

    pub fn total_distance(&self) -> f64 {
        self.distance.x + self.distance.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEffect {
    None,
    /// Angle deltas (radians) for one front panel.
    RotatePanel { panel: PanelRef, delta: DVec2 },
    RotateScene { delta: DVec2 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// Up without a matching down.
    Ignored,
    Click {
        target: Option<PanelRef>,
        /// False when the press landed while interaction was disabled.
        honored: bool,
    },
    Drag {
        rotated_scene: bool,
    },
}

pub struct GestureClassifier {
    state: GestureState,
    interaction: Interaction,
    tuning: GestureTuning,
    device: DeviceClass,
}

impl GestureClassifier {
    pub fn new(tuning: GestureTuning, device: DeviceClass) -> Self {
        Self {
            state: GestureState::default(),
            interaction: Interaction::Idle,
            tuning,
            device,
        }
    }

    pub fn set_device(&mut self, device: DeviceClass) {
        self.device = device;
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn is_enabled(&self) -> bool {
        self.interaction.is_enabled()
    }

    pub fn is_rotating_scene(&self) -> bool {
        self.state.dragging && self.state.rotating_scene
    }

    /// Frame clock. Returns true if interaction just became enabled again.
    pub fn tick(&mut self, now: Duration) -> bool {
        self.interaction.advance(now)
    }

    pub fn press(&mut self, position: DVec2, time: Duration, hit: Option<PanelRef>) {
        self.tick(time);
        let enabled = self.is_enabled();
        self.state.begin(position, time, hit, enabled);
    }

    pub fn drag(&mut self, position: DVec2) -> DragEffect {
        if !self.state.dragging {
            return DragEffect::None;
        }

        let delta = position - self.state.last_position;
        self.state.last_position = position;
        self.state.distance += delta.abs();
        let angles = delta * self.tuning.sensitivity;

        match self.state.active {
            Some(panel) if panel.layer == Layer::Front => DragEffect::RotatePanel {
                panel,
                delta: angles,
            },
            _ if self.state.total_distance() > self.tuning.rotate_threshold.get(self.device) => {
                if !self.state.rotating_scene {
                    log::debug!("Scene rotation started");
                }
                self.state.rotating_scene = true;
                self.interaction = Interaction::Rotating;
                DragEffect::RotateScene { delta: angles }
            }
            _ => DragEffect::None,
        }
    }

    pub fn release(&mut self, time: Duration) -> Release {
        if !self.state.dragging {
            return Release::Ignored;
        }
        self.state.dragging = false;

        let elapsed = time.saturating_sub(self.state.started_at);
        let is_click = elapsed < self.tuning.click_duration
            && self.state.total_distance() < self.tuning.click_distance.get(self.device);

        if is_click {
            self.interaction = Interaction::Idle;
            log::debug!(
                "Click on {:?} after {:?}, {:.1}px",
                self.state.active,
                elapsed,
                self.state.total_distance()
            );
            return Release::Click {
                target: self.state.active,
                honored: self.state.pressed_while_enabled,
            };
        }

        if self.state.rotating_scene {
            // replaces any earlier deadline
            self.interaction = Interaction::Cooldown {
                until: time + self.tuning.cooldown,
            };
        }
        Release::Drag {
            rotated_scene: self.state.rotating_scene,
        }
    }
}
