use crate::focus::{AnimationTuning, ZoomTable};
use crate::gesture::GestureTuning;
use crate::layout::{DeviceClass, Orientation};
use crate::rotation::BackOffset;
use glam::{DQuat, DVec3};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Viewport width (px) below which the scene treats the device as mobile.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ByOrientation<T> {
    pub landscape: T,
    pub portrait: T,
}

impl<T: Copy> ByOrientation<T> {
    pub const fn new(landscape: T, portrait: T) -> Self {
        Self {
            landscape,
            portrait,
        }
    }

    pub fn get(&self, orientation: Orientation) -> T {
        match orientation {
            Orientation::Landscape => self.landscape,
            Orientation::Portrait => self.portrait,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ByDevice<T> {
    pub desktop: T,
    pub mobile: T,
}

impl<T: Copy> ByDevice<T> {
    pub const fn new(desktop: T, mobile: T) -> Self {
        Self { desktop, mobile }
    }

    pub fn get(&self, device: DeviceClass) -> T {
        match device {
            DeviceClass::Desktop => self.desktop,
            DeviceClass::Mobile => self.mobile,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EllipseTuning {
    /// Ellipse width as a multiple of the available strip space.
    pub width: ByDevice<ByOrientation<f64>>,
    /// Ellipse height as a multiple of the tallest panel.
    pub height: ByDevice<ByOrientation<f64>>,
    pub offset_degrees: ByOrientation<f64>,
    /// Extra turn about Z applied in portrait only.
    pub portrait_turn_degrees: f64,
    pub tilt_axis: [f64; 3],
    pub tilt_degrees: f64,
    /// Back panel size relative to the front base width.
    pub scale: f64,
}

impl EllipseTuning {
    pub fn tilt(&self, orientation: Orientation) -> DQuat {
        let axis = DVec3::from_array(self.tilt_axis).normalize_or_zero();
        let tilt = if axis == DVec3::ZERO {
            DQuat::IDENTITY
        } else {
            DQuat::from_axis_angle(axis, self.tilt_degrees.to_radians())
        };

        match orientation {
            Orientation::Landscape => tilt,
            Orientation::Portrait => {
                DQuat::from_rotation_z(self.portrait_turn_degrees.to_radians()) * tilt
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTuning {
    pub spacing: ByDevice<ByOrientation<f64>>,
    /// Fraction of the viewport span along the strip axis.
    pub available: ByOrientation<f64>,
    pub ellipse: EllipseTuning,
}

/// Every constant one variant of the piece is configured by.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    pub layout: LayoutTuning,
    pub zoom: ZoomTable,
    pub animation: AnimationTuning,
    pub gesture: GestureTuning,
    pub back: BackOffset,
    pub fov_degrees: f64,
    pub breakpoint: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Variant::default().tuning()
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Flat strip, front panels face the viewer, gentle back drift.
    #[default]
    Gallery,
    /// Wide tilted ring with a strong back-layer swing.
    Orbit,
    /// Tight strip, close camera, subtle back-layer motion.
    Drift,
}

impl Variant {
    pub fn tuning(&self) -> Tuning {
        let gallery = Tuning {
            layout: LayoutTuning {
                spacing: ByDevice::new(ByOrientation::new(0.7, 0.4), ByOrientation::new(0.5, 0.3)),
                available: ByOrientation::new(0.9, 0.7),
                ellipse: EllipseTuning {
                    width: ByDevice::new(
                        ByOrientation::new(0.9, 1.2),
                        ByOrientation::new(0.8, 1.1),
                    ),
                    height: ByDevice::new(
                        ByOrientation::new(2.2, 1.6),
                        ByOrientation::new(1.8, 1.4),
                    ),
                    offset_degrees: ByOrientation::new(90.0, -40.0),
                    portrait_turn_degrees: 90.0,
                    tilt_axis: [1.0, 0.0, 0.0],
                    tilt_degrees: 0.0,
                    scale: 0.8,
                },
            },
            zoom: ZoomTable {
                overview: ByOrientation::new(5.0, 8.0),
                front_layer: ByOrientation::new(3.0, 4.5),
                back_layer: ByOrientation::new(4.0, 6.0),
            },
            animation: AnimationTuning::default(),
            gesture: GestureTuning::default(),
            back: BackOffset {
                max_offset: 2.0,
                depth: -1.0,
            },
            fov_degrees: 75.0,
            breakpoint: MOBILE_BREAKPOINT,
        };

        match self {
            Self::Gallery => gallery,
            Self::Orbit => {
                let mut t = gallery;
                t.layout.ellipse.width = ByDevice::new(
                    ByOrientation::new(1.0, 1.3),
                    ByOrientation::new(0.9, 1.2),
                );
                t.layout.ellipse.tilt_degrees = 20.0;
                t.zoom = ZoomTable {
                    overview: ByOrientation::new(6.0, 9.0),
                    front_layer: ByOrientation::new(3.5, 5.0),
                    back_layer: ByOrientation::new(4.5, 6.5),
                };
                t.back.max_offset = 3.0;
                t
            }
            Self::Drift => {
                let mut t = gallery;
                t.layout.spacing =
                    ByDevice::new(ByOrientation::new(0.5, 0.3), ByOrientation::new(0.4, 0.25));
                t.layout.ellipse.offset_degrees = ByOrientation::new(90.0, -30.0);
                t.zoom = ZoomTable {
                    overview: ByOrientation::new(4.5, 7.5),
                    front_layer: ByOrientation::new(2.8, 4.2),
                    back_layer: ByOrientation::new(3.6, 5.5),
                };
                t.back.max_offset = 1.5;
                t
            }
        }
    }
}
