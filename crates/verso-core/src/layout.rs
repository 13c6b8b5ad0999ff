use crate::tuning::LayoutTuning;
use derive_more::Display;
use glam::DVec3;
use std::f64::consts::TAU;
use strum::{Display as StrumDisplay, EnumIter};

/// Smallest panel width the strip will shrink to on tiny viewports.
pub const MIN_PANEL_WIDTH: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Layer {
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
pub enum Orientation {
    Landscape,
    Portrait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay)]
pub enum DeviceClass {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceClass {
    pub fn from_width(width_px: f64, breakpoint: f64) -> Self {
        if width_px < breakpoint {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Stable handle for one panel: its layer plus its index within that layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("{layer}#{index}")]
pub struct PanelRef {
    pub layer: Layer,
    pub index: usize,
}

impl PanelRef {
    pub fn new(layer: Layer, index: usize) -> Self {
        Self { layer, index }
    }

    pub fn front(index: usize) -> Self {
        Self::new(Layer::Front, index)
    }

    pub fn back(index: usize) -> Self {
        Self::new(Layer::Back, index)
    }
}

/// Visible area in world units at the overview camera distance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Placement of one panel inside its layer, before scene rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub position: DVec3,
    pub width: f64,
    pub height: f64,
}

/// Places `aspect_ratios.len()` panels for one layer. Front panels form a
/// row (landscape) or a column (portrait); back panels sit on an ellipse.
pub fn compute_layout(
    aspect_ratios: &[f64],
    extent: Extent,
    device: DeviceClass,
    layer: Layer,
    tuning: &LayoutTuning,
) -> Vec<Slot> {
    if aspect_ratios.is_empty() {
        return Vec::new();
    }

    let orientation = extent.orientation();
    let strip = Strip::measure(aspect_ratios, extent, device, orientation, tuning);

    match (layer, orientation) {
        (Layer::Front, Orientation::Landscape) => strip.row(),
        (Layer::Front, Orientation::Portrait) => strip.column(),
        (Layer::Back, _) => strip.ellipse(device, orientation, tuning),
    }
}

fn sanitize_aspect(aspect: f64) -> f64 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

/// Shared measurements every arrangement starts from.
struct Strip {
    spacing: f64,
    available: f64,
    base_width: f64,
    heights: Vec<f64>,
    max_height: f64,
}

impl Strip {
    fn measure(
        aspect_ratios: &[f64],
        extent: Extent,
        device: DeviceClass,
        orientation: Orientation,
        tuning: &LayoutTuning,
    ) -> Self {
        let n = aspect_ratios.len() as f64;
        let spacing = tuning.spacing.get(device).get(orientation);
        let span = match orientation {
            Orientation::Landscape => extent.width,
            Orientation::Portrait => extent.height,
        };
        let available = span * tuning.available.get(orientation);
        let base_width = ((available - (n - 1.0) * spacing) / n).max(MIN_PANEL_WIDTH);

        let heights: Vec<f64> = aspect_ratios
            .iter()
            .map(|&aspect| base_width / sanitize_aspect(aspect))
            .collect();
        let max_height = heights.iter().copied().fold(0.0, f64::max);

        Self {
            spacing,
            available,
            base_width,
            heights,
            max_height,
        }
    }

    fn count(&self) -> f64 {
        self.heights.len() as f64
    }

    fn row(&self) -> Vec<Slot> {
        let n = self.count();
        let total_width = n * self.base_width + (n - 1.0) * self.spacing;
        let left = -total_width / 2.0 + self.base_width / 2.0;
        let step = self.base_width + self.spacing;

        self.heights
            .iter()
            .enumerate()
            .map(|(i, &height)| Slot {
                // top edges line up with the tallest panel
                position: DVec3::new(
                    left + i as f64 * step,
                    (self.max_height - height) / 2.0,
                    0.0,
                ),
                width: self.base_width,
                height,
            })
            .collect()
    }

    fn column(&self) -> Vec<Slot> {
        let total_height =
            self.heights.iter().sum::<f64>() + (self.count() - 1.0) * self.spacing;
        let mut top = total_height / 2.0;

        self.heights
            .iter()
            .map(|&height| {
                let slot = Slot {
                    position: DVec3::new(0.0, top - height / 2.0, 0.0),
                    width: self.base_width,
                    height,
                };
                top -= height + self.spacing;
                slot
            })
            .collect()
    }

    fn ellipse(
        &self,
        device: DeviceClass,
        orientation: Orientation,
        tuning: &LayoutTuning,
    ) -> Vec<Slot> {
        let ring = &tuning.ellipse;
        let radius_x = self.available * ring.width.get(device).get(orientation) / 2.0;
        let radius_y = self.max_height * ring.height.get(device).get(orientation) / 2.0;
        let offset = ring.offset_degrees.get(orientation).to_radians();
        let tilt = ring.tilt(orientation);
        let n = self.count();

        self.heights
            .iter()
            .enumerate()
            .map(|(i, &height)| {
                let angle = (i as f64 / n) * TAU + offset;
                let flat = DVec3::new(radius_x * angle.cos(), radius_y * angle.sin(), 0.0);
                Slot {
                    position: tilt * flat,
                    width: self.base_width * ring.scale,
                    height: height * ring.scale,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Variant;

    const SQUARES: [f64; 5] = [1.0; 5];

    fn tuning() -> LayoutTuning {
        Variant::Gallery.tuning().layout
    }

    #[test]
    fn test_layout_is_deterministic() {
        let extent = Extent::new(13.6, 7.7);
        let ratios = [1.5, 0.75, 1.0, 1.33, 0.5];
        for layer in [Layer::Front, Layer::Back] {
            let a = compute_layout(&ratios, extent, DeviceClass::Desktop, layer, &tuning());
            let b = compute_layout(&ratios, extent, DeviceClass::Desktop, layer, &tuning());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_landscape_row_is_centered_and_top_aligned() {
        let tuning = tuning();
        let extent = Extent::new(10.0, 5.0);
        let ratios = [1.0, 2.0, 1.0, 0.5, 1.0];
        let slots = compute_layout(&ratios, extent, DeviceClass::Desktop, Layer::Front, &tuning);

        let spacing = tuning.spacing.desktop.landscape;
        let expected_width = (10.0 * tuning.available.landscape - 4.0 * spacing) / 5.0;
        assert!(slots.iter().all(|s| (s.width - expected_width).abs() < 1e-12));

        // symmetric around x = 0
        let first = slots[0].position.x;
        let last = slots[4].position.x;
        assert!((first + last).abs() < 1e-12);
        assert!(slots.windows(2).all(|w| w[0].position.x < w[1].position.x));

        let tops: Vec<f64> = slots.iter().map(|s| s.position.y + s.height / 2.0).collect();
        assert!(tops.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-12));
    }

    #[test]
    fn test_portrait_column_starts_at_top_of_stack() {
        let tuning = tuning();
        let extent = Extent::new(4.0, 9.0);
        let slots = compute_layout(&SQUARES, extent, DeviceClass::Mobile, Layer::Front, &tuning);

        let spacing = tuning.spacing.mobile.portrait;
        let total: f64 = slots.iter().map(|s| s.height).sum::<f64>() + 4.0 * spacing;
        let first_top = slots[0].position.y + slots[0].height / 2.0;
        assert!((first_top - total / 2.0).abs() < 1e-12);
        assert!(slots.iter().all(|s| s.position.x == 0.0));
        assert!(slots.windows(2).all(|w| w[0].position.y > w[1].position.y));
    }

    #[test]
    fn test_back_layer_sits_on_ellipse() {
        let mut tuning = tuning();
        tuning.ellipse.tilt_degrees = 0.0;
        let extent = Extent::new(12.0, 6.0);
        let slots = compute_layout(&SQUARES, extent, DeviceClass::Desktop, Layer::Back, &tuning);

        let available = 12.0 * tuning.available.landscape;
        let base_width = (available - 4.0 * tuning.spacing.desktop.landscape) / 5.0;
        let rx = available * tuning.ellipse.width.desktop.landscape / 2.0;
        let ry = base_width * tuning.ellipse.height.desktop.landscape / 2.0;

        for slot in &slots {
            let p = slot.position;
            let on_ring = (p.x / rx).powi(2) + (p.y / ry).powi(2);
            assert!((on_ring - 1.0).abs() < 1e-9, "{on_ring}");
        }
        // first slot at the landscape offset of +90 degrees
        assert!(slots[0].position.x.abs() < 1e-9);
        assert!(slots[0].position.y > 0.0);
    }

    #[test]
    fn test_portrait_back_layer_is_offset_then_turned() {
        let tuning = tuning();
        let extent = Extent::new(4.0, 9.0);
        let slots = compute_layout(&SQUARES, extent, DeviceClass::Mobile, Layer::Back, &tuning);

        let available = 9.0 * tuning.available.portrait;
        let base_width = (available - 4.0 * tuning.spacing.mobile.portrait) / 5.0;
        let rx = available * tuning.ellipse.width.mobile.portrait / 2.0;
        let ry = base_width * tuning.ellipse.height.mobile.portrait / 2.0;
        let offset = tuning.ellipse.offset_degrees.portrait.to_radians();
        assert_eq!(tuning.ellipse.offset_degrees.portrait, -40.0);

        for (i, slot) in slots.iter().enumerate() {
            let angle = i as f64 / 5.0 * TAU + offset;
            // a quarter turn about Z maps (x, y) to (-y, x)
            let expected = DVec3::new(-ry * angle.sin(), rx * angle.cos(), 0.0);
            assert!(
                slot.position.abs_diff_eq(expected, 1e-9),
                "slot {i}: {} vs {expected}",
                slot.position
            );
            assert!((slot.width - base_width * tuning.ellipse.scale).abs() < 1e-12);
        }

        // the long axis of the ring now runs along the column
        assert!(slots[0].position.y > slots[0].position.x);
        assert!(slots[0].position.x > 0.0);
    }

    #[test]
    fn test_bad_aspect_ratio_falls_back_to_square() {
        let extent = Extent::new(10.0, 5.0);
        let ratios = [f64::NAN, 0.0, -2.0, f64::INFINITY, 1.0];
        let slots = compute_layout(&ratios, extent, DeviceClass::Desktop, Layer::Front, &tuning());
        assert!(slots.iter().all(|s| (s.width - s.height).abs() < 1e-12));
    }

    #[test]
    fn test_empty_input_yields_no_slots() {
        let slots = compute_layout(
            &[],
            Extent::new(10.0, 5.0),
            DeviceClass::Desktop,
            Layer::Back,
            &tuning(),
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn test_panel_ref_display() {
        assert_eq!(PanelRef::back(3).to_string(), "back#3");
    }
}
