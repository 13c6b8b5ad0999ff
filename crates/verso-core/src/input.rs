use glam::DVec2;
use std::time::Duration;

/// Window-level input, positions in pixels, times since scene start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: DVec2, time: Duration },
    Move { position: DVec2 },
    Up { time: Duration },
    DoubleClick,
    /// Positive ticks zoom out.
    Wheel { ticks: f64 },
}
