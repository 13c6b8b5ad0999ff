//! Interaction core for a two-layer panel scene: a front strip of image or
//! text panels, a back ellipse of text panels whose positions follow the
//! front panels' rotation, camera fly-to focus and drag gestures.
//!
//! Everything here is renderer agnostic. Feed [`PointerEvent`]s and frame
//! ticks into a [`Scene`] and draw whatever [`Scene::frame`] returns.

pub mod camera;
pub mod content;
pub mod error;
pub mod focus;
pub mod gesture;
pub mod input;
pub mod layout;
pub mod order;
pub mod registry;
pub mod rotation;
pub mod scene;
pub mod tuning;

pub use camera::{Camera, Viewport};
pub use content::{AssetState, Panel, PanelContent};
pub use error::SceneError;
pub use focus::Focus;
pub use input::PointerEvent;
pub use layout::{Layer, PanelRef};
pub use order::PentagonOrder;
pub use scene::{Frame, ItemTransform, Scene};
pub use tuning::{Tuning, Variant};
