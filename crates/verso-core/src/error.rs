use crate::layout::PanelRef;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Layers differ in size: {front} front panels, {back} back panels")]
    CountMismatch { front: usize, back: usize },
    #[error("Order {order:?} is not a permutation of 0..{len}")]
    NotAPermutation { order: Vec<usize>, len: usize },
    #[error("No panel {0}")]
    NoSuchPanel(PanelRef),
}
