use crate::error::SceneError;
use derive_more::Deref;

pub const DEFAULT_ORDER: [usize; 5] = [2, 0, 1, 3, 4];

/// Pairs each back-layer slot with one front panel. Back slot `s` follows
/// front panel `order[s]`.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct PentagonOrder {
    #[deref]
    back_to_front: Vec<usize>,
    front_to_back: Vec<usize>,
}

impl PentagonOrder {
    pub fn new(order: Vec<usize>) -> Result<Self, SceneError> {
        let len = order.len();
        let mut front_to_back = vec![usize::MAX; len];

        for (slot, &front) in order.iter().enumerate() {
            match front_to_back.get_mut(front) {
                Some(entry) if *entry == usize::MAX => *entry = slot,
                _ => {
                    return Err(SceneError::NotAPermutation {
                        order: order.clone(),
                        len,
                    });
                }
            }
        }

        Ok(Self {
            back_to_front: order,
            front_to_back,
        })
    }

    pub fn identity(len: usize) -> Self {
        Self {
            back_to_front: (0..len).collect(),
            front_to_back: (0..len).collect(),
        }
    }

    /// Front panel paired with back slot `slot`.
    pub fn front_of(&self, slot: usize) -> Option<usize> {
        self.back_to_front.get(slot).copied()
    }

    /// Back slot paired with front panel `index`.
    pub fn back_of(&self, index: usize) -> Option<usize> {
        self.front_to_back.get(index).copied()
    }
}

impl Default for PentagonOrder {
    fn default() -> Self {
        Self {
            back_to_front: DEFAULT_ORDER.to_vec(),
            front_to_back: vec![1, 2, 0, 3, 4],
        }
    }
}
