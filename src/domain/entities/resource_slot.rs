//! Resource slot entity - one yielded item on a live dispenser

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ItemId, YieldCategory};

/// A single (category, item) yield on a dispenser
///
/// `start_amount` is the full-capacity yield; `amount` is what is left of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSlot {
    pub category: YieldCategory,
    pub item: ItemId,
    pub start_amount: f32,
    pub amount: f32,
}

impl ResourceSlot {
    /// A slot at full capacity
    #[cfg(test)]
    pub fn full(category: YieldCategory, item: ItemId, start_amount: f32) -> Self {
        Self {
            category,
            item,
            start_amount,
            amount: start_amount,
        }
    }

    /// Set a new full-capacity yield, keeping the same depletion ratio
    pub fn rescale(&mut self, start_amount: f32, fraction_remaining: f32) {
        self.start_amount = start_amount;
        self.amount = start_amount * fraction_remaining;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescale_keeps_depletion() {
        let mut slot = ResourceSlot::full(YieldCategory::contained_items(), ItemId::new("wood"), 1000.0);
        slot.rescale(2000.0, 0.5);
        assert_eq!(slot.start_amount, 2000.0);
        assert_eq!(slot.amount, 1000.0);
    }
}
