//! Sync Service - Pushes a rate table onto live dispensers
//!
//! The same two operations serve both directions: applying derived rates at
//! startup/spawn and restoring baseline rates at shutdown.

use tracing::{debug, info};

use crate::application::dto::SyncReport;
use crate::application::ports::outbound::{EntitySourcePort, LiveDispenser};
use crate::domain::value_objects::RateTable;

/// Bring one dispenser in line with `table`.
///
/// Slots without a rate in the table are left alone. A slot changes only when
/// its start amount differs exactly from the table value; its live amount is
/// rescaled by the dispenser's remaining fraction. The dispenser is committed
/// at most once, and only if something changed.
pub fn apply_one(dispenser: &mut dyn LiveDispenser, table: &RateTable) -> bool {
    let kind = dispenser.kind().clone();
    let fraction_remaining = dispenser.fraction_remaining();

    let mut slots = dispenser.slots().to_vec();
    let mut changed = false;
    for slot in &mut slots {
        let Some(rate) = table.rate_for(&kind, &slot.category, &slot.item) else {
            continue;
        };
        if slot.start_amount != rate {
            slot.rescale(rate, fraction_remaining);
            changed = true;
        }
    }

    if changed {
        debug!(entity_id = %dispenser.entity_id(), kind = %kind, "Updating dispenser rates");
        dispenser.commit(slots);
    }
    changed
}

/// Bring every live dispenser in line with `table`
pub fn apply_all(source: &dyn EntitySourcePort, table: &RateTable) -> SyncReport {
    let mut report = SyncReport::default();
    source.visit_all(&mut |dispenser| {
        report.total += 1;
        if apply_one(dispenser, table) {
            report.updated += 1;
        }
    });

    info!(
        updated = report.updated,
        total = report.total,
        "Updated {} resource dispensers of {}.",
        report.updated,
        report.total
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_doubles::{TestDispenser, TestWorld};
    use crate::domain::value_objects::{EntityId, EntityKind, ItemId, YieldCategory, YieldKey};

    fn table_with(wood: f32) -> RateTable {
        let mut table = RateTable::new();
        table.insert(
            YieldKey::new("wood_node".into(), YieldCategory::contained_items(), ItemId::new("wood")),
            wood,
        );
        table
    }

    #[test]
    fn test_apply_scales_live_amount_and_commits_once() {
        let mut dispenser = TestDispenser::wood(1000.0, 0.5);

        assert!(apply_one(&mut dispenser, &table_with(2000.0)));
        assert_eq!(dispenser.slots[0].start_amount, 2000.0);
        assert_eq!(dispenser.slots[0].amount, 1000.0);
        assert_eq!(dispenser.commits, 1);

        // Same table again: nothing to do, no commit
        assert!(!apply_one(&mut dispenser, &table_with(2000.0)));
        assert_eq!(dispenser.commits, 1);
    }

    #[test]
    fn test_untracked_slots_are_left_alone() {
        let mut dispenser = TestDispenser::wood(1000.0, 1.0);
        apply_one(&mut dispenser, &table_with(1500.0));

        let charcoal = &dispenser.slots[1];
        assert_eq!(charcoal.start_amount, 3.0);
        assert_eq!(charcoal.amount, 3.0);
    }

    #[test]
    fn test_equal_rates_cause_no_side_effects() {
        let mut dispenser = TestDispenser::wood(1000.0, 0.25);
        let before = dispenser.slots.clone();

        assert!(!apply_one(&mut dispenser, &table_with(1000.0)));
        assert_eq!(dispenser.slots, before);
        assert_eq!(dispenser.commits, 0);
    }

    #[test]
    fn test_other_kinds_are_not_touched() {
        let mut dispenser = TestDispenser::wood(1000.0, 1.0);
        dispenser.kind = EntityKind::new("stone_node");

        assert!(!apply_one(&mut dispenser, &table_with(2000.0)));
        assert_eq!(dispenser.commits, 0);
    }

    #[test]
    fn test_restore_returns_captured_value() {
        let mut dispenser = TestDispenser::wood(1000.0, 0.5);

        apply_one(&mut dispenser, &table_with(2500.0));
        assert!(apply_one(&mut dispenser, &table_with(1000.0)));
        assert_eq!(dispenser.slots[0].start_amount, 1000.0);
        assert_eq!(dispenser.slots[0].amount, 500.0);
    }

    #[test]
    fn test_apply_all_counts_changed_dispensers() {
        let world = TestWorld::with(vec![
            TestDispenser::wood(1000.0, 1.0),
            TestDispenser::wood(2000.0, 1.0),
            TestDispenser::wood(500.0, 1.0),
        ]);

        let report = apply_all(&world, &table_with(2000.0));
        assert_eq!(report, SyncReport { updated: 2, total: 3 });

        let report = apply_all(&world, &table_with(2000.0));
        assert_eq!(report, SyncReport { updated: 0, total: 3 });
        assert_eq!(world.total_commits(), 2);
    }

    #[test]
    fn test_visit_unknown_entity() {
        let world = TestWorld::with(vec![TestDispenser::wood(1.0, 1.0)]);
        assert!(!world.visit(EntityId::new(), &mut |_| panic!("no such entity")));
    }
}
