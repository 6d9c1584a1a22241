//! Cross-field calculation rules for the in-progress tier draft.
//!
//! Observers are registered per field category and dispatched on each field
//! mutation event, instead of pattern-matching over field path strings.
//! Dispatch is one hop: an observer's own writes do not recursively trigger
//! further dispatch. A later edit to the affected field raises its own
//! independent event.

use chrono::{DateTime, Utc};

use crate::tier::Tier;

/// Editable tier field categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierField {
    Price,
    Supply,
    StartTime,
    EndTime,
    MinCap,
}

/// New value carried by a field mutation event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Time(DateTime<Utc>),
    Amount(f64),
}

/// A single field mutation on the draft tier sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldChange {
    pub index: usize,
    pub field: TierField,
    pub value: FieldValue,
}

type Observer = Box<dyn Fn(&FieldChange, &mut [Tier]) + Send + Sync>;

/// Registry of per-field observers over the draft tier sequence.
pub struct FieldObserverRegistry {
    observers: Vec<(TierField, Observer)>,
}

impl Default for FieldObserverRegistry {
    /// Registry with the built-in end-time propagation rule.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(TierField::EndTime, link_end_to_start);
        registry
    }
}

impl FieldObserverRegistry {
    pub fn empty() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Register an observer for one field category.
    pub fn register(
        &mut self,
        field: TierField,
        observer: impl Fn(&FieldChange, &mut [Tier]) + Send + Sync + 'static,
    ) {
        self.observers.push((field, Box::new(observer)));
    }

    /// Apply an edit to the draft: write the edited field itself, then
    /// dispatch the change to every observer registered for its category.
    pub fn apply(&self, draft: &mut [Tier], change: FieldChange) {
        if let Some(tier) = draft.get_mut(change.index) {
            write_field(tier, change.field, change.value);
        } else {
            tracing::warn!(index = change.index, "Edit targets a tier outside the draft");
            return;
        }
        self.dispatch(&change, draft);
    }

    /// Dispatch a change event without writing the edited field (for edits
    /// the form has already applied).
    pub fn dispatch(&self, change: &FieldChange, draft: &mut [Tier]) {
        for (field, observer) in &self.observers {
            if *field == change.field {
                observer(change, draft);
            }
        }
    }
}

fn write_field(tier: &mut Tier, field: TierField, value: FieldValue) {
    match (field, value) {
        (TierField::Price, FieldValue::Amount(v)) => tier.price = v,
        (TierField::Supply, FieldValue::Amount(v)) => tier.supply = v,
        (TierField::MinCap, FieldValue::Amount(v)) => tier.min_cap = v,
        (TierField::StartTime, FieldValue::Time(t)) => tier.start_time = t,
        (TierField::EndTime, FieldValue::Time(t)) => tier.end_time = t,
        (field, value) => {
            tracing::warn!(?field, ?value, "Mismatched field/value kind, edit dropped");
        }
    }
}

/// The built-in rule: when tier N's end time changes, tier N + 1's start
/// time follows it. No effect on the last tier, no effect on earlier tiers.
pub fn link_end_to_start(change: &FieldChange, draft: &mut [Tier]) {
    let FieldValue::Time(end_time) = change.value else {
        return;
    };
    if let Some(next) = draft.get_mut(change.index + 1) {
        next.start_time = end_time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn draft(len: usize) -> Vec<Tier> {
        let now = Utc::now();
        (0..len).map(|i| Tier::seed(i, now)).collect()
    }

    fn end_time_change(index: usize, at: DateTime<Utc>) -> FieldChange {
        FieldChange {
            index,
            field: TierField::EndTime,
            value: FieldValue::Time(at),
        }
    }

    #[test]
    fn test_end_time_propagates_one_hop() {
        let registry = FieldObserverRegistry::default();
        let mut tiers = draft(4);
        let before = tiers.clone();
        let new_end = Utc::now() + Duration::days(30);

        registry.apply(&mut tiers, end_time_change(1, new_end));

        assert_eq!(tiers[1].end_time, new_end);
        assert_eq!(tiers[2].start_time, new_end);
        // Never touches the tier before, never cascades two hops ahead.
        assert_eq!(tiers[0], before[0]);
        assert_eq!(tiers[2].end_time, before[2].end_time);
        assert_eq!(tiers[3], before[3]);
    }

    #[test]
    fn test_last_tier_has_no_successor() {
        let registry = FieldObserverRegistry::default();
        let mut tiers = draft(2);
        let before = tiers.clone();
        let new_end = Utc::now() + Duration::days(10);

        registry.apply(&mut tiers, end_time_change(1, new_end));

        assert_eq!(tiers[1].end_time, new_end);
        assert_eq!(tiers[0], before[0]);
    }

    #[test]
    fn test_non_end_time_edits_do_not_propagate() {
        let registry = FieldObserverRegistry::default();
        let mut tiers = draft(2);
        let next_start_before = tiers[1].start_time;

        registry.apply(
            &mut tiers,
            FieldChange {
                index: 0,
                field: TierField::Price,
                value: FieldValue::Amount(3.5),
            },
        );

        assert_eq!(tiers[0].price, 3.5);
        assert_eq!(tiers[1].start_time, next_start_before);
    }

    #[test]
    fn test_out_of_range_edit_is_dropped() {
        let registry = FieldObserverRegistry::default();
        let mut tiers = draft(1);
        let before = tiers.clone();

        registry.apply(&mut tiers, end_time_change(5, Utc::now()));

        assert_eq!(tiers, before);
    }

    #[test]
    fn test_custom_observer_dispatches_on_matching_field_only() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_observer = Arc::clone(&hits);

        let mut registry = FieldObserverRegistry::empty();
        registry.register(TierField::MinCap, move |_, _| {
            hits_in_observer.fetch_add(1, Ordering::SeqCst);
        });

        let mut tiers = draft(2);
        registry.apply(
            &mut tiers,
            FieldChange {
                index: 0,
                field: TierField::MinCap,
                value: FieldValue::Amount(1.0),
            },
        );
        registry.apply(&mut tiers, end_time_change(0, Utc::now()));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
