//! Full recomputation of category and reconstruction counters
//!
//! Counters are derived from item state on every mutation. Nothing here
//! increments a stored counter, so a stored value can never drift from the
//! items it describes.

use std::collections::HashMap;

use uuid::Uuid;

use crate::checklist::{ChecklistCategory, ChecklistItem, ItemStatus};

use super::state::{LifecycleStatus, ReconstructionState, READINESS_THRESHOLD};

/// `round(completed / total * 100)`, 0 when there is nothing to complete
pub fn completion_percentage(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (completed as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Recompute one category's counters from its items.
///
/// Items belonging to other categories are ignored.
pub fn recompute_category(category: &mut ChecklistCategory, items: &[ChecklistItem]) {
    let own = items.iter().filter(|i| i.category_id == category.id);
    let (total, completed) = own.fold((0u32, 0u32), |(t, c), item| {
        (t + 1, c + u32::from(item.status.is_complete()))
    });
    category.total_items = total;
    category.completed_items = completed;
    category.completion_percentage = completion_percentage(completed, total);
}

/// Recompute every category, then the aggregate over all of them.
pub fn recompute_all(
    categories: &mut [ChecklistCategory],
    items: &[ChecklistItem],
) -> ReconstructionState {
    let mut counts: HashMap<Uuid, (u32, u32)> = HashMap::new();
    for item in items {
        let entry = counts.entry(item.category_id).or_default();
        entry.0 += 1;
        entry.1 += u32::from(item.status.is_complete());
    }
    for category in categories.iter_mut() {
        let (total, completed) = counts.get(&category.id).copied().unwrap_or_default();
        category.total_items = total;
        category.completed_items = completed;
        category.completion_percentage = completion_percentage(completed, total);
    }
    aggregate(categories, items)
}

/// Reconstruction aggregate from already-recomputed categories.
///
/// Totals are the sums of category counters; the status breakdown comes from
/// the items themselves.
pub fn aggregate(categories: &[ChecklistCategory], items: &[ChecklistItem]) -> ReconstructionState {
    let total: u32 = categories.iter().map(|c| c.total_items).sum();
    let completed: u32 = categories.iter().map(|c| c.completed_items).sum();

    let mut state = ReconstructionState::empty();
    for item in items {
        match item.status {
            ItemStatus::Missing => state.missing_documents += 1,
            ItemStatus::Requested | ItemStatus::Processing => state.requested_documents += 1,
            ItemStatus::Rejected => state.rejected_documents += 1,
            ItemStatus::Uploaded | ItemStatus::Verified => {}
        }
        if item.is_requestable() {
            state.outstanding_requestable += 1;
        }
    }

    let pct = completion_percentage(completed, total);
    state.total_documents = total;
    state.completed_documents = completed;
    state.completion_percentage = pct;
    state.ready = pct >= READINESS_THRESHOLD;
    state.lifecycle = LifecycleStatus::from_counts(completed, total);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::{CategoryWithItems, GeneratedCategory, ItemTemplate};
    use crate::checklist::{AcquisitionMethod, CategoryType, DocumentType, Priority};

    fn category(n: usize) -> CategoryWithItems {
        let generated = GeneratedCategory {
            category_type: CategoryType::Medical,
            name: "Medical Records".into(),
            priority: Priority::Critical,
            position: 0,
            items: (0..n)
                .map(|i| ItemTemplate {
                    document_name: format!("doc {}", i),
                    document_type: DocumentType::MedicalRecord,
                    source: "custodian".into(),
                    acquisition_method: AcquisitionMethod::ThirdPartyRequest,
                    priority: Priority::High,
                    required: i == 0,
                    tag: None,
                })
                .collect(),
        };
        CategoryWithItems::instantiate(Uuid::new_v4(), &generated)
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(completion_percentage(3, 5), 60);
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(0, 0), 0);
    }

    #[test]
    fn test_three_of_five_is_sixty() {
        let mut c = category(5);
        c.items[0].status = ItemStatus::Uploaded;
        c.items[1].status = ItemStatus::Verified;
        c.items[2].status = ItemStatus::Uploaded;
        c.items[3].status = ItemStatus::Requested;
        recompute_category(&mut c.category, &c.items);
        assert_eq!(c.category.total_items, 5);
        assert_eq!(c.category.completed_items, 3);
        assert_eq!(c.category.completion_percentage, 60);
    }

    #[test]
    fn test_aggregate_sums_categories() {
        let a = category(4);
        let mut b = category(6);
        b.items[0].status = ItemStatus::Verified;
        b.items[1].status = ItemStatus::Processing;

        let mut categories = vec![a.category.clone(), b.category.clone()];
        let items: Vec<_> = a.items.iter().chain(b.items.iter()).cloned().collect();
        let state = recompute_all(&mut categories, &items);

        assert_eq!(state.total_documents, 10);
        assert_eq!(state.completed_documents, 1);
        assert_eq!(state.requested_documents, 1);
        assert_eq!(state.missing_documents, 8);
        assert_eq!(state.outstanding_requestable, 8);
        assert_eq!(state.completion_percentage, 10);
        assert_eq!(state.lifecycle, LifecycleStatus::InProgress);
        assert_eq!(
            categories.iter().map(|c| c.total_items).sum::<u32>(),
            state.total_documents
        );
    }

    #[test]
    fn test_readiness_at_eighty() {
        let mut c = category(5);
        for item in c.items.iter_mut().take(4) {
            item.status = ItemStatus::Uploaded;
        }
        let mut categories = vec![c.category.clone()];
        let state = recompute_all(&mut categories, &c.items);
        assert_eq!(state.completion_percentage, 80);
        assert!(state.ready);
        assert_eq!(state.lifecycle, LifecycleStatus::ReadyForSubmission);
    }

    #[test]
    fn test_one_missing_of_many_is_not_complete() {
        let mut c = category(200);
        for item in c.items.iter_mut().skip(1) {
            item.status = ItemStatus::Verified;
        }
        let mut categories = vec![c.category.clone()];
        let state = recompute_all(&mut categories, &c.items);
        assert_eq!(state.completion_percentage, 100);
        assert!(state.ready);
        assert_eq!(state.missing_documents, 1);
        assert_eq!(state.lifecycle, LifecycleStatus::ReadyForSubmission);
    }

    #[test]
    fn test_first_upload_leaves_initialized() {
        let mut c = category(201);
        c.items[0].status = ItemStatus::Uploaded;
        let mut categories = vec![c.category.clone()];
        let state = recompute_all(&mut categories, &c.items);
        assert_eq!(state.completion_percentage, 0);
        assert_eq!(state.lifecycle, LifecycleStatus::InProgress);
    }

    #[test]
    fn test_regression_is_recomputed() {
        let mut c = category(2);
        c.items[0].status = ItemStatus::Verified;
        c.items[1].status = ItemStatus::Verified;
        let mut categories = vec![c.category.clone()];
        assert_eq!(
            recompute_all(&mut categories, &c.items).lifecycle,
            LifecycleStatus::Complete
        );

        c.items[1].status = ItemStatus::Missing;
        let state = recompute_all(&mut categories, &c.items);
        assert_eq!(state.completion_percentage, 50);
        assert!(!state.ready);
    }
}
