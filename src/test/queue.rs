use super::support::{critical, routine};
use crate::dispatch::{DispatchQueue, QueueSlot};
use crate::model::{EmergencyId, Severity};

#[test]
fn enqueue_splits_by_tier_and_keeps_arrival_order() {
    let mut q = DispatchQueue::new();
    assert!(q.is_empty());
    assert_eq!(q.top_tier(), None);

    q.enqueue(routine(1, 2, 10));
    q.enqueue(critical(2, 3, 20));
    q.enqueue(routine(3, 4, 30));

    assert_eq!(q.len(), 3);
    assert_eq!(q.lengths(), vec![1, 2]);
    assert_eq!(q.top_tier(), Some(Severity::Critical));
    let ids: Vec<_> = q.tier(Severity::Routine).iter().map(|em| em.id).collect();
    assert_eq!(ids, vec![EmergencyId(1), EmergencyId(3)]);
}

#[test]
fn reinsert_front_goes_ahead_of_its_tier() {
    let mut q = DispatchQueue::new();
    q.enqueue(routine(1, 2, 10));
    q.enqueue(routine(2, 2, 20));
    q.reinsert_front(routine(0, 5, 0));

    let ids: Vec<_> = q.tier(Severity::Routine).iter().map(|em| em.id).collect();
    assert_eq!(ids, vec![EmergencyId(0), EmergencyId(1), EmergencyId(2)]);
    assert!(q.tier(Severity::Critical).is_empty());
}

#[test]
fn take_removes_exactly_one_case() {
    let mut q = DispatchQueue::new();
    q.enqueue(critical(1, 0, 0));
    q.enqueue(routine(2, 1, 0));
    q.enqueue(routine(3, 1, 5));

    let taken = q
        .take(QueueSlot {
            severity: Severity::Routine,
            index: 1,
        })
        .expect("slot exists");
    assert_eq!(taken.id, EmergencyId(3));
    assert_eq!(q.len(), 2);

    let by_id = q.take_id(EmergencyId(1)).expect("id exists");
    assert_eq!(by_id.severity, Severity::Critical);
    assert!(q.take_id(EmergencyId(1)).is_none());
    assert_eq!(q.top_tier(), Some(Severity::Routine));
}

#[test]
fn iter_walks_highest_tier_first() {
    let mut q = DispatchQueue::new();
    q.enqueue(routine(1, 1, 0));
    q.enqueue(critical(2, 1, 5));
    q.enqueue(routine(3, 1, 9));

    let order: Vec<_> = q.iter().map(|(slot, em)| (slot, em.id)).collect();
    assert_eq!(order[0].1, EmergencyId(2));
    assert_eq!(
        order[0].0,
        QueueSlot {
            severity: Severity::Critical,
            index: 0
        }
    );
    assert_eq!(order[1].1, EmergencyId(1));
    assert_eq!(order[2].1, EmergencyId(3));
    assert_eq!(q.get(order[2].0).map(|em| em.id), Some(EmergencyId(3)));
}
