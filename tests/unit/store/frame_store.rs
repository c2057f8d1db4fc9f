use super::*;

fn tiny_frame(v: u8) -> FrameImage {
    FrameImage::from_premul_rgba8(1, 1, &[v, v, v, 255]).unwrap()
}

fn store_with(n: u32) -> FrameStore {
    FrameStore::new(&SequenceConfig::new(n, "/images"))
}

#[test]
fn new_store_is_all_pending_with_locators() {
    let store = store_with(3);
    assert_eq!(store.len(), 3);
    assert!(store.slots().iter().all(|s| s.state() == SlotState::Pending));
    assert_eq!(
        store.slot(FrameIndex(2)).unwrap().locator(),
        "/images/frame_0003.webp"
    );
    assert_eq!(store.load_progress(), 0);
    assert!(!store.is_complete());
}

#[test]
fn fallback_scans_backward_only() {
    let mut store = store_with(5);
    store.settle(FrameIndex(0), LoadOutcome::Loaded(tiny_frame(0)));
    store.settle(FrameIndex(1), LoadOutcome::Failed("404".into()));
    store.settle(FrameIndex(2), LoadOutcome::Loaded(tiny_frame(2)));
    store.settle(FrameIndex(3), LoadOutcome::Failed("404".into()));
    store.settle(FrameIndex(4), LoadOutcome::Loaded(tiny_frame(4)));

    let (idx, img) = store.resolve_nearest_ready(FrameIndex(3)).unwrap();
    assert_eq!(idx, FrameIndex(2));
    assert!(img.ptr_eq(store.get(FrameIndex(2)).unwrap()));

    assert_eq!(store.resolve_nearest_ready(FrameIndex(1)).unwrap().0, FrameIndex(0));
    assert_eq!(store.resolve_nearest_ready(FrameIndex(4)).unwrap().0, FrameIndex(4));
    assert!(store.get(FrameIndex(3)).is_none());
}

#[test]
fn fallback_returns_nothing_when_first_slot_failed() {
    let mut store = store_with(3);
    store.settle(FrameIndex(0), LoadOutcome::Failed("decode".into()));
    store.settle(FrameIndex(1), LoadOutcome::Loaded(tiny_frame(1)));

    assert!(store.resolve_nearest_ready(FrameIndex(0)).is_none());
    assert_eq!(store.resolve_nearest_ready(FrameIndex(2)).unwrap().0, FrameIndex(1));
}

#[test]
fn fallback_never_picks_a_later_frame() {
    let mut store = store_with(4);
    store.settle(FrameIndex(3), LoadOutcome::Loaded(tiny_frame(3)));
    assert!(store.resolve_nearest_ready(FrameIndex(2)).is_none());
    assert_eq!(store.resolve_nearest_ready(FrameIndex(9)).unwrap().0, FrameIndex(3));
}

#[test]
fn slots_settle_exactly_once() {
    let mut store = store_with(2);
    assert!(store.settle(FrameIndex(0), LoadOutcome::Failed("x".into())));
    assert!(!store.settle(FrameIndex(0), LoadOutcome::Loaded(tiny_frame(1))));
    assert!(!store.settle(FrameIndex(7), LoadOutcome::Loaded(tiny_frame(1))));

    let slot = store.slot(FrameIndex(0)).unwrap();
    assert_eq!(slot.state(), SlotState::Failed);
    assert_eq!(slot.failure(), Some("x"));
    assert!(slot.natural_size().is_none());
    assert_eq!(store.settled_count(), 1);
}

#[test]
fn progress_is_monotonic_and_hits_100_only_when_complete() {
    let mut store = store_with(3);
    let mut last = store.load_progress();
    for i in 0..3 {
        let outcome = if i == 1 {
            LoadOutcome::Failed("gone".into())
        } else {
            LoadOutcome::Loaded(tiny_frame(i as u8))
        };
        store.settle(FrameIndex(i), outcome);
        let now = store.load_progress();
        assert!(now >= last);
        assert_eq!(now == 100, store.is_complete());
        last = now;
    }
    assert_eq!(last, 100);
    assert_eq!(store.loaded_count(), 2);
    assert_eq!(store.failed_count(), 1);
}

#[test]
fn loaded_slot_reports_natural_size() {
    let mut store = store_with(1);
    let img = FrameImage::from_premul_rgba8(4, 2, &[255u8; 32]).unwrap();
    store.settle(FrameIndex(0), LoadOutcome::Loaded(img));
    assert_eq!(store.slot(FrameIndex(0)).unwrap().natural_size(), Some((4, 2)));
    assert!(store.is_ready(FrameIndex(0)));
}
