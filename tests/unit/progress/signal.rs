use std::cell::Cell;

use super::*;

#[test]
fn listeners_receive_changes_in_order() {
    let signal = ProgressSignal::new(0.0);
    let log = Rc::new(RefCell::new(Vec::new()));

    let l1 = Rc::clone(&log);
    let _a = signal.subscribe(move |p| l1.borrow_mut().push(("a", p)));
    let l2 = Rc::clone(&log);
    let _b = signal.subscribe(move |p| l2.borrow_mut().push(("b", p)));

    signal.set(0.25);
    assert_eq!(*log.borrow(), vec![("a", 0.25), ("b", 0.25)]);
    assert_eq!(signal.get(), 0.25);
}

#[test]
fn unchanged_values_do_not_notify() {
    let signal = ProgressSignal::new(0.5);
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    let _sub = signal.subscribe(move |_| h.set(h.get() + 1));

    signal.set(0.5);
    signal.set(0.6);
    signal.set(0.6);
    assert_eq!(hits.get(), 1);
}

#[test]
fn dropping_the_token_unsubscribes() {
    let signal = ProgressSignal::default();
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    let sub = signal.subscribe(move |_| h.set(h.get() + 1));
    assert_eq!(signal.listener_count(), 1);

    signal.set(0.1);
    sub.unsubscribe();
    signal.set(0.2);
    assert_eq!(hits.get(), 1);
    assert_eq!(signal.listener_count(), 0);
}

#[test]
fn listener_can_drop_its_own_subscription_mid_notify() {
    let signal = ProgressSignal::default();
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let hits = Rc::new(Cell::new(0));

    let s = Rc::clone(&slot);
    let h = Rc::clone(&hits);
    let sub = signal.subscribe(move |_| {
        h.set(h.get() + 1);
        s.borrow_mut().take();
    });
    *slot.borrow_mut() = Some(sub);

    signal.set(0.3);
    signal.set(0.4);
    assert_eq!(hits.get(), 1);
    assert_eq!(signal.listener_count(), 0);
}

#[test]
fn listener_can_subscribe_during_notify() {
    let signal = ProgressSignal::default();
    let late_hits = Rc::new(Cell::new(0));
    let keep: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

    let sig = signal.clone();
    let k = Rc::clone(&keep);
    let lh = Rc::clone(&late_hits);
    let _outer = signal.subscribe(move |_| {
        if k.borrow().is_empty() {
            let lh = Rc::clone(&lh);
            k.borrow_mut().push(sig.subscribe(move |_| lh.set(lh.get() + 1)));
        }
    });

    signal.set(0.1);
    assert_eq!(late_hits.get(), 0);
    signal.set(0.2);
    assert_eq!(late_hits.get(), 1);
    assert_eq!(signal.listener_count(), 2);
}

#[test]
fn subscription_outliving_signal_is_harmless() {
    let signal = ProgressSignal::default();
    let sub = signal.subscribe(|_| {});
    drop(signal);
    drop(sub);
}
