use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

type Listener = Box<dyn FnMut(f64)>;

struct SignalInner {
    value: f64,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    notifying: bool,
    removed_while_notifying: Vec<u64>,
}

/// Host-thread observable holding the current scroll progress.
///
/// Listeners run synchronously inside [`set`](Self::set), in subscription order, and only when the
/// value actually changes. Listeners may subscribe or drop subscriptions while being notified; a
/// `set` issued from inside a listener updates the value without a nested notification.
#[derive(Clone)]
pub struct ProgressSignal {
    inner: Rc<RefCell<SignalInner>>,
}

impl std::fmt::Debug for ProgressSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ProgressSignal")
            .field("value", &inner.value)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl Default for ProgressSignal {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ProgressSignal {
    /// New signal starting at `initial`.
    pub fn new(initial: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SignalInner {
                value: initial,
                next_id: 0,
                listeners: Vec::new(),
                notifying: false,
                removed_while_notifying: Vec::new(),
            })),
        }
    }

    /// Current value.
    pub fn get(&self) -> f64 {
        self.inner.borrow().value
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Store `value` and notify every listener if it differs from the current one.
    pub fn set(&self, value: f64) {
        let mut listeners = {
            let mut inner = self.inner.borrow_mut();
            if inner.value.to_bits() == value.to_bits() || inner.notifying {
                inner.value = value;
                return;
            }
            inner.value = value;
            inner.notifying = true;
            std::mem::take(&mut inner.listeners)
        };

        for (_, listener) in listeners.iter_mut() {
            listener(value);
        }

        let mut inner = self.inner.borrow_mut();
        let removed = std::mem::take(&mut inner.removed_while_notifying);
        listeners.retain(|(id, _)| !removed.contains(id));
        let added = std::mem::replace(&mut inner.listeners, listeners);
        inner.listeners.extend(added);
        inner.notifying = false;
    }

    /// Register `listener`; it stays registered until the returned token drops.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl FnMut(f64) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Box::new(listener)));
        Subscription {
            id,
            signal: Rc::downgrade(&self.inner),
        }
    }
}

/// Unsubscribe token returned by [`ProgressSignal::subscribe`].
pub struct Subscription {
    id: u64,
    signal: Weak<RefCell<SignalInner>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Subscription {
    /// Explicitly unsubscribe; same as dropping the token.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.signal.upgrade() else {
            return;
        };
        let Ok(mut inner) = inner.try_borrow_mut() else {
            return;
        };
        inner.listeners.retain(|(id, _)| *id != self.id);
        if inner.notifying {
            inner.removed_while_notifying.push(self.id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/progress/signal.rs"]
mod tests;
