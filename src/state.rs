//! The single owned "active section" cell.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::handle::Subscription;
use crate::section::SectionId;

type Subscriber = Rc<RefCell<dyn FnMut(SectionId)>>;

struct CellInner {
    value: Cell<SectionId>,
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<(u64, Subscriber)>>,
}

/// Holds the active section and notifies subscribers when it changes.
///
/// Clones share the same value. Setting the current value again is a no-op,
/// so subscribers only ever observe real transitions.
#[derive(Clone)]
pub struct SectionCell {
    inner: Rc<CellInner>,
}

impl SectionCell {
    pub fn new(initial: SectionId) -> Self {
        Self {
            inner: Rc::new(CellInner {
                value: Cell::new(initial),
                next_id: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn get(&self) -> SectionId {
        self.inner.value.get()
    }

    /// Returns true if the value changed.
    pub fn set(&self, section: SectionId) -> bool {
        if self.inner.value.replace(section) == section {
            return false;
        }
        log::debug!("active section -> {section}");
        let subscribers: Vec<Subscriber> =
            self.inner.subscribers.borrow().iter().map(|(_, s)| s.clone()).collect();
        for subscriber in subscribers {
            match subscriber.try_borrow_mut() {
                Ok(mut notify) => (&mut *notify)(section),
                Err(_) => log::warn!("subscriber re-entered while handling {section}; skipped"),
            };
        }
        true
    }

    pub fn subscribe(&self, callback: impl FnMut(SectionId) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let subscriber: Subscriber = Rc::new(RefCell::new(callback));
        self.inner.subscribers.borrow_mut().push((id, subscriber));

        let inner: Weak<CellInner> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                let removed = {
                    let mut subs = inner.subscribers.borrow_mut();
                    subs.iter().position(|(sid, _)| *sid == id).map(|idx| subs.remove(idx))
                };
                drop(removed);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }
}
