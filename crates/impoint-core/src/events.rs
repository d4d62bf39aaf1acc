//! Change notification for a shared category.
//!
//! [`CategoryHandle`] is the single authoritative owner of a [`Category`]:
//! mutation goes through the handle, which notifies subscribers after the
//! mutation has committed. Subscriptions are explicit: `subscribe` hands
//! out a [`SubscriptionId`] and the owner of the callback is responsible
//! for `unsubscribe` when it goes away.
//!
//! Notification is synchronous and sequential. A callback may re-enter the
//! handle with another mutation; that mutation's event is queued and
//! delivered after the current pass completes, never nested inside it.

use std::cell::{Cell, Ref, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::category::{Category, MissingLabelPolicy};
use crate::error::CategoryResult;
use crate::label::Label;

/// What part of a category changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryEvent {
    /// Labels were renumbered; codes and label order changed together.
    LabelList,
    /// Coded values were replaced wholesale.
    CodedValues,
    /// The color palette was recomputed.
    Palette,
}

/// Identifies one subscription on a [`CategoryHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Rc<RefCell<dyn FnMut(&CategoryEvent)>>;

struct Shared {
    category: RefCell<Category>,
    subscribers: RefCell<Vec<(SubscriptionId, Callback)>>,
    next_id: Cell<u64>,
    pending: RefCell<VecDeque<CategoryEvent>>,
    notifying: Cell<bool>,
}

/// Cheaply-clonable shared handle to a category (single-threaded).
#[derive(Clone)]
pub struct CategoryHandle {
    shared: Rc<Shared>,
}

impl CategoryHandle {
    /// Take ownership of a category.
    pub fn new(category: Category) -> Self {
        Self {
            shared: Rc::new(Shared {
                category: RefCell::new(category),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                pending: RefCell::new(VecDeque::new()),
                notifying: Cell::new(false),
            }),
        }
    }

    /// Read access to the category.
    ///
    /// The borrow must not be held across a mutating call on any clone of
    /// this handle.
    pub fn read(&self) -> Ref<'_, Category> {
        self.shared.category.borrow()
    }

    /// Run a closure against the category and return its result.
    pub fn with<R>(&self, f: impl FnOnce(&Category) -> R) -> R {
        f(&self.shared.category.borrow())
    }

    /// Register a change callback. Callbacks fire in subscription order.
    pub fn subscribe(&self, callback: impl FnMut(&CategoryEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.shared.next_id.get());
        self.shared.next_id.set(id.0 + 1);
        self.shared
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(callback))));
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.shared.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    pub fn num_subscribers(&self) -> usize {
        self.shared.subscribers.borrow().len()
    }

    /// See [`Category::set_label_list`]. Notifies `LabelList` on change.
    pub fn set_label_list(
        &self,
        new_labels: Vec<Label>,
        on_missing: MissingLabelPolicy,
    ) -> CategoryResult<()> {
        let changed = self
            .shared
            .category
            .borrow_mut()
            .set_label_list(new_labels, on_missing)?;
        if changed {
            self.emit(CategoryEvent::LabelList);
        }
        Ok(())
    }

    /// See [`Category::set_coded_values`]. Notifies `CodedValues`.
    pub fn set_coded_values(
        &self,
        new_codes: Vec<u16>,
        label_list: &[Label],
    ) -> CategoryResult<()> {
        self.shared
            .category
            .borrow_mut()
            .set_coded_values(new_codes, label_list)?;
        self.emit(CategoryEvent::CodedValues);
        Ok(())
    }

    /// See [`Category::create_color_palette`]. Notifies `Palette`.
    pub fn create_color_palette(
        &self,
        explicit: Option<&HashMap<Label, [f32; 3]>>,
    ) -> CategoryResult<()> {
        self.shared
            .category
            .borrow_mut()
            .create_color_palette(explicit)?;
        self.emit(CategoryEvent::Palette);
        Ok(())
    }

    /// Queue an event and drain the queue unless a drain is already
    /// running further up the stack.
    fn emit(&self, event: CategoryEvent) {
        self.shared.pending.borrow_mut().push_back(event);
        if self.shared.notifying.get() {
            return;
        }
        self.shared.notifying.set(true);
        loop {
            let event = match self.shared.pending.borrow_mut().pop_front() {
                Some(event) => event,
                None => break,
            };
            // Snapshot so callbacks may subscribe/unsubscribe freely.
            let callbacks: Vec<Callback> = self
                .shared
                .subscribers
                .borrow()
                .iter()
                .map(|(_, cb)| Rc::clone(cb))
                .collect();
            for callback in callbacks {
                (callback.borrow_mut())(&event);
            }
        }
        self.shared.notifying.set(false);
    }
}
