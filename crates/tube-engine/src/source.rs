//! Control point sources and change subscriptions.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};
use tube_math::Point3;

new_key_type! {
    /// Handle returned by [`ControlPointSource::subscribe`].
    pub struct SubscriptionId;
}

/// Invoked after the source's points have changed.
pub type ChangeCallback = Rc<dyn Fn()>;

/// An ordered, observable list of 3D control points.
///
/// Implementations must deliver change notifications only after the
/// mutation has completed and no internal borrow is held, so a callback can
/// read the source.
pub trait ControlPointSource {
    fn count(&self) -> usize;

    fn position_at(&self, index: usize) -> Option<Point3>;

    fn subscribe(&self, on_changed: ChangeCallback) -> SubscriptionId;

    /// Remove a subscription. Returns `false` if it was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Snapshot of all positions, in order.
    fn positions(&self) -> Vec<Point3> {
        (0..self.count()).filter_map(|i| self.position_at(i)).collect()
    }
}

/// A live subscription. Unsubscribes exactly once, when dropped.
pub struct Subscription {
    source: Rc<dyn ControlPointSource>,
    id: SubscriptionId,
}

impl Subscription {
    pub fn new(source: Rc<dyn ControlPointSource>, on_changed: ChangeCallback) -> Self {
        let id = source.subscribe(on_changed);
        Self { source, id }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn source(&self) -> &Rc<dyn ControlPointSource> {
        &self.source
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.source.unsubscribe(self.id);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// In-memory control point list that notifies subscribers after each change.
#[derive(Default)]
pub struct ControlPointList {
    points: RefCell<Vec<Point3>>,
    subscribers: RefCell<SlotMap<SubscriptionId, ChangeCallback>>,
}

impl ControlPointList {
    pub fn new(points: Vec<Point3>) -> Self {
        Self {
            points: RefCell::new(points),
            subscribers: RefCell::default(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn push(&self, point: Point3) {
        self.points.borrow_mut().push(point);
        self.notify();
    }

    /// Insert before `index`. Returns `false` (and does nothing) past the end.
    pub fn insert(&self, index: usize, point: Point3) -> bool {
        {
            let mut points = self.points.borrow_mut();
            if index > points.len() {
                return false;
            }
            points.insert(index, point);
        }
        self.notify();
        true
    }

    pub fn remove(&self, index: usize) -> Option<Point3> {
        let removed = {
            let mut points = self.points.borrow_mut();
            (index < points.len()).then(|| points.remove(index))
        };
        if removed.is_some() {
            self.notify();
        }
        removed
    }

    /// Move an existing point. Returns `false` for an out-of-range index.
    pub fn set_position(&self, index: usize, point: Point3) -> bool {
        {
            let mut points = self.points.borrow_mut();
            match points.get_mut(index) {
                Some(slot) => *slot = point,
                None => return false,
            }
        }
        self.notify();
        true
    }

    /// Replace every point with one notification.
    pub fn set_all(&self, points: Vec<Point3>) {
        *self.points.borrow_mut() = points;
        self.notify();
    }

    pub fn clear(&self) {
        self.points.borrow_mut().clear();
        self.notify();
    }

    fn notify(&self) {
        // Callbacks may subscribe or unsubscribe, so call them on a snapshot.
        let callbacks: Vec<ChangeCallback> = self.subscribers.borrow().values().cloned().collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl ControlPointSource for ControlPointList {
    fn count(&self) -> usize {
        self.points.borrow().len()
    }

    fn position_at(&self, index: usize) -> Option<Point3> {
        self.points.borrow().get(index).copied()
    }

    fn subscribe(&self, on_changed: ChangeCallback) -> SubscriptionId {
        self.subscribers.borrow_mut().insert(on_changed)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.borrow_mut().remove(id).is_some()
    }

    fn positions(&self) -> Vec<Point3> {
        self.points.borrow().clone()
    }
}

impl fmt::Debug for ControlPointList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlPointList")
            .field("points", &self.points.borrow())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
