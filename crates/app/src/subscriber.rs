//! Set-once subscriber slots.
//!
//! The host platform registers one callback per device kind while it boots.
//! The first registration wins: any later call is a no-op and the rejected
//! callback is dropped.

use std::fmt;
use std::sync::OnceLock;

use avebridge_domain::event::DeviceChange;

/// Callback invoked with every change of one device kind.
pub type Callback = Box<dyn Fn(&DeviceChange) + Send + Sync>;

/// Optional, set-once callback holder.
#[derive(Default)]
pub struct SubscriberSlot {
    callback: OnceLock<Callback>,
}

impl SubscriberSlot {
    /// Register `callback` unless one is already registered.
    ///
    /// Returns `true` when this call registered the callback.
    pub fn set<F>(&self, callback: F) -> bool
    where
        F: Fn(&DeviceChange) + Send + Sync + 'static,
    {
        self.callback.set(Box::new(callback)).is_ok()
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.callback.get().is_some()
    }

    /// Deliver `change` to the registered callback, if any.
    ///
    /// Returns `true` when a callback was invoked.
    pub fn notify(&self, change: &DeviceChange) -> bool {
        match self.callback.get() {
            Some(callback) => {
                callback(change);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for SubscriberSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberSlot")
            .field("is_set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use avebridge_domain::device::{Device, DeviceKind, UniqueId};
    use avebridge_domain::family::Family;

    use super::*;

    fn change() -> DeviceChange {
        DeviceChange::Created(Device::new(UniqueId::new(
            DeviceKind::Switch,
            Family::Light,
            1,
        )))
    }

    fn counting(counter: &Arc<AtomicUsize>) -> impl Fn(&DeviceChange) + Send + Sync + 'static {
        let counter = Arc::clone(counter);
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn should_start_empty() {
        let slot = SubscriberSlot::default();
        assert!(!slot.is_set());
        assert!(!slot.notify(&change()));
    }

    #[test]
    fn should_deliver_to_registered_callback() {
        let slot = SubscriberSlot::default();
        let calls = Arc::new(AtomicUsize::new(0));
        assert!(slot.set(counting(&calls)));

        assert!(slot.notify(&change()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn should_ignore_second_registration() {
        let slot = SubscriberSlot::default();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        assert!(slot.set(counting(&first)));
        assert!(!slot.set(counting(&second)));

        slot.notify(&change());
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }
}
