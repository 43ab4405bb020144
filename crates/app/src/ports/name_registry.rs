//! Name registry port: consulted before showing a hub-provided name.

use avebridge_domain::device::UniqueId;

/// Knows which devices were renamed by the user on the host platform.
///
/// The cache never overwrites a customised name with the one reported by
/// the hub; it only records the hub name alongside.
pub trait NameRegistry: Send + Sync {
    /// Whether the user gave `unique_id` a name of their own.
    fn is_customized(&self, unique_id: &UniqueId) -> bool;
}

/// Registry for hosts without user-editable names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCustomNames;

impl NameRegistry for NoCustomNames {
    fn is_customized(&self, _unique_id: &UniqueId) -> bool {
        false
    }
}

impl<T: NameRegistry + ?Sized> NameRegistry for std::sync::Arc<T> {
    fn is_customized(&self, unique_id: &UniqueId) -> bool {
        (**self).is_customized(unique_id)
    }
}
