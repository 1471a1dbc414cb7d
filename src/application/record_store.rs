// Persistence seam for the cache's records
use crate::domain::error::PanelError;

/// Key/value record store the cache persists through, modeled on the
/// flash-preferences namespace of the device. Small integers and opaque
/// blobs, keyed by name. A missing or unreadable key reads as `None`;
/// writes must be all-or-nothing per key so a torn write can never leave a
/// half-updated record behind.
pub trait RecordStore: Send + Sync {
    fn get_u32(&self, key: &str) -> Option<u32>;

    fn put_u32(&self, key: &str, value: u32) -> Result<(), PanelError>;

    fn get_blob(&self, key: &str) -> Option<Vec<u8>>;

    fn put_blob(&self, key: &str, bytes: &[u8]) -> Result<(), PanelError>;
}
