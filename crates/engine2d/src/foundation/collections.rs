//! Specialized collection types

pub use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle to a physics body stored in a [`HandleMap`]
    pub struct BodyHandle;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<T> = SlotMap<BodyHandle, T>;
