//! Entity trait: things with identity.

/// Marker + minimal interface for domain objects with identity.
///
/// Two entities with the same id are the same entity regardless of attribute
/// values: a participant keeps their identity when their display name
/// changes. Contrast with [`crate::ValueObject`].
pub trait Entity {
    /// The entity's strongly-typed id.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// This entity's id.
    fn id(&self) -> &Self::Id;
}
