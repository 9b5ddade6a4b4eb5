//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined
//! entirely by their attribute values. Two value objects with the same values are
//! considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. They represent
/// concepts where identity doesn't matter - only the values matter.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: No identity (two `Amount`s of 30.00 are the same money)
/// - **Entity**: Has identity (two participants named "alex" are still two
///   different people)
///
/// ## Immutability
///
/// To "modify" a value object, create a new one with the new values. A `Share`
/// never changes in place; an amended expense carries a fresh share list.
///
/// ## Design Constraints
///
/// - **Clone**: value objects are cheap to copy
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: debuggable for logging and tests
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
