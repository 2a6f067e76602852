//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. A product's variant attribute set (a DVD's size, a piece
//! of furniture's dimensions) is a value object owned by the product entity.

/// Marker trait for value objects.
///
/// The trait requires:
/// - **Clone**: value objects are copied, never shared mutably
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: helpful for logging and test failures
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Dimensions {
///     height: f64,
///     width: f64,
/// }
///
/// impl ValueObject for Dimensions {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
