//! Semantic representations of classes
//!
//! This is the representation to use while analyzing classes. It keeps the
//! compatibility-relevant information around and queryable.
//!
//!   - __Class__ is represented using [`Class`]
//!   - __Method__ is represented using [`Method`]
//!   - __Field__ is represented using [`Field`]
//!
//! Members carry their descriptors as the raw strings spelled in the class
//! file, so two members match exactly when their descriptor strings match.

mod class;
mod field;
mod instruction;
mod method;

pub use class::*;
pub use field::*;
pub use instruction::*;
pub use method::*;
