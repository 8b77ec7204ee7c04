//! Built-in comparison steps
//!
//! Each step owns one class of shapes. The canonical consultation order is
//! reference equality, dictionary, collection, enum, complex type, then the
//! simple-equality fallback; [`crate::pipeline::StepPipeline::reset`]
//! restores it.

pub mod collection;
pub mod complex;
pub mod dictionary;
pub mod enumeration;
pub mod reference;
pub mod simple;

pub use collection::CollectionStep;
pub use complex::ComplexTypeStep;
pub use dictionary::DictionaryStep;
pub use enumeration::EnumStep;
pub use reference::ReferenceEqualityStep;
pub use simple::SimpleEqualityStep;
