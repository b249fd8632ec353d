//! Math module — engine value types not covered by glam.

mod vector4i;

pub use vector4i::Vector4i;
