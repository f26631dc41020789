//! A contiguous growable array with bounds-checked positional operations and a
//! configurable growth policy.
pub mod error;
pub mod growvec;
pub mod policy;

pub use error::{OutOfRangeError, PolicyError};
pub use growvec::GrowVec;
pub use policy::GrowthPolicy;
