//! Shared foundational types used across the matepar place-and-route toolchain.
//!
//! This crate provides the internal error type, content hashing used to
//! fingerprint placements, and the small value objects (process/voltage/temperature
//! corners and combinatorial delays) used to tag characterization data attached
//! to placed primitives.

#![warn(missing_docs)]

pub mod corner;
pub mod delay;
pub mod hash;
pub mod result;

pub use corner::{ProcessSpeed, PtvCorner};
pub use delay::{CombinatorialDelay, DelayEntry, DelayTable};
pub use hash::ContentHash;
pub use result::{InternalError, ParResult};
