//! Opaque ID newtypes for graph entities.
//!
//! [`NodeId`] indexes a node inside the arena of the [`Graph`](crate::Graph)
//! that created it; [`Label`] is a resource-class tag handed out by
//! [`Graph::allocate_label`](crate::Graph::allocate_label). Both are thin `u32`
//! wrappers that are `Copy`, `Ord`, `Hash`, and `Serialize`/`Deserialize`.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the raw index as a `usize`, for slice indexing.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable handle to a node of one graph.
    NodeId
);

define_id!(
    /// Resource-class identifier. Nodes with matching labels are interchangeable
    /// as placement candidates.
    Label
);
