use core::fmt;
use core::num::NonZeroU32;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Create an id from a 0-based slot index by storing index+1.
            ///
            /// Saturates at `u32::MAX - 1`; arenas never get that large.
            pub fn from_index(index: u32) -> Self {
                Self(NonZeroU32::MIN.saturating_add(index))
            }

            /// Recover the 0-based slot index.
            pub fn index(self) -> u32 {
                self.0.get() - 1
            }

            /// Slot index as a `usize`, for indexing into arena vectors.
            pub fn slot(self) -> usize {
                self.index() as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.index())
            }
        }
    };
}

define_id!(
    /// Stable identity of a graph node.
    ///
    /// - `u32` keeps adjacency lists small
    /// - `NonZero` lets `Option<NodeId>` be the same size as `NodeId`
    ///
    /// Slots are never reused, so an id outlives the node it names and
    /// can be checked for staleness.
    NodeId
);

define_id!(
    /// Stable identity of a directed edge.
    EdgeId
);
