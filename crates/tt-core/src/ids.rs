//! Strongly typed, zero-cost identifier wrappers.
//!
//! Feature and node ids follow the vector-map convention of being **1-based**:
//! id `1` is the first feature, and `0` never names anything.  The `.index()`
//! helper converts to a 0-based slot for direct `Vec` indexing, and
//! `from_index` goes the other way.

use std::fmt;

/// Generate a 1-based typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// 0-based slot for direct use as a `Vec` index.
            ///
            /// # Panics
            /// Panics in debug mode on the (never valid) id `0`.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize - 1
            }

            /// Inverse of [`index`](Self::index).
            #[inline(always)]
            pub fn from_index(i: usize) -> Self {
                $name((i + 1) as $inner)
            }

            /// The id widened to a signed category value.
            #[inline(always)]
            pub fn as_cat(self) -> i64 {
                self.0 as i64
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Id of a feature (point, line, boundary, …) in a vector map.
    ///
    /// Input and output maps use separate id spaces; a rewrite in the output
    /// map may hand back a different id for the same logical feature.
    pub struct FeatureId(u32);
}

typed_id! {
    /// Id of a topological node (line endpoint / intersection).
    pub struct NodeId(u32);
}

/// A category layer ("field") number.  Layer `0` is reserved and never valid
/// in a configuration.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layer(pub u32);

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}", self.0)
    }
}
