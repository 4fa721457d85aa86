//! Typed handles into the mesh arena and the global system.
//!
//! Elements, nodes and equation rows are all plain offsets; each gets its
//! own newtype so an auxiliary dof row cannot be used as a node id.

use std::fmt;
use std::ops::{Index, IndexMut};

/// Index access for one container type.
macro_rules! offset_access {
    ($name:ident, $container:ty) => {
        impl<T> Index<$name> for $container {
            type Output = T;
            #[inline]
            fn index(&self, at: $name) -> &T {
                &self[at.0]
            }
        }

        impl<T> IndexMut<$name> for $container {
            #[inline]
            fn index_mut(&mut self, at: $name) -> &mut T {
                &mut self[at.0]
            }
        }
    };
}

/// Declare a set of offset newtypes with a short display prefix each.
macro_rules! typed_offsets {
    ($( $(#[$meta:meta])* $name:ident => $prefix:literal; )+) => {$(
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Wrap a raw offset.
            #[inline]
            pub const fn new(offset: usize) -> Self {
                Self(offset)
            }

            /// Raw offset.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// Every handle below `len`, ascending.
            pub fn iter(len: usize) -> impl Iterator<Item = $name> + ExactSizeIterator {
                (0..len).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        offset_access!($name, [T]);
        offset_access!($name, Vec<T>);
    )+};
}

typed_offsets! {
    /// Element slot in the mesh store.
    ///
    /// Upwind links hold one of these instead of a reference, so the
    /// element graph can contain cycles without shared ownership.
    ///
    /// ```
    /// use potflow_rs::types::ElementIndex;
    ///
    /// assert_eq!(ElementIndex::new(42).to_string(), "E42");
    /// ```
    ElementIndex => "E";

    /// Node slot in the mesh store.
    NodeIndex => "N";

    /// Row of the global system owned by one degree of freedom.
    EquationId => "Q";
}
