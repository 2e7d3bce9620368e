//! This crate provides the [`DArray`] data structure for growable arrays of
//! plain `Copy` records, and the [`DString`] zero-terminated byte string
//! built on top of it.
//!
//! Both are parameterized by an [`Allocator`], chosen when the value is
//! created and used for every relocation and for the final release.
//! By default the process allocator [`Global`] is used.
//!
//! ## Basic usage
//!
//! A `DArray` behaves mostly like a `Vec`:
//! ```rust
//! use darray::DArray;
//!
//! let mut array = DArray::from_elem(0u32, 5);
//! array.push(1);
//! array.insert(0, 2);
//! assert_eq!(array, [2, 0, 0, 0, 0, 0, 1]);
//! assert_eq!(array.remove(0), 2);
//! ```
//!
//! Its capacity follows a fixed policy: when it runs out of room, the array
//! moves to a block of `max(10, ceil(required * 1.3))` elements (see [`new_capacity`]).
//! ```rust
//! # use darray::DArray;
//! let mut array = DArray::new();
//! array.push(1u8); // <- first block, 10 elements.
//! assert_eq!(array.capacity(), 10);
//! ```
//!
//! Every operation that may grow the array has a `try_` form reporting
//! allocation failures as a [`TryReserveError`] and leaving the array untouched:
//! ```rust
//! # use darray::{DArray, TryReserveError};
//! let mut array: DArray<u64> = DArray::new();
//! assert_eq!(array.try_reserve(usize::MAX), Err(TryReserveError::CapacityOverflow));
//! assert_eq!(array.capacity(), 0);
//! ```
//!
//! ## Strings
//!
//! A `DString` always keeps a `0` byte after its content.
//! ```rust
//! use darray::{dformat, DString};
//!
//! let mut s = dformat!("{} {}", 5, "foo");
//! s.push_bytes(b" bar");
//! s.replace_all("bar", "baz");
//! assert_eq!(s, "5 foo baz");
//! assert_eq!(s.as_bytes_with_nul(), b"5 foo baz\0");
//! ```
pub mod alloc;
pub mod error;
pub mod raw;
pub mod generic;
pub mod string;

pub use alloc::{
	Allocator,
	Global
};
pub use error::{
	AllocError,
	ReadError,
	TryReserveError
};
pub use raw::{
	new_capacity,
	MIN_CAPACITY
};
pub use generic::DArray;
pub use string::{
	DString,
	Delimiter
};

/// Creates a [`DString`] using interpolation of runtime expressions.
///
/// Accepts the same arguments as [`format!`]. The output is measured first,
/// then written into a string allocated once to the right size.
///
/// # Panics
///
/// Panics on capacity overflow, or if a formatting trait implementation
/// returns an error.
///
/// ```
/// let s = darray::dformat!("{}-{:02}", "a", 7);
/// assert_eq!(s, "a-07");
/// ```
#[macro_export]
macro_rules! dformat {
	($($arg:tt)*) => {
		$crate::DString::from_fmt(::core::format_args!($($arg)*))
	}
}
