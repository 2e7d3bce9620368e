//! Error values reported by the fallible operations.
use core::alloc::Layout;
use std::io;
use thiserror::Error;

/// The allocator could not satisfy a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Error)]
#[error("memory allocation failed")]
pub struct AllocError;

/// The error type for operations that may grow a buffer.
///
/// When one of these is returned the buffer has not been modified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TryReserveError {
	/// The computed capacity exceeded the maximum (usually `isize::MAX` bytes).
	#[error("memory allocation failed because the computed capacity exceeded the collection's maximum")]
	CapacityOverflow,

	/// The allocator returned an error.
	#[error("memory allocation of {} bytes failed", .layout.size())]
	AllocError {
		/// The layout of the allocation request that failed.
		layout: Layout
	}
}

/// The error type of [`DString::try_read_delimited`](crate::DString::try_read_delimited).
///
/// The content of the string is unspecified after any of these.
#[derive(Debug, Error)]
pub enum ReadError {
	/// The string could not grow to hold the next byte.
	#[error(transparent)]
	Reserve(#[from] TryReserveError),

	/// The stream ended before the delimiter was read.
	#[error("stream ended before the delimiter {0:#04x} was read")]
	UnexpectedEof(u8),

	/// The stream itself failed.
	#[error("failed to read from the stream")]
	Io(#[from] io::Error)
}
