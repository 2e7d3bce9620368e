//! Allocator capability used by every buffer of this crate.
//!
//! A buffer receives its allocator when it is created and keeps it until it is
//! dropped: every relocation and the final release go through that same value.
use core::{
	alloc::Layout,
	ptr::NonNull
};
use std::alloc;
use crate::error::AllocError;

/// A source of memory blocks.
///
/// This is the stable counterpart of the unstable `core::alloc::Allocator` trait,
/// reduced to the three operations the buffers need.
///
/// # Safety
///
/// Implementors must return blocks that are valid for reads and writes of
/// `layout.size()` bytes and aligned to `layout.align()`.
/// A block returned by `allocate` or `reallocate` must stay valid until it is
/// passed to `reallocate` or `release` on the same allocator.
pub unsafe trait Allocator {
	/// Attempts to allocate a block of memory fitting `layout`.
	///
	/// `layout` never has a size of zero.
	fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

	/// Attempts to resize the block `ptr` to `new_size` bytes, keeping its alignment.
	///
	/// The returned block may live at a different address, in which case the
	/// first `min(old_layout.size(), new_size)` bytes are copied over and `ptr`
	/// is released.
	/// On failure `ptr` is left untouched and still owned by the caller.
	///
	/// # Safety
	///
	/// `ptr` must denote a block currently allocated by this allocator with
	/// `old_layout`, and `new_size` must not be zero.
	unsafe fn reallocate(&self, ptr: NonNull<u8>, old_layout: Layout, new_size: usize) -> Result<NonNull<u8>, AllocError>;

	/// Releases the memory referenced by `ptr`.
	///
	/// # Safety
	///
	/// `ptr` must denote a block currently allocated by this allocator with `layout`.
	unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The process allocator, backed by `std::alloc`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Global;

unsafe impl Allocator for Global {
	#[inline]
	fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
		debug_assert_ne!(layout.size(), 0);
		// SAFETY: callers never request zero-sized blocks.
		NonNull::new(unsafe { alloc::alloc(layout) }).ok_or(AllocError)
	}

	#[inline]
	unsafe fn reallocate(&self, ptr: NonNull<u8>, old_layout: Layout, new_size: usize) -> Result<NonNull<u8>, AllocError> {
		debug_assert_ne!(new_size, 0);
		NonNull::new(alloc::realloc(ptr.as_ptr(), old_layout, new_size)).ok_or(AllocError)
	}

	#[inline]
	unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
		alloc::dealloc(ptr.as_ptr(), layout)
	}
}

unsafe impl<'a, A: Allocator + ?Sized> Allocator for &'a A {
	#[inline]
	fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
		(**self).allocate(layout)
	}

	#[inline]
	unsafe fn reallocate(&self, ptr: NonNull<u8>, old_layout: Layout, new_size: usize) -> Result<NonNull<u8>, AllocError> {
		(**self).reallocate(ptr, old_layout, new_size)
	}

	#[inline]
	unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
		(**self).release(ptr, layout)
	}
}
