use core::{
	alloc::{
		Layout,
		LayoutError
	},
	cmp,
	marker::PhantomData,
	mem,
	ptr::NonNull
};
use crate::{
	alloc::{
		Allocator,
		Global
	},
	error::TryReserveError
};

/// Smallest capacity ever chosen by the growth policy.
pub const MIN_CAPACITY: usize = 10;

/// Growth policy: the capacity allocated to hold `len` elements with some headroom.
///
/// Returns `max(10, ceil(len * 1.3))`, or `None` if the computation overflows.
///
/// ```
/// assert_eq!(darray::new_capacity(0), Some(10));
/// assert_eq!(darray::new_capacity(10), Some(13));
/// assert_eq!(darray::new_capacity(100), Some(130));
/// assert_eq!(darray::new_capacity(101), Some(132));
/// ```
#[inline]
pub fn new_capacity(len: usize) -> Option<usize> {
	// ceil(len * 13 / 10) == len + ceil(len * 3 / 10).
	let extra = len / 10 * 3 + (len % 10 * 3 + 9) / 10;
	let capacity = len.checked_add(extra)?;
	Some(cmp::max(MIN_CAPACITY, capacity))
}

/// Bookkeeping of a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
	/// Size of one element in bytes.
	elem_size: usize,

	/// Number of initialized elements.
	len: usize,

	/// Number of elements the current block can hold.
	capacity: usize
}

impl Header {
	#[inline]
	fn new<T>(capacity: usize) -> Header {
		Header {
			elem_size: mem::size_of::<T>(),
			len: 0,
			capacity
		}
	}

	/// Size of one element in bytes.
	#[inline]
	pub fn elem_size(&self) -> usize {
		self.elem_size
	}

	/// Number of initialized elements.
	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	/// Number of elements the block can hold without relocating.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.capacity
	}
}

/// A low-level utility for managing the block behind a buffer.
///
/// This type does not in anyway inspect the memory that it manages. When dropped it *will*
/// free its memory, but it *won't* try to drop its contents.
/// The allocator given on creation is used for every allocation, relocation and release
/// of the buffer, and cannot be replaced.
///
/// Blocks of zero bytes (zero capacity, or zero-sized elements) are never requested from the
/// allocator: the pointer is dangling instead.
pub struct RawBuffer<T, A: Allocator = Global> {
	/// Length, capacity and element size.
	header: Header,

	/// Start of the block, or dangling if no block is held.
	ptr: NonNull<T>,

	/// Allocator.
	alloc: A,

	marker: PhantomData<T>
}

unsafe impl<T: Send, A: Allocator + Send> Send for RawBuffer<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawBuffer<T, A> {}

impl<T, A: Allocator> Drop for RawBuffer<T, A> {
	fn drop(&mut self) {
		if let Some((ptr, layout)) = self.current_memory() {
			unsafe {
				self.alloc.release(ptr, layout)
			}
		}
	}
}

impl<T, A: Allocator> RawBuffer<T, A> {
	/// Creates an empty buffer holding no block.
	#[inline]
	pub fn new_in(alloc: A) -> Self {
		RawBuffer {
			header: Header::new::<T>(0),
			ptr: NonNull::dangling(),
			alloc,
			marker: PhantomData
		}
	}

	/// Creates an empty buffer able to hold exactly `capacity` elements.
	pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, TryReserveError> {
		let mut buffer = Self::new_in(alloc);
		if capacity > 0 {
			buffer.try_relocate(capacity)?;
		}

		Ok(buffer)
	}

	#[inline]
	pub fn header(&self) -> &Header {
		&self.header
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.header.len
	}

	/// Sets the number of initialized elements.
	///
	/// ## Safety
	///
	/// `len` must not exceed the capacity, and the first `len` elements must be initialized.
	#[inline]
	pub unsafe fn set_len(&mut self, len: usize) {
		debug_assert!(len <= self.header.capacity);
		self.header.len = len
	}

	#[inline]
	pub fn capacity(&self) -> usize {
		self.header.capacity
	}

	/// Returns a reference to the underlying allocator.
	#[inline]
	pub fn allocator(&self) -> &A {
		&self.alloc
	}

	#[inline]
	pub fn as_ptr(&self) -> *const T {
		self.ptr.as_ptr()
	}

	#[inline]
	pub fn as_mut_ptr(&mut self) -> *mut T {
		self.ptr.as_ptr()
	}

	/// Returns the current allocated memory and layout.
	///
	/// Returns `None` if no block is held.
	fn current_memory(&self) -> Option<(NonNull<u8>, Layout)> {
		let size = self.header.elem_size * self.header.capacity;
		if size == 0 {
			None
		} else {
			// We have an allocated chunk of memory, so we can bypass runtime
			// checks to get our current layout.
			unsafe {
				let layout = Layout::from_size_align_unchecked(size, mem::align_of::<T>());
				Some((self.ptr.cast(), layout))
			}
		}
	}

	/// Returns if the buffer needs to grow to fulfill the needed extra capacity.
	/// Mainly used to make inlining reserve-calls possible without inlining `relocate`.
	#[inline]
	pub fn needs_to_grow(&self, additional: usize) -> bool {
		additional > self.header.capacity.wrapping_sub(self.header.len)
	}

	/// Reserves capacity for at least `additional` more elements, following the growth policy.
	///
	/// Does nothing if the capacity is already sufficient.
	pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
		if self.needs_to_grow(additional) {
			let required = self.header.len.checked_add(additional).ok_or_else(overflow)?;
			let capacity = new_capacity(required).ok_or_else(overflow)?;
			self.try_relocate(capacity)
		} else {
			Ok(())
		}
	}

	/// Reserves capacity for exactly `additional` more elements.
	///
	/// Does nothing if the capacity is already sufficient.
	pub fn try_reserve_exact(&mut self, additional: usize) -> Result<(), TryReserveError> {
		if self.needs_to_grow(additional) {
			let capacity = self.header.len.checked_add(additional).ok_or_else(overflow)?;
			self.try_relocate(capacity)
		} else {
			Ok(())
		}
	}

	/// Moves the data into a block of exactly `capacity` elements.
	///
	/// Relocating to a zero-byte block releases the current one.
	/// On error, the buffer is left untouched.
	///
	/// # Panics
	///
	/// Panics if `capacity` is less than the length.
	pub fn try_relocate(&mut self, capacity: usize) -> Result<(), TryReserveError> {
		let len = self.header.len;
		if capacity < len {
			panic!("relocation capacity (is {}) should be >= len (is {})", capacity, len);
		}

		let old_capacity = self.header.capacity;
		let new_layout = Layout::array::<T>(capacity);

		// `finish_grow` is non-generic over `T`.
		self.ptr = match finish_grow(new_layout, self.current_memory(), &self.alloc)? {
			Some(ptr) => ptr.cast(),
			None => NonNull::dangling()
		};
		self.header.capacity = capacity;

		tracing::trace!(
			elem_size = self.header.elem_size,
			old_capacity,
			new_capacity = capacity,
			"relocated buffer"
		);

		Ok(())
	}
}

// This function is outside `RawBuffer` to minimize compile times.
// Returns `None` when the new layout is zero-sized, after releasing the current block if any.
#[inline(never)]
fn finish_grow<A>(new_layout: Result<Layout, LayoutError>, current_memory: Option<(NonNull<u8>, Layout)>, alloc: &A) -> Result<Option<NonNull<u8>>, TryReserveError> where A: Allocator {
	// Check for the error here to minimize the size of `RawBuffer::try_relocate`.
	let new_layout = new_layout.map_err(|_| overflow())?;

	alloc_guard(new_layout.size())?;

	if new_layout.size() == 0 {
		if let Some((ptr, old_layout)) = current_memory {
			unsafe {
				alloc.release(ptr, old_layout)
			}
		}
		return Ok(None)
	}

	let memory = match current_memory {
		Some((ptr, old_layout)) => {
			debug_assert_eq!(old_layout.align(), new_layout.align());
			unsafe {
				alloc.reallocate(ptr, old_layout, new_layout.size())
			}
		},
		None => alloc.allocate(new_layout)
	};

	match memory {
		Ok(ptr) => Ok(Some(ptr)),
		Err(_) => {
			tracing::debug!(size = new_layout.size(), align = new_layout.align(), "allocation failed");
			Err(TryReserveError::AllocError { layout: new_layout })
		}
	}
}

/// Every capacity overflow goes through here.
#[cold]
pub(crate) fn overflow() -> TryReserveError {
	tracing::debug!("buffer capacity overflow");
	TryReserveError::CapacityOverflow
}

// We need to guarantee the following:
// * We don't ever allocate `> isize::MAX` byte-size objects.
// * We don't overflow `usize::MAX` and actually allocate too little.
//
// On 64-bit we just need to check for overflow since trying to allocate
// `> isize::MAX` bytes will surely fail. On 32-bit and 16-bit we need to add
// an extra guard for this in case we're running on a platform which can use
// all 4GB in user-space, e.g., PAE or x32.
#[inline]
fn alloc_guard(alloc_size: usize) -> Result<(), TryReserveError> {
	if usize::BITS < 64 && alloc_size > isize::MAX as usize {
		Err(overflow())
	} else {
		Ok(())
	}
}
