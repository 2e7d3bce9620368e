use core::{
	fmt,
	ops::{
		Deref,
		DerefMut
	},
	ptr,
	slice
};
use std::alloc::handle_alloc_error;
use crate::{
	alloc::{
		Allocator,
		Global
	},
	error::TryReserveError,
	raw::{
		overflow,
		Header,
		RawBuffer
	}
};

/// Contiguous growable array of plain `Copy` records, with a pluggable allocator.
///
/// This type behaves mostly like a `Vec<T>`, with two differences.
/// First, capacity follows a fixed growth policy: whenever the array runs out of
/// room it moves to a block of [`new_capacity`](crate::new_capacity)`(required)` elements,
/// that is `max(10, ceil(required * 1.3))`.
/// Second, the allocator is chosen once at creation (see [`Allocator`]) and every
/// relocation and the final release use that same allocator.
///
/// Elements are treated as opaque records: they are copied bit for bit when the array
/// moves and never dropped.
///
/// Every operation that can relocate the array comes in two forms.
/// The `try_` form returns a [`TryReserveError`] and leaves the array untouched on failure.
/// The plain form panics on capacity overflow and calls [`handle_alloc_error`] when the
/// allocator fails, like `Vec` does.
///
/// # Examples
///
/// ```
/// # use darray::DArray;
/// let mut array = DArray::new();
/// for i in 0..16 {
/// 	array.push(i);
/// }
///
/// assert_eq!(array.len(), 16);
/// assert_eq!(array.capacity(), 21);
/// assert_eq!(array[3], 3);
/// ```
pub struct DArray<T: Copy, A: Allocator = Global> {
	buf: RawBuffer<T, A>
}

impl<T: Copy> DArray<T, Global> {
	/// Creates a new empty `DArray`.
	///
	/// The array will not allocate until elements are pushed onto it.
	#[inline]
	pub fn new() -> Self {
		Self::new_in(Global)
	}

	/// Creates a new empty `DArray` with room for `count` elements, plus headroom given by
	/// the growth policy.
	#[inline]
	pub fn with_capacity(count: usize) -> Self {
		Self::with_capacity_in(count, Global)
	}

	/// Creates a `DArray` holding `count` copies of `value`.
	///
	/// The capacity follows the growth policy.
	#[inline]
	pub fn from_elem(value: T, count: usize) -> Self {
		Self::from_elem_in(value, count, Global)
	}

	/// Creates a `DArray` holding `count` copies of `value`, with a capacity of exactly `count`.
	#[inline]
	pub fn from_elem_exact(value: T, count: usize) -> Self {
		Self::from_elem_exact_in(value, count, Global)
	}
}

impl<T: Copy, A: Allocator> DArray<T, A> {
	/// Constructs a new, empty `DArray<T, A>`.
	///
	/// The array will not allocate until elements are pushed onto it.
	#[inline]
	pub fn new_in(alloc: A) -> Self {
		DArray {
			buf: RawBuffer::new_in(alloc)
		}
	}

	/// The same as `with_capacity_in`, but returns on errors instead of panicking or aborting.
	pub fn try_with_capacity_in(count: usize, alloc: A) -> Result<Self, TryReserveError> {
		let capacity = crate::new_capacity(count).ok_or_else(overflow)?;
		Ok(DArray {
			buf: RawBuffer::try_with_capacity_in(capacity, alloc)?
		})
	}

	/// Like `with_capacity`, but parameterized over the choice of allocator.
	#[inline]
	pub fn with_capacity_in(count: usize, alloc: A) -> Self {
		handle_reserve(Self::try_with_capacity_in(count, alloc))
	}

	/// The same as `from_elem_in`, but returns on errors instead of panicking or aborting.
	pub fn try_from_elem_in(value: T, count: usize, alloc: A) -> Result<Self, TryReserveError> {
		let mut array = Self::try_with_capacity_in(count, alloc)?;
		array.extend_with(count, value);
		Ok(array)
	}

	/// Like `from_elem`, but parameterized over the choice of allocator.
	#[inline]
	pub fn from_elem_in(value: T, count: usize, alloc: A) -> Self {
		handle_reserve(Self::try_from_elem_in(value, count, alloc))
	}

	/// The same as `from_elem_exact_in`, but returns on errors instead of panicking or aborting.
	pub fn try_from_elem_exact_in(value: T, count: usize, alloc: A) -> Result<Self, TryReserveError> {
		let mut array = DArray {
			buf: RawBuffer::try_with_capacity_in(count, alloc)?
		};
		array.extend_with(count, value);
		Ok(array)
	}

	/// Like `from_elem_exact`, but parameterized over the choice of allocator.
	#[inline]
	pub fn from_elem_exact_in(value: T, count: usize, alloc: A) -> Self {
		handle_reserve(Self::try_from_elem_exact_in(value, count, alloc))
	}

	/// Copies a slice into a new `DArray`, with a capacity following the growth policy.
	pub fn try_from_slice_in(slice: &[T], alloc: A) -> Result<Self, TryReserveError> {
		let mut array = Self::try_with_capacity_in(slice.len(), alloc)?;
		unsafe {
			array.append_elements(slice);
		}
		Ok(array)
	}

	/// Returns a reference to the underlying allocator.
	#[inline]
	pub fn allocator(&self) -> &A {
		self.buf.allocator()
	}

	/// Returns the bookkeeping record of this array.
	#[inline]
	pub fn header(&self) -> &Header {
		self.buf.header()
	}

	/// Returns the number of elements in the array.
	#[inline]
	pub fn len(&self) -> usize {
		self.buf.len()
	}

	/// Returns `true` if the array contains no elements.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the number of elements the array can hold without relocating.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.buf.capacity()
	}

	/// Returns the size of one element, in bytes.
	#[inline]
	pub fn elem_size(&self) -> usize {
		self.buf.header().elem_size()
	}

	/// Forces the length of the array to `len`.
	///
	/// ## Safety
	///
	/// `len` must be less than or equal to the capacity, and the elements at
	/// `old_len..len` must be initialized.
	#[inline]
	pub unsafe fn set_len(&mut self, len: usize) {
		self.buf.set_len(len)
	}

	/// Returns a raw pointer to the array's buffer.
	///
	/// The caller must ensure that the array outlives the pointer this
	/// function returns, or else it will end up pointing to garbage.
	/// Modifying the array may cause its buffer to be relocated,
	/// which would also make any pointers to it invalid.
	#[inline]
	pub fn as_ptr(&self) -> *const T {
		self.buf.as_ptr()
	}

	/// Returns an unsafe mutable pointer to the array's buffer.
	#[inline]
	pub fn as_mut_ptr(&mut self) -> *mut T {
		self.buf.as_mut_ptr()
	}

	/// Extracts a slice containing the entire array.
	#[inline]
	pub fn as_slice(&self) -> &[T] {
		unsafe {
			slice::from_raw_parts(self.as_ptr(), self.len())
		}
	}

	/// Extracts a mutable slice of the entire array.
	#[inline]
	pub fn as_mut_slice(&mut self) -> &mut [T] {
		unsafe {
			slice::from_raw_parts_mut(self.as_mut_ptr(), self.len())
		}
	}

	/// Returns an iterator over the elements.
	///
	/// The end of the iteration is fixed by the length at the time of the call,
	/// and the iterator borrows the array so it cannot be relocated meanwhile.
	#[inline]
	pub fn iter(&self) -> slice::Iter<'_, T> {
		self.as_slice().iter()
	}

	/// Returns an iterator that allows modifying each element.
	#[inline]
	pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
		self.as_mut_slice().iter_mut()
	}

	/// The same as `reserve`, but returns on errors instead of panicking or aborting.
	#[inline]
	pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
		self.buf.try_reserve(additional)
	}

	/// Ensures room for at least `additional` more elements without changing the length.
	///
	/// If the capacity is already sufficient this does nothing: the array is not moved and
	/// its capacity does not change.
	/// Otherwise the array moves to a block of `new_capacity(len + additional)` elements.
	///
	/// # Panics
	///
	/// Panics if the new capacity overflows.
	#[inline]
	pub fn reserve(&mut self, additional: usize) {
		handle_reserve(self.try_reserve(additional))
	}

	/// The same as `reserve_exact`, but returns on errors instead of panicking or aborting.
	#[inline]
	pub fn try_reserve_exact(&mut self, additional: usize) -> Result<(), TryReserveError> {
		self.buf.try_reserve_exact(additional)
	}

	/// Reserves the minimum capacity for exactly `additional` more elements.
	///
	/// Does nothing if the capacity is already sufficient.
	#[inline]
	pub fn reserve_exact(&mut self, additional: usize) {
		handle_reserve(self.try_reserve_exact(additional))
	}

	/// The same as `resize`, but returns on errors instead of panicking or aborting.
	pub fn try_resize(&mut self, new_len: usize, value: T) -> Result<(), TryReserveError> {
		let len = self.len();
		if new_len > len {
			self.try_reserve(new_len - len)?;
			self.extend_with(new_len - len, value)
		} else {
			self.truncate(new_len)
		}

		Ok(())
	}

	/// Resizes the `DArray` in-place so that `len` is equal to `new_len`.
	///
	/// If `new_len` is greater than `len`, the `DArray` is extended by the
	/// difference, with each additional slot filled with `value`.
	/// The array relocates to `new_capacity(new_len)` elements if it was too small.
	/// If `new_len` is less than `len`, the `DArray` is simply truncated.
	pub fn resize(&mut self, new_len: usize, value: T) {
		handle_reserve(self.try_resize(new_len, value))
	}

	/// The same as `resize_exact`, but returns on errors instead of panicking or aborting.
	pub fn try_resize_exact(&mut self, new_len: usize, value: T) -> Result<(), TryReserveError> {
		let len = self.len();
		if new_len > len {
			self.try_reserve_exact(new_len - len)?;
			self.extend_with(new_len - len, value)
		} else {
			self.truncate(new_len)
		}

		Ok(())
	}

	/// Like `resize`, but relocates to a block of exactly `new_len` elements when growing
	/// beyond the capacity.
	pub fn resize_exact(&mut self, new_len: usize, value: T) {
		handle_reserve(self.try_resize_exact(new_len, value))
	}

	/// Shortens the array, keeping the first `len` elements.
	///
	/// If `len` is greater than the array's current length, this has no
	/// effect. The capacity is left unchanged.
	#[inline]
	pub fn truncate(&mut self, len: usize) {
		if len < self.len() {
			unsafe {
				self.set_len(len)
			}
		}
	}

	/// Clears the array, removing all values.
	///
	/// Note that this method has no effect on the allocated capacity
	/// of the array.
	#[inline]
	pub fn clear(&mut self) {
		self.truncate(0)
	}

	/// The same as `push`, but returns on errors instead of panicking or aborting.
	#[inline]
	pub fn try_push(&mut self, value: T) -> Result<(), TryReserveError> {
		let len = self.len();
		if len == self.capacity() {
			self.try_reserve(1)?;
		}

		unsafe {
			ptr::write(self.as_mut_ptr().add(len), value);
			self.set_len(len + 1);
		}

		Ok(())
	}

	/// Appends an element to the back of the array.
	///
	/// # Panics
	///
	/// Panics if the new capacity overflows.
	#[inline]
	pub fn push(&mut self, value: T) {
		handle_reserve(self.try_push(value))
	}

	/// Removes the last element from the array and returns it, or [`None`] if it
	/// is empty.
	///
	/// This never relocates the array.
	#[inline]
	pub fn pop(&mut self) -> Option<T> {
		if self.is_empty() {
			None
		} else {
			unsafe {
				self.set_len(self.len() - 1);
				Some(ptr::read(self.as_ptr().add(self.len())))
			}
		}
	}

	/// The same as `insert`, but returns on errors instead of panicking or aborting.
	///
	/// # Panics
	///
	/// Panics if `index > len`.
	pub fn try_insert(&mut self, index: usize, element: T) -> Result<(), TryReserveError> {
		self.try_insert_slice(index, slice::from_ref(&element))
	}

	/// Inserts an element at position `index` within the array, shifting all
	/// elements after it to the right.
	///
	/// # Panics
	///
	/// Panics if `index > len`.
	#[inline]
	pub fn insert(&mut self, index: usize, element: T) {
		handle_reserve(self.try_insert(index, element))
	}

	/// The same as `insert_slice`, but returns on errors instead of panicking or aborting.
	///
	/// # Panics
	///
	/// Panics if `index > len`.
	pub fn try_insert_slice(&mut self, index: usize, elements: &[T]) -> Result<(), TryReserveError> {
		let len = self.len();
		if index > len {
			panic!("insertion index (is {}) should be <= len (which is {})", index, len);
		}

		let count = elements.len();
		self.try_reserve(count)?;

		unsafe {
			// infallible
			let p = self.as_mut_ptr().add(index);
			// Shift everything over to make space.
			ptr::copy(p, p.add(count), len - index);
			ptr::copy_nonoverlapping(elements.as_ptr(), p, count);
			self.set_len(len + count);
		}

		Ok(())
	}

	/// Inserts a copy of `elements` at position `index`, shifting all elements after it
	/// to the right.
	///
	/// # Panics
	///
	/// Panics if `index > len`.
	#[inline]
	pub fn insert_slice(&mut self, index: usize, elements: &[T]) {
		handle_reserve(self.try_insert_slice(index, elements))
	}

	/// Removes and returns the element at position `index` within the array,
	/// shifting all elements after it to the left.
	///
	/// This never relocates the array.
	///
	/// # Panics
	///
	/// Panics if `index` is out of bounds.
	pub fn remove(&mut self, index: usize) -> T {
		let len = self.len();
		if index >= len {
			panic!("removal index (is {}) should be < len (is {})", index, len);
		}

		let ret = self[index];
		self.remove_range(index, 1);
		ret
	}

	/// Removes the `count` elements starting at `index`, shifting all elements after them
	/// to the left.
	///
	/// This never relocates the array.
	///
	/// # Panics
	///
	/// Panics if `index + count > len`.
	pub fn remove_range(&mut self, index: usize, count: usize) {
		let len = self.len();
		match index.checked_add(count) {
			Some(end) if end <= len => unsafe {
				// infallible
				let p = self.as_mut_ptr().add(index);
				ptr::copy(p.add(count), p, len - end);
				self.set_len(len - count);
			},
			_ => panic!("removal range (is {}..{}+{}) should be within len (is {})", index, index, count, len)
		}
	}

	/// Exchanges the elements at indices `a` and `b`.
	///
	/// Swapping an element with itself does nothing.
	///
	/// # Panics
	///
	/// Panics if `a` or `b` are out of bounds.
	#[inline]
	pub fn swap(&mut self, a: usize, b: usize) {
		self.as_mut_slice().swap(a, b)
	}

	/// The same as `concat`, but returns on errors instead of panicking or aborting.
	#[inline]
	pub fn try_concat(&mut self, other: &[T]) -> Result<(), TryReserveError> {
		self.try_reserve(other.len())?;
		unsafe {
			self.append_elements(other);
		}
		Ok(())
	}

	/// Appends a copy of every element of `other` at the end of the array.
	///
	/// `other` may be a plain slice or another `DArray`.
	///
	/// ```
	/// # use darray::DArray;
	/// let mut a: DArray<i32> = DArray::from(&[0, 1, 2][..]);
	/// let b: DArray<i32> = DArray::from(&[3, 4][..]);
	/// a.concat(&b);
	/// assert_eq!(a, [0, 1, 2, 3, 4]);
	/// ```
	#[inline]
	pub fn concat(&mut self, other: &[T]) {
		handle_reserve(self.try_concat(other))
	}

	/// Overwrites every element of the array with `value`.
	#[inline]
	pub fn fill(&mut self, value: T) {
		self.as_mut_slice().fill(value)
	}

	/// Appends elements to `Self` from other buffer.
	///
	/// ## Safety
	///
	/// The capacity must already be sufficient.
	#[inline]
	unsafe fn append_elements(&mut self, other: &[T]) {
		let count = other.len();
		let len = self.len();
		debug_assert!(count <= self.capacity() - len);
		ptr::copy_nonoverlapping(other.as_ptr(), self.as_mut_ptr().add(len), count);
		self.set_len(len + count);
	}

	/// Extend the array by `n` copies of `value`, within the current capacity.
	fn extend_with(&mut self, n: usize, value: T) {
		let len = self.len();
		debug_assert!(n <= self.capacity() - len);
		unsafe {
			let mut p = self.as_mut_ptr().add(len);
			for _ in 0..n {
				ptr::write(p, value);
				p = p.add(1);
			}
			self.set_len(len + n);
		}
	}
}

impl<T: Copy, A: Allocator + Clone> Clone for DArray<T, A> {
	fn clone(&self) -> DArray<T, A> {
		handle_reserve(DArray::try_from_slice_in(self, self.allocator().clone()))
	}
}

impl<T: Copy> Default for DArray<T, Global> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl<T: Copy, A: Allocator> Deref for DArray<T, A> {
	type Target = [T];

	#[inline]
	fn deref(&self) -> &[T] {
		self.as_slice()
	}
}

impl<T: Copy, A: Allocator> DerefMut for DArray<T, A> {
	#[inline]
	fn deref_mut(&mut self) -> &mut [T] {
		self.as_mut_slice()
	}
}

impl<'v, T: Copy, A: Allocator> IntoIterator for &'v DArray<T, A> {
	type Item = &'v T;
	type IntoIter = slice::Iter<'v, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<'v, T: Copy, A: Allocator> IntoIterator for &'v mut DArray<T, A> {
	type Item = &'v mut T;
	type IntoIter = slice::IterMut<'v, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter_mut()
	}
}

impl<T: Copy, A: Allocator> Extend<T> for DArray<T, A> {
	#[inline]
	fn extend<I: IntoIterator<Item = T>>(&mut self, iterator: I) {
		let iterator = iterator.into_iter();
		let (lower, _) = iterator.size_hint();
		self.reserve(lower);
		for element in iterator {
			self.push(element)
		}
	}
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for DArray<T, A> {
	#[inline]
	fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iterator: I) {
		self.extend(iterator.into_iter().copied())
	}
}

impl<T: Copy> FromIterator<T> for DArray<T, Global> {
	fn from_iter<I: IntoIterator<Item = T>>(iterator: I) -> Self {
		let mut array = DArray::new();
		array.extend(iterator);
		array
	}
}

impl<T: Copy + fmt::Debug, A: Allocator> fmt::Debug for DArray<T, A> {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

impl<T: Copy, A: Allocator> AsRef<[T]> for DArray<T, A> {
	#[inline]
	fn as_ref(&self) -> &[T] {
		self
	}
}

impl<T: Copy, A: Allocator> AsMut<[T]> for DArray<T, A> {
	#[inline]
	fn as_mut(&mut self) -> &mut [T] {
		self
	}
}

impl<'a, T: Copy> From<&'a [T]> for DArray<T, Global> {
	#[inline]
	fn from(s: &'a [T]) -> DArray<T, Global> {
		handle_reserve(DArray::try_from_slice_in(s, Global))
	}
}

macro_rules! impl_slice_eq1 {
	([$($vars:tt)*] $lhs:ty, $rhs:ty, $($bounds:tt)*) => {
		impl<T, U, $($vars)*> PartialEq<$rhs> for $lhs
		where
			T: PartialEq<U>,
			$($bounds)*
		{
			#[inline]
			fn eq(&self, other: &$rhs) -> bool { self[..] == other[..] }
		}
	}
}

impl_slice_eq1! { [A: Allocator, B: Allocator] DArray<T, A>, DArray<U, B>, T: Copy, U: Copy }
impl_slice_eq1! { [A: Allocator] DArray<T, A>, Vec<U>, T: Copy }
impl_slice_eq1! { [A: Allocator] Vec<T>, DArray<U, A>, U: Copy }
impl_slice_eq1! { [A: Allocator] DArray<T, A>, [U], T: Copy }
impl_slice_eq1! { [A: Allocator] DArray<T, A>, &[U], T: Copy }
impl_slice_eq1! { [A: Allocator] DArray<T, A>, &mut [U], T: Copy }
impl_slice_eq1! { [A: Allocator, const N: usize] DArray<T, A>, [U; N], T: Copy }
impl_slice_eq1! { [A: Allocator, const N: usize] DArray<T, A>, &[U; N], T: Copy }

impl<T: Copy + Eq, A: Allocator> Eq for DArray<T, A> {}

// Central function for reserve error handling.
#[inline]
pub(crate) fn handle_reserve<T>(result: Result<T, TryReserveError>) -> T {
	match result {
		Err(TryReserveError::CapacityOverflow) => capacity_overflow(),
		Err(TryReserveError::AllocError { layout }) => handle_alloc_error(layout),
		Ok(t) => t
	}
}

// One central function responsible for reporting capacity overflows. This'll
// ensure that the code generation related to these panics is minimal as there's
// only one location which panics rather than a bunch throughout the module.
fn capacity_overflow() -> ! {
	panic!("capacity overflow");
}

#[cfg(test)]
mod tests {
	use super::*;

	const INITIAL_NUM_ELEMS: usize = 5;
	const RESIZE_NUM_ELEMS: usize = 100;

	fn counting(len: usize) -> DArray<i32> {
		(0..len as i32).collect()
	}

	#[test]
	fn from_elem() {
		let array = DArray::from_elem(0i32, INITIAL_NUM_ELEMS);
		assert_eq!(array.len(), INITIAL_NUM_ELEMS);
		assert_eq!(array.capacity(), 10);
		assert_eq!(array.elem_size(), 4);
		assert_eq!(array, [0; INITIAL_NUM_ELEMS]);
	}

	#[test]
	fn from_elem_exact() {
		let array = DArray::from_elem_exact(7u32, INITIAL_NUM_ELEMS);
		assert_eq!(array.len(), INITIAL_NUM_ELEMS);
		assert_eq!(array.capacity(), INITIAL_NUM_ELEMS);
		assert_eq!(array.elem_size(), 4);
		assert!(array.iter().all(|&x| x == 7));
	}

	#[test]
	fn header_mirrors_accessors() {
		let array = DArray::from_elem(0u16, 3);
		let header = *array.header();
		assert_eq!(header.elem_size(), 2);
		assert_eq!(header.len(), 3);
		assert_eq!(header.capacity(), 10);
	}

	#[test]
	fn resize() {
		let mut array = counting(INITIAL_NUM_ELEMS);
		array.resize(RESIZE_NUM_ELEMS, -1);
		assert_eq!(array.len(), RESIZE_NUM_ELEMS);
		assert_eq!(array.capacity(), 130);
		for i in 0..INITIAL_NUM_ELEMS {
			assert_eq!(array[i], i as i32);
		}
		assert!(array[INITIAL_NUM_ELEMS..].iter().all(|&x| x == -1));
	}

	#[test]
	fn resize_exact() {
		let mut array = counting(INITIAL_NUM_ELEMS);
		array.resize_exact(RESIZE_NUM_ELEMS, 0);
		assert_eq!(array.len(), RESIZE_NUM_ELEMS);
		assert_eq!(array.capacity(), RESIZE_NUM_ELEMS);
		assert_eq!(array[..INITIAL_NUM_ELEMS], [0, 1, 2, 3, 4]);
	}

	#[test]
	fn resize_down_then_up() {
		let mut array = counting(8);
		let capacity = array.capacity();
		array.resize(3, 0);
		assert_eq!(array, [0, 1, 2]);
		assert_eq!(array.capacity(), capacity);
		array.resize(6, 0);
		assert_eq!(array, [0, 1, 2, 0, 0, 0]);
	}

	#[test]
	fn reserve_is_idempotent() {
		let mut array = DArray::from_elem(0i32, 1);
		array.reserve(5000);
		assert!(array.capacity() - array.len() >= 5000);

		let ptr = array.as_ptr();
		let capacity = array.capacity();
		array.reserve(50);
		assert_eq!(array.as_ptr(), ptr);
		assert_eq!(array.capacity(), capacity);
	}

	#[test]
	fn push() {
		let mut array = DArray::new();
		for i in 0..=15 {
			array.push(i);
			assert!(array.capacity() >= array.len());
		}
		assert_eq!(array.len(), 16);
		for i in 0..=15 {
			assert_eq!(array[i], i);
		}
	}

	#[test]
	fn pop() {
		let mut array: DArray<i32> = DArray::from(&[3, 5][..]);
		assert_eq!(array.pop(), Some(5));
		assert_eq!(array.len(), 1);
		assert_eq!(array.pop(), Some(3));
		assert_eq!(array.len(), 0);
		assert_eq!(array.pop(), None);
	}

	#[test]
	fn insert() {
		let mut array: DArray<i32> = DArray::from(&[3, 5][..]);
		array.insert(0, 7);
		assert_eq!(array, [7, 3, 5]);
		array.insert(1, 9);
		assert_eq!(array, [7, 9, 3, 5]);
		array.insert(4, 11);
		assert_eq!(array, [7, 9, 3, 5, 11]);
	}

	#[test]
	fn insert_mimics_push_front() {
		let mut array = DArray::new();
		for i in (0..=15).rev() {
			array.insert(0, i);
		}
		assert_eq!(array.len(), 16);
		for i in 0..=15 {
			assert_eq!(array[i], i);
		}
	}

	#[test]
	#[should_panic]
	fn insert_past_end() {
		let mut array = counting(2);
		array.insert(3, 0);
	}

	#[test]
	fn insert_slice() {
		let mut array: DArray<i32> = DArray::from(&[3, 5][..]);
		array.insert_slice(0, &[7, 9, 11]);
		assert_eq!(array, [7, 9, 11, 3, 5]);
		array.insert_slice(1, &[13, 15]);
		assert_eq!(array, [7, 13, 15, 9, 11, 3, 5]);
		array.insert_slice(0, &[]);
		assert_eq!(array.len(), 7);
	}

	#[test]
	fn remove() {
		let mut array: DArray<i32> = DArray::from(&[3, 5, 7, 9][..]);
		assert_eq!(array.remove(1), 5);
		assert_eq!(array.len(), 3);
		assert_eq!(array.remove(0), 3);
		assert_eq!(array.len(), 2);
		assert_eq!(array.remove(1), 9);
		assert_eq!(array, [7]);
	}

	#[test]
	#[should_panic]
	fn remove_past_end() {
		let mut array = counting(2);
		array.remove(2);
	}

	#[test]
	fn remove_range() {
		let mut array = counting(6);
		array.remove_range(2, 3);
		assert_eq!(array, [0, 1, 5]);
		array.remove_range(0, 0);
		assert_eq!(array, [0, 1, 5]);
		array.remove_range(1, 2);
		assert_eq!(array, [0]);
	}

	#[test]
	fn swap() {
		let mut array = DArray::from_elem(0i32, 6);
		array[3] = 12;
		array[5] = 99;
		array.swap(3, 5);
		assert_eq!((array[3], array[5]), (99, 12));
		array.swap(3, 5);
		assert_eq!((array[3], array[5]), (12, 99));
		array.swap(3, 3);
		assert_eq!((array[3], array[5]), (12, 99));
	}

	#[test]
	fn concat_array() {
		let src: DArray<i32> = DArray::from(&[3, 4][..]);
		let mut dest = counting(3);
		dest.concat(&src);
		assert_eq!(dest, [0, 1, 2, 3, 4]);
		assert_eq!(src, [3, 4]);
	}

	#[test]
	fn concat_slice() {
		let mut dest = counting(3);
		dest.concat(&[3, 4]);
		assert_eq!(dest, counting(5));
	}

	#[test]
	fn concat_bytes() {
		let mut dest: DArray<u8> = DArray::from(&b"Hello "[..]);
		dest.concat(b"World!\0");
		assert_eq!(&dest[..], b"Hello World!\0");
		dest.pop();
		dest.concat(b" Another one!\0");
		assert_eq!(&dest[..], b"Hello World! Another one!\0");
	}

	#[test]
	fn fill() {
		let mut array = counting(INITIAL_NUM_ELEMS);
		array.fill(12 + 3);
		assert!(array.iter().all(|&x| x == 15));
		assert_eq!(array.len(), INITIAL_NUM_ELEMS);
	}

	#[test]
	fn iterate() {
		let mut array = counting(INITIAL_NUM_ELEMS);
		for x in &mut array {
			*x += 1;
		}
		assert_eq!(array, [1, 2, 3, 4, 5]);

		let mut last = i32::MIN;
		let mut count = 0;
		for &x in &array {
			assert!(x >= last);
			last = x;
			count += 1;
		}
		assert_eq!(count, INITIAL_NUM_ELEMS);

		// restartable
		assert_eq!(array.iter().count(), INITIAL_NUM_ELEMS);
	}

	#[test]
	fn nested() {
		let mut rows: DArray<usize> = DArray::new();
		let mut grid = Vec::new();
		for _ in 0..INITIAL_NUM_ELEMS {
			grid.push(DArray::from_elem(1usize, INITIAL_NUM_ELEMS));
		}
		for row in &grid {
			rows.push(row.iter().sum());
		}
		assert_eq!(rows.iter().sum::<usize>(), INITIAL_NUM_ELEMS * INITIAL_NUM_ELEMS);
	}

	#[derive(Clone, Copy, Debug, PartialEq)]
	struct Record {
		a: i32,
		b: u8,
		c: f64
	}

	#[test]
	fn struct_elements() {
		let record = Record { a: 3, b: b'y', c: 2.5 };
		let mut array = DArray::from_elem(record, 1);
		array.push(Record { a: 4, b: b'z', c: 4.5 });
		assert_eq!(array.elem_size(), std::mem::size_of::<Record>());
		assert_eq!(array.remove(0), record);
		assert_eq!(array[0].a, 4);
	}

	#[test]
	fn zero_sized() {
		let mut array = DArray::new();
		for _ in 0..100 {
			array.push(());
		}
		assert_eq!(array.len(), 100);
		assert_eq!(array.elem_size(), 0);
		assert_eq!(array.pop(), Some(()));
	}

	#[test]
	fn clone() {
		let array = counting(12);
		let copy = array.clone();
		assert_eq!(array, copy);
		assert_ne!(array.as_ptr(), copy.as_ptr());
	}
}
