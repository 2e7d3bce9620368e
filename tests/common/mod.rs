use std::{
	alloc::Layout,
	cell::Cell,
	ptr::NonNull
};
use darray::{
	AllocError,
	Allocator,
	Global
};

/// Allocator traffic, by operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Traffic {
	pub allocations: usize,
	pub reallocations: usize,
	pub releases: usize
}

impl Traffic {
	pub fn total(&self) -> usize {
		self.allocations + self.reallocations + self.releases
	}
}

/// Forwards to [`Global`], counting every call.
#[derive(Debug, Default)]
pub struct Counting {
	traffic: Cell<Traffic>
}

impl Counting {
	pub fn traffic(&self) -> Traffic {
		self.traffic.get()
	}

	fn record(&self, f: impl FnOnce(&mut Traffic)) {
		let mut traffic = self.traffic.get();
		f(&mut traffic);
		self.traffic.set(traffic)
	}
}

unsafe impl Allocator for Counting {
	fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
		self.record(|t| t.allocations += 1);
		Global.allocate(layout)
	}

	unsafe fn reallocate(&self, ptr: NonNull<u8>, old_layout: Layout, new_size: usize) -> Result<NonNull<u8>, AllocError> {
		self.record(|t| t.reallocations += 1);
		Global.reallocate(ptr, old_layout, new_size)
	}

	unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
		self.record(|t| t.releases += 1);
		Global.release(ptr, layout)
	}
}

/// Forwards to [`Global`] while the requested block sizes fit in a byte budget,
/// and fails otherwise.
///
/// The budget bounds the size of each block, not the sum of all blocks.
#[derive(Debug)]
pub struct Budgeted {
	limit: Cell<usize>,
	failures: Cell<usize>
}

impl Budgeted {
	pub fn new(limit: usize) -> Budgeted {
		Budgeted {
			limit: Cell::new(limit),
			failures: Cell::new(0)
		}
	}

	pub fn set_limit(&self, limit: usize) {
		self.limit.set(limit)
	}

	pub fn failures(&self) -> usize {
		self.failures.get()
	}

	fn check(&self, size: usize) -> Result<(), AllocError> {
		if size > self.limit.get() {
			self.failures.set(self.failures.get() + 1);
			Err(AllocError)
		} else {
			Ok(())
		}
	}
}

unsafe impl Allocator for Budgeted {
	fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
		self.check(layout.size())?;
		Global.allocate(layout)
	}

	unsafe fn reallocate(&self, ptr: NonNull<u8>, old_layout: Layout, new_size: usize) -> Result<NonNull<u8>, AllocError> {
		self.check(new_size)?;
		Global.reallocate(ptr, old_layout, new_size)
	}

	unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
		Global.release(ptr, layout)
	}
}
