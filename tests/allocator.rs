mod common;

use std::mem;
use common::{
	Budgeted,
	Counting,
	Traffic
};
use darray::{
	dformat,
	DArray,
	DString,
	TryReserveError
};

#[test]
fn traffic_of_an_array() {
	let counting = Counting::default();
	{
		let mut array = DArray::from_elem_in(0i32, 5, &counting);
		assert_eq!(counting.traffic().total(), 1);

		array.resize(100, 0);
		assert_eq!(counting.traffic().total(), 2);

		// Within capacity.
		array.resize(120, 0);
		array.pop();
		array.remove_range(0, 10);
		assert_eq!(counting.traffic().total(), 2);
	}

	assert_eq!(counting.traffic(), Traffic {
		allocations: 1,
		reallocations: 1,
		releases: 1
	});
}

#[test]
fn empty_arrays_never_allocate() {
	let counting = Counting::default();
	{
		let array: DArray<u64, _> = DArray::new_in(&counting);
		assert_eq!(array.capacity(), 0);

		let mut units = DArray::new_in(&counting);
		for _ in 0..1000 {
			units.push(());
		}
		assert_eq!(units.len(), 1000);
	}

	assert_eq!(counting.traffic().total(), 0);
}

#[test]
fn traffic_of_a_string() {
	let counting = Counting::default();
	{
		let mut s = DString::from_bytes_in(b"Hello", &counting);
		s.push_bytes(b", World!");
		assert_eq!(s, "Hello, World!");

		let copy = s.clone();
		assert_eq!(copy, s);
		assert_ne!(copy.as_bytes().as_ptr(), s.as_bytes().as_ptr());
	}

	let traffic = counting.traffic();
	assert_eq!(traffic.allocations, 2);
	assert_eq!(traffic.reallocations, 1);
	assert_eq!(traffic.releases, 2);
}

#[test]
fn failed_growth_leaves_the_array_untouched() {
	let budget = Budgeted::new(10 * mem::size_of::<u32>());
	let mut array = DArray::from_elem_in(7u32, 5, &budget);
	for i in 0..5 {
		array.try_push(i).unwrap();
	}
	assert_eq!(array.capacity(), 10);

	let ptr = array.as_ptr();
	let before: Vec<u32> = array.to_vec();
	match array.try_push(99) {
		Err(TryReserveError::AllocError { layout }) => assert_eq!(layout.size(), 15 * mem::size_of::<u32>()),
		other => panic!("unexpected result {:?}", other)
	}
	assert_eq!(budget.failures(), 1);
	assert_eq!(array.len(), 10);
	assert_eq!(array.capacity(), 10);
	assert_eq!(array.as_ptr(), ptr);
	assert_eq!(array, before);

	assert!(array.try_insert_slice(0, &[1, 2]).is_err());
	assert!(array.try_concat(&[1, 2, 3]).is_err());
	assert!(array.try_resize(11, 0).is_err());
	assert_eq!(array, before);

	budget.set_limit(usize::MAX);
	array.try_push(99).unwrap();
	assert_eq!(array.len(), 11);
	assert_eq!(array.capacity(), 15);
	assert_eq!(array[10], 99);
}

#[test]
fn failed_creation() {
	let budget = Budgeted::new(0);
	assert!(DArray::try_from_elem_in(0u8, 3, &budget).is_err());
	assert!(DString::try_new_in(&budget).is_err());
	assert!(DString::try_from_fmt_in(format_args!("{}", 12), &budget).is_err());

	// Zero-sized blocks are never requested.
	let array = DArray::try_from_elem_in((), 3, &budget).unwrap();
	assert_eq!(array.len(), 3);
	assert_eq!(budget.failures(), 3);
}

#[test]
fn failed_string_growth() {
	let budget = Budgeted::new(10);
	let mut s = DString::from_bytes_in(b"abc", &budget);
	assert_eq!(s.capacity(), 9);

	assert!(s.try_push_bytes(b"0123456789").is_err());
	assert_eq!(s, "abc");
	assert_eq!(s.as_bytes_with_nul(), b"abc\0");

	assert!(s.try_assign_fmt(format_args!("{:>20}", 1)).is_err());
	assert!(s.is_empty());
	assert_eq!(s.as_bytes_with_nul(), b"\0");

	s.assign_bytes(b"a a a");
	assert!(s.try_replace_all("a", "bcd").is_err());
	assert_eq!(s, "bcd bcd ");
	assert_eq!(s.as_bytes_with_nul().last(), Some(&0));
}

#[test]
fn capacity_overflow_is_reported() {
	let mut array: DArray<u16> = DArray::new();
	assert_eq!(array.try_reserve(usize::MAX), Err(TryReserveError::CapacityOverflow));
	assert_eq!(array.try_reserve_exact(usize::MAX / 2), Err(TryReserveError::CapacityOverflow));
	assert_eq!(array.capacity(), 0);
}

#[test]
#[should_panic(expected = "capacity overflow")]
fn capacity_overflow_panics() {
	let mut array: DArray<u16> = DArray::new();
	array.reserve(usize::MAX);
}

#[test]
fn formatted_strings_allocate_once() {
	let counting = Counting::default();
	{
		let s = DString::from_fmt_in(format_args!("{} {} {}", "a long enough argument", 12345, 6.5), &counting);
		assert_eq!(s, "a long enough argument 12345 6.5");
	}

	assert_eq!(counting.traffic(), Traffic {
		allocations: 1,
		reallocations: 0,
		releases: 1
	});

	let s = dformat!("{}", "");
	assert!(s.is_empty());
}
