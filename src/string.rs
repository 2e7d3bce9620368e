use core::{
	cmp::Ordering,
	fmt,
	hash::{
		Hash,
		Hasher
	},
	ops::{
		Deref,
		DerefMut
	},
	slice,
	str
};
use std::{
	ffi::{
		CStr,
		FromBytesWithNulError
	},
	io
};
use crate::{
	alloc::{
		Allocator,
		Global
	},
	error::{
		ReadError,
		TryReserveError
	},
	generic::{
		handle_reserve,
		DArray
	}
};

/// Where [`DString::try_read_delimited`] stops reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Delimiter {
	/// Stop after this byte has been consumed. The byte is not stored.
	Byte(u8),

	/// Read until the end of the stream.
	Eof
}

/// A growable, zero-terminated byte string.
///
/// The bytes are stored in a [`DArray<u8, A>`] followed by a single `0`
/// terminator that is always present, so the string can be handed to
/// anything expecting a C string with [`to_c_str`](DString::to_c_str).
/// The content itself is arbitrary bytes: it need not be UTF-8 and may
/// contain interior zero bytes.
///
/// Since the terminator always has a slot, even an empty string holds a block
/// of memory.
pub struct DString<A: Allocator = Global> {
	/// Content followed by the terminator.
	buf: DArray<u8, A>
}

impl DString<Global> {
	/// Creates a new empty `DString`.
	#[inline]
	pub fn new() -> Self {
		Self::new_in(Global)
	}

	/// Copies `bytes` into a new `DString`.
	#[inline]
	pub fn from_bytes(bytes: &[u8]) -> Self {
		Self::from_bytes_in(bytes, Global)
	}

	/// Creates a `DString` from formatting arguments.
	///
	/// See the [`dformat!`](crate::dformat) macro.
	#[inline]
	pub fn from_fmt(args: fmt::Arguments<'_>) -> Self {
		Self::from_fmt_in(args, Global)
	}
}

impl<A: Allocator> DString<A> {
	/// The same as `new_in`, but returns on errors instead of panicking or aborting.
	#[inline]
	pub fn try_new_in(alloc: A) -> Result<Self, TryReserveError> {
		Self::try_from_bytes_in(&[], alloc)
	}

	/// Creates a new empty `DString` using the given allocator.
	#[inline]
	pub fn new_in(alloc: A) -> Self {
		handle_reserve(Self::try_new_in(alloc))
	}

	/// Copies `bytes` into a new `DString` using the given allocator.
	///
	/// The whole slice is copied, including any zero byte it may contain.
	pub fn try_from_bytes_in(bytes: &[u8], alloc: A) -> Result<Self, TryReserveError> {
		let mut buf = DArray::try_with_capacity_in(bytes.len() + 1, alloc)?;
		buf.try_concat(bytes)?;
		buf.try_push(0)?;
		Ok(DString { buf })
	}

	/// Like `from_bytes`, but parameterized over the choice of allocator.
	#[inline]
	pub fn from_bytes_in(bytes: &[u8], alloc: A) -> Self {
		handle_reserve(Self::try_from_bytes_in(bytes, alloc))
	}

	/// Formats `args` into a new `DString`.
	///
	/// The arguments are formatted twice: once to measure the output,
	/// then into a string allocated to that size.
	pub fn try_from_fmt_in(args: fmt::Arguments<'_>, alloc: A) -> Result<Self, TryReserveError> {
		let mut buf = DArray::try_with_capacity_in(measure(args).saturating_add(1), alloc)?;
		buf.try_push(0)?;
		let mut string = DString { buf };
		string.write_args(args)?;
		Ok(string)
	}

	/// Like `from_fmt`, but parameterized over the choice of allocator.
	#[inline]
	pub fn from_fmt_in(args: fmt::Arguments<'_>, alloc: A) -> Self {
		handle_reserve(Self::try_from_fmt_in(args, alloc))
	}

	/// Copies this string into a new `DString` using the given allocator.
	#[inline]
	pub fn try_clone_in<B: Allocator>(&self, alloc: B) -> Result<DString<B>, TryReserveError> {
		DString::try_from_bytes_in(self.as_bytes(), alloc)
	}

	/// Returns a reference to the underlying allocator.
	#[inline]
	pub fn allocator(&self) -> &A {
		self.buf.allocator()
	}

	/// Returns the underlying array, terminator included.
	#[inline]
	pub fn as_array(&self) -> &DArray<u8, A> {
		&self.buf
	}

	/// Returns this string's length, in bytes, terminator excluded.
	#[inline]
	pub fn len(&self) -> usize {
		self.buf.len() - 1
	}

	/// Returns `true` if this string has a length of zero.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the number of content bytes this string can hold without relocating.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.buf.capacity() - 1
	}

	/// Returns the content, terminator excluded.
	#[inline]
	pub fn as_bytes(&self) -> &[u8] {
		let len = self.len();
		&self.buf[..len]
	}

	/// Returns a mutable view of the content, terminator excluded.
	#[inline]
	pub fn as_bytes_mut(&mut self) -> &mut [u8] {
		let len = self.len();
		&mut self.buf[..len]
	}

	/// Returns the content followed by the terminator.
	#[inline]
	pub fn as_bytes_with_nul(&self) -> &[u8] {
		&self.buf
	}

	/// Views the content as a string slice, if it is valid UTF-8.
	#[inline]
	pub fn to_str(&self) -> Result<&str, str::Utf8Error> {
		str::from_utf8(self.as_bytes())
	}

	/// Views the string as a C string.
	///
	/// Fails if the content holds an interior zero byte.
	#[inline]
	pub fn to_c_str(&self) -> Result<&CStr, FromBytesWithNulError> {
		CStr::from_bytes_with_nul(self.as_bytes_with_nul())
	}

	/// Reserves room for at least `additional` more content bytes, following the growth policy.
	#[inline]
	pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
		self.buf.try_reserve(additional)
	}

	/// Panicking version of [`try_reserve`](DString::try_reserve).
	#[inline]
	pub fn reserve(&mut self, additional: usize) {
		handle_reserve(self.try_reserve(additional))
	}

	/// Truncates this string, removing all contents.
	///
	/// The capacity is untouched, and this never allocates.
	#[inline]
	pub fn clear(&mut self) {
		self.buf.truncate(1);
		self.buf[0] = 0
	}

	/// Replaces the content of this string with `bytes`, reusing its capacity when it suffices.
	///
	/// On failure the string is left empty.
	#[inline]
	pub fn try_assign_bytes(&mut self, bytes: &[u8]) -> Result<(), TryReserveError> {
		self.clear();
		self.try_push_bytes(bytes)
	}

	/// Panicking version of [`try_assign_bytes`](DString::try_assign_bytes).
	#[inline]
	pub fn assign_bytes(&mut self, bytes: &[u8]) {
		handle_reserve(self.try_assign_bytes(bytes))
	}

	/// Replaces the content of this string with a copy of `other`.
	///
	/// On failure the string is left empty.
	#[inline]
	pub fn try_assign_dstring<B: Allocator>(&mut self, other: &DString<B>) -> Result<(), TryReserveError> {
		self.try_assign_bytes(other.as_bytes())
	}

	/// Panicking version of [`try_assign_dstring`](DString::try_assign_dstring).
	#[inline]
	pub fn assign_dstring<B: Allocator>(&mut self, other: &DString<B>) {
		handle_reserve(self.try_assign_dstring(other))
	}

	/// Replaces the content of this string with the formatted `args`.
	///
	/// On failure the string is left empty.
	#[inline]
	pub fn try_assign_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), TryReserveError> {
		self.clear();
		self.try_push_fmt(args)
	}

	/// Panicking version of [`try_assign_fmt`](DString::try_assign_fmt).
	#[inline]
	pub fn assign_fmt(&mut self, args: fmt::Arguments<'_>) {
		handle_reserve(self.try_assign_fmt(args))
	}

	/// Appends a single byte.
	#[inline]
	pub fn try_push(&mut self, byte: u8) -> Result<(), TryReserveError> {
		self.try_push_bytes(slice::from_ref(&byte))
	}

	/// Panicking version of [`try_push`](DString::try_push).
	#[inline]
	pub fn push(&mut self, byte: u8) {
		handle_reserve(self.try_push(byte))
	}

	/// Appends `bytes` at the end of the string.
	///
	/// On failure the string is left untouched.
	pub fn try_push_bytes(&mut self, bytes: &[u8]) -> Result<(), TryReserveError> {
		self.buf.try_reserve(bytes.len())?;

		// The capacity is now sufficient: nothing below relocates.
		let len = self.len();
		self.buf.truncate(len);
		self.buf.concat(bytes);
		self.buf.push(0);
		Ok(())
	}

	/// Panicking version of [`try_push_bytes`](DString::try_push_bytes).
	#[inline]
	pub fn push_bytes(&mut self, bytes: &[u8]) {
		handle_reserve(self.try_push_bytes(bytes))
	}

	/// Appends the content of `other`.
	#[inline]
	pub fn try_push_dstring<B: Allocator>(&mut self, other: &DString<B>) -> Result<(), TryReserveError> {
		self.try_push_bytes(other.as_bytes())
	}

	/// Panicking version of [`try_push_dstring`](DString::try_push_dstring).
	#[inline]
	pub fn push_dstring<B: Allocator>(&mut self, other: &DString<B>) {
		handle_reserve(self.try_push_dstring(other))
	}

	/// Appends the formatted `args`, growing the string at most once.
	pub fn try_push_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), TryReserveError> {
		self.buf.try_reserve(measure(args))?;
		self.write_args(args)
	}

	/// Panicking version of [`try_push_fmt`](DString::try_push_fmt).
	#[inline]
	pub fn push_fmt(&mut self, args: fmt::Arguments<'_>) {
		handle_reserve(self.try_push_fmt(args))
	}

	fn write_args(&mut self, args: fmt::Arguments<'_>) -> Result<(), TryReserveError> {
		let mut output = Adapter {
			string: self,
			error: None
		};

		match fmt::write(&mut output, args) {
			Ok(()) => Ok(()),
			Err(_) => match output.error {
				Some(e) => Err(e),
				None => panic!("a formatting trait implementation returned an error when the underlying stream did not")
			}
		}
	}

	/// Compares the bytes of two strings, the shorter prefix first.
	///
	/// ```
	/// # use std::cmp::Ordering;
	/// # use darray::DString;
	/// let a = DString::from("ABCD A");
	/// assert_eq!(a.compare("ABCD B"), Ordering::Less);
	/// assert_eq!(a.compare("ABCD"), Ordering::Greater);
	/// ```
	#[inline]
	pub fn compare<S: AsRef<[u8]> + ?Sized>(&self, other: &S) -> Ordering {
		self.as_bytes().cmp(other.as_ref())
	}

	/// Like [`compare`](DString::compare), ignoring ASCII case.
	#[inline]
	pub fn compare_ignore_case<S: AsRef<[u8]> + ?Sized>(&self, other: &S) -> Ordering {
		let lhs = self.as_bytes().iter().map(u8::to_ascii_lowercase);
		let rhs = other.as_ref().iter().map(u8::to_ascii_lowercase);
		lhs.cmp(rhs)
	}

	/// Returns the index of the first occurrence of `pattern`.
	///
	/// An empty pattern is found at index 0.
	#[inline]
	pub fn find<S: AsRef<[u8]> + ?Sized>(&self, pattern: &S) -> Option<usize> {
		find_bytes(self.as_bytes(), pattern.as_ref())
	}

	/// Like [`find`](DString::find), ignoring ASCII case.
	#[inline]
	pub fn find_ignore_case<S: AsRef<[u8]> + ?Sized>(&self, pattern: &S) -> Option<usize> {
		find_bytes_ignore_case(self.as_bytes(), pattern.as_ref())
	}

	/// Replaces every occurrence of `pattern` with `replacement`.
	///
	/// The string is scanned again from the start after each replacement, so
	/// `replacement` must not contain `pattern`.
	/// An empty pattern replaces nothing.
	///
	/// If an insertion fails the string holds the replacements made so far,
	/// minus the occurrence being replaced.
	///
	/// ```
	/// # use darray::DString;
	/// let mut s = DString::from("Hello, World! Hello again.");
	/// s.try_replace_all("Hello", "foo").unwrap();
	/// assert_eq!(s, "foo, World! foo again.");
	/// ```
	#[inline]
	pub fn try_replace_all<P, R>(&mut self, pattern: &P, replacement: &R) -> Result<(), TryReserveError> where P: AsRef<[u8]> + ?Sized, R: AsRef<[u8]> + ?Sized {
		self.replace_all_with(pattern.as_ref(), replacement.as_ref(), find_bytes)
	}

	/// Panicking version of [`try_replace_all`](DString::try_replace_all).
	#[inline]
	pub fn replace_all<P, R>(&mut self, pattern: &P, replacement: &R) where P: AsRef<[u8]> + ?Sized, R: AsRef<[u8]> + ?Sized {
		handle_reserve(self.try_replace_all(pattern, replacement))
	}

	/// Like [`try_replace_all`](DString::try_replace_all), matching `pattern` regardless of ASCII case.
	#[inline]
	pub fn try_replace_all_ignore_case<P, R>(&mut self, pattern: &P, replacement: &R) -> Result<(), TryReserveError> where P: AsRef<[u8]> + ?Sized, R: AsRef<[u8]> + ?Sized {
		self.replace_all_with(pattern.as_ref(), replacement.as_ref(), find_bytes_ignore_case)
	}

	/// Panicking version of [`try_replace_all_ignore_case`](DString::try_replace_all_ignore_case).
	#[inline]
	pub fn replace_all_ignore_case<P, R>(&mut self, pattern: &P, replacement: &R) where P: AsRef<[u8]> + ?Sized, R: AsRef<[u8]> + ?Sized {
		handle_reserve(self.try_replace_all_ignore_case(pattern, replacement))
	}

	fn replace_all_with(&mut self, pattern: &[u8], replacement: &[u8], find: fn(&[u8], &[u8]) -> Option<usize>) -> Result<(), TryReserveError> {
		if pattern.is_empty() {
			return Ok(())
		}

		debug_assert!(find(replacement, pattern).is_none(), "replacement contains the pattern it replaces");

		while let Some(i) = find(self.as_bytes(), pattern) {
			self.buf.remove_range(i, pattern.len());
			self.buf.try_insert_slice(i, replacement)?;
		}

		Ok(())
	}

	/// Converts the content to ASCII lower case, in place.
	#[inline]
	pub fn make_ascii_lowercase(&mut self) {
		self.as_bytes_mut().make_ascii_lowercase()
	}

	/// Converts the content to ASCII upper case, in place.
	#[inline]
	pub fn make_ascii_uppercase(&mut self) {
		self.as_bytes_mut().make_ascii_uppercase()
	}

	/// Replaces the content of this string with bytes read from `reader`, up to `delimiter`.
	///
	/// Bytes are read one at a time, so nothing past the delimiter is consumed.
	/// With [`Delimiter::Byte`] the delimiter is consumed but not stored, and
	/// reaching the end of the stream first is an [`UnexpectedEof`](ReadError::UnexpectedEof)
	/// error. With [`Delimiter::Eof`] the whole remaining stream is read.
	///
	/// On error the content of the string is unspecified.
	pub fn try_read_delimited<R: io::Read + ?Sized>(&mut self, delimiter: Delimiter, reader: &mut R) -> Result<(), ReadError> {
		self.clear();

		let mut byte = [0u8];
		loop {
			match reader.read(&mut byte) {
				Ok(0) => {
					return match delimiter {
						Delimiter::Eof => Ok(()),
						Delimiter::Byte(b) => {
							tracing::trace!(delimiter = b, len = self.len(), "stream ended before the delimiter");
							Err(ReadError::UnexpectedEof(b))
						}
					}
				},
				Ok(_) => match delimiter {
					Delimiter::Byte(b) if byte[0] == b => return Ok(()),
					_ => self.try_push(byte[0])?
				},
				Err(e) if e.kind() == io::ErrorKind::Interrupted => (),
				Err(e) => return Err(e.into())
			}
		}
	}

	/// Reads the next line of `reader`, without its `\n`.
	#[inline]
	pub fn try_read_line<R: io::Read + ?Sized>(&mut self, reader: &mut R) -> Result<(), ReadError> {
		self.try_read_delimited(Delimiter::Byte(b'\n'), reader)
	}

	/// Removes leading and trailing whitespace in place.
	///
	/// Whitespace is a space, `\t`, `\n`, `\v`, `\f` or `\r`.
	pub fn trim(&mut self) {
		let bytes = self.as_bytes();
		let len = bytes.len();
		let end = match bytes.iter().rposition(|&b| !is_space(b)) {
			Some(i) => i + 1,
			None => 0
		};
		let start = bytes[..end].iter().position(|&b| !is_space(b)).unwrap_or(end);

		self.buf.remove_range(end, len - end);
		self.buf.remove_range(0, start);
	}
}

struct Adapter<'s, A: Allocator> {
	string: &'s mut DString<A>,
	error: Option<TryReserveError>
}

impl<'s, A: Allocator> fmt::Write for Adapter<'s, A> {
	#[inline]
	fn write_str(&mut self, s: &str) -> fmt::Result {
		match self.string.try_push_bytes(s.as_bytes()) {
			Ok(()) => Ok(()),
			Err(e) => {
				self.error = Some(e);
				Err(fmt::Error)
			}
		}
	}
}

/// Counts the bytes written into it.
struct Measure(usize);

impl fmt::Write for Measure {
	#[inline]
	fn write_str(&mut self, s: &str) -> fmt::Result {
		self.0 = self.0.saturating_add(s.len());
		Ok(())
	}
}

fn measure(args: fmt::Arguments<'_>) -> usize {
	let mut counter = Measure(0);
	// Errors resurface when the arguments are written for real.
	let _ = fmt::write(&mut counter, args);
	counter.0
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
	if needle.is_empty() {
		return Some(0)
	}

	haystack.windows(needle.len()).position(|window| window == needle)
}

fn find_bytes_ignore_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
	if needle.is_empty() {
		return Some(0)
	}

	haystack.windows(needle.len()).position(|window| window.eq_ignore_ascii_case(needle))
}

#[inline]
fn is_space(b: u8) -> bool {
	matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

impl<A: Allocator> Deref for DString<A> {
	type Target = [u8];

	#[inline]
	fn deref(&self) -> &[u8] {
		self.as_bytes()
	}
}

impl<A: Allocator> DerefMut for DString<A> {
	#[inline]
	fn deref_mut(&mut self) -> &mut [u8] {
		self.as_bytes_mut()
	}
}

impl<A: Allocator> AsRef<[u8]> for DString<A> {
	#[inline]
	fn as_ref(&self) -> &[u8] {
		self.as_bytes()
	}
}

impl<A: Allocator + Clone> Clone for DString<A> {
	#[inline]
	fn clone(&self) -> Self {
		handle_reserve(self.try_clone_in(self.allocator().clone()))
	}
}

impl Default for DString<Global> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl<'a> From<&'a str> for DString<Global> {
	#[inline]
	fn from(s: &'a str) -> DString<Global> {
		DString::from_bytes(s.as_bytes())
	}
}

impl<'a> From<&'a [u8]> for DString<Global> {
	#[inline]
	fn from(s: &'a [u8]) -> DString<Global> {
		DString::from_bytes(s)
	}
}

impl<A: Allocator> fmt::Write for DString<A> {
	#[inline]
	fn write_str(&mut self, s: &str) -> fmt::Result {
		self.try_push_bytes(s.as_bytes()).map_err(|_| fmt::Error)
	}
}

impl<A: Allocator, B: Allocator> PartialEq<DString<B>> for DString<A> {
	#[inline]
	fn eq(&self, other: &DString<B>) -> bool {
		self.as_bytes() == other.as_bytes()
	}
}

impl<A: Allocator> Eq for DString<A> {}

impl<A: Allocator> PartialEq<str> for DString<A> {
	#[inline]
	fn eq(&self, other: &str) -> bool {
		self.as_bytes() == other.as_bytes()
	}
}

impl<'b, A: Allocator> PartialEq<&'b str> for DString<A> {
	#[inline]
	fn eq(&self, other: &&'b str) -> bool {
		self.as_bytes() == other.as_bytes()
	}
}

impl<A: Allocator> PartialEq<[u8]> for DString<A> {
	#[inline]
	fn eq(&self, other: &[u8]) -> bool {
		self.as_bytes() == other
	}
}

impl<'b, A: Allocator> PartialEq<&'b [u8]> for DString<A> {
	#[inline]
	fn eq(&self, other: &&'b [u8]) -> bool {
		self.as_bytes() == *other
	}
}

impl<A: Allocator> PartialEq<DString<A>> for str {
	#[inline]
	fn eq(&self, other: &DString<A>) -> bool {
		self.as_bytes() == other.as_bytes()
	}
}

impl<'a, A: Allocator> PartialEq<DString<A>> for &'a str {
	#[inline]
	fn eq(&self, other: &DString<A>) -> bool {
		self.as_bytes() == other.as_bytes()
	}
}

impl<A: Allocator> PartialOrd for DString<A> {
	#[inline]
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl<A: Allocator> Ord for DString<A> {
	#[inline]
	fn cmp(&self, other: &Self) -> Ordering {
		self.compare(other)
	}
}

impl<A: Allocator> Hash for DString<A> {
	#[inline]
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.as_bytes().hash(state)
	}
}

impl<A: Allocator> fmt::Display for DString<A> {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&String::from_utf8_lossy(self.as_bytes()), f)
	}
}

impl<A: Allocator> fmt::Debug for DString<A> {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "\"{}\"", self.as_bytes().escape_ascii())
	}
}
