use core::{
    borrow::{Borrow, BorrowMut},
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    iter::{self, FusedIterator},
    mem,
    ops::{Add, AddAssign, Deref, DerefMut, Index, IndexMut, Sub, SubAssign},
    slice,
};

use log::trace;

use crate::{
    config::GrowthPolicy,
    error::{AccessError, AllocError},
    raw::RawBuf,
};

/// A contiguous growable array type, short for 'vector'.
///
/// Slots `[0, len)` hold live values and slots `[len, capacity)` are raw memory. An empty
/// `Vector` that has never grown holds no allocation.
///
/// Capacity never shrinks on its own. Only [`reallocate`](Vector::reallocate) and
/// [`shrink_to_fit`](Vector::shrink_to_fit) release slots.
///
/// Element access is bounds-checked everywhere, including `v[i]`, which panics with the same
/// message [`at`](Vector::at) returns as an error.
pub struct Vector<T> {
    buf: RawBuf<T>,
    len: usize,
    policy: GrowthPolicy,
}

impl<T> Vector<T> {
    /// Constructs a new, empty `Vector` without allocating.
    pub const fn new() -> Self {
        Self::with_policy(GrowthPolicy::DEFAULT)
    }

    /// Constructs a new, empty `Vector` that grows according to `policy`.
    pub const fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            buf: RawBuf::new(),
            len: 0,
            policy,
        }
    }

    /// Constructs a new, empty `Vector` with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        let buf = RawBuf::allocate(capacity).unwrap_or_else(|err| err.fail());
        Self {
            buf,
            len: 0,
            policy: GrowthPolicy::DEFAULT,
        }
    }

    /// Constructs a `Vector` of `count` values produced by `f`, with capacity `count`.
    pub fn from_fn<F>(count: usize, f: F) -> Self
    where
        F: FnMut() -> T,
    {
        let mut vec = Self::with_capacity(count);
        vec.extend(iter::repeat_with(f).take(count));
        vec
    }

    /// Constructs a `Vector` of `count` clones of `value`, with capacity `count`.
    pub fn from_elem(count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(count, || value.clone())
    }

    /// Constructs a `Vector` of `count` default values, with capacity `count`.
    pub fn from_default(count: usize) -> Self
    where
        T: Default,
    {
        Self::from_fn(count, T::default)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    #[inline]
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are live
        unsafe { self.buf.as_slice(self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: slots [0, len) are live
        unsafe { self.buf.as_mut_slice(self.len) }
    }

    /// Detaches the contents, leaving `self` empty and unallocated.
    pub fn take(&mut self) -> Self {
        let policy = self.policy;
        mem::replace(self, Self::with_policy(policy))
    }

    /// Exchanges contents with `other` without touching any element.
    pub fn swap_with(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

// access
impl<T> Vector<T> {
    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `index >= len`.
    pub fn at(&self, index: usize) -> Result<&T, AccessError> {
        self.as_slice().get(index).ok_or(AccessError::OutOfRange {
            index,
            len: self.len,
        })
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, AccessError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(AccessError::OutOfRange { index, len })
    }

    pub fn front(&self) -> Result<&T, AccessError> {
        self.at(0)
    }

    pub fn front_mut(&mut self) -> Result<&mut T, AccessError> {
        self.at_mut(0)
    }

    pub fn back(&self) -> Result<&T, AccessError> {
        match self.len.checked_sub(1) {
            Some(last) => self.at(last),
            None => Err(AccessError::OutOfRange { index: 0, len: 0 }),
        }
    }

    pub fn back_mut(&mut self) -> Result<&mut T, AccessError> {
        match self.len.checked_sub(1) {
            Some(last) => self.at_mut(last),
            None => Err(AccessError::OutOfRange { index: 0, len: 0 }),
        }
    }
}

// mutation
impl<T> Vector<T> {
    /// Appends an element to the back.
    ///
    /// Grows first when full, so the element always lands in allocated storage.
    pub fn push_back(&mut self, value: T) {
        self.emplace_back(|| value);
    }

    /// Constructs an element in place at the back from `f` and returns it.
    ///
    /// Storage grows before `f` runs.
    pub fn emplace_back<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        if self.len == self.capacity() {
            self.grow_one();
        }
        let index = self.len;
        // SAFETY: len < capacity, and the slot at len is raw
        let slot = unsafe { self.buf.write(index, f()) };
        self.len += 1;
        slot
    }

    /// Removes the last element and returns it.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the vector is empty. Capacity never changes.
    pub fn pop_back(&mut self) -> Result<T, AccessError> {
        if self.len == 0 {
            return Err(AccessError::Empty);
        }
        self.len -= 1;
        // SAFETY: the slot at the old last index was live and is now outside [0, len)
        Ok(unsafe { self.buf.read(self.len) })
    }

    /// Inserts an element at `index`, shifting later elements towards the back.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `index > len`. The value is dropped in that case.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), AccessError> {
        if index > self.len {
            return Err(AccessError::OutOfRange {
                index,
                len: self.len,
            });
        }
        if self.len == self.capacity() {
            self.grow_one();
        }
        // SAFETY: len < capacity, slot `index` is overwritten right after the shift
        unsafe {
            self.buf.shift_back(index..self.len);
            self.buf.write(index, value);
        }
        self.len += 1;
        Ok(())
    }

    /// Removes the element at `index`, shifting later elements towards the front.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<T, AccessError> {
        if index >= self.len {
            return Err(AccessError::OutOfRange {
                index,
                len: self.len,
            });
        }
        // SAFETY: slot `index` is live, and its stale copy at the end falls outside [0, len)
        unsafe {
            let value = self.buf.read(index);
            self.buf.shift_front(index + 1..self.len);
            self.len -= 1;
            Ok(value)
        }
    }

    /// Drops every element in index order. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Drops the elements in `[new_len, len)`. Does nothing if `new_len >= len`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let old_len = mem::replace(&mut self.len, new_len);
        // SAFETY: the slots were live, and len already excludes them
        unsafe { self.buf.drop_range(new_len..old_len) };
    }

    /// Resizes to `new_len`, filling new slots with values from `f`.
    ///
    /// Shrinking drops the tail. Growing follows the growth policy until the capacity holds
    /// `new_len`, relocating at most once.
    pub fn resize_with<F>(&mut self, new_len: usize, f: F)
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        self.grow_to_fit(new_len);
        let additional = new_len - self.len;
        self.extend(iter::repeat_with(f).take(additional));
    }

    /// Resizes to `new_len`, filling new slots with clones of `value`.
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        self.resize_with(new_len, || value.clone());
    }

    /// Resizes to `new_len`, filling new slots with `T::default()`.
    pub fn resize_default(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Appends clones of every element in `other`.
    pub fn extend_from_slice(&mut self, other: &[T])
    where
        T: Clone,
    {
        self.extend(other.iter().cloned());
    }

    /// Replaces the contents with clones of `values`, in a block of exactly `values.len()` slots.
    pub fn assign_from_slice(&mut self, values: &[T])
    where
        T: Clone,
    {
        self.release();
        self.buf = RawBuf::allocate(values.len()).unwrap_or_else(|err| err.fail());
        self.extend(values.iter().cloned());
    }

    /// Drops every element and returns the block to the allocator.
    fn release(&mut self) {
        self.clear();
        self.buf = RawBuf::new();
    }
}

// capacity
impl<T> Vector<T> {
    /// Grows the capacity to exactly `new_capacity`. Never shrinks.
    ///
    /// Elements keep their order and values. All references into the old block are invalidated,
    /// which the borrow checker enforces.
    pub fn reserve(&mut self, new_capacity: usize) {
        self.try_reserve(new_capacity).unwrap_or_else(|err| err.fail());
    }

    /// Like [`reserve`](Vector::reserve), but reports allocation failure instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the block cannot be allocated. The vector is unchanged.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), AllocError> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        self.relocate(new_capacity)
    }

    /// Moves the elements into a block of exactly `new_capacity` slots, growing or shrinking.
    ///
    /// Elements at or beyond `new_capacity` are dropped first, so `len <= capacity` always holds.
    pub fn reallocate(&mut self, new_capacity: usize) {
        if new_capacity == self.capacity() {
            return;
        }
        self.truncate(new_capacity);
        self.relocate(new_capacity).unwrap_or_else(|err| err.fail());
    }

    /// Shrinks the capacity to `len`. An empty vector gives its block back entirely.
    pub fn shrink_to_fit(&mut self) {
        self.reallocate(self.len);
    }

    /// Follows the growth policy until `required` slots fit, relocating at most once.
    fn grow_to_fit(&mut self, required: usize) {
        if required <= self.capacity() {
            return;
        }
        let target = self
            .policy
            .capacity_for(self.capacity(), required)
            .unwrap_or_else(|err| err.fail());
        self.relocate(target).unwrap_or_else(|err| err.fail());
    }

    fn grow_one(&mut self) {
        let target = self
            .policy
            .next_capacity(self.capacity())
            .unwrap_or_else(|err| err.fail());
        self.relocate(target).unwrap_or_else(|err| err.fail());
    }

    /// Moves every live element into a new block of `new_capacity` slots and frees the old one.
    ///
    /// The new block is allocated before any element moves, so failure leaves `self` untouched.
    fn relocate(&mut self, new_capacity: usize) -> Result<(), AllocError> {
        debug_assert!(new_capacity >= self.len);
        let mut new_buf = RawBuf::allocate(new_capacity)?;
        trace!(
            "relocating {} elements: capacity {} -> {}",
            self.len,
            self.capacity(),
            new_capacity
        );
        // SAFETY: slots [0, len) are live in the old block and raw in the new one
        unsafe { new_buf.relocate_from(&self.buf, self.len) };
        // the old block now holds only raw slots, so dropping it just frees memory
        self.buf = new_buf;
        Ok(())
    }
}

// cursors
impl<T> Vector<T> {
    /// Returns a cursor at the first element.
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), 0)
    }

    /// Returns a cursor one past the last element.
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), self.len as isize)
    }

    /// Returns a mutable cursor at the first element.
    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self.as_mut_slice(), 0)
    }

    /// Returns a mutable cursor one past the last element.
    pub fn end_mut(&mut self) -> CursorMut<'_, T> {
        let len = self.len as isize;
        CursorMut::new(self.as_mut_slice(), len)
    }
}

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        // SAFETY: slots [0, len) are live; `buf` frees the block afterwards
        unsafe { self.buf.drop_range(0..len) };
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Vector<T> {
    /// Copies the source's capacity and clones each live element into independent storage.
    fn clone(&self) -> Self {
        let mut vec = Self::with_policy(self.policy);
        vec.buf = RawBuf::allocate(self.capacity()).unwrap_or_else(|err| err.fail());
        vec.extend(self.iter().cloned());
        vec
    }

    /// Releases the current contents, then copies `source` as [`clone`](Clone::clone) does.
    fn clone_from(&mut self, source: &Self) {
        self.release();
        self.policy = source.policy;
        self.buf = RawBuf::allocate(source.capacity()).unwrap_or_else(|err| err.fail());
        self.extend(source.iter().cloned());
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for Vector<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.at(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.at_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> AsRef<[T]> for Vector<T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T> AsMut<[T]> for Vector<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T> Borrow<[T]> for Vector<T> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T> BorrowMut<[T]> for Vector<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Hash> Hash for Vector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, U> PartialEq<Vector<U>> for Vector<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vector<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U> PartialEq<[U]> for Vector<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U> PartialEq<&[U]> for Vector<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for Vector<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T: PartialOrd> PartialOrd for Vector<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for Vector<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T> FromIterator<T> for Vector<T> {
    /// Collects into a block sized by the iterator's lower size hint, so exact-size sources
    /// produce `len == capacity`.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut vec = Self::with_capacity(iter.size_hint().0);
        vec.extend(iter);
        vec
    }
}

impl<T> Extend<T> for Vector<T> {
    /// Appends every value, growing along the policy for the iterator's lower size hint first.
    ///
    /// Each value is counted as live as soon as it is written, so a panicking iterator leaves
    /// a valid vector.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let required = self.len.saturating_add(iter.size_hint().0);
        self.grow_to_fit(required);
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for Vector<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(values: &[T]) -> Self {
        values.iter().cloned().collect()
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> IntoIter<T> {
        let end = mem::replace(&mut self.len, 0);
        let buf = mem::replace(&mut self.buf, RawBuf::new());
        IntoIter { buf, start: 0, end }
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}

/// Creates a [`Vector`] from a list of elements, or from `value; count`.
#[macro_export]
macro_rules! vector {
    () => {
        $crate::Vector::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::Vector::from_elem($n, $elem)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::Vector::from([$($x),+])
    };
}

/// An iterator that moves elements out of a [`Vector`].
///
/// Elements that are never yielded are dropped with the iterator.
pub struct IntoIter<T> {
    buf: RawBuf<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// Returns the elements that have not been yielded yet.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [start, end) are live
        unsafe { slice::from_raw_parts(self.buf.slot(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let index = self.start;
        self.start += 1;
        // SAFETY: slot `index` was live and is now outside [start, end)
        Some(unsafe { self.buf.read(index) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: slot `end` was live and is now outside [start, end)
        Some(unsafe { self.buf.read(self.end) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let (start, end) = (self.start, self.end);
        self.start = end;
        // SAFETY: slots [start, end) are still live
        unsafe { self.buf.drop_range(start..end) };
    }
}

/// A read-only random-access position in a [`Vector`].
///
/// Positions may move anywhere, including before the first element or past the end, but only
/// positions in `[begin, end)` dereference to an element.
///
/// Two cursors belong to the same range when they view the same address and length. Cursors
/// into different non-empty vectors of sized elements are therefore unordered, while empty
/// vectors and vectors of zero-sized elements cannot be told apart.
pub struct Cursor<'a, T> {
    slice: &'a [T],
    pos: isize,
}

impl<'a, T> Cursor<'a, T> {
    fn new(slice: &'a [T], pos: isize) -> Self {
        Self { slice, pos }
    }

    /// Returns the offset from the first element.
    #[inline]
    pub fn position(&self) -> isize {
        self.pos
    }

    /// Returns the element under the cursor, or `None` outside `[begin, end)`.
    pub fn get(&self) -> Option<&'a T> {
        usize::try_from(self.pos).ok().and_then(|index| self.slice.get(index))
    }

    /// Advances by one, returning the cursor before the move.
    pub fn move_next(&mut self) -> Self {
        let prev = *self;
        self.pos += 1;
        prev
    }

    /// Retreats by one, returning the cursor before the move.
    pub fn move_prev(&mut self) -> Self {
        let prev = *self;
        self.pos -= 1;
        prev
    }

    fn same_range(&self, other: &Self) -> bool {
        core::ptr::eq(self.slice, other.slice)
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("pos", &self.pos)
            .field("len", &self.slice.len())
            .finish()
    }
}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_range(other) && self.pos == other.pos
    }
}

impl<T> PartialOrd for Cursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.same_range(other) {
            Some(self.pos.cmp(&other.pos))
        } else {
            None
        }
    }
}

impl<T> AddAssign<isize> for Cursor<'_, T> {
    fn add_assign(&mut self, n: isize) {
        self.pos += n;
    }
}

impl<T> SubAssign<isize> for Cursor<'_, T> {
    fn sub_assign(&mut self, n: isize) {
        self.pos -= n;
    }
}

impl<T> Add<isize> for Cursor<'_, T> {
    type Output = Self;

    fn add(mut self, n: isize) -> Self {
        self += n;
        self
    }
}

impl<T> Sub<isize> for Cursor<'_, T> {
    type Output = Self;

    fn sub(mut self, n: isize) -> Self {
        self -= n;
        self
    }
}

impl<'a, T> Sub for Cursor<'a, T> {
    type Output = isize;

    /// Returns the number of elements between two cursors into the same vector.
    fn sub(self, other: Self) -> isize {
        debug_assert!(self.same_range(&other), "cursors belong to different vectors");
        self.pos - other.pos
    }
}

/// A mutable random-access position in a [`Vector`].
///
/// Holds the vector's unique borrow, so no other cursor or reference can observe it while
/// this one is alive. Use [`as_cursor`](CursorMut::as_cursor) to compare positions.
pub struct CursorMut<'a, T> {
    slice: &'a mut [T],
    pos: isize,
}

impl<'a, T> CursorMut<'a, T> {
    fn new(slice: &'a mut [T], pos: isize) -> Self {
        Self { slice, pos }
    }

    #[inline]
    pub fn position(&self) -> isize {
        self.pos
    }

    fn index(&self) -> Option<usize> {
        usize::try_from(self.pos).ok().filter(|&index| index < self.slice.len())
    }

    pub fn get(&self) -> Option<&T> {
        self.index().map(|index| &self.slice[index])
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.index().map(|index| &mut self.slice[index])
    }

    /// Consumes the cursor, returning the element under it for the rest of the borrow.
    pub fn into_mut(self) -> Option<&'a mut T> {
        let index = self.index()?;
        let slice = self.slice;
        slice.get_mut(index)
    }

    pub fn move_next(&mut self) {
        self.pos += 1;
    }

    pub fn move_prev(&mut self) {
        self.pos -= 1;
    }

    /// Returns a read-only cursor at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(&*self.slice, self.pos)
    }
}

impl<T> fmt::Debug for CursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("pos", &self.pos)
            .field("len", &self.slice.len())
            .finish()
    }
}

impl<T> AddAssign<isize> for CursorMut<'_, T> {
    fn add_assign(&mut self, n: isize) {
        self.pos += n;
    }
}

impl<T> SubAssign<isize> for CursorMut<'_, T> {
    fn sub_assign(&mut self, n: isize) {
        self.pos -= n;
    }
}

impl<T> Add<isize> for CursorMut<'_, T> {
    type Output = Self;

    fn add(mut self, n: isize) -> Self {
        self += n;
        self
    }
}

impl<T> Sub<isize> for CursorMut<'_, T> {
    type Output = Self;

    fn sub(mut self, n: isize) -> Self {
        self -= n;
        self
    }
}
