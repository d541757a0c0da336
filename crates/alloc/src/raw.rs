use core::{alloc::Layout, marker::PhantomData, mem, ops::Range, ptr, ptr::NonNull, slice};
use std::alloc;

use bytesize::ByteSize;
use log::error;

use super::error::AllocError;

/// An owned block of memory with room for `capacity` values of `T`.
///
/// `RawBuf` tracks slots, not values. It releases its block when dropped but never drops
/// the values inside, so its owner decides which slots are live.
///
/// A `RawBuf` with capacity 0 holds no allocation. Zero-sized types never allocate either.
pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

// SAFETY: `RawBuf` uniquely owns its block, like `Box<[MaybeUninit<T>]>`.
unsafe impl<T: Send> Send for RawBuf<T> {}
unsafe impl<T: Sync> Sync for RawBuf<T> {}

impl<T> RawBuf<T> {
    /// Returns an empty buffer without allocating.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates a block of exactly `capacity` uninitialized slots.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the block would exceed `isize::MAX` bytes or the global allocator fails.
    pub fn allocate(capacity: usize) -> Result<Self, AllocError> {
        if capacity == 0 {
            return Ok(Self::new());
        }

        let layout = Layout::array::<T>(capacity).map_err(|_| AllocError::CapacityOverflow)?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                cap: capacity,
                _marker: PhantomData,
            });
        }

        // SAFETY: layout has non-zero size
        let ptr = unsafe { alloc::alloc(layout) };
        match NonNull::new(ptr.cast::<T>()) {
            Some(ptr) => Ok(Self {
                ptr,
                cap: capacity,
                _marker: PhantomData,
            }),
            None => {
                error!(
                    "global allocator refused a block of {} ({} slots)",
                    ByteSize::b(layout.size() as u64).to_string_as(true),
                    capacity
                );
                Err(AllocError::OutOfMemory { layout })
            }
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns `true` if the buffer owns an allocation from the global allocator.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.cap != 0 && mem::size_of::<T>() != 0
    }

    /// Returns a pointer to the slot at `index`.
    ///
    /// ## Safety
    /// - `index` must be at most `capacity`.
    #[inline]
    pub unsafe fn slot(&self, index: usize) -> *mut T {
        debug_assert!(index <= self.cap);
        self.ptr.as_ptr().add(index)
    }
}

// read
impl<T> RawBuf<T> {
    /// Moves the value out of a slot, leaving the slot logically uninitialized.
    ///
    /// ## Safety
    /// - The slot at `index` must be live. The caller must treat it as raw afterwards.
    #[inline]
    pub unsafe fn read(&self, index: usize) -> T {
        ptr::read(self.slot(index))
    }

    /// Returns the first `len` slots as a slice.
    ///
    /// ## Safety
    /// - Slots `[0, len)` must be live.
    #[inline]
    pub unsafe fn as_slice(&self, len: usize) -> &[T] {
        slice::from_raw_parts(self.ptr.as_ptr(), len)
    }

    /// Returns the first `len` slots as a mutable slice.
    ///
    /// ## Safety
    /// - Slots `[0, len)` must be live.
    #[inline]
    pub unsafe fn as_mut_slice(&mut self, len: usize) -> &mut [T] {
        slice::from_raw_parts_mut(self.ptr.as_ptr(), len)
    }
}

// write
impl<T> RawBuf<T> {
    /// Constructs a value in a raw slot.
    ///
    /// ## Safety
    /// - `index` must be less than `capacity`.
    /// - The slot must be raw, or its previous value is leaked.
    #[inline]
    pub unsafe fn write(&mut self, index: usize, value: T) -> &mut T {
        debug_assert!(index < self.cap);
        let slot = self.slot(index);
        slot.write(value);
        &mut *slot
    }

    /// Moves `count` live values from the front of `src` into the front of `self`.
    ///
    /// Afterwards the source slots are raw: their values now live in `self`.
    ///
    /// ## Safety
    /// - `count` must not exceed either capacity, and slots `[0, count)` of `src` must be live.
    /// - Slots `[0, count)` of `self` must be raw.
    #[inline]
    pub unsafe fn relocate_from(&mut self, src: &RawBuf<T>, count: usize) {
        debug_assert!(count <= self.cap && count <= src.cap);
        ptr::copy_nonoverlapping(src.as_ptr(), self.as_ptr(), count);
    }

    /// Shifts the live values in `range` by one slot towards the back.
    ///
    /// ## Safety
    /// - `range.end` must be less than `capacity`. Slot `range.start` is left holding a stale copy.
    #[inline]
    pub unsafe fn shift_back(&mut self, range: Range<usize>) {
        debug_assert!(range.end < self.cap);
        let src = self.slot(range.start);
        ptr::copy(src, src.add(1), range.end - range.start);
    }

    /// Shifts the live values in `range` by one slot towards the front.
    ///
    /// ## Safety
    /// - `range.start` must be at least 1. Slot `range.end - 1` is left holding a stale copy.
    #[inline]
    pub unsafe fn shift_front(&mut self, range: Range<usize>) {
        debug_assert!(range.start >= 1);
        let src = self.slot(range.start);
        ptr::copy(src, src.sub(1), range.end - range.start);
    }
}

// drop
impl<T> RawBuf<T> {
    /// Drops the values in `range` in index order. Their slots become raw.
    ///
    /// ## Safety
    /// - Every slot in `range` must be live.
    #[inline]
    pub unsafe fn drop_range(&mut self, range: Range<usize>) {
        let len = range.end - range.start;
        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.slot(range.start), len));
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        if self.is_allocated() {
            // SAFETY: the same layout succeeded in `allocate`
            unsafe {
                let size = mem::size_of::<T>() * self.cap;
                let layout = Layout::from_size_align_unchecked(size, mem::align_of::<T>());
                alloc::dealloc(self.ptr.as_ptr().cast(), layout);
            }
        }
    }
}
