use core::{
    fmt, iter,
    marker::PhantomData,
    mem::{self, MaybeUninit},
    ptr::NonNull,
};

use crate::{
    error::AccessError,
    traits::{DefaultDelete, Deleter},
};

/// An owning pointer to a single heap value (or slice), which may also own nothing.
///
/// The pointee is handed to the deleter `D` exactly once: when the `UniqueBox` is dropped or
/// reset. Moving a `UniqueBox` moves ownership. It cannot be cloned.
pub struct UniqueBox<T: ?Sized, D: Deleter<T> = DefaultDelete> {
    ptr: Option<NonNull<T>>,
    deleter: D,
    _marker: PhantomData<T>,
}

// SAFETY: a `UniqueBox` uniquely owns its pointee, like `Box<T>`
unsafe impl<T: ?Sized + Send, D: Deleter<T> + Send> Send for UniqueBox<T, D> {}
unsafe impl<T: ?Sized + Sync, D: Deleter<T> + Sync> Sync for UniqueBox<T, D> {}

impl<T: ?Sized, D: Deleter<T>> UniqueBox<T, D> {
    /// Returns a `UniqueBox` that owns nothing and deletes with `deleter`.
    pub const fn null_with(deleter: D) -> Self {
        Self {
            ptr: None,
            deleter,
            _marker: PhantomData,
        }
    }

    /// Returns a `UniqueBox` that owns nothing.
    pub fn null() -> Self
    where
        D: Default,
    {
        Self::null_with(D::default())
    }

    /// Takes ownership of `ptr`. A null `ptr` yields a `UniqueBox` that owns nothing.
    ///
    /// ## Safety
    /// - `ptr` must be null or uniquely owned by the caller.
    /// - `deleter` must be able to delete it.
    pub unsafe fn from_raw_with(ptr: *mut T, deleter: D) -> Self {
        Self {
            ptr: NonNull::new(ptr),
            deleter,
            _marker: PhantomData,
        }
    }

    /// Takes ownership of `ptr`, deleting it with `D::default()`.
    ///
    /// ## Safety
    /// - See [`from_raw_with`](UniqueBox::from_raw_with).
    pub unsafe fn from_raw(ptr: *mut T) -> Self
    where
        D: Default,
    {
        Self::from_raw_with(ptr, D::default())
    }

    /// Gives up ownership without deleting. The caller becomes responsible for the pointee.
    pub fn release(&mut self) -> Option<NonNull<T>> {
        self.ptr.take()
    }

    /// Deletes the pointee, if any, and owns nothing afterwards.
    pub fn reset(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            // SAFETY: `ptr` was owned and is no longer reachable through `self`
            unsafe { self.deleter.delete(ptr) };
        }
    }

    /// Deletes the current pointee, then takes ownership of `ptr`.
    ///
    /// ## Safety
    /// - See [`from_raw_with`](UniqueBox::from_raw_with). `ptr` must not be the current pointee.
    pub unsafe fn reset_raw(&mut self, ptr: *mut T) {
        self.reset();
        self.ptr = NonNull::new(ptr);
    }

    /// Exchanges pointees and deleters with `other`.
    pub fn swap_with(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Moves ownership out, leaving `self` owning nothing.
    pub fn take(&mut self) -> Self
    where
        D: Default,
    {
        mem::replace(self, Self::null())
    }

    #[inline]
    pub fn is_owning(&self) -> bool {
        self.ptr.is_some()
    }

    #[inline]
    pub fn as_ptr(&self) -> Option<NonNull<T>> {
        self.ptr
    }

    pub fn get(&self) -> Option<&T> {
        // SAFETY: an owned pointee is valid for as long as `self` is borrowed
        self.ptr.as_ref().map(|ptr| unsafe { ptr.as_ref() })
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        // SAFETY: an owned pointee is valid and unaliased for as long as `self` is borrowed
        self.ptr.as_mut().map(|ptr| unsafe { ptr.as_mut() })
    }

    /// Returns the pointee.
    ///
    /// # Errors
    ///
    /// Returns `Err` if nothing is owned.
    pub fn try_deref(&self) -> Result<&T, AccessError> {
        self.get().ok_or(AccessError::Null)
    }

    /// Returns the pointee mutably.
    ///
    /// # Errors
    ///
    /// Returns `Err` if nothing is owned.
    pub fn try_deref_mut(&mut self) -> Result<&mut T, AccessError> {
        self.get_mut().ok_or(AccessError::Null)
    }

    pub fn deleter(&self) -> &D {
        &self.deleter
    }

    pub fn deleter_mut(&mut self) -> &mut D {
        &mut self.deleter
    }
}

impl<T> UniqueBox<T> {
    /// Allocates `value` on the heap and owns it.
    pub fn new(value: T) -> Self {
        Self::from(Box::new(value))
    }

    /// Allocates room for a `T` without initializing it.
    pub fn new_uninit() -> UniqueBox<MaybeUninit<T>> {
        UniqueBox::new(MaybeUninit::uninit())
    }

    /// Deletes the current pointee and owns `value` instead.
    pub fn replace(&mut self, value: T) {
        self.reset();
        self.ptr = Some(NonNull::from(Box::leak(Box::new(value))));
    }
}

impl<T: ?Sized> UniqueBox<T> {
    /// Converts into a [`Box`], or `None` if nothing is owned.
    pub fn into_box(mut self) -> Option<Box<T>> {
        // SAFETY: pointees of the default deleter come from `Box`
        self.ptr.take().map(|ptr| unsafe { Box::from_raw(ptr.as_ptr()) })
    }
}

impl<T> UniqueBox<MaybeUninit<T>> {
    /// Initializes the pointee with `value`.
    ///
    /// Allocates afresh if nothing is owned.
    pub fn write(mut self, value: T) -> UniqueBox<T> {
        match self.ptr.take() {
            Some(ptr) => {
                // SAFETY: `MaybeUninit<T>` has the layout of `T`, so the block is a valid `Box<T>`
                unsafe {
                    ptr.as_ptr().write(MaybeUninit::new(value));
                    UniqueBox::from_raw(ptr.as_ptr().cast::<T>())
                }
            }
            None => UniqueBox::new(value),
        }
    }

    /// ## Safety
    /// - The pointee, if any, must be initialized.
    pub unsafe fn assume_init(mut self) -> UniqueBox<T> {
        match self.ptr.take() {
            Some(ptr) => UniqueBox::from_raw(ptr.as_ptr().cast::<T>()),
            None => UniqueBox::null(),
        }
    }
}

impl<T> UniqueBox<[T]> {
    /// Allocates a slice of `len` values produced by `f`.
    pub fn from_fn<F>(len: usize, f: F) -> Self
    where
        F: FnMut() -> T,
    {
        Self::from(iter::repeat_with(f).take(len).collect::<Box<[T]>>())
    }

    /// Allocates a slice of `len` default values.
    pub fn new_default(len: usize) -> Self
    where
        T: Default,
    {
        Self::from_fn(len, T::default)
    }

    /// Allocates a slice of `len` uninitialized slots.
    pub fn new_uninit_slice(len: usize) -> UniqueBox<[MaybeUninit<T>]> {
        UniqueBox::from_fn(len, MaybeUninit::uninit)
    }
}

impl<T> UniqueBox<[MaybeUninit<T>]> {
    /// ## Safety
    /// - Every slot of the pointee, if any, must be initialized.
    pub unsafe fn assume_init(mut self) -> UniqueBox<[T]> {
        match self.ptr.take() {
            Some(ptr) => UniqueBox::from_raw(ptr.as_ptr() as *mut [T]),
            None => UniqueBox::null(),
        }
    }
}

impl<T, D: Deleter<[T]>> UniqueBox<[T], D> {
    /// Returns the slice length, or 0 if nothing is owned.
    pub fn len(&self) -> usize {
        self.get().map_or(0, <[T]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if nothing is owned or `index` is out of bounds.
    pub fn at(&self, index: usize) -> Result<&T, AccessError> {
        let slice = self.try_deref()?;
        let len = slice.len();
        slice.get(index).ok_or(AccessError::OutOfRange { index, len })
    }

    /// Returns the element at `index` mutably.
    ///
    /// # Errors
    ///
    /// Returns `Err` if nothing is owned or `index` is out of bounds.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, AccessError> {
        let slice = self.try_deref_mut()?;
        let len = slice.len();
        slice.get_mut(index).ok_or(AccessError::OutOfRange { index, len })
    }
}

impl<T: ?Sized, D: Deleter<T>> Drop for UniqueBox<T, D> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T: ?Sized, D: Deleter<T> + Default> Default for UniqueBox<T, D> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized> From<Box<T>> for UniqueBox<T> {
    fn from(boxed: Box<T>) -> Self {
        Self {
            ptr: Some(NonNull::from(Box::leak(boxed))),
            deleter: DefaultDelete,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized + fmt::Debug, D: Deleter<T>> fmt::Debug for UniqueBox<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("UniqueBox").field(&value).finish(),
            None => f.write_str("UniqueBox(null)"),
        }
    }
}

/// Allocates `value` on the heap and returns its owner.
pub fn make_unique<T>(value: T) -> UniqueBox<T> {
    UniqueBox::new(value)
}

/// Allocates a slice of `len` default values and returns its owner.
pub fn make_unique_slice<T: Default>(len: usize) -> UniqueBox<[T]> {
    UniqueBox::new_default(len)
}

/// Allocates room for a `T` to be written later.
pub fn make_unique_for_overwrite<T>() -> UniqueBox<MaybeUninit<T>> {
    UniqueBox::new_uninit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    /// Frees through `Box` and counts each call.
    #[derive(Default)]
    struct CountingDelete(Rc<Cell<usize>>);

    impl<T: ?Sized> Deleter<T> for CountingDelete {
        unsafe fn delete(&mut self, ptr: NonNull<T>) {
            self.0.set(self.0.get() + 1);
            drop(Box::from_raw(ptr.as_ptr()));
        }
    }

    fn counted<T>(value: T, count: &Rc<Cell<usize>>) -> UniqueBox<T, CountingDelete> {
        // SAFETY: the pointer comes straight from `Box`
        unsafe {
            UniqueBox::from_raw_with(
                Box::into_raw(Box::new(value)),
                CountingDelete(count.clone()),
            )
        }
    }

    #[test]
    fn null_owns_nothing() {
        let mut ptr = UniqueBox::<u32>::null();
        assert!(!ptr.is_owning());
        assert_eq!(ptr.try_deref(), Err(AccessError::Null));
        assert_eq!(ptr.try_deref_mut(), Err(AccessError::Null));
        assert_eq!(format!("{ptr:?}"), "UniqueBox(null)");
    }

    #[test]
    fn new_owns_value() {
        let mut ptr = make_unique(String::from("a"));
        assert!(ptr.is_owning());
        ptr.try_deref_mut().unwrap().push('b');
        assert_eq!(ptr.try_deref().map(String::as_str), Ok("ab"));
        assert_eq!(format!("{ptr:?}"), "UniqueBox(\"ab\")");
    }

    #[test]
    fn drop_deletes_exactly_once() {
        let count = Rc::new(Cell::new(0));
        {
            let ptr = counted(5, &count);
            let moved = ptr;
            assert_eq!(moved.get(), Some(&5));
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn release_skips_the_deleter() {
        let count = Rc::new(Cell::new(0));
        let mut ptr = counted(5, &count);
        let raw = ptr.release().unwrap();
        assert!(!ptr.is_owning());
        drop(ptr);
        assert_eq!(count.get(), 0);
        // SAFETY: released from a `Box` allocation
        drop(unsafe { Box::from_raw(raw.as_ptr()) });
    }

    #[test]
    fn reset_deletes_old_pointee() {
        let count = Rc::new(Cell::new(0));
        let mut ptr = counted(1, &count);
        // SAFETY: a fresh `Box` allocation
        unsafe { ptr.reset_raw(Box::into_raw(Box::new(2))) };
        assert_eq!(count.get(), 1);
        assert_eq!(ptr.get(), Some(&2));
        ptr.reset();
        assert_eq!(count.get(), 2);
        ptr.reset();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn take_and_swap_transfer_ownership() {
        let mut a = UniqueBox::new(1);
        let mut b = UniqueBox::null();
        a.swap_with(&mut b);
        assert!(!a.is_owning());
        assert_eq!(b.get(), Some(&1));

        let c = b.take();
        assert!(!b.is_owning());
        assert_eq!(c.into_box().as_deref(), Some(&1));

        a.replace(3);
        assert_eq!(a.get(), Some(&3));
    }

    #[test]
    fn uninit_then_write() {
        let ptr = make_unique_for_overwrite::<u64>().write(42);
        assert_eq!(ptr.get(), Some(&42));

        let mut empty = UniqueBox::<u64>::new_uninit();
        empty.reset();
        assert_eq!(empty.write(7).get(), Some(&7));
    }

    #[test]
    fn slice_access_is_checked() {
        let mut slice = make_unique_slice::<i32>(3);
        assert_eq!(slice.len(), 3);
        *slice.at_mut(1).unwrap() = 8;
        assert_eq!(slice.get(), Some(&[0, 8, 0][..]));
        assert_eq!(slice.at(3), Err(AccessError::OutOfRange { index: 3, len: 3 }));

        slice.reset();
        assert!(slice.is_empty());
        assert_eq!(slice.at(0), Err(AccessError::Null));
    }

    #[test]
    fn uninit_slice_assume_init() {
        let mut slots = UniqueBox::<[u8]>::new_uninit_slice(4);
        for (i, slot) in slots.get_mut().unwrap().iter_mut().enumerate() {
            slot.write(i as u8);
        }
        // SAFETY: every slot was written above
        let slice = unsafe { slots.assume_init() };
        assert_eq!(slice.get(), Some(&[0, 1, 2, 3][..]));
    }

    #[test]
    fn slices_use_the_custom_deleter() {
        let count = Rc::new(Cell::new(0));
        let boxed: Box<[String]> = vec!["a".to_owned(), "b".to_owned()].into_boxed_slice();
        // SAFETY: the pointer comes straight from `Box`
        let ptr = unsafe {
            UniqueBox::from_raw_with(Box::into_raw(boxed), CountingDelete(count.clone()))
        };
        assert_eq!(ptr.at(1).map(String::as_str), Ok("b"));
        drop(ptr);
        assert_eq!(count.get(), 1);
    }
}
