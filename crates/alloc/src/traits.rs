use core::ptr::NonNull;

/// Releases whatever an owning pointer points to.
pub trait Deleter<T: ?Sized> {
    /// Destroys the pointee and frees its memory.
    ///
    /// ## Safety
    /// - `ptr` must be uniquely owned by the caller and must not be used afterwards.
    /// - `ptr` must have been produced in a way this deleter understands.
    unsafe fn delete(&mut self, ptr: NonNull<T>);
}

/// Deletes pointees that were allocated through [`Box`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DefaultDelete;

impl<T: ?Sized> Deleter<T> for DefaultDelete {
    unsafe fn delete(&mut self, ptr: NonNull<T>) {
        drop(Box::from_raw(ptr.as_ptr()));
    }
}
