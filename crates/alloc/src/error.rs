use core::alloc::Layout;

use bytesize::ByteSize;
use thiserror::Error;

/// An error with reading or removing an element.
///
/// A container that returns one of these is left exactly as it was before the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The index does not refer to a live element.
    #[error("index {index} out of range (len = {len})")]
    OutOfRange { index: usize, len: usize },
    /// The container has no element to remove.
    #[error("container is empty")]
    Empty,
    /// The pointer owns nothing.
    #[error("attempted to dereference a pointer that owns nothing")]
    Null,
    /// No value is stored under the key.
    #[error("key not found")]
    KeyNotFound,
}

/// An error with allocating memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AllocError {
    /// The requested number of bytes exceeds `isize::MAX` or overflowed `usize`.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The global allocator could not satisfy the request.
    #[error("out of memory: failed to allocate {}", human_size(.layout))]
    OutOfMemory { layout: Layout },
}

fn human_size(layout: &Layout) -> String {
    ByteSize::b(layout.size() as u64).to_string_as(true)
}

impl AllocError {
    /// Aborts the operation that could not get its memory.
    ///
    /// Capacity overflow panics. Allocator failure is routed to [`handle_alloc_error`].
    ///
    /// [`handle_alloc_error`]: std::alloc::handle_alloc_error
    pub(crate) fn fail(self) -> ! {
        match self {
            AllocError::CapacityOverflow => panic!("capacity overflow"),
            AllocError::OutOfMemory { layout } => std::alloc::handle_alloc_error(layout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reports_index_and_len() {
        let err = AccessError::OutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 out of range (len = 3)");
    }

    #[test]
    fn out_of_memory_formats_request_size() {
        let layout = Layout::array::<u64>(128).unwrap();
        let err = AllocError::OutOfMemory { layout };
        let expected = format!(
            "out of memory: failed to allocate {}",
            ByteSize::b(1024).to_string_as(true)
        );
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn capacity_overflow_is_fatal() {
        AllocError::CapacityOverflow.fail();
    }
}
