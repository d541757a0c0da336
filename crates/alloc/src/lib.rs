//! Owning containers over a raw slot buffer: a growable [`Vector`], a [`UniqueBox`] pointer, a
//! fixed-size [`Bitset`] and a prefix [`Trie`].
pub mod config;
pub mod containers;
pub mod error;
pub(crate) mod raw;
pub mod traits;

pub use config::GrowthPolicy;
pub use containers::{
    bitset::Bitset,
    boxed::{make_unique, make_unique_for_overwrite, make_unique_slice, UniqueBox},
    trie::{Trie, TrieSet},
    vec::{Cursor, CursorMut, IntoIter, Vector},
};
pub use error::{AccessError, AllocError};
pub use traits::{DefaultDelete, Deleter};
