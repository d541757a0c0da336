pub mod bitset;
pub mod boxed;
pub mod trie;
pub mod vec;
