pub use dsa_alloc::*;
pub use dsa_alloc::vector;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reexports_reach_every_container() {
        let mut v = vector![1, 2, 3];
        v.push_back(4);
        assert_eq!(v, [1, 2, 3, 4]);

        let boxed = make_unique(v.len());
        assert_eq!(boxed.try_deref(), Ok(&4));

        let mut bits = Bitset::<4>::new();
        bits.set(1, true).unwrap();
        assert_eq!(bits.to_int::<u8>(), Some(0b10));

        let words: TrieSet<char> = ["ab", "ac"].into_iter().map(|w| (w.chars(), ())).collect();
        assert!(words.starts_with("a".chars()));
    }
}
