use core::{borrow::Borrow, fmt, iter::FusedIterator};
use std::collections::{btree_map, BTreeMap};

use crate::error::AccessError;

#[derive(Clone, PartialEq, Eq)]
struct Node<K, V> {
    value: Option<V>,
    children: BTreeMap<K, Node<K, V>>,
}

impl<K, V> Node<K, V> {
    const fn new() -> Self {
        Self {
            value: None,
            children: BTreeMap::new(),
        }
    }

    /// Walks `key` from this node, creating missing nodes along the way.
    fn descend_or_insert<I>(&mut self, key: I) -> &mut Self
    where
        K: Ord,
        I: IntoIterator<Item = K>,
    {
        key.into_iter().fold(self, |node, token| {
            node.children.entry(token).or_insert_with(Node::new)
        })
    }

    fn is_vacant(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }
}

/// A map keyed by sequences of tokens, sharing storage between common prefixes.
///
/// Keys iterate in lexicographic order. Lookups accept any sequence whose items borrow as `K`,
/// so a `Trie<char, V>` can be queried with `"key".chars()` and a `Trie<u8, V>` with `b"key"`.
#[derive(Clone, PartialEq, Eq)]
pub struct Trie<K, V = ()> {
    root: Node<K, V>,
    len: usize,
}

/// A set of token sequences.
pub type TrieSet<K> = Trie<K, ()>;

impl<K: Ord, V> Trie<K, V> {
    pub const fn new() -> Self {
        Self {
            root: Node::new(),
            len: 0,
        }
    }

    /// Returns the number of keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.root = Node::new();
        self.len = 0;
    }

    /// Stores `value` under `key`, returning the value it replaced.
    pub fn insert<I>(&mut self, key: I, value: V) -> Option<V>
    where
        I: IntoIterator<Item = K>,
    {
        let node = self.root.descend_or_insert(key);
        let old = node.value.replace(value);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Returns the value under `key`, inserting `V::default()` first if there is none.
    pub fn get_or_insert_default<I>(&mut self, key: I) -> &mut V
    where
        I: IntoIterator<Item = K>,
        V: Default,
    {
        let node = self.root.descend_or_insert(key);
        if node.value.is_none() {
            self.len += 1;
        }
        node.value.get_or_insert_with(V::default)
    }

    fn find<Q>(&self, key: Q) -> Option<&Node<K, V>>
    where
        Q: IntoIterator,
        Q::Item: Borrow<K>,
    {
        let mut node = &self.root;
        for token in key {
            node = node.children.get(token.borrow())?;
        }
        Some(node)
    }

    fn find_mut<Q>(&mut self, key: Q) -> Option<&mut Node<K, V>>
    where
        Q: IntoIterator,
        Q::Item: Borrow<K>,
    {
        let mut node = &mut self.root;
        for token in key {
            node = node.children.get_mut(token.borrow())?;
        }
        Some(node)
    }

    pub fn get<Q>(&self, key: Q) -> Option<&V>
    where
        Q: IntoIterator,
        Q::Item: Borrow<K>,
    {
        self.find(key)?.value.as_ref()
    }

    pub fn get_mut<Q>(&mut self, key: Q) -> Option<&mut V>
    where
        Q: IntoIterator,
        Q::Item: Borrow<K>,
    {
        self.find_mut(key)?.value.as_mut()
    }

    pub fn contains_key<Q>(&self, key: Q) -> bool
    where
        Q: IntoIterator,
        Q::Item: Borrow<K>,
    {
        self.get(key).is_some()
    }

    /// Returns the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if no value is stored under `key`.
    pub fn at<Q>(&self, key: Q) -> Result<&V, AccessError>
    where
        Q: IntoIterator,
        Q::Item: Borrow<K>,
    {
        self.get(key).ok_or(AccessError::KeyNotFound)
    }

    /// Removes the value under `key` and prunes branches left without keys.
    pub fn remove<Q>(&mut self, key: Q) -> Option<V>
    where
        Q: IntoIterator,
        Q::Item: Borrow<K>,
    {
        let removed = remove_in(&mut self.root, key.into_iter());
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Returns `true` if any stored key starts with `prefix`.
    pub fn starts_with<Q>(&self, prefix: Q) -> bool
    where
        Q: IntoIterator,
        Q::Item: Borrow<K>,
    {
        self.find(prefix).is_some_and(|node| !node.is_vacant())
    }

    /// Iterates over every entry in lexicographic key order.
    pub fn iter(&self) -> Iter<'_, K, V>
    where
        K: Clone,
    {
        Iter::new(Vec::new(), Some(&self.root))
    }

    /// Iterates over the entries whose keys start with `prefix`, in lexicographic key order.
    pub fn with_prefix<Q>(&self, prefix: Q) -> Iter<'_, K, V>
    where
        K: Clone,
        Q: IntoIterator,
        Q::Item: Borrow<K>,
    {
        let mut path = Vec::new();
        let mut node = Some(&self.root);
        for token in prefix {
            let token = token.borrow();
            node = node.and_then(|node| node.children.get(token));
            path.push(token.clone());
        }
        Iter::new(path, node)
    }
}

impl<K: Ord> Trie<K, ()> {
    /// Adds `key` to the set, returning `true` if it was not already present.
    pub fn insert_key<I>(&mut self, key: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        self.insert(key, ()).is_none()
    }
}

fn remove_in<K, V, Q>(node: &mut Node<K, V>, mut key: Q) -> Option<V>
where
    K: Ord,
    Q: Iterator,
    Q::Item: Borrow<K>,
{
    let Some(token) = key.next() else {
        return node.value.take();
    };
    let token = token.borrow();
    let child = node.children.get_mut(token)?;
    let removed = remove_in(child, key);
    if removed.is_some() && child.is_vacant() {
        node.children.remove(token);
    }
    removed
}

impl<K: Ord, V> Default for Trie<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + fmt::Debug, V: fmt::Debug> fmt::Debug for Trie<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V, I: IntoIterator<Item = K>> FromIterator<(I, V)> for Trie<K, V> {
    fn from_iter<T: IntoIterator<Item = (I, V)>>(iter: T) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl<K: Ord, V, I: IntoIterator<Item = K>> Extend<(I, V)> for Trie<K, V> {
    fn extend<T: IntoIterator<Item = (I, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Ord + Clone, V> IntoIterator for &'a Trie<K, V> {
    type Item = (Vec<K>, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// An iterator over a [`Trie`]'s entries, yielding each key as an owned token sequence.
pub struct Iter<'a, K, V> {
    // one child iterator per node on the path below the starting node
    stack: Vec<btree_map::Iter<'a, K, Node<K, V>>>,
    path: Vec<K>,
    // the starting node's own value, yielded first
    head: Option<&'a V>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(path: Vec<K>, start: Option<&'a Node<K, V>>) -> Self {
        match start {
            Some(node) => Self {
                stack: vec![node.children.iter()],
                path,
                head: node.value.as_ref(),
            },
            None => Self {
                stack: Vec::new(),
                path,
                head: None,
            },
        }
    }
}

impl<'a, K: Clone, V> Iterator for Iter<'a, K, V> {
    type Item = (Vec<K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(value) = self.head.take() {
            return Some((self.path.clone(), value));
        }
        loop {
            let children = self.stack.last_mut()?;
            match children.next() {
                Some((token, node)) => {
                    self.path.push(token.clone());
                    self.stack.push(node.children.iter());
                    if let Some(value) = node.value.as_ref() {
                        return Some((self.path.clone(), value));
                    }
                }
                None => {
                    self.stack.pop();
                    self.path.pop();
                }
            }
        }
    }
}

impl<K: Clone, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<V>(iter: Iter<'_, char, V>) -> Vec<String> {
        iter.map(|(key, _)| key.into_iter().collect()).collect()
    }

    #[test]
    fn insert_and_get() {
        let mut trie = Trie::new();
        assert_eq!(trie.insert("tea".chars(), 1), None);
        assert_eq!(trie.insert("ten".chars(), 2), None);
        assert_eq!(trie.insert("tea".chars(), 3), Some(1));
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.get("tea".chars()), Some(&3));
        assert_eq!(trie.get("te".chars()), None);
        assert!(!trie.contains_key("teapot".chars()));
    }

    #[test]
    fn at_reports_missing_keys() {
        let trie: Trie<u8, u32> = [(b"ab".to_vec(), 1)].into_iter().collect();
        assert_eq!(trie.at(b"ab"), Ok(&1));
        assert_eq!(trie.at(b"a"), Err(AccessError::KeyNotFound));
    }

    #[test]
    fn empty_key_is_a_key() {
        let mut trie = Trie::new();
        trie.insert("".chars(), 0);
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.get("".chars()), Some(&0));
        assert_eq!(keys(trie.iter()), [""]);
    }

    #[test]
    fn iteration_is_lexicographic() {
        let trie: Trie<char, usize> = ["to", "tea", "ted", "ten", "i", "in", "inn", "A"]
            .into_iter()
            .enumerate()
            .map(|(i, word)| (word.chars(), i))
            .collect();
        assert_eq!(
            keys(trie.iter()),
            ["A", "i", "in", "inn", "tea", "ted", "ten", "to"]
        );
    }

    #[test]
    fn prefix_ranges() {
        let trie: Trie<char, ()> = ["tea", "ted", "ten", "to", "inn"]
            .into_iter()
            .map(|word| (word.chars(), ()))
            .collect();
        assert_eq!(keys(trie.with_prefix("te".chars())), ["tea", "ted", "ten"]);
        assert_eq!(keys(trie.with_prefix("ted".chars())), ["ted"]);
        assert!(keys(trie.with_prefix("x".chars())).is_empty());
        assert!(keys(trie.with_prefix("tedd".chars())).is_empty());
        assert!(trie.starts_with("i".chars()));
        assert!(!trie.starts_with("o".chars()));
    }

    #[test]
    fn remove_prunes_branches() {
        let mut trie = Trie::new();
        trie.insert("tea".chars(), 1);
        trie.insert("team".chars(), 2);
        assert_eq!(trie.remove("team".chars()), Some(2));
        assert_eq!(trie.remove("team".chars()), None);
        assert!(!trie.starts_with("team".chars()));
        assert!(trie.starts_with("tea".chars()));
        assert_eq!(trie.remove("tea".chars()), Some(1));
        assert!(trie.is_empty());
        assert!(!trie.starts_with("t".chars()));
        assert_eq!(trie, Trie::new());
    }

    #[test]
    fn get_or_insert_default_counts_new_keys() {
        let mut counts: Trie<char, u32> = Trie::new();
        for word in ["a", "b", "a"] {
            *counts.get_or_insert_default(word.chars()) += 1;
        }
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get("a".chars()), Some(&2));
        *counts.get_mut("b".chars()).unwrap() = 10;
        assert_eq!(format!("{counts:?}"), "{['a']: 2, ['b']: 10}");
    }

    #[test]
    fn sets_report_new_keys() {
        let mut set = TrieSet::new();
        assert!(set.insert_key([1, 2]));
        assert!(!set.insert_key([1, 2]));
        assert!(set.insert_key([1]));
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains_key(&[1, 2]));
    }
}
