use petgraph::{csr::IndexType, graph::NodeIndex};

use crate::automaton::State;

pub trait IndexMapData: Clone + PartialEq {
    fn empty() -> Self;
}

impl<T: Clone + PartialEq> IndexMapData for Option<T> {
    fn empty() -> Self {
        None
    }
}

impl<T: Clone + PartialEq> IndexMapData for Vec<T> {
    fn empty() -> Self {
        Vec::new()
    }
}

pub trait IndexMapKey: Copy {
    fn new(index: usize) -> Self;
    fn index(self) -> usize;
}

impl<T: IndexType> IndexMapKey for NodeIndex<T> {
    fn new(index: usize) -> Self {
        NodeIndex::new(index)
    }

    fn index(self) -> usize {
        NodeIndex::index(self)
    }
}

impl IndexMapKey for State {
    fn new(index: usize) -> Self {
        State::new(index)
    }

    fn index(self) -> usize {
        State::index(self)
    }
}

/// A dense map from a compact index space to values, backed by a [Vec].
pub struct IndexMap<K: IndexMapKey, V: IndexMapData> {
    data: Vec<V>,
    _marker: std::marker::PhantomData<K>,
}

impl<K: IndexMapKey, V: IndexMapData> IndexMap<K, V> {
    pub fn new(max_index: usize) -> Self {
        IndexMap {
            data: vec![V::empty(); max_index],
            _marker: std::marker::PhantomData,
        }
    }

    pub fn has_key(&self, key: K) -> bool {
        let index = key.index();

        index < self.data.len() && self.data[index] != V::empty()
    }

    pub fn get(&self, key: K) -> &V {
        &self.data[key.index()]
    }

    pub fn get_mut(&mut self, key: K) -> &mut V {
        &mut self.data[key.index()]
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.data[key.index()] = value;
    }
}

/// A dense set over a compact index space.
#[derive(Debug, Clone)]
pub struct IndexSet<K: IndexMapKey> {
    data: Vec<bool>,
    len: usize,
    _marker: std::marker::PhantomData<K>,
}

impl<K: IndexMapKey> IndexSet<K> {
    pub fn new(max_index: usize) -> Self {
        IndexSet {
            data: vec![false; max_index],
            len: 0,
            _marker: std::marker::PhantomData,
        }
    }

    /// Inserts a key, returning true if it was not present before.
    pub fn insert(&mut self, key: K) -> bool {
        let index = key.index();
        if self.data[index] {
            return false;
        }

        self.data[index] = true;
        self.len += 1;
        true
    }

    pub fn contains(&self, key: K) -> bool {
        self.data.get(key.index()).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over the contained keys in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, present)| **present)
            .map(|(index, _)| K::new(index))
    }
}

#[test]
fn test_index_set() {
    let mut set = IndexSet::<NodeIndex>::new(4);
    assert!(set.insert(NodeIndex::new(2)));
    assert!(!set.insert(NodeIndex::new(2)));
    assert!(set.insert(NodeIndex::new(0)));
    assert!(!set.contains(NodeIndex::new(1)));
    assert!(!set.contains(NodeIndex::new(7)));
    assert_eq!(set.len(), 2);
    assert_eq!(
        set.iter().collect::<Vec<_>>(),
        vec![NodeIndex::new(0), NodeIndex::new(2)]
    );
}

#[test]
fn test_index_map() {
    let mut map = IndexMap::<State, Option<usize>>::new(3);
    assert!(!map.has_key(State(1)));
    map.insert(State(1), Some(5));
    assert!(map.has_key(State(1)));
    assert_eq!(*map.get(State(1)), Some(5));
    *map.get_mut(State(1)) = None;
    assert!(!map.has_key(State(1)));
}
