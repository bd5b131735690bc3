use std::borrow::Borrow;

/// Dense indices for a set of values, numbered in sorted order so the
/// numbering never depends on the order values arrive in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IxMap<T> {
    value_of: Vec<T>,
}

impl<T: Ord> IxMap<T> {
    /// Sort and deduplicate `vals`; index `i` is the `i`-th smallest.
    pub fn from_sorted<I: IntoIterator<Item = T>>(vals: I) -> Self {
        let mut value_of: Vec<T> = vals.into_iter().collect();
        value_of.sort();
        value_of.dedup();
        Self { value_of }
    }

    pub fn len(&self) -> usize {
        self.value_of.len()
    }
    pub fn is_empty(&self) -> bool {
        self.value_of.is_empty()
    }

    pub fn index_of<Q>(&self, x: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.value_of
            .binary_search_by(|v| Borrow::<Q>::borrow(v).cmp(x))
            .ok()
    }
    pub fn value_of(&self, i: usize) -> Option<&T> {
        self.value_of.get(i)
    }

    pub fn values(&self) -> &[T] {
        &self.value_of
    }
}
