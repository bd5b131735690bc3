use crate::model::{EdgeKind, NodeKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// A closed enumeration that fits in a small bitset.
pub trait Kind: Copy + 'static {
    const ALL: &'static [Self];
    fn bit(self) -> u8;
}

impl Kind for NodeKind {
    const ALL: &'static [Self] = &NodeKind::ALL;
    fn bit(self) -> u8 {
        match self {
            NodeKind::Input => 1,
            NodeKind::Output => 1 << 1,
            NodeKind::Context => 1 << 2,
        }
    }
}

impl Kind for EdgeKind {
    const ALL: &'static [Self] = &EdgeKind::ALL;
    fn bit(self) -> u8 {
        match self {
            EdgeKind::Direct => 1,
            EdgeKind::Hyperedge => 1 << 1,
            EdgeKind::Temporal => 1 << 2,
        }
    }
}

/// Finite set of kinds with constant-time membership.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<K>", into = "Vec<K>")]
#[serde(bound(
    serialize = "K: Kind + Serialize",
    deserialize = "K: Kind + Deserialize<'de>"
))]
pub struct KindSet<K: Kind> {
    bits: u8,
    _kind: PhantomData<K>,
}

pub type NodeKindSet = KindSet<NodeKind>;
pub type EdgeKindSet = KindSet<EdgeKind>;

impl<K: Kind> KindSet<K> {
    pub fn empty() -> Self {
        Self {
            bits: 0,
            _kind: PhantomData,
        }
    }

    pub fn all() -> Self {
        K::ALL.iter().copied().collect()
    }

    pub fn contains(&self, kind: K) -> bool {
        self.bits & kind.bit() != 0
    }

    pub fn insert(&mut self, kind: K) {
        self.bits |= kind.bit();
    }

    pub fn remove(&mut self, kind: K) {
        self.bits &= !kind.bit();
    }

    /// Insert or remove `kind` so that membership equals `present`.
    pub fn set(&mut self, kind: K, present: bool) {
        if present {
            self.insert(kind);
        } else {
            self.remove(kind);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        K::ALL.iter().copied().filter(|k| self.contains(*k))
    }
}

impl<K: Kind> Default for KindSet<K> {
    fn default() -> Self {
        Self::all()
    }
}

impl<K: Kind> FromIterator<K> for KindSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl<K: Kind> From<Vec<K>> for KindSet<K> {
    fn from(kinds: Vec<K>) -> Self {
        kinds.into_iter().collect()
    }
}

impl<K: Kind> From<KindSet<K>> for Vec<K> {
    fn from(set: KindSet<K>) -> Self {
        set.iter().collect()
    }
}

impl<K: Kind + fmt::Debug> fmt::Debug for KindSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let mut set: NodeKindSet =
            [NodeKind::Input, NodeKind::Output].into_iter().collect();

        assert!(set.contains(NodeKind::Input));
        assert!(!set.contains(NodeKind::Context));

        set.set(NodeKind::Input, false);
        assert!(!set.contains(NodeKind::Input));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![NodeKind::Output]);
    }

    #[test]
    fn test_serializes_as_list() {
        let set: EdgeKindSet =
            [EdgeKind::Temporal, EdgeKind::Direct].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["direct","temporal"]"#);

        let back: EdgeKindSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
