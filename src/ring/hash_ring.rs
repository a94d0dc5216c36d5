//! Consistent Hash Ring
//!
//! Maps keys to node addresses through virtual points on a 32-bit circle.

use std::collections::{BTreeMap, BTreeSet};

use md5::{Digest, Md5};
use parking_lot::RwLock;

/// Hashes `input` onto the ring.
///
/// First four bytes of the MD5 digest, big-endian. Used for placement only,
/// never for anything security related.
pub fn ring_hash(input: &str) -> u32 {
    let digest = Md5::digest(input.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

fn virtual_point(address: &str, index: usize) -> u32 {
    ring_hash(&format!("{}:{}", address, index))
}

// == Hash Ring ==
/// Virtual-node consistent hash ring.
///
/// Points live in a sorted map behind one lock, so a lookup sees the ring
/// either entirely before or entirely after a membership change.
#[derive(Debug)]
pub struct HashRing {
    /// Virtual points per node
    replicas: usize,
    /// Ring point -> owning address, kept in ascending order
    points: RwLock<BTreeMap<u32, String>>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring placing `replicas` points per node.
    pub fn new(replicas: usize) -> Self {
        Self {
            replicas: replicas.max(1),
            points: RwLock::new(BTreeMap::new()),
        }
    }

    /// Creates a ring pre-populated with `nodes`.
    pub fn with_nodes<I, S>(replicas: usize, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ring = Self::new(replicas);
        for node in nodes {
            ring.add_node(node.as_ref());
        }
        ring
    }

    // == Add Node ==
    /// Places `replicas` points for `address`. Re-adding overwrites the
    /// same points, so the call is idempotent.
    pub fn add_node(&self, address: &str) {
        let mut points = self.points.write();
        for i in 0..self.replicas {
            points.insert(virtual_point(address, i), address.to_string());
        }
    }

    // == Remove Node ==
    /// Drops every point owned by `address`. Unknown addresses are a no-op.
    ///
    /// A point another node won on a hash collision is left alone.
    pub fn remove_node(&self, address: &str) {
        let mut points = self.points.write();
        for i in 0..self.replicas {
            let point = virtual_point(address, i);
            if points.get(&point).is_some_and(|owner| owner == address) {
                points.remove(&point);
            }
        }
    }

    // == Get Node ==
    /// Returns the owner of `key`: the first point at or after its hash,
    /// wrapping to the lowest point. `None` on an empty ring.
    pub fn get_node(&self, key: &str) -> Option<String> {
        let hash = ring_hash(key);
        let points = self.points.read();

        points
            .range(hash..)
            .next()
            .or_else(|| points.iter().next())
            .map(|(_, address)| address.clone())
    }

    // == Get Nodes ==
    /// Returns the distinct addresses currently on the ring, sorted.
    pub fn get_nodes(&self) -> Vec<String> {
        let points = self.points.read();
        points
            .values()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.points.read().values().any(|owner| owner == address)
    }

    /// Number of points on the ring.
    pub fn len(&self) -> usize {
        self.points.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.read().is_empty()
    }

    /// Snapshot of `(point, address)` pairs in ring order.
    pub fn points(&self) -> Vec<(u32, String)> {
        self.points
            .read()
            .iter()
            .map(|(point, address)| (*point, address.clone()))
            .collect()
    }
}
