//! Ring Module
//!
//! Consistent hashing used by the router to pick the node owning a key.

mod hash_ring;


pub use hash_ring::{ring_hash, HashRing};
