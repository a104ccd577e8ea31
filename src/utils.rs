use fnv::FnvHasher;
use rand::{Rng, SeedableRng, XorShiftRng};
use std::{
    collections::HashMap,
    hash::{BuildHasherDefault, Hash},
};

pub type FnvHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FnvHasher>>;

/// Construct a hash map with the specified capacity. Fnv hashing is much
/// faster than the default on short keys such as grid coordinates, at the
/// cost of being less robust against crafted key collisions.
pub fn fnv_hashmap<K: Hash + Eq, V>(capacity: usize) -> FnvHashMap<K, V> {
    let fnv = BuildHasherDefault::<FnvHasher>::default();
    HashMap::with_capacity_and_hasher(capacity, fnv)
}

/// Remove and return one element chosen uniformly at random, or None if the
/// list is empty. Removal is by swap_remove, so the order of the survivors
/// is scrambled.
pub fn pick_one<T, R: Rng>(items: &mut Vec<T>, rng: &mut R) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        let index = rng.gen::<usize>() % items.len();
        Some(items.swap_remove(index))
    }
}

/// Expand one seed word into xorshift state. The state must not be all
/// zeroes or the generator gets stuck, hence the low bit pin.
pub fn rng_from_seed(seed: u64) -> XorShiftRng {
    let low = seed as u32;
    let high = (seed >> 32) as u32;
    XorShiftRng::from_seed([low | 1, high, low ^ 0x9e37_79b9, high ^ 0x7f4a_7c15])
}
