// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Object identity: numeric ids and the generator that hands them out.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The numeric identity of an object, unique within one [`IdGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out strictly increasing [`ObjectId`]s, starting at 0.
///
/// Clones share the same counter. Every object remembers the generator it was
/// created from so that clones of it draw from the same sequence.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: Arc<AtomicU64>,
}

impl IdGenerator {
    /// Creates a generator whose first id is 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next unused id.
    pub fn next_id(&self) -> ObjectId {
        ObjectId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the id the next call to [`next_id`](Self::next_id) would produce.
    pub fn peek(&self) -> ObjectId {
        ObjectId(self.next.load(Ordering::Relaxed))
    }

    /// Returns `true` if both handles share one counter.
    pub fn same_sequence(&self, other: &IdGenerator) -> bool {
        Arc::ptr_eq(&self.next, &other.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn ids_are_strictly_increasing() {
        let ids = IdGenerator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.clone().next_id();
        assert_eq!(a, ObjectId(0));
        assert!(a < b && b < c);
        assert_eq!(ids.peek(), ObjectId(3));
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let ids = IdGenerator::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                thread::spawn(move || (0..250).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("id thread panicked") {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn independent_generators_do_not_share() {
        let a = IdGenerator::new();
        let b = IdGenerator::new();
        assert!(!a.same_sequence(&b));
        assert!(a.same_sequence(&a.clone()));
    }
}
