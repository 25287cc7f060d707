//! Opaque key/value payload carried by an instruction
//!
//! A `DataBundle` lets test setup code hand context to a predicate (and read
//! results back after the wait) without the watcher knowing the types involved.

use std::any::Any;
use std::collections::HashMap;

/// Type-erased storage keyed by string
///
/// Values are stored as `Box<dyn Any + Send + Sync>` and retrieved by type.
/// Asking for a key with the wrong type yields `None`, same as a missing key.
///
/// # Example
///
/// ```rust
/// use condition_watcher::DataBundle;
///
/// let mut bundle = DataBundle::new();
/// bundle.put("expected_rows", 2usize);
/// bundle.put("title", "Reminder 1".to_string());
///
/// assert_eq!(bundle.get::<usize>("expected_rows"), Some(&2));
/// assert_eq!(bundle.get::<u32>("expected_rows"), None);
/// assert_eq!(bundle.get_cloned::<String>("title").as_deref(), Some("Reminder 1"));
/// ```
#[derive(Default)]
pub struct DataBundle {
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl DataBundle {
    /// Create a new empty bundle
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Store a value under `key`, returning whether a previous value was replaced
    pub fn put<T>(&mut self, key: impl Into<String>, value: T) -> bool
    where
        T: Any + Send + Sync,
    {
        self.values.insert(key.into(), Box::new(value)).is_some()
    }

    /// Builder form of [`put`](Self::put)
    pub fn with<T>(mut self, key: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.put(key, value);
        self
    }

    /// Borrow a value by key and type
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// Mutably borrow a value by key and type
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.values
            .get_mut(key)
            .and_then(|boxed| boxed.downcast_mut::<T>())
    }

    /// Clone a value out of the bundle
    pub fn get_cloned<T: Any + Clone>(&self, key: &str) -> Option<T> {
        self.get::<T>(key).cloned()
    }

    /// Remove a value, returning whether it existed
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// Check if a key exists, regardless of its type
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over stored keys in arbitrary order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Get the number of values stored
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the bundle is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Clear all values
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl std::fmt::Debug for DataBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("DataBundle").field("keys", &keys).finish()
    }
}
