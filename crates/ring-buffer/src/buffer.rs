//! Circular Window Implementation

use crate::WindowError;

/// Window size matching the classifier's training windows
pub const WINDOW_SIZE: usize = 50;

/// Fixed-capacity circular window.
///
/// Insertion overwrites the slot at the write index. Storage order is therefore
/// not chronological once the window has wrapped; use [`SlidingWindow::chronological`]
/// when order matters.
#[derive(Debug, Clone)]
pub struct SlidingWindow<T> {
    /// Pre-allocated storage
    storage: Box<[T]>,
    /// Next slot to overwrite
    write_index: usize,
    /// Set on the first wrap, never cleared
    filled: bool,
    /// Total samples inserted (for statistics)
    total_inserted: u64,
}

impl<T: Copy + Default> SlidingWindow<T> {
    /// Create a window with the given capacity
    pub fn new(capacity: usize) -> Result<Self, WindowError> {
        if capacity == 0 {
            return Err(WindowError::ZeroCapacity);
        }
        Ok(Self {
            storage: vec![T::default(); capacity].into_boxed_slice(),
            write_index: 0,
            filled: false,
            total_inserted: 0,
        })
    }

    /// Create a window with the default capacity (50 samples)
    pub fn with_default_capacity() -> Self {
        Self {
            storage: vec![T::default(); WINDOW_SIZE].into_boxed_slice(),
            write_index: 0,
            filled: false,
            total_inserted: 0,
        }
    }

    /// Write a sample into the current slot and advance
    pub fn insert(&mut self, sample: T) {
        self.storage[self.write_index] = sample;
        self.write_index = (self.write_index + 1) % self.storage.len();
        self.total_inserted += 1;

        if self.write_index == 0 {
            self.filled = true;
        }
    }

    /// Whether at least `capacity` samples have ever been inserted
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// All stored samples in storage order.
    ///
    /// Fails with `NotReady` until the window has filled.
    pub fn snapshot(&self) -> Result<&[T], WindowError> {
        if !self.filled {
            return Err(WindowError::NotReady {
                inserted: self.write_index,
                capacity: self.capacity(),
            });
        }
        Ok(&self.storage)
    }

    /// Stored samples oldest-first, reconstructed from the write index
    pub fn chronological(&self) -> Result<Vec<T>, WindowError> {
        let storage = self.snapshot()?;
        let (newer, older) = storage.split_at(self.write_index);
        Ok(older.iter().chain(newer).copied().collect())
    }

    /// Most recently written slot, if any sample has been inserted
    pub fn latest(&self) -> Option<&T> {
        if self.total_inserted == 0 {
            return None;
        }
        let idx = (self.write_index + self.capacity() - 1) % self.capacity();
        Some(&self.storage[idx])
    }

    /// Get the window capacity
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of valid samples (saturates at capacity)
    pub fn len(&self) -> usize {
        if self.filled {
            self.capacity()
        } else {
            self.write_index
        }
    }

    /// Check if no sample has been inserted yet
    pub fn is_empty(&self) -> bool {
        self.total_inserted == 0
    }

    /// Slot the next insertion will overwrite
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Get total samples inserted (for statistics)
    pub fn total_inserted(&self) -> u64 {
        self.total_inserted
    }
}
