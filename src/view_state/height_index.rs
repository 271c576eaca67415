//! HeightIndex - O(log n) prefix sums and lower_bound via Fenwick tree
//!
//! Backs the running offsets of a virtual list so that a single row resize
//! costs O(log n) instead of a full O(n) prefix recompute.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum` / `offset_of`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: amortized O(log n)
//! - `truncate`: O(k log n) for k removed entries
//! - `rebuild`: O(n log n)
//! - `height`, `len`: O(1)

/// HeightIndex wraps a Fenwick tree for O(log n) prefix sum queries and updates.
///
/// The tree is sized to a power-of-two capacity and entries past `len()` are
/// kept at zero, so growing only requires a rebuild when the capacity doubles.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (capacity >= heights.len()).
    tree: Vec<isize>,
    /// Plain per-entry heights, used for O(1) point reads and rebuilds.
    heights: Vec<usize>,
}

impl HeightIndex {
    /// Creates a new HeightIndex with the given initial capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chatscroll::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity.max(1).next_power_of_two()],
            heights: Vec::with_capacity(capacity),
        }
    }

    /// Creates an index populated with the given heights.
    pub fn from_heights(heights: impl IntoIterator<Item = usize>) -> Self {
        let mut index = Self::default();
        index.rebuild(heights);
        index
    }

    /// Replaces all entries with `heights`.
    pub fn rebuild(&mut self, heights: impl IntoIterator<Item = usize>) {
        self.heights.clear();
        self.heights.extend(heights);
        let capacity = self.heights.len().max(1).next_power_of_two();
        self.tree.clear();
        self.tree.resize(capacity, 0);
        for (i, &h) in self.heights.iter().enumerate() {
            if h != 0 {
                fenwick::array::update(&mut self.tree, i, h as isize);
            }
        }
    }

    /// Sets the height at the given index.
    ///
    /// Returns the signed delta applied (0 when the height was unchanged).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chatscroll::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(5);
    /// assert_eq!(index.set(0, 10), 5);
    /// assert_eq!(index.prefix_sum(0), 10);
    /// ```
    pub fn set(&mut self, index: usize, height: usize) -> isize {
        assert!(
            index < self.heights.len(),
            "index {} out of bounds (len: {})",
            index,
            self.heights.len()
        );

        let delta = height as isize - self.heights[index] as isize;
        if delta != 0 {
            self.heights[index] = height;
            fenwick::array::update(&mut self.tree, index, delta);
        }
        delta
    }

    /// Returns the cumulative height up to and including the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chatscroll::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([3, 4, 5]);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(1), 7);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.heights.len(),
            "index {} out of bounds (len: {})",
            index,
            self.heights.len()
        );

        let sum = fenwick::array::prefix_sum(&self.tree, index);
        sum.max(0) as usize
    }

    /// Top offset of the entry at `index`: the sum of all heights before it.
    ///
    /// Accepts `index == len()`, which yields `total()`. Larger indices clamp to `total()`.
    ///
    /// ```
    /// # use chatscroll::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([10, 20]);
    /// assert_eq!(index.offset_of(0), 0);
    /// assert_eq!(index.offset_of(1), 10);
    /// assert_eq!(index.offset_of(2), 30);
    /// ```
    pub fn offset_of(&self, index: usize) -> usize {
        if index == 0 || self.is_empty() {
            0
        } else {
            self.prefix_sum(index.min(self.heights.len()) - 1)
        }
    }

    /// Height of the entry at `index`, or `None` when out of bounds.
    pub fn height(&self, index: usize) -> Option<usize> {
        self.heights.get(index).copied()
    }

    /// Binary search for the first index where `prefix_sum(index) > value`.
    ///
    /// Returns the index of the entry containing the given vertical offset.
    ///
    /// # Returns
    ///
    /// - `Some(index)` if there exists an index where `prefix_sum(index) > value`
    /// - `None` if `value >= total()` or the index is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use chatscroll::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([10, 20, 15]);
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(100), None);
    /// ```
    pub fn lower_bound(&self, value: usize) -> Option<usize> {
        // Entry i covers range [prefix_sum(i-1), prefix_sum(i))
        let mut left = 0;
        let mut right = self.heights.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.heights.len()).then_some(left)
    }

    /// Returns the total cumulative height of all entries.
    pub fn total(&self) -> usize {
        self.offset_of(self.heights.len())
    }

    /// Returns the number of entries in the index.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Returns true if the index contains no entries.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Appends a new entry with the given height.
    ///
    /// ```
    /// # use chatscroll::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(1);
    /// index.push(5);
    /// index.push(3);
    /// index.push(2);
    /// assert_eq!(index.len(), 3);
    /// assert_eq!(index.total(), 10);
    /// ```
    pub fn push(&mut self, height: usize) {
        if self.heights.len() >= self.tree.len() {
            // Node coverage depends on tree length, so growth means a full rebuild.
            let heights = std::mem::take(&mut self.heights);
            let capacity = (heights.len() + 1).next_power_of_two();
            self.tree.clear();
            self.tree.resize(capacity, 0);
            for (i, &h) in heights.iter().enumerate() {
                if h != 0 {
                    fenwick::array::update(&mut self.tree, i, h as isize);
                }
            }
            self.heights = heights;
        }

        let idx = self.heights.len();
        self.heights.push(height);
        if height != 0 {
            fenwick::array::update(&mut self.tree, idx, height as isize);
        }
    }

    /// Shortens the index to `len` entries. No-op when already shorter.
    pub fn truncate(&mut self, len: usize) {
        while self.heights.len() > len {
            let idx = self.heights.len() - 1;
            let height = self.heights[idx];
            if height != 0 {
                fenwick::array::update(&mut self.tree, idx, -(height as isize));
            }
            self.heights.pop();
        }
    }

    /// Clears all entries, resetting to empty state. Retains allocated capacity.
    pub fn clear(&mut self) {
        self.tree.iter_mut().for_each(|node| *node = 0);
        self.heights.clear();
    }
}
