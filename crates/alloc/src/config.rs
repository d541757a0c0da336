use super::error::AllocError;

/// Capacity of the first block a growing, empty container allocates.
pub const DEFAULT_CAPACITY: usize = 16;
/// Multiplier applied to a full container's capacity.
pub const GROWTH_FACTOR: usize = 2;

/// Controls how a container picks its next capacity when it runs out of slots.
///
/// Growth is geometric, so appending stays amortized *O*(1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GrowthPolicy {
    /// The capacity an unallocated container jumps to.
    default_capacity: usize,
    /// Full containers multiply their capacity by this factor.
    growth_factor: usize,
}

impl GrowthPolicy {
    pub const DEFAULT: Self = Self {
        default_capacity: DEFAULT_CAPACITY,
        growth_factor: GROWTH_FACTOR,
    };

    /// Constructs a new `GrowthPolicy`.
    ///
    /// # Panics
    ///
    /// Panics if
    /// - `default_capacity` is 0
    /// - `growth_factor` is less than 2
    pub const fn new(default_capacity: usize, growth_factor: usize) -> Self {
        assert!(default_capacity != 0);
        assert!(growth_factor >= 2);
        Self {
            default_capacity,
            growth_factor,
        }
    }

    #[inline]
    pub const fn default_capacity(&self) -> usize {
        self.default_capacity
    }

    #[inline]
    pub const fn growth_factor(&self) -> usize {
        self.growth_factor
    }

    /// Returns the capacity that follows `current`.
    ///
    /// That is `max(default_capacity, current * growth_factor)`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the product overflows `usize`.
    pub fn next_capacity(&self, current: usize) -> Result<usize, AllocError> {
        current
            .checked_mul(self.growth_factor)
            .map(|grown| grown.max(self.default_capacity))
            .ok_or(AllocError::CapacityOverflow)
    }

    /// Returns the first capacity in the growth sequence from `current` that holds `required`
    /// slots.
    ///
    /// Returns `current` if it is already large enough.
    pub fn capacity_for(&self, current: usize, required: usize) -> Result<usize, AllocError> {
        let mut capacity = current;
        while capacity < required {
            capacity = self.next_capacity(capacity)?;
        }
        Ok(capacity)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_growth_jumps_to_default_capacity() {
        let policy = GrowthPolicy::default();
        assert_eq!(policy.next_capacity(0), Ok(16));
        assert_eq!(policy.next_capacity(3), Ok(16));
        assert_eq!(policy.next_capacity(16), Ok(32));
        assert_eq!(policy.next_capacity(100), Ok(200));
    }

    #[test]
    fn capacity_for_follows_doublings() {
        let policy = GrowthPolicy::default();
        assert_eq!(policy.capacity_for(0, 0), Ok(0));
        assert_eq!(policy.capacity_for(0, 1), Ok(16));
        assert_eq!(policy.capacity_for(0, 17), Ok(32));
        assert_eq!(policy.capacity_for(16, 100), Ok(128));
        assert_eq!(policy.capacity_for(40, 10), Ok(40));
    }

    #[test]
    fn overflow_is_reported() {
        let policy = GrowthPolicy::default();
        assert_eq!(
            policy.next_capacity(usize::MAX / 2 + 1),
            Err(AllocError::CapacityOverflow)
        );
        assert_eq!(
            policy.capacity_for(1, usize::MAX),
            Err(AllocError::CapacityOverflow)
        );
    }

    #[test]
    fn custom_policy() {
        let policy = GrowthPolicy::new(4, 3);
        assert_eq!(policy.default_capacity(), 4);
        assert_eq!(policy.growth_factor(), 3);
        assert_eq!(policy.capacity_for(0, 13), Ok(36));
    }

    #[test]
    #[should_panic]
    fn growth_factor_must_grow() {
        GrowthPolicy::new(4, 1);
    }
}
