use crate::error::PolicyError;

/// Capacity a `GrowVec` allocates when none is given.
pub const DEFAULT_INITIAL_CAPACITY: usize = 10;

/// Multiplier applied to the current capacity when the backing store is full.
pub const DEFAULT_GROWTH_FACTOR: f64 = 1.5;

/// Largest growth factor a `GrowthPolicy` accepts.
pub const MAX_GROWTH_FACTOR: f64 = 4.0;

/// Decides how much storage a `GrowVec` allocates up front and how it grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthPolicy {
    initial_capacity: usize,
    growth_factor: f64,
}

impl GrowthPolicy {
    /// Creates a policy, rejecting growth factors outside `1.0..=MAX_GROWTH_FACTOR`.
    pub fn new(initial_capacity: usize, growth_factor: f64) -> Result<Self, PolicyError> {
        if !(1.0..=MAX_GROWTH_FACTOR).contains(&growth_factor) {
            return Err(PolicyError::InvalidGrowthFactor(growth_factor));
        }
        Ok(Self {
            initial_capacity,
            growth_factor,
        })
    }

    pub fn with_initial_capacity(self, initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..self
        }
    }

    #[inline]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    #[inline]
    pub fn growth_factor(&self) -> f64 {
        self.growth_factor
    }

    /// Returns the capacity to grow to from `cap` so that at least `required` slots exist.
    ///
    /// The scaled capacity is capped at `limit`, the most slots the store can address.
    /// The result is never below `required`, so a factor of 1.0 or an empty store
    /// still makes progress.
    pub fn next_capacity(&self, cap: usize, required: usize, limit: usize) -> usize {
        let scaled = (cap as f64 * self.growth_factor) as usize;
        scaled.min(limit).max(required)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let policy = GrowthPolicy::default();
        assert_eq!(policy.initial_capacity(), 10);
        assert_eq!(policy.growth_factor(), 1.5);
    }

    #[test]
    fn rejects_bad_factors() {
        assert_eq!(
            GrowthPolicy::new(4, 0.9),
            Err(PolicyError::InvalidGrowthFactor(0.9))
        );
        assert!(GrowthPolicy::new(4, f64::NAN).is_err());
        assert!(GrowthPolicy::new(4, f64::INFINITY).is_err());
        assert_eq!(
            GrowthPolicy::new(10, 1e20),
            Err(PolicyError::InvalidGrowthFactor(1e20))
        );
        assert!(GrowthPolicy::new(0, 1.0).is_ok());
        assert!(GrowthPolicy::new(0, MAX_GROWTH_FACTOR).is_ok());
    }

    #[test]
    fn next_capacity() {
        let policy = GrowthPolicy::default();
        assert_eq!(policy.next_capacity(10, 11, usize::MAX), 15);
        assert_eq!(policy.next_capacity(15, 16, usize::MAX), 22);
        // scaled capacity is too small, required wins
        assert_eq!(policy.next_capacity(0, 1, usize::MAX), 1);
        assert_eq!(policy.next_capacity(1, 2, usize::MAX), 2);
        assert_eq!(policy.next_capacity(10, 40, usize::MAX), 40);

        let doubling = GrowthPolicy::new(2, 2.0).unwrap();
        assert_eq!(doubling.next_capacity(8, 9, usize::MAX), 16);

        let flat = GrowthPolicy::new(0, 1.0).unwrap();
        assert_eq!(flat.next_capacity(7, 8, usize::MAX), 8);
    }

    #[test]
    fn next_capacity_respects_limit() {
        let policy = GrowthPolicy::new(0, MAX_GROWTH_FACTOR).unwrap();
        assert_eq!(policy.next_capacity(100, 101, 250), 250);
        let half = usize::MAX / 2;
        assert_eq!(policy.next_capacity(half, half + 1, half + 7), half + 7);
        // required always wins over the limit
        assert_eq!(policy.next_capacity(100, 300, 250), 300);
    }

    #[test]
    fn builder() {
        let policy = GrowthPolicy::default().with_initial_capacity(3);
        assert_eq!(policy.initial_capacity(), 3);
        assert_eq!(policy.growth_factor(), DEFAULT_GROWTH_FACTOR);
    }
}
