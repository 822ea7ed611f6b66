//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL container with migrations applied (feature: "postgres")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let title = builder.title("main");
//!     let date = builder.date(0);
//! }
//! ```

use chrono::{Days, NaiveDate};

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded random data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_task");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Unique task title for this test
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.title("main"), "test-task-7-main");
    /// ```
    pub fn title(&self, suffix: &str) -> String {
        format!("test-task-{}-{}", self.seed, suffix)
    }

    /// `YYYYMMDD` date derived from the seed, shifted by `offset_days`
    ///
    /// Dates fall in 2024-2025 so ordering assertions stay readable.
    pub fn date(&self, offset_days: u64) -> String {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid base date");
        let day = base
            .checked_add_days(Days::new(self.seed % 365 + offset_days))
            .expect("date in range");
        day.format("%Y%m%d").to_string()
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that `dates` (as `YYYYMMDD`) are in ascending order
    pub fn assert_ascending(dates: &[String], context: &str) {
        assert!(
            dates.windows(2).all(|w| w[0] <= w[1]),
            "{}: dates not ascending: {:?}",
            context,
            dates
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.title("a"), builder2.title("a"));
        assert_eq!(builder1.date(3), builder2.date(3));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.title("a"), builder2.title("a"));
    }

    #[test]
    fn test_dates_are_eight_digits_and_ordered_by_offset() {
        let builder = TestDataBuilder::new(364);
        let first = builder.date(0);
        let later = builder.date(40);

        assert_eq!(first.len(), 8);
        assert!(first.bytes().all(|b| b.is_ascii_digit()));
        assert!(first < later);
    }
}
