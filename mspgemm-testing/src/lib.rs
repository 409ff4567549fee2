//! Internal testing utilities for the mspgemm crates.

use std::fmt::Debug;
use std::panic::RefUnwindSafe;

pub mod fixtures;

/// Utility for creating parametrized (aka. table-driven) tests.
///
/// Create a struct, conventionally named `Case`, holding the data for one
/// test case, build a collection of cases and call `test_each` with the test
/// function. All cases are run even if some of them panic. If any case
/// fails, `test_each` panics with the count and debug representations of the
/// failing cases.
///
/// ```
/// use mspgemm_testing::TestCases;
///
/// #[derive(Debug)]
/// struct Case {
///     rows: usize,
///     workers: usize,
/// }
///
/// let cases = [
///     Case { rows: 10, workers: 3 },
///     Case { rows: 2, workers: 4 },
/// ];
///
/// cases.test_each(|&Case { rows, workers }| {
///     assert!(rows.div_ceil(workers) * workers >= rows);
/// });
/// ```
///
/// Cases and any values captured by the test closure must be
/// [unwind safe](https://doc.rust-lang.org/std/panic/fn.catch_unwind.html).
/// Values created inside the test closure have no such restriction.
pub trait TestCases {
    /// The data for a single test case.
    type Case;

    /// Call `test` with a reference to each case, catching any panics.
    fn test_each(self, test: impl Fn(&Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe;
}

impl<I: IntoIterator> TestCases for I {
    type Case = I::Item;

    fn test_each(self, test: impl Fn(&I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe,
    {
        let failures: Vec<_> = self
            .into_iter()
            .filter(|case| std::panic::catch_unwind(|| test(case)).is_err())
            .collect();
        assert_eq!(
            failures.len(),
            0,
            "{} test cases failed: {:?}",
            failures.len(),
            failures
        );
    }
}
