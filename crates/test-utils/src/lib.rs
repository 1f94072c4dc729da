//! Shared test utilities for the vegrestore workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Region array and FIS response generators
//! - Common test fixtures (sampled regions, polygons, responses)
//! - Approximate float assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, fixtures};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of bounds tuples.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_bounds_approx_eq;
///
/// assert_bounds_approx_eq!((1.0001, 2.0, 3.0, 4.0), (1.0, 2.0, 3.0, 4.0), 0.001);
/// ```
#[macro_export]
macro_rules! assert_bounds_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (lx0, ly0, lx1, ly1) = $left;
        let (rx0, ry0, rx1, ry1) = $right;
        $crate::assert_approx_eq!(lx0, rx0, $epsilon);
        $crate::assert_approx_eq!(ly0, ry0, $epsilon);
        $crate::assert_approx_eq!(lx1, rx1, $epsilon);
        $crate::assert_approx_eq!(ly1, ry1, $epsilon);
    }};
}
