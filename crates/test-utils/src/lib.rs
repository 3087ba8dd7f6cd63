//! Test support for the moisture case-study workspace.
//!
//! - [`paths`]: the workspace root, temporary directories and lookup of the
//!   optional real case archive
//! - [`generators`]: synthetic axes and moisture fields
//! - [`fixtures`]: synthetic NetCDF steps, the zip archive that bundles them,
//!   the storm track and the storm mask
//!
//! Crates pull it in as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Resolve a real case file through [`find_test_file`], or skip the
/// calling test when it is absent.
///
/// ```ignore
/// #[test]
/// fn test_real_genesis_step() {
///     let archive = require_test_file!("radius.zip");
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: case file '{}' not found. Set TEST_DATA_DIR to run this test.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Assert two floats differ by at most `epsilon`.
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
