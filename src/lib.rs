//! Shared helpers for the workspace integration tests.

use std::path::PathBuf;

/// Path of a file under `tests/testdata`.
#[must_use]
pub fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
        .join(name)
}
