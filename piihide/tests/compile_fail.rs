//! Compile-fail tests to ensure proper error messages for incorrect usage.
//!
//! These tests verify that the derive macro produces helpful compiler errors
//! when used incorrectly, such as:
//! - Marking a scalar field with `#[pii]` (scalars carry no text to seal)
//! - Using `#[pii]` on a struct type (should use `#[pii(nested)]` instead)
//! - Using `#[pii(nested)]` on a type that doesn't implement `Traversable`
//!
//! After a compiler upgrade, re-bless the snapshots with
//! `TRYBUILD=overwrite cargo test --test compile_fail`.

#[test]
fn compile_fail_tests() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/compile_fail/*.rs");
}
