#![allow(dead_code, unused_imports)]

pub use mash_test_utils::builders;
pub use mash_test_utils::fake_minifier::FakeMinifier;
pub use mash_test_utils::{init_tracing, with_timeout};
