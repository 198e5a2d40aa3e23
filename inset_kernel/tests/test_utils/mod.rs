#![allow(dead_code)]

mod shape_test_properties;
mod shapes;

pub use shape_test_properties::*;
pub use shapes::*;

/// Route `log` output through the test harness, safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
