use std::sync::Once;
use tinymath::math::Vec3;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

static INIT: Once = Once::new();

/// Send spans and log records to the test output, filtered with `RUST_LOG`.
///
/// Closed spans are printed with their duration, which is how the sampler
/// timings show up.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_span_events(FmtSpan::CLOSE)
            .with_test_writer()
            .try_init();
    });
}

/// Loose comparison for values that went through several transforms
#[track_caller]
pub fn assert_near(actual: Vec3, expected: Vec3, tolerance: f32) {
    let distance = Vec3::distance(actual, expected);
    assert!(
        distance <= tolerance,
        "{actual} is {distance} away from {expected}, more than {tolerance}"
    );
}
