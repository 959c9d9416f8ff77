use std::panic::{catch_unwind, AssertUnwindSafe};

/// Reports crawl milestones to a caller-supplied callback
///
/// The callback gets a status message and a fraction in `[0, 1]`. A panic
/// inside the callback is caught and logged; it never reaches the crawl.
pub struct Progress<P> {
    callback: P,
}

impl<P> Progress<P>
where
    P: Fn(&str, f64),
{
    pub fn new(callback: P) -> Self {
        Self { callback }
    }

    pub fn report(&self, message: &str, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        tracing::debug!("progress {:.0}%: {}", fraction * 100.0, message);

        let outcome = catch_unwind(AssertUnwindSafe(|| (self.callback)(message, fraction)));
        if outcome.is_err() {
            tracing::warn!("Progress callback panicked at '{}'", message);
        }
    }
}
