//! Logging setup and scoped silencing of fitting diagnostics.
//!
//! Standard output carries exactly one JSON value, so every subscriber
//! installed here writes to standard error.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global stderr subscriber used by the binaries.
///
/// `RUST_LOG` takes precedence over the `verbose` default.
pub fn init_logger(verbose: bool) {
    let default_filter = if verbose {
        "price_forecast=debug,forecast_math=debug,warn"
    } else {
        "price_forecast=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Run `f` with diagnostics silenced on this thread when `suppress` is set.
///
/// Only events raised inside `f` are dropped; the global subscriber is
/// untouched and sees everything else.
pub fn scoped<T>(suppress: bool, f: impl FnOnce() -> T) -> T {
    if suppress {
        tracing::subscriber::with_default(tracing::subscriber::NoSubscriber::default(), f)
    } else {
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{debug, warn, Event, Subscriber};
    use tracing_subscriber::layer::{Context, Layer};

    struct CountEvents(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for CountEvents {
        fn on_event(&self, _event: &Event<'_>, _ctx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_only_events_inside_suppressed_scope_are_dropped() {
        let seen = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(CountEvents(Arc::clone(&seen)));

        tracing::subscriber::with_default(subscriber, || {
            debug!("before fit");
            scoped(true, || {
                debug!("inside fit");
                warn!("inside fit");
            });
            scoped(false, || debug!("unsuppressed fit"));
            warn!("after fit");
        });

        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_scoped_returns_closure_value() {
        assert_eq!(scoped(true, || 41 + 1), 42);
        assert_eq!(scoped(false, || "kept"), "kept");
    }
}
