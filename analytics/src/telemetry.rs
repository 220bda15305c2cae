//! Tracing setup for hosts embedding the analytics engine
//!
//! The engine only emits events. Installing a subscriber is up to the host:
//! native hosts call [`init_tracing`], hosts without stdout or a system clock
//! (the browser) pass their own writer to [`init_tracing_with_writer`].

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "analytics=info";

/// Install a global tracing subscriber writing to stdout.
///
/// `RUST_LOG` wins over `default_filter`. Calling this more than once is a
/// no-op; returns `false` when a subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

/// Install a global tracing subscriber writing plain lines, without
/// timestamps or colors, to `writer`.
pub fn init_tracing_with_writer<W>(default_filter: &str, writer: W) -> bool
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .without_time(),
        )
        .try_init()
        .is_ok()
}
