//! Opt-in log output for hosts embedding `graph-rs`.
//!
//! The crate never installs a subscriber on its own. Every event goes
//! through the `tracing` macros under the `graph_rs` target:
//!
//! | level   | events |
//! |---------|--------|
//! | `warn`  | `formula failed` (no error sink attached), `render failed`, non-proportional grid range |
//! | `debug` | `draw graphs`, `add graphs`, `resampled all curves`, `zoom applied`, `zoom rejected`, `resize` |
//! | `trace` | `series sampled`, `pan start`, `pan`, `hover hit`, `edge extension stopped` |
//!
//! `formula failed` carries `formula` and `message` fields, so a host that
//! relies on the log instead of an `ErrorSink` can still tell curves apart.

/// Filter used when `RUST_LOG` is unset: warnings and session lifecycle.
pub const DEFAULT_FILTER: &str = "graph_rs=info";

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to [`DEFAULT_FILTER`].
///
/// Returns `false` without the `telemetry` feature, or when the host already
/// set a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_FILTER, init_default_tracing};

    #[test]
    fn default_filter_targets_this_crate() {
        let target = DEFAULT_FILTER.split('=').next().expect("filter target");
        assert!(module_path!().starts_with(target));
    }

    #[cfg(not(feature = "telemetry"))]
    #[test]
    fn init_is_a_no_op_without_the_feature() {
        assert!(!init_default_tracing());
    }

    #[cfg(feature = "telemetry")]
    #[test]
    fn second_init_reports_an_existing_subscriber() {
        let _ = init_default_tracing();
        assert!(!init_default_tracing());
    }
}
