//! Logging and metrics setup
//!
//! Counters recorded by the services are exported in Prometheus text
//! format at `/metrics`.

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const ENTRIES_SAVED: &str = "weight_entries_saved_total";
pub const ENTRIES_DELETED: &str = "weight_entries_deleted_total";
pub const PROFILES_SAVED: &str = "profiles_saved_total";
pub const AVATARS_UPLOADED: &str = "avatars_uploaded_total";
pub const USERS_CREATED: &str = "users_created_total";

/// Initialize tracing/logging
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(production: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if production {
            "weight_tracker_backend=info,tower_http=info".into()
        } else {
            "weight_tracker_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if production {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Install the global Prometheus recorder
pub fn install_metrics_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

/// A handle backed by a recorder that is not installed globally
///
/// Renders an empty exposition; used where several states coexist.
pub fn detached_metrics_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
