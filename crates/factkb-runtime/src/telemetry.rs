//! Tracing pipeline initialisation for factkb.
//!
//! Call [`init_tracing`] once at process startup.  Library crates only emit
//! through the `tracing` facade (malformed fact lines, load summaries, query
//! dispatch); this is where those events get a destination.
//!
//! # Environment variables
//!
//! | Variable | Effect |
//! |---|---|
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | OTLP collector base URL (e.g. `http://localhost:4318`). When set and non-blank, spans are exported over OTLP/HTTP. |
//! | `RUST_LOG` | Log filter (default `"info"`). |
//! | `FACTKB_LOG_FORMAT=json` | Emit newline-delimited JSON logs. |
//!
//! # Example
//!
//! ```rust,no_run
//! let guard = factkb_runtime::telemetry::init_tracing("factkb");
//! let flusher = guard.flush_handle();
//! // hand `flusher` to a signal handler that may exit before `guard` drops
//! # drop(flusher);
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{trace::SdkTracerProvider, Resource};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable selecting the console log format.
pub const LOG_FORMAT_ENV: &str = "FACTKB_LOG_FORMAT";

/// Environment variable naming the OTLP collector.
pub const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Console output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// Read [`LOG_FORMAT_ENV`].
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }

    /// `json` in any case selects JSON; anything else, or nothing, is compact.
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Initialise the global `tracing` subscriber.
///
/// When an OTLP endpoint is configured an OpenTelemetry layer is added, so
/// the `#[instrument]` span around every [`KnowledgeBase::query`] reaches
/// the collector.
///
/// Hold the returned [`TracerProviderGuard`] for the lifetime of the
/// process; dropping it flushes pending spans.
///
/// [`KnowledgeBase::query`]: crate::KnowledgeBase::query
pub fn init_tracing(service_name: &str) -> TracerProviderGuard {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let provider = otlp_endpoint(std::env::var(OTLP_ENDPOINT_ENV).ok())
        .and_then(|endpoint| build_provider(service_name, endpoint));
    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer("factkb")));
    let (json_layer, compact_layer) = match LogFormat::from_env() {
        LogFormat::Json => (Some(fmt::layer().with_target(true).json()), None),
        LogFormat::Compact => (None, Some(fmt::layer().with_target(true).compact())),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_layer)
        .with(json_layer)
        .with(compact_layer)
        .init();

    TracerProviderGuard(provider)
}

/// Shuts down the OTel [`SdkTracerProvider`] on drop, flushing pending spans.
pub struct TracerProviderGuard(Option<SdkTracerProvider>);

impl TracerProviderGuard {
    /// A cloneable handle that flushes spans without owning the guard.
    pub fn flush_handle(&self) -> SpanFlusher {
        SpanFlusher(self.0.clone())
    }
}

impl Drop for TracerProviderGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.0.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("[factkb] OpenTelemetry provider shutdown error: {e}");
        }
    }
}

/// Flushes pending spans on request.  Needed on paths that leave the
/// process with `std::process::exit`, which skips destructors.
#[derive(Clone, Default)]
pub struct SpanFlusher(Option<SdkTracerProvider>);

impl SpanFlusher {
    /// `true` when an exporter is installed.
    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }

    pub fn flush(&self) {
        if let Some(provider) = &self.0
            && let Err(e) = provider.force_flush()
        {
            eprintln!("[factkb] OpenTelemetry span flush error: {e}");
        }
    }
}

/// A blank endpoint counts as unset.
fn otlp_endpoint(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build an OTLP/HTTP [`SdkTracerProvider`] for `endpoint`.
///
/// Returns `None` when the exporter cannot be built; the error goes to
/// stderr because no subscriber exists yet.
fn build_provider(service_name: &str, endpoint: String) -> Option<SdkTracerProvider> {
    let exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()
    {
        Ok(exporter) => exporter,
        Err(e) => {
            eprintln!("[factkb] OTLP exporter init failed: {e}");
            return None;
        }
    };

    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    Some(
        SdkTracerProvider::builder()
            .with_resource(resource)
            // Queries are synchronous and no async runtime exists.
            .with_simple_exporter(exporter)
            .build(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_defaults_to_compact() {
        assert_eq!(LogFormat::from_value(None), LogFormat::Compact);
        assert_eq!(LogFormat::from_value(Some("pretty")), LogFormat::Compact);
        assert_eq!(LogFormat::from_value(Some("")), LogFormat::Compact);
    }

    #[test]
    fn log_format_json_ignores_case_and_padding() {
        assert_eq!(LogFormat::from_value(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_value(Some(" JSON ")), LogFormat::Json);
    }

    #[test]
    fn blank_endpoint_disables_export() {
        assert_eq!(otlp_endpoint(None), None);
        assert_eq!(otlp_endpoint(Some(String::new())), None);
        assert_eq!(otlp_endpoint(Some("   ".to_string())), None);
        assert_eq!(
            otlp_endpoint(Some(" http://localhost:4318 ".to_string())),
            Some("http://localhost:4318".to_string())
        );
    }

    #[test]
    fn flush_handle_without_exporter_is_inert() {
        let guard = TracerProviderGuard(None);
        let flusher = guard.flush_handle();
        assert!(!flusher.is_active());
        flusher.flush();
        drop(guard);
        flusher.clone().flush();
    }

    #[test]
    fn default_flusher_is_inactive() {
        assert!(!SpanFlusher::default().is_active());
    }
}
