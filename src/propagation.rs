//! W3C Trace Context propagation across the hop boundary
//!
//! The gateway injects `traceparent` into its call to the orchestrator and
//! the orchestrator parents its request span on it, so both hops end up in
//! one trace. The propagator is owned by each service's state rather than
//! registered globally.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::propagation::{Extractor, Injector, TextMapPropagator};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// W3C Trace Context header name
pub const TRACEPARENT: &str = "traceparent";

/// Adapter for extracting W3C Trace Context from HTTP headers
struct HeadersExtractor<'a>(&'a HeaderMap);

impl Extractor for HeadersExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

/// Adapter for injecting W3C Trace Context into HTTP headers
struct HeadersInjector<'a>(&'a mut HeaderMap);

impl Injector for HeadersInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let (Ok(name), Ok(val)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            self.0.insert(name, val);
        }
    }
}

/// Trace context propagation handle shared by a service's handlers
#[derive(Debug, Clone, Default)]
pub struct TracePropagation {
    propagator: TraceContextPropagator,
}

impl TracePropagation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the context of `span` into outbound request headers.
    /// Nothing is written when no OpenTelemetry layer is installed.
    pub fn inject(&self, span: &Span, headers: &mut HeaderMap) {
        let cx = span.context();
        self.propagator
            .inject_context(&cx, &mut HeadersInjector(headers));
    }

    /// Parent `span` on the trace context carried by inbound headers and
    /// record the inbound trace id in its `trace_id` field
    pub fn set_parent_from_headers(&self, span: &Span, headers: &HeaderMap) {
        let Some(traceparent) = headers.get(TRACEPARENT).and_then(|v| v.to_str().ok()) else {
            return;
        };
        if let Some(trace_id) = parse_trace_id(traceparent) {
            span.record("trace_id", trace_id);
        }
        let parent_cx = self.propagator.extract(&HeadersExtractor(headers));
        let _ = span.set_parent(parent_cx);
    }
}

/// Parse trace ID from a W3C traceparent header (format: "00-{trace_id}-{span_id}-{flags}")
fn parse_trace_id(traceparent: &str) -> Option<&str> {
    let mut parts = traceparent.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("00"), Some(trace_id), Some(_), Some(_)) if trace_id.len() == 32 => Some(trace_id),
        _ => None,
    }
}
