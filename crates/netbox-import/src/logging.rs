//! Tracing setup and in-memory log capture.
//!
//! [`init`] installs the process-wide fmt subscriber used by the CLI.
//! [`CaptureLayer`] records events into a shared buffer; [`capture`] runs a
//! closure under a subscriber made of that layer alone, which is how tests
//! assert on warning counts.

use std::fmt::Write as FmtWrite;
use std::sync::{Arc, Mutex};

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use crate::error::{ImportError, Result};

/// Parse a verbosity name. Unknown names fall back to `info`.
pub fn parse_level(verbosity: &str) -> Level {
    match verbosity.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global subscriber. `format` is `text` or `json`; logs go to
/// stderr so stdout stays free for `--output-json`.
pub fn init(verbosity: &str, format: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(parse_level(verbosity))
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = match format {
        "json" => subscriber.json().try_init(),
        "text" => subscriber.try_init(),
        other => {
            return Err(ImportError::Config(format!(
                "log format must be 'text' or 'json', got '{}'",
                other
            )))
        }
    };

    installed.map_err(|e| ImportError::Config(format!("Failed to initialize logging: {}", e)))
}

/// One captured log event.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedEvent {
    /// Event severity.
    pub level: Level,
    /// The formatted message.
    pub message: String,
    /// Structured fields other than the message, as `name=value`.
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    /// Value of a structured field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A tracing layer that appends every event to a shared buffer.
#[derive(Debug, Clone, Default)]
pub struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureLayer {
    /// Create a capture layer with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events captured so far.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        };

        // A poisoned buffer only loses log lines.
        if let Ok(mut events) = self.events.lock() {
            events.push(captured);
        }
    }
}

/// Run `f` with a capturing subscriber installed on this thread and return
/// the captured events alongside its result.
pub fn capture<F, R>(f: F) -> (Vec<CapturedEvent>, R)
where
    F: FnOnce() -> R,
{
    let layer = CaptureLayer::new();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (layer.events(), result)
}

/// Visitor splitting an event into its message and its other fields.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }
}
