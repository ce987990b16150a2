use std::{
    collections::VecDeque,
    fmt::Write as _,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};

use tracing::Subscriber;
use tracing_subscriber::Layer;

const MAX_LOG_ENTRIES: usize = 1000;

#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Time since the buffer was created, i.e. since startup.
    pub elapsed: Duration,
    pub level: tracing::Level,
    /// Module path with the `songrank_` crate prefix dropped.
    pub target: String,
    /// The message, followed by any other fields as `key=value`.
    pub message: String,
}

/// The last [`MAX_LOG_ENTRIES`] log lines, for the logs panel. Stdout
/// belongs to the terminal, so this is where a running session's log goes.
#[derive(Clone)]
pub struct LogBuffer {
    started: Instant,
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}
impl Default for LogBuffer {
    fn default() -> Self {
        Self {
            started: Instant::now(),
            entries: Arc::default(),
        }
    }
}
impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, entry: LogEntry) {
        let mut entries = self.lock();
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn get_entries(&self) -> Vec<LogEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Feeds every event that passes the subscriber's filter into a
/// [`LogBuffer`].
pub struct LogBufferLayer {
    buffer: LogBuffer,
}
impl LogBufferLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}
impl<S> Layer<S> for LogBufferLayer
where
    S: Subscriber,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();

        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);

        let target = metadata.target();
        self.buffer.push(LogEntry {
            elapsed: self.buffer.started.elapsed(),
            level: *metadata.level(),
            target: target.strip_prefix("songrank_").unwrap_or(target).to_string(),
            message: visitor.finish(),
        });
    }
}

#[derive(Default)]
struct EntryVisitor {
    message: String,
    fields: String,
}
impl EntryVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }
}
impl tracing::field::Visit for EntryVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            if !self.fields.is_empty() {
                self.fields.push(' ');
            }
            let _ = write!(self.fields, "{}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.record_debug(field, &value);
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    fn capture(f: impl FnOnce()) -> LogBuffer {
        let buffer = LogBuffer::new();
        let subscriber = tracing_subscriber::registry().with(LogBufferLayer::new(buffer.clone()));
        tracing::subscriber::with_default(subscriber, f);
        buffer
    }

    #[test]
    fn test_captures_events_and_evicts_oldest() {
        let buffer = capture(|| {
            for i in 0..MAX_LOG_ENTRIES + 5 {
                tracing::info!("entry {i}");
            }
            tracing::warn!("last");
        });

        let entries = buffer.get_entries();
        assert_eq!(entries.len(), MAX_LOG_ENTRIES);
        assert_eq!(entries[0].message, "entry 6");
        let last = entries.last().unwrap();
        assert_eq!(last.message, "last");
        assert_eq!(last.level, tracing::Level::WARN);
    }

    #[test]
    fn test_fields_follow_the_message() {
        let buffer = capture(|| {
            tracing::info!(page = 2, singer = "Mira", "Showing page");
            tracing::debug!(count = 3);
        });

        let entries = buffer.get_entries();
        assert_eq!(entries[0].message, "Showing page page=2 singer=\"Mira\"");
        assert_eq!(entries[1].message, "count=3");
    }

    #[test]
    fn test_crate_prefix_is_dropped() {
        let buffer = capture(|| {
            tracing::info!(target: "songrank_core::logic", "Loaded");
            tracing::info!(target: "reqwest::connect", "Connecting");
        });

        let entries = buffer.get_entries();
        assert_eq!(entries[0].target, "core::logic");
        assert_eq!(entries[1].target, "reqwest::connect");
    }
}
