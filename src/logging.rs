//! Leveled debug traces emitted while exceptions are built.
//!
//! Records carry a verbosity level: small numbers are summaries, larger
//! numbers are detail. A record is delivered only when its level is at or
//! below the current thread's verbosity (see [`set_verbosity`]).
//!
//! # Sinks
//!
//! Delivery goes to the first sink found in this order:
//!
//! 1. a sink scoped to the current thread with [`with_sink`]
//! 2. the process-wide sink set with [`install_global_sink`]
//! 3. [`TracingSink`], which forwards to the `tracing` crate
//!
//! Emitting never panics and never fails: a poisoned lock is recovered, and a
//! thread whose locals are already torn down falls back to the defaults.
//!
//! # Example
//!
//! ```rust
//! use dynamic_graph_exceptions::{logging, FactoryError, FactoryErrorCode, TraceBuffer};
//! use std::sync::Arc;
//!
//! let buffer = TraceBuffer::new(16, 512);
//! logging::with_sink(Arc::new(buffer.clone()), || {
//!     let _ = FactoryError::new(FactoryErrorCode::ReadFile, "no such script");
//! });
//! assert_eq!(buffer.len(), 2);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Level of the detailed construction record.
pub const TRACE_DETAIL: u8 = 15;

/// Level of the summary construction record.
pub const TRACE_SUMMARY: u8 = 1;

/// Verbosity a thread starts with. Both construction records pass.
pub const DEFAULT_VERBOSITY: u8 = 50;

/// `tracing` target used by [`TracingSink`].
pub const TRACE_TARGET: &str = "dynamic_graph::exception";

// ============================================================================
// Records And Sinks
// ============================================================================

/// One trace record. Borrowed for the duration of a [`TraceSink::record`]
/// call only.
#[derive(Debug, Clone, Copy)]
pub struct TraceRecord<'a> {
    level: u8,
    exception: &'static str,
    code: Option<u16>,
    args: fmt::Arguments<'a>,
}

impl<'a> TraceRecord<'a> {
    /// Build a record.
    #[inline]
    pub const fn new(
        level: u8,
        exception: &'static str,
        code: Option<u16>,
        args: fmt::Arguments<'a>,
    ) -> Self {
        Self {
            level,
            exception,
            code,
            args,
        }
    }

    /// Verbosity level.
    #[inline]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Category name of the exception being built.
    #[inline]
    pub const fn exception(&self) -> &'static str {
        self.exception
    }

    /// Numeric code, when the record is tied to one.
    #[inline]
    pub const fn code(&self) -> Option<u16> {
        self.code
    }

    /// Unrendered message.
    #[inline]
    pub const fn args(&self) -> fmt::Arguments<'a> {
        self.args
    }
}

impl fmt::Display for TraceRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.args, f)
    }
}

/// Destination for trace records.
///
/// Implementations must not panic and must not touch the exception being
/// built; they only see the record.
pub trait TraceSink: Send + Sync {
    /// Consume one record.
    fn record(&self, record: &TraceRecord<'_>);
}

/// Default sink: forwards records to `tracing`.
///
/// Summary records (level 1 and below) become `debug` events, deeper levels
/// become `trace` events. Level, category and code travel as fields so a
/// subscriber can filter on them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&self, record: &TraceRecord<'_>) {
        if record.level <= TRACE_SUMMARY {
            tracing::debug!(
                target: TRACE_TARGET,
                verbosity = record.level,
                exception = record.exception,
                code = ?record.code,
                "{}",
                record.args
            );
        } else {
            tracing::trace!(
                target: TRACE_TARGET,
                verbosity = record.level,
                exception = record.exception,
                code = ?record.code,
                "{}",
                record.args
            );
        }
    }
}

static DEFAULT_SINK: TracingSink = TracingSink;

// ============================================================================
// Sink Registry
// ============================================================================

static GLOBAL_SINK: RwLock<Option<Arc<dyn TraceSink>>> = RwLock::new(None);

// Per-thread settings. Each thread starts at the default verbosity with no
// scoped sink.
thread_local! {
    static VERBOSITY: Cell<u8> = const { Cell::new(DEFAULT_VERBOSITY) };
    static SCOPED_SINK: RefCell<Option<Arc<dyn TraceSink>>> = const { RefCell::new(None) };
}

#[inline]
fn read_global() -> RwLockReadGuard<'static, Option<Arc<dyn TraceSink>>> {
    match GLOBAL_SINK.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[inline]
fn write_global() -> RwLockWriteGuard<'static, Option<Arc<dyn TraceSink>>> {
    match GLOBAL_SINK.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Replace the process-wide sink, returning the previous one.
pub fn install_global_sink(sink: Arc<dyn TraceSink>) -> Option<Arc<dyn TraceSink>> {
    write_global().replace(sink)
}

/// Remove the process-wide sink, reverting to [`TracingSink`].
pub fn clear_global_sink() -> Option<Arc<dyn TraceSink>> {
    write_global().take()
}

/// Route this thread's records to `sink` while `f` runs.
///
/// Scopes nest; the previous sink is restored when `f` returns or unwinds.
pub fn with_sink<R>(sink: Arc<dyn TraceSink>, f: impl FnOnce() -> R) -> R {
    struct Restore(Option<Arc<dyn TraceSink>>);

    impl Drop for Restore {
        fn drop(&mut self) {
            let previous = self.0.take();
            let _ = SCOPED_SINK.try_with(|slot| {
                if let Ok(mut slot) = slot.try_borrow_mut() {
                    *slot = previous;
                }
            });
        }
    }

    let previous = SCOPED_SINK
        .try_with(|slot| match slot.try_borrow_mut() {
            Ok(mut slot) => slot.replace(sink),
            Err(_) => None,
        })
        .unwrap_or(None);
    let _restore = Restore(previous);
    f()
}

#[inline]
fn current_sink() -> Option<Arc<dyn TraceSink>> {
    let scoped = SCOPED_SINK
        .try_with(|slot| slot.try_borrow().ok().and_then(|s| s.clone()))
        .ok()
        .flatten();
    scoped.or_else(|| read_global().clone())
}

// ============================================================================
// Verbosity
// ============================================================================

/// Set this thread's verbosity. Records above `level` are dropped.
#[inline]
pub fn set_verbosity(level: u8) {
    let _ = VERBOSITY.try_with(|v| v.set(level));
}

/// Get this thread's verbosity.
#[inline]
pub fn verbosity() -> u8 {
    VERBOSITY.try_with(Cell::get).unwrap_or(DEFAULT_VERBOSITY)
}

/// Restore this thread's verbosity to [`DEFAULT_VERBOSITY`].
#[inline]
pub fn reset_verbosity() {
    set_verbosity(DEFAULT_VERBOSITY);
}

/// Check whether a record at `level` would be delivered on this thread.
#[inline]
pub fn enabled(level: u8) -> bool {
    level <= verbosity()
}

// ============================================================================
// Emission
// ============================================================================

/// Deliver one record if `level` passes the verbosity gate.
///
/// `args` is only rendered by the sink, so gated-out records cost nothing
/// beyond the check.
pub fn emit(level: u8, exception: &'static str, code: Option<u16>, args: fmt::Arguments<'_>) {
    if !enabled(level) {
        return;
    }

    let record = TraceRecord::new(level, exception, code, args);
    match current_sink() {
        Some(sink) => sink.record(&record),
        None => DEFAULT_SINK.record(&record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring_buffer::TraceBuffer;
    use std::panic;
    use std::thread;

    #[test]
    fn verbosity_gates_records() {
        let buffer = TraceBuffer::new(8, 256);
        with_sink(Arc::new(buffer.clone()), || {
            set_verbosity(10);
            emit(TRACE_DETAIL, "Sample", None, format_args!("detail"));
            emit(TRACE_SUMMARY, "Sample", None, format_args!("summary"));
            reset_verbosity();
        });

        let entries = buffer.get_all();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text.as_ref(), "summary");
    }

    #[test]
    fn verbosity_zero_silences_everything() {
        let buffer = TraceBuffer::new(8, 256);
        with_sink(Arc::new(buffer.clone()), || {
            set_verbosity(0);
            emit(TRACE_SUMMARY, "Sample", None, format_args!("summary"));
            reset_verbosity();
        });
        assert!(buffer.is_empty());
    }

    #[test]
    fn verbosity_is_per_thread() {
        set_verbosity(3);
        let other = thread::spawn(verbosity).join().expect("thread panicked");
        assert_eq!(other, DEFAULT_VERBOSITY);
        assert_eq!(verbosity(), 3);
        reset_verbosity();
    }

    #[test]
    fn scoped_sinks_nest() {
        let outer = TraceBuffer::new(8, 256);
        let inner = TraceBuffer::new(8, 256);

        with_sink(Arc::new(outer.clone()), || {
            emit(TRACE_SUMMARY, "Sample", None, format_args!("before"));
            with_sink(Arc::new(inner.clone()), || {
                emit(TRACE_SUMMARY, "Sample", None, format_args!("inside"));
            });
            emit(TRACE_SUMMARY, "Sample", None, format_args!("after"));
        });

        assert_eq!(outer.len(), 2);
        assert_eq!(inner.len(), 1);
        assert_eq!(inner.get_all()[0].text.as_ref(), "inside");
    }

    #[test]
    fn scoped_sink_restored_after_unwind() {
        let outer = TraceBuffer::new(8, 256);
        let inner = TraceBuffer::new(8, 256);

        with_sink(Arc::new(outer.clone()), || {
            let inner_sink: Arc<dyn TraceSink> = Arc::new(inner.clone());
            let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
                with_sink(inner_sink, || panic!("boom"));
            }));
            assert!(result.is_err());
            emit(TRACE_SUMMARY, "Sample", None, format_args!("after"));
        });

        assert_eq!(outer.len(), 1);
        assert!(inner.is_empty());
    }

    #[test]
    fn global_sink_receives_unscoped_records() {
        let buffer = TraceBuffer::new(64, 256);
        let previous = install_global_sink(Arc::new(buffer.clone()));

        // Other tests may emit concurrently; look only for our own record.
        thread::spawn(|| emit(TRACE_SUMMARY, "Sample", Some(7), format_args!("global-marker")))
            .join()
            .expect("thread panicked");

        match previous {
            Some(sink) => {
                install_global_sink(sink);
            }
            None => {
                clear_global_sink();
            }
        }

        let ours = buffer.get_filtered(|e| e.text.as_ref() == "global-marker");
        assert_eq!(ours.len(), 1);
        assert_eq!(ours[0].code, Some(7));
    }

    #[test]
    fn default_sink_does_not_panic_without_subscriber() {
        emit(TRACE_SUMMARY, "Sample", Some(400), format_args!("to tracing"));
        emit(TRACE_DETAIL, "Sample", None, format_args!("to tracing"));
    }

    mod capture {
        use std::fmt;
        use std::sync::{Arc, Mutex};
        use tracing::field::{Field, Visit};
        use tracing::span::{Attributes, Id, Record};
        use tracing::{Event, Level, Metadata, Subscriber};

        #[derive(Debug, Clone, PartialEq)]
        pub struct Captured {
            pub level: Level,
            pub target: String,
            pub code: Option<String>,
            pub exception: Option<String>,
        }

        #[derive(Clone, Default)]
        pub struct Capture {
            pub events: Arc<Mutex<Vec<Captured>>>,
        }

        struct Fields<'a>(&'a mut Captured);

        impl Visit for Fields<'_> {
            fn record_str(&mut self, field: &Field, value: &str) {
                if field.name() == "exception" {
                    self.0.exception = Some(value.to_string());
                }
            }

            fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
                match field.name() {
                    "code" => self.0.code = Some(format!("{:?}", value)),
                    "exception" => self.0.exception = Some(format!("{:?}", value)),
                    _ => {}
                }
            }
        }

        impl Subscriber for Capture {
            fn enabled(&self, _: &Metadata<'_>) -> bool {
                true
            }

            fn new_span(&self, _: &Attributes<'_>) -> Id {
                Id::from_u64(1)
            }

            fn record(&self, _: &Id, _: &Record<'_>) {}

            fn record_follows_from(&self, _: &Id, _: &Id) {}

            fn event(&self, event: &Event<'_>) {
                let metadata = event.metadata();
                let mut captured = Captured {
                    level: *metadata.level(),
                    target: metadata.target().to_string(),
                    code: None,
                    exception: None,
                };
                event.record(&mut Fields(&mut captured));
                if let Ok(mut events) = self.events.lock() {
                    events.push(captured);
                }
            }

            fn enter(&self, _: &Id) {}

            fn exit(&self, _: &Id) {}
        }
    }

    #[test]
    fn default_sink_maps_levels_onto_tracing() {
        use crate::{FactoryErrorCode, factory_err};

        let subscriber = capture::Capture::default();
        let events = Arc::clone(&subscriber.events);

        // Scoped, so a global sink installed by another test is bypassed.
        let _ = tracing::subscriber::with_default(subscriber, || {
            with_sink(Arc::new(TracingSink), || {
                factory_err!(FactoryErrorCode::SyntaxError, "bad param: ", "{}={}", "x", 5)
            })
        });

        let events = events.lock().expect("capture lock poisoned");
        let levels: Vec<_> = events.iter().map(|e| e.level).collect();
        assert_eq!(levels, [tracing::Level::TRACE, tracing::Level::DEBUG]);
        assert!(events.iter().all(|e| e.target == TRACE_TARGET));
        assert!(events.iter().all(|e| e.exception.as_deref() == Some("Factory")));
        assert!(events.iter().all(|e| e.code.as_deref() == Some("Some(408)")));
    }

    #[test]
    fn record_displays_its_arguments() {
        fn check(record: &TraceRecord<'_>) {
            assert_eq!(record.to_string(), "#401");
            assert_eq!(record.level(), 1);
            assert_eq!(record.exception(), "Factory");
            assert_eq!(record.code(), Some(401));
        }

        let code = 401;
        check(&TraceRecord::new(1, "Factory", Some(code), format_args!("#{}", code)));
    }
}
