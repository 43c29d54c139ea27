use anyhow::Result;
use chrono::Local;
use std::{
    fmt,
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext, FormattedFields, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

// --- Formatter ---

/// One line per event: `[time] LEVEL target: span{fields}: message fields`.
///
/// Targets lose their `withdrawal_` crate prefix, so a record from
/// `withdrawal_core::calculations::reconciliation` shows as
/// `core::calculations::reconciliation`.
#[derive(Debug, Clone, Copy)]
struct LocalFmt {
    timestamps: bool,
}

const DIM: &str = "2";
const CYAN: &str = "36";

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "1;31",
        Level::WARN => "1;33",
        Level::INFO => "1;32",
        Level::DEBUG => "1;34",
        Level::TRACE => "1;35",
    }
}

fn short_target(target: &str) -> &str {
    target.strip_prefix("withdrawal_").unwrap_or(target)
}

fn paint(
    writer: &mut Writer<'_>,
    color: &str,
    text: impl fmt::Display,
) -> fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "\x1b[{color}m{text}\x1b[0m")
    } else {
        write!(writer, "{text}")
    }
}

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        if self.timestamps {
            paint(&mut writer, DIM, Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))?;
            write!(writer, " ")?;
        }
        paint(
            &mut writer,
            level_color(meta.level()),
            format_args!("{:>5}", meta.level()),
        )?;
        write!(writer, " ")?;
        paint(&mut writer, CYAN, short_target(meta.target()))?;
        write!(writer, ": ")?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}", span.name())?;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{fields}}}")?;
                    }
                }
                write!(writer, ": ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Late-bound file writer ---

/// A MakeWriter that can be pointed at a file after initialization.
/// While no file is set, all writes are silently discarded.
#[derive(Clone)]
struct FileSlot(Arc<Mutex<Option<File>>>);

struct SlotWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for SlotWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match &mut *self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter(self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

static FILE_SLOT: OnceLock<Arc<Mutex<Option<File>>>> = OnceLock::new();

fn make_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

// --- Public API ---

/// Initializes logging. Call once at startup.
///
/// - Stderr: no timestamps; colored when attached to a terminal, plain when
///   piped, so that results on stdout stay machine-readable.
/// - File: timestamped, inactive until [`enable_file_logging`] is called.
/// - Level: `default_level`, or overridden by the RUST_LOG env var.
pub fn init_logging(default_level: &str) {
    let file_inner: Arc<Mutex<Option<File>>> = Arc::new(Mutex::new(None));
    let _ = FILE_SLOT.set(file_inner.clone());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt { timestamps: false })
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt { timestamps: true })
        .with_ansi(false)
        .with_writer(FileSlot(file_inner));

    let _ = tracing_subscriber::registry()
        .with(make_filter(default_level))
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}

/// Starts appending log output to `path`. If a file is already open it is
/// replaced. The directory must already exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("cannot open log file '{}': {e}", path.display()))?;

    match FILE_SLOT.get() {
        Some(slot) => {
            *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(file);
            Ok(())
        }
        None => anyhow::bail!("logging not yet initialized"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing::{info, info_span, warn};

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(emit: impl FnOnce()) -> String {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .event_format(LocalFmt { timestamps: false })
                .with_ansi(false)
                .with_writer(move || writer.clone()),
        );

        tracing::subscriber::with_default(subscriber, emit);
        sink.text()
    }

    #[test]
    fn short_target_strips_crate_prefix() {
        assert_eq!(
            short_target("withdrawal_core::calculations::reconciliation"),
            "core::calculations::reconciliation"
        );
        assert_eq!(short_target("csv::reader"), "csv::reader");
    }

    #[test]
    fn formats_level_target_and_fields() {
        let text = capture(|| {
            warn!(target: "withdrawal_core::calculations::common", amount = -5, "clamped");
        });

        assert!(text.starts_with(" WARN core::calculations::common: "));
        assert!(text.contains("clamped"));
        assert!(text.contains("amount=-5"));
        assert!(text.ends_with('\n'));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn includes_span_scope() {
        let text = capture(|| {
            let _span = info_span!("residency", index = 2).entered();
            info!(target: "withdrawal_cli", "computed");
        });

        assert!(text.starts_with(" INFO cli: residency{index=2}: "));
        assert!(text.contains("computed"));
    }
}
