use anyhow::Result;
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    Layer, // for .with_filter() on the console layer
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

// --- Formatter ---

/// `HH:MM:SS.mmm LEVEL file:line message fields`, local time.
/// Levels and locations are coloured when the writer supports ANSI.
struct ShellFormat;

fn level_colour(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[1;32m",
        Level::DEBUG => "\x1b[1;34m",
        Level::TRACE => "\x1b[1;35m",
    }
}

/// Drops the crate-relative `src/` prefix; other workspace crates keep theirs.
fn short_location(file: &str) -> &str {
    file.strip_prefix("src/")
        .or_else(|| file.strip_prefix("src\\"))
        .unwrap_or(file)
}

impl<S, N> FormatEvent<S, N> for ShellFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        const RESET: &str = "\x1b[0m";
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();
        let time = Local::now().format("%H:%M:%S%.3f");
        let location = meta
            .file()
            .zip(meta.line())
            .map(|(file, line)| format!("{}:{line}", short_location(file)));

        if ansi {
            let colour = level_colour(meta.level());
            write!(writer, "\x1b[2m{time}{RESET} {colour}{:>5}{RESET} ", meta.level())?;
            if let Some(location) = location {
                write!(writer, "\x1b[36m{location}{RESET} ")?;
            }
        } else {
            write!(writer, "{time} {:>5} ", meta.level())?;
            if let Some(location) = location {
                write!(writer, "{location} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Late-bound file writer ---

type SharedFile = Arc<Mutex<Option<File>>>;

/// Log destination that can be pointed at a file once the subscriber is
/// installed. Records are dropped while it is empty.
#[derive(Clone, Default)]
struct FileSlot(SharedFile);

impl FileSlot {
    /// A panic while logging must not silence every later record.
    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(
        &self,
        file: Option<File>,
    ) {
        *self.lock() = file;
    }
}

struct SlotWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for SlotWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        self.0.as_mut().map_or(Ok(buf.len()), |file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.as_mut().map_or(Ok(()), |file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter(self.lock())
    }
}

// --- Runtime handles ---

type Reload = Box<dyn Fn(EnvFilter) -> Result<()> + Send + Sync>;

/// Everything the shell can change after start-up.
struct LogHandles {
    level: Reload,
    console: Reload,
    file: FileSlot,
}

static HANDLES: OnceLock<LogHandles> = OnceLock::new();

fn handles() -> Result<&'static LogHandles> {
    HANDLES
        .get()
        .ok_or_else(|| anyhow::anyhow!("logging not yet initialized"))
}

fn boxed_reload<S>(
    handle: reload::Handle<EnvFilter, S>,
    what: &'static str,
) -> Reload
where
    S: Subscriber + Send + Sync + 'static,
{
    Box::new(move |filter| {
        handle
            .reload(filter)
            .map_err(|e| anyhow::anyhow!("{what} reload failed: {e}"))
    })
}

// --- Public API ---

/// Changes the active log filter at runtime.
/// Accepts a bare level ("error", "warn", "info", "debug", "trace")
/// or any full EnvFilter directive.
pub fn set_log_level(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .map_err(|e| anyhow::anyhow!("invalid log level '{directive}': {e}"))?;
    (handles()?.level)(filter)
}

/// Shows or hides log output on stderr without affecting file logging.
/// The global level still applies when shown.
pub fn set_console_enabled(enabled: bool) -> Result<()> {
    let filter = EnvFilter::new(if enabled { "trace" } else { "off" });
    (handles()?.console)(filter)
}

/// Starts appending log output to `path`, replacing any open log file.
/// The directory must already exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let handles = handles()?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("cannot open log file '{}': {e}", path.display()))?;
    handles.file.replace(Some(file));
    Ok(())
}

/// Closes the current log file. Later records go to stderr only.
pub fn disable_file_logging() {
    if let Some(handles) = HANDLES.get() {
        handles.file.replace(None);
    }
}

/// Installs the global subscriber. Later calls are ignored.
///
/// Screens go to stdout, so console logging uses stderr, coloured on a
/// terminal. `RUST_LOG` wins over `default_level`. The file layer stays
/// silent until [`enable_file_logging`] is called.
pub fn init_logging(default_level: &str) {
    let level = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let (level_filter, level_handle) = reload::Layer::new(level);
    let (console_gate, console_handle) = reload::Layer::new(EnvFilter::new("trace"));
    let file = FileSlot::default();

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(ShellFormat)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(console_gate);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(ShellFormat)
        .with_ansi(false)
        .with_writer(file.clone());

    let installed = tracing_subscriber::registry()
        .with(level_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if installed {
        let _ = HANDLES.set(LogHandles {
            level: boxed_reload(level_handle, "level filter"),
            console: boxed_reload(console_handle, "console gate"),
            file,
        });
    }
}
