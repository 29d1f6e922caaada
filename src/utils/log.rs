use std::fs::File;
use std::io::stderr;
use std::path::PathBuf;
use std::sync::{LazyLock, Mutex};

use chrono::Local;
use miette::{Context, IntoDiagnostic};
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

use crate::board::zobrist::ZOBRIST;

const LOG_DIR: &str = "/tmp/coup_logs";

/// Type-erased reload handle. The concrete handle type is generic over
/// the whole subscriber stack, which callers should not have to name.
trait Reloadable: Send + Sync {
    fn swap(&self, filter: EnvFilter) -> miette::Result<()>;
}

impl<S> Reloadable for reload::Handle<EnvFilter, S>
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    fn swap(&self, filter: EnvFilter) -> miette::Result<()> {
        self.modify(|f| *f = filter).into_diagnostic()
    }
}

struct Filters {
    console: Box<dyn Reloadable>,
    file: Box<dyn Reloadable>,
}

static FILTERS: LazyLock<Mutex<Filters>> = LazyLock::new(|| {
    #[cfg(feature = "dev-tools")]
    color_backtrace::install();

    let (console_filter, console) = reload::Layer::new(
        EnvFilter::builder()
            .with_default_directive(Level::INFO.into())
            .from_env_lossy(),
    );
    // The file layer starts silent until toggled on.
    let (file_filter, file) = reload::Layer::new(
        EnvFilter::builder()
            .with_default_directive(LevelFilter::OFF.into())
            .from_env_lossy(),
    );

    let (writer, guard) = non_blocking(open_log_file());
    std::mem::forget(guard); // Keep the writer thread alive.

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .without_time()
                .with_writer(stderr)
                .with_filter(console_filter),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(file_filter),
        )
        .init();

    Mutex::new(Filters {
        console: Box::new(console),
        file: Box::new(file),
    })
});

fn open_log_file() -> File {
    let dir = PathBuf::from(LOG_DIR);
    if !dir.exists() {
        std::fs::create_dir_all(&dir).expect("failed to create log directory");
    }

    let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = dir.join(format!("coup_{stamp}.log"));
    File::create(&path).unwrap_or_else(|_| panic!("failed to create log file {}", path.display()))
}

/// Swaps the console filter for one at `level`.
pub fn set_log_level(level: Level) -> miette::Result<()> {
    FILTERS
        .lock()
        .unwrap()
        .console
        .swap(EnvFilter::new(level.to_string()))
        .with_context(|| format!("Changing console log level to {level}"))
}

/// Turns the file layer on (at debug) or back off.
pub fn toggle_file_logging(enable: bool) -> miette::Result<()> {
    let filter = if enable {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("off")
    };

    FILTERS
        .lock()
        .unwrap()
        .file
        .swap(filter)
        .context("Toggling the file log layer")
}

/// Initialize tracing, backtraces, and the zobrist keys.
pub fn init() {
    LazyLock::force(&FILTERS);
    LazyLock::force(&ZOBRIST);
}
