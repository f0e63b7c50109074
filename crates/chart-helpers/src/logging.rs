use std::{
    io::{Sink, sink},
    path::{Path, PathBuf},
};

use snafu::{ResultExt, Snafu};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{
        MakeWriter,
        writer::{EitherWriter, MakeWriterExt as _},
    },
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

const MAX_LOG_FILES: usize = 6;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to initialize rolling file appender in {}", directory.display()))]
    InitRollingFileAppender {
        source: InitError,
        directory: PathBuf,
    },

    #[snafu(display("failed to set the global default subscriber"))]
    SetGlobalDefault { source: TryInitError },
}

/// Initializes `tracing` logging with options from the environment variable
/// given in the `env` parameter.
///
/// Users provide a variable name so it can differ per embedding tool, like
/// `CHART_RENDER_LOG`. If the variable is not set (or invalid), the maximum
/// log level is INFO.
///
/// Log output can be copied to a file by setting `{env}_DIRECTORY` (e.g.
/// `CHART_RENDER_LOG_DIRECTORY`) to a directory path. This file is rotated
/// daily.
///
/// Returns an error if a global subscriber has already been installed.
pub fn initialize_logging(env: &str, app_name: &str) -> Result<()> {
    let filter = EnvFilter::try_from_env(env)
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let file_appender_directory = std::env::var_os(format!("{env}_DIRECTORY")).map(PathBuf::from);
    let file_appender = file_appender(file_appender_directory.as_deref(), app_name)?;

    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stdout.and(file_appender));
    Registry::default()
        .with(filter)
        .with(fmt)
        .try_init()
        .context(SetGlobalDefaultSnafu)?;

    // need to delay logging until after tracing is initialized
    match file_appender_directory {
        Some(dir) => tracing::info!(directory = %dir.display(), "file logging enabled"),
        None => tracing::debug!("file logging disabled, because no log directory set"),
    }

    Ok(())
}

fn file_appender(
    directory: Option<&Path>,
    app_name: &str,
) -> Result<OptionalMakeWriter<RollingFileAppender>> {
    let appender = directory
        .map(|log_dir| {
            RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_suffix(format!("{app_name}.log"))
                .max_log_files(MAX_LOG_FILES)
                .build(log_dir)
                .context(InitRollingFileAppenderSnafu { directory: log_dir })
        })
        .transpose()?;

    Ok(appender.into())
}

/// Like [`EitherWriter`] but implements [`MakeWriter`] instead of [`std::io::Write`].
/// For selecting writers depending on dynamic configuration.
enum EitherMakeWriter<A, B> {
    A(A),
    B(B),
}

impl<'a, A, B> MakeWriter<'a> for EitherMakeWriter<A, B>
where
    A: MakeWriter<'a>,
    B: MakeWriter<'a>,
{
    type Writer = EitherWriter<A::Writer, B::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        match self {
            Self::A(a) => EitherWriter::A(a.make_writer()),
            Self::B(b) => EitherWriter::B(b.make_writer()),
        }
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        match self {
            Self::A(a) => EitherWriter::A(a.make_writer_for(meta)),
            Self::B(b) => EitherWriter::B(b.make_writer_for(meta)),
        }
    }
}

type OptionalMakeWriter<T> = EitherMakeWriter<T, fn() -> Sink>;

impl<T> From<Option<T>> for OptionalMakeWriter<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(t) => Self::A(t),
            None => Self::B(sink),
        }
    }
}
