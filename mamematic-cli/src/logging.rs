//! Logger setup: timestamped lines on stderr, mirrored to a log file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::Target;
use env_logger::fmt::Formatter;
use log::{Level, LevelFilter, Record};

/// Log file name, relative to the directory the program starts in.
pub(crate) const LOG_FILE: &str = "mamematic.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Install the global logger. `RUST_LOG` overrides `level` when set.
///
/// If the log file cannot be opened, logging continues on stderr only.
pub(crate) fn init(level: LevelFilter, log_file: &Path) {
    let target = match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => Target::Pipe(Box::new(Tee { file })),
        Err(e) => {
            eprintln!("Cannot open log file {}: {e}", log_file.display());
            Target::Stderr
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(format_record)
        .target(target)
        .init();
}

fn format_record(buf: &mut Formatter, record: &Record<'_>) -> io::Result<()> {
    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
    let tag = level_tag(record.level());
    if record.level() > Level::Info {
        writeln!(
            buf,
            "{timestamp} {tag} ({}:{}) {}",
            record.module_path().unwrap_or("?"),
            record.line().unwrap_or(0),
            record.args()
        )
    } else {
        writeln!(buf, "{timestamp} {tag} {}", record.args())
    }
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "[E]",
        Level::Warn => "[W]",
        Level::Info => "[I]",
        Level::Debug => "[D]",
        Level::Trace => "[T]",
    }
}

/// Writes every record to stderr and the log file.
struct Tee<W: Write = File> {
    file: W,
}

impl<W: Write> Write for Tee<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}
