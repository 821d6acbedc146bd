//! Locating the machine catalog: a dumped XML file or the emulator itself.

use std::fmt;
use std::io::BufReader;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::DatError;
use crate::listxml::ListXml;

/// Argument that makes the emulator print its machine list as XML.
pub const LISTXML_FLAG: &str = "-listxml";

/// Where a catalog document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Parsed directly from an XML file.
    File,
    /// Parsed from the standard output of `<executable> -listxml`.
    Executable,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Executable => write!(f, "emulator executable"),
        }
    }
}

/// A parsed catalog together with how it was obtained.
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub kind: SourceKind,
    pub document: ListXml,
}

/// Parse `identifier` as an XML file; if its contents are not XML, run it as
/// the emulator with [`LISTXML_FLAG`] and parse its output instead.
///
/// A path that cannot be opened at all is an I/O error, not a fallback case.
pub fn resolve(identifier: &Path) -> Result<ResolvedSource, DatError> {
    match ListXml::from_file(identifier) {
        Ok(document) => Ok(ResolvedSource {
            kind: SourceKind::File,
            document,
        }),
        Err(e) if e.is_parse_failure() => {
            log::debug!(
                "{} is not an XML file ({e}), running it with {LISTXML_FLAG}",
                identifier.display()
            );
            Ok(ResolvedSource {
                kind: SourceKind::Executable,
                document: run_listxml(identifier)?,
            })
        }
        Err(e) => Err(e),
    }
}

/// Run the emulator and stream its stdout through the XML reader.
///
/// The exit status is not inspected; only whether the output parses.
pub fn run_listxml(executable: &Path) -> Result<ListXml, DatError> {
    let identifier = executable.display().to_string();

    let mut child = Command::new(executable)
        .arg(LISTXML_FLAG)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| DatError::source_unreadable(&identifier, e))?;

    let Some(stdout) = child.stdout.take() else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(DatError::source_unreadable(&identifier, "no stdout pipe"));
    };

    let parsed = ListXml::parse(BufReader::new(stdout));
    if parsed.is_err() {
        let _ = child.kill();
    }
    if let Err(e) = child.wait() {
        log::warn!("Failed to reap {identifier}: {e}");
    }

    parsed.map_err(|e| DatError::source_unreadable(&identifier, e))
}
