//! mamematic CLI
//!
//! Reads the emulator's machine catalog, joins genre metadata and saves the
//! result as JSON.

mod config;
mod error;
mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use mamematic_dat::{GenreTable, MachineList};

use crate::config::Settings;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "mamematic", version)]
#[command(about = "MAME front-end: read the machine catalog and save it as JSON", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Config directory (holds mamematic.toml)
    #[arg(short, long, default_value = ".")]
    directory: PathBuf,

    /// Read the machine list from this XML file or emulator executable
    #[arg(short, long)]
    xml: Option<PathBuf>,

    /// Genre file in catver.ini format
    #[arg(short, long)]
    genres: Option<PathBuf>,

    /// Load a JSON snapshot instead of reading the XML machine list
    #[arg(short, long, conflicts_with = "xml")]
    json: Option<PathBuf>,

    /// Save the machine list as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::init(level, Path::new(logging::LOG_FILE));
    log::info!("mamematic {}", env!("CARGO_PKG_VERSION"));
    log::debug!("Verbose logging enabled");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("ERROR: {}", error::report(&e));
            log::debug!("{e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    std::env::set_current_dir(&cli.directory).map_err(|source| CliError::Directory {
        path: cli.directory.display().to_string(),
        source,
    })?;
    let settings = Settings::load(Path::new(config::CONFIG_FILE))?;

    let machines = match cli.json {
        Some(snapshot) => MachineList::load_json(&snapshot)?,
        None => {
            let source = cli.xml.or(settings.mame.exec).ok_or_else(|| {
                CliError::config(format!(
                    "no machine list source: pass --xml or set mame.exec in {}",
                    config::CONFIG_FILE
                ))
            })?;
            let genres = match cli.genres.or(settings.mame.genres) {
                Some(path) => GenreTable::load(&path)?,
                None => GenreTable::default(),
            };
            MachineList::load_xml(&source, &genres)?
        }
    };

    for machine in &machines {
        log::info!("{machine}");
    }

    if let Some(output) = cli.output.or(settings.mame.output) {
        machines.save_json(&output)?;
        log::info!("Saved {} machines to {}", machines.len(), output.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["mamematic"]).unwrap();
        assert!(!cli.verbose);
        assert_eq!(cli.directory, PathBuf::from("."));
        assert!(cli.xml.is_none());
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "mamematic", "-v", "-d", "/srv/mame", "-x", "mame.xml", "-g", "catver.ini", "-o",
            "out.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.directory, PathBuf::from("/srv/mame"));
        assert_eq!(cli.xml, Some(PathBuf::from("mame.xml")));
        assert_eq!(cli.genres, Some(PathBuf::from("catver.ini")));
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_json_conflicts_with_xml() {
        let result = Cli::try_parse_from(["mamematic", "-x", "mame.xml", "-j", "snap.json"]);
        assert!(result.is_err());
    }
}
