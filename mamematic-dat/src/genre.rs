//! Genre side table parser (`catver.ini` format).
//!
//! Each relevant line looks like `name=Category / Subcategory * Mature *`,
//! where the subcategory and the mature marker are optional. Reading stops
//! at the `[VerAdded]` section, which lists emulator versions rather than
//! genres.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use mamematic_core::GenreEntry;

use crate::error::DatError;

/// Line that ends the genre section of the file.
pub const END_SENTINEL: &str = "[VerAdded]";

static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)=(.*?)(/(.*?))?(\* Mature \*)?$").expect("genre entry pattern is valid")
});

/// Machine name to genre lookup, immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct GenreTable {
    entries: HashMap<String, GenreEntry>,
}

impl GenreTable {
    /// Load a genre table from a file.
    pub fn load(path: &Path) -> Result<Self, DatError> {
        let file = std::fs::File::open(path)?;
        let table = Self::parse(std::io::BufReader::new(file))?;
        log::debug!(
            "Loaded {} genre entries from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse genre entries from any buffered reader.
    ///
    /// Lines without an `=` are skipped. An empty name or a repeated name is fatal.
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, DatError> {
        let mut entries = HashMap::new();

        for (index, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();
            if line == END_SENTINEL {
                break;
            }

            let Some(caps) = ENTRY_RE.captures(line) else {
                continue;
            };

            let name = caps[1].trim();
            if name.is_empty() {
                return Err(DatError::MalformedEntry { line: index + 1 });
            }
            if entries.contains_key(name) {
                return Err(DatError::DuplicateGenreKey(name.to_string()));
            }

            let entry = GenreEntry {
                category: caps.get(2).map(|m| m.as_str().trim().to_string()),
                subcat: caps.get(4).map(|m| m.as_str().trim().to_string()),
                mature: caps.get(5).is_some(),
            };
            entries.insert(name.to_string(), entry);
        }

        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&GenreEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, GenreEntry)> for GenreTable {
    fn from_iter<I: IntoIterator<Item = (String, GenreEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
