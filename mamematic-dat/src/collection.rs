use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::Error as _;
use serde_json::Value;

use mamematic_core::{Chronolog, Machine};

use crate::error::DatError;
use crate::genre::GenreTable;
use crate::listxml::ListXml;
use crate::machine::machine_from_element;
use crate::source;

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// All machines of one catalog, keyed (and iterated) by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineList {
    machines: BTreeMap<String, Machine>,
}

impl MachineList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a catalog from an XML file or, failing that, from the emulator
    /// executable at the same path. See [`source::resolve`].
    pub fn load_xml(identifier: &Path, genres: &GenreTable) -> Result<Self, DatError> {
        log::info!("Reading machine list from {}", identifier.display());
        let mut chrono = Chronolog::started();

        let resolved = source::resolve(identifier)?;
        let list = Self::from_document(&resolved.document, genres)?;

        let elapsed = chrono.stop()?;
        log::info!(
            "Read {} machines from {} in {:.1}s",
            list.len(),
            resolved.kind,
            elapsed.as_secs_f64()
        );
        Ok(list)
    }

    /// Normalize every `machine` element of a parsed document.
    ///
    /// A later machine with an already-seen name replaces the earlier one.
    pub fn from_document(document: &ListXml, genres: &GenreTable) -> Result<Self, DatError> {
        let mut list = Self::new();
        for element in document.machines() {
            list.insert(machine_from_element(element, genres)?);
        }
        Ok(list)
    }

    /// Read a JSON snapshot written by [`MachineList::save_json`].
    ///
    /// Also accepts an object mapping names to records; the record's own
    /// `name` is used as the key.
    pub fn load_json(path: &Path) -> Result<Self, DatError> {
        let file = fs::File::open(path)?;
        let snapshot: Value = serde_json::from_reader(BufReader::new(file))?;
        let list: Self = match snapshot {
            Value::Array(_) => serde_json::from_value::<Vec<Machine>>(snapshot)?
                .into_iter()
                .collect(),
            Value::Object(_) => serde_json::from_value::<BTreeMap<String, Machine>>(snapshot)?
                .into_values()
                .collect(),
            other => {
                return Err(DatError::Json(serde_json::Error::custom(format!(
                    "expected an array or object of machine records, found {}",
                    json_kind(&other)
                ))));
            }
        };
        log::debug!("Read {} machines from {}", list.len(), path.display());
        Ok(list)
    }

    /// Write the collection as a JSON array of records, sorted by name.
    pub fn save_json(&self, path: &Path) -> Result<(), DatError> {
        let mut writer = BufWriter::new(fs::File::create(path)?);
        let machines: Vec<&Machine> = self.machines.values().collect();
        serde_json::to_writer(&mut writer, &machines)?;
        writer.flush()?;
        log::debug!("Wrote {} machines to {}", self.len(), path.display());
        Ok(())
    }

    /// Insert a machine, returning the record it replaced, if any.
    pub fn insert(&mut self, machine: Machine) -> Option<Machine> {
        self.machines.insert(machine.name.clone(), machine)
    }

    pub fn get(&self, name: &str) -> Option<&Machine> {
        self.machines.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.machines.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, Machine> {
        self.machines.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.machines.keys().map(String::as_str)
    }

    /// Machines that are not clones of another machine.
    pub fn parents(&self) -> impl Iterator<Item = &Machine> {
        self.iter().filter(|m| !m.is_clone())
    }

    /// Clones whose parent is `parent`.
    pub fn clones_of<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a Machine> {
        self.iter().filter(move |m| m.parent() == Some(parent))
    }
}

impl<'a> IntoIterator for &'a MachineList {
    type Item = &'a Machine;
    type IntoIter = btree_map::Values<'a, String, Machine>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Machine> for MachineList {
    fn extend<I: IntoIterator<Item = Machine>>(&mut self, iter: I) {
        for machine in iter {
            self.insert(machine);
        }
    }
}

impl FromIterator<Machine> for MachineList {
    fn from_iter<I: IntoIterator<Item = Machine>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}
