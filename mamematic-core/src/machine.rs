use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute names of the `<driver>` element, in the order they are stored.
pub const DRIVER_FIELDS: [&str; 8] = [
    "status",
    "emulation",
    "color",
    "sound",
    "graphic",
    "cocktail",
    "protection",
    "savestate",
];

/// Genre metadata for one machine, as listed in a `catver.ini`-style file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreEntry {
    pub category: Option<String>,
    pub subcat: Option<String>,
    pub mature: bool,
}

/// A normalized machine (game, BIOS or device) from the emulator catalog.
///
/// Field names match the JSON snapshot format one-to-one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub name: String,
    pub sourcefile: Option<String>,
    pub isbios: bool,
    pub isdevice: bool,
    pub ismechanical: bool,
    pub runnable: bool,
    /// Parent machine name; equals `name` for machines that are not clones.
    pub cloneof: String,
    pub romof: Option<String>,
    pub sampleof: Option<String>,

    /// Empty when the catalog has no `<description>` element.
    pub description: String,
    pub year: String,
    pub manufacturer: String,

    // <driver> attributes; empty when there is no driver element
    pub status: String,
    pub emulation: String,
    pub color: String,
    pub sound: String,
    pub graphic: String,
    pub cocktail: String,
    pub protection: String,
    pub savestate: String,

    /// Genre join results. All `None` when the machine is not in the genre table.
    pub category: Option<String>,
    pub subcat: Option<String>,
    pub mature: Option<bool>,
}

impl Machine {
    /// A machine with the catalog defaults: runnable, its own parent,
    /// every text field empty and no genre.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            cloneof: name.clone(),
            name,
            sourcefile: None,
            isbios: false,
            isdevice: false,
            ismechanical: false,
            runnable: true,
            romof: None,
            sampleof: None,
            description: String::new(),
            year: String::new(),
            manufacturer: String::new(),
            status: String::new(),
            emulation: String::new(),
            color: String::new(),
            sound: String::new(),
            graphic: String::new(),
            cocktail: String::new(),
            protection: String::new(),
            savestate: String::new(),
            category: None,
            subcat: None,
            mature: None,
        }
    }

    pub fn is_clone(&self) -> bool {
        self.cloneof != self.name
    }

    /// The parent machine name, if this machine is a clone.
    pub fn parent(&self) -> Option<&str> {
        self.is_clone().then_some(self.cloneof.as_str())
    }

    /// Copy genre metadata onto the record. `None` clears all three fields.
    pub fn set_genre(&mut self, genre: Option<&GenreEntry>) {
        match genre {
            Some(entry) => {
                self.category = entry.category.clone();
                self.subcat = entry.subcat.clone();
                self.mature = Some(entry.mature);
            }
            None => {
                self.category = None;
                self.subcat = None;
                self.mature = None;
            }
        }
    }

    /// Mutable access to a driver sub-field by its `<driver>` attribute name.
    pub fn driver_field_mut(&mut self, attribute: &str) -> Option<&mut String> {
        match attribute {
            "status" => Some(&mut self.status),
            "emulation" => Some(&mut self.emulation),
            "color" => Some(&mut self.color),
            "sound" => Some(&mut self.sound),
            "graphic" => Some(&mut self.graphic),
            "cocktail" => Some(&mut self.cocktail),
            "protection" => Some(&mut self.protection),
            "savestate" => Some(&mut self.savestate),
            _ => None,
        }
    }

    /// Driver sub-fields paired with their attribute names, in [`DRIVER_FIELDS`] order.
    pub fn driver_fields(&self) -> [(&'static str, &str); 8] {
        [
            ("status", self.status.as_str()),
            ("emulation", self.emulation.as_str()),
            ("color", self.color.as_str()),
            ("sound", self.sound.as_str()),
            ("graphic", self.graphic.as_str()),
            ("cocktail", self.cocktail.as_str()),
            ("protection", self.protection.as_str()),
            ("savestate", self.savestate.as_str()),
        ]
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.description.is_empty() {
            write!(f, " \"{}\"", self.description)?;
        }
        if !self.year.is_empty() || !self.manufacturer.is_empty() {
            write!(f, " ({} {})", self.year, self.manufacturer)?;
        }
        if let Some(parent) = self.parent() {
            write!(f, " [clone of {parent}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_machine_is_its_own_parent() {
        let m = Machine::new("pacman");
        assert_eq!(m.cloneof, "pacman");
        assert!(!m.is_clone());
        assert_eq!(m.parent(), None);
        assert!(m.runnable);
        assert!(!m.isbios);
    }

    #[test]
    fn clone_reports_parent() {
        let mut m = Machine::new("mspacman");
        m.cloneof = "pacman".to_string();
        assert!(m.is_clone());
        assert_eq!(m.parent(), Some("pacman"));
    }

    #[test]
    fn set_genre_copies_and_clears() {
        let mut m = Machine::new("pacman");
        let entry = GenreEntry {
            category: Some("Maze".to_string()),
            subcat: Some("Collect".to_string()),
            mature: false,
        };
        m.set_genre(Some(&entry));
        assert_eq!(m.category.as_deref(), Some("Maze"));
        assert_eq!(m.subcat.as_deref(), Some("Collect"));
        assert_eq!(m.mature, Some(false));

        m.set_genre(None);
        assert_eq!(m.category, None);
        assert_eq!(m.subcat, None);
        assert_eq!(m.mature, None);
    }

    #[test]
    fn driver_field_names_match_constant() {
        let mut m = Machine::new("x");
        for field in DRIVER_FIELDS {
            *m.driver_field_mut(field).unwrap() = field.to_uppercase();
        }
        for (i, (name, value)) in m.driver_fields().into_iter().enumerate() {
            assert_eq!(name, DRIVER_FIELDS[i]);
            assert_eq!(value, name.to_uppercase());
        }
        assert!(m.driver_field_mut("bogus").is_none());
    }

    #[test]
    fn display_includes_description_and_parent() {
        let mut m = Machine::new("mspacman");
        m.description = "Ms. Pac-Man".to_string();
        m.year = "1981".to_string();
        m.manufacturer = "Midway".to_string();
        m.cloneof = "pacman".to_string();
        assert_eq!(
            m.to_string(),
            "mspacman \"Ms. Pac-Man\" (1981 Midway) [clone of pacman]"
        );
    }
}
