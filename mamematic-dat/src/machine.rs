//! Normalization of `<machine>` elements into [`Machine`] records.

use mamematic_core::{DRIVER_FIELDS, Machine};

use crate::error::DatError;
use crate::genre::GenreTable;
use crate::listxml::XmlElement;

/// Build a normalized record from one `<machine>` element.
///
/// Pure: reads `element` and `genres`, retains neither. Defaults follow the
/// catalog's conventions: a machine is runnable unless it says otherwise, and
/// a machine without `cloneof` is its own parent.
pub fn machine_from_element(element: &XmlElement, genres: &GenreTable) -> Result<Machine, DatError> {
    let name = element.attr("name").ok_or(DatError::MissingName)?;
    let flag = |attribute: &str, default: bool| {
        parse_bool(element.attr(attribute), default).map_err(|value| {
            DatError::InvalidBooleanLiteral {
                machine: name.to_string(),
                attribute: attribute.to_string(),
                value,
            }
        })
    };

    let mut machine = Machine::new(name);
    machine.sourcefile = element.attr("sourcefile").map(str::to_string);
    machine.isbios = flag("isbios", false)?;
    machine.isdevice = flag("isdevice", false)?;
    machine.ismechanical = flag("ismechanical", false)?;
    machine.runnable = flag("runnable", true)?;
    if let Some(parent) = element.attr("cloneof") {
        machine.cloneof = parent.to_string();
    }
    machine.romof = element.attr("romof").map(str::to_string);
    machine.sampleof = element.attr("sampleof").map(str::to_string);

    machine.description = child_text(element, "description");
    machine.year = child_text(element, "year");
    machine.manufacturer = child_text(element, "manufacturer");

    if let Some(driver) = element.child("driver") {
        for field in DRIVER_FIELDS {
            if let (Some(slot), Some(value)) = (machine.driver_field_mut(field), driver.attr(field)) {
                *slot = value.to_string();
            }
        }
    }

    if log::log_enabled!(log::Level::Trace) {
        let controls: Vec<&str> = element
            .children_named("input")
            .flat_map(|input| input.children_named("control"))
            .filter_map(|control| control.attr("type"))
            .collect();
        log::trace!("{name}: controls {controls:?}");
    }

    machine.set_genre(genres.get(name));
    Ok(machine)
}

/// Coerce a `yes`/`no` attribute value, falling back to `default` when absent.
///
/// Any other value is returned as the error so the caller can report it.
pub fn parse_bool(raw: Option<&str>, default: bool) -> Result<bool, String> {
    match raw {
        None => Ok(default),
        Some("yes") => Ok(true),
        Some("no") => Ok(false),
        Some(other) => Err(other.to_string()),
    }
}

fn child_text(element: &XmlElement, name: &str) -> String {
    element
        .child(name)
        .map(|child| child.text.clone())
        .unwrap_or_default()
}
