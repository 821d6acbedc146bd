//! Falling back from a non-XML path to running it as the emulator.
//!
//! Kept in its own test binary: writing and then executing a script races
//! with other tests that fork (ETXTBSY).

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use mamematic_dat::{DatError, GenreTable, ListXml, MachineList, SourceKind, resolve};
use tempfile::TempDir;

const LISTXML: &str = r#"<?xml version="1.0"?>
<mame build="0.261">
    <machine name="foo" cloneof="bar"><description>Foo</description></machine>
    <machine name="baz"><year>1984</year></machine>
</mame>"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn executable_fallback() {
    let tmp = TempDir::new().unwrap();

    let xml_path = tmp.path().join("mame.xml");
    fs::write(&xml_path, LISTXML).unwrap();

    let emulator = write_script(
        tmp.path(),
        "fake-mame",
        &format!(
            "[ \"$1\" = \"-listxml\" ] || exit 2\ncat '{}'",
            xml_path.display()
        ),
    );

    let resolved = resolve(&emulator).unwrap();
    assert_eq!(resolved.kind, SourceKind::Executable);
    assert_eq!(resolved.document.root().attr("build"), Some("0.261"));

    let from_exec = MachineList::load_xml(&emulator, &GenreTable::default()).unwrap();
    let from_file = MachineList::load_xml(&xml_path, &GenreTable::default()).unwrap();
    assert_eq!(from_exec, from_file);
    assert_eq!(from_exec.get("foo").unwrap().cloneof, "bar");
    assert_eq!(from_exec.get("baz").unwrap().cloneof, "baz");

    let direct = resolve(&xml_path).unwrap();
    assert_eq!(direct.kind, SourceKind::File);
    assert_eq!(direct.document.machines().count(), 2);

    // exit status is ignored as long as the output parses
    let noisy = write_script(
        tmp.path(),
        "noisy-mame",
        &format!("cat '{}'\nexit 3", xml_path.display()),
    );
    let list = MachineList::load_xml(&noisy, &GenreTable::default()).unwrap();
    assert_eq!(list.len(), 2);

    // output that is not XML either is fatal
    let broken = write_script(tmp.path(), "broken-mame", "echo 'not a machine list'");
    let err = resolve(&broken).unwrap_err();
    assert!(matches!(err, DatError::SourceUnreadable { .. }));

    let parsed = ListXml::from_file(&xml_path).unwrap();
    assert_eq!(parsed.machines().count(), 2);
}
