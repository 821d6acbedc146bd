pub mod collection;
pub mod error;
pub mod genre;
pub mod listxml;
pub mod machine;
pub mod source;

pub use collection::MachineList;
pub use error::DatError;
pub use genre::GenreTable;
pub use listxml::{ListXml, XmlElement};
pub use machine::{machine_from_element, parse_bool};
pub use source::{ResolvedSource, SourceKind, resolve};
