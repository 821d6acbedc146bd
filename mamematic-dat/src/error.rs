use mamematic_core::ChronologError;

/// Errors that can occur while reading or writing catalog data.
#[derive(Debug, thiserror::Error)]
pub enum DatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not an XML document: {0}")]
    NotXml(String),

    #[error("Malformed genre entry on line {line}: empty machine name")]
    MalformedEntry { line: usize },

    #[error("Duplicate genre entry for machine '{0}'")]
    DuplicateGenreKey(String),

    #[error("Invalid boolean '{value}' for attribute '{attribute}' of machine '{machine}'")]
    InvalidBooleanLiteral {
        machine: String,
        attribute: String,
        value: String,
    },

    #[error("Machine element has no name attribute")]
    MissingName,

    #[error("Could not read a machine list from '{identifier}': {reason}")]
    SourceUnreadable { identifier: String, reason: String },

    #[error("Timing error: {0}")]
    Chronolog(#[from] ChronologError),
}

impl DatError {
    pub fn not_xml(msg: impl Into<String>) -> Self {
        Self::NotXml(msg.into())
    }

    pub fn source_unreadable(identifier: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnreadable {
            identifier: identifier.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors that mean "this stream is not an XML document",
    /// as opposed to failing to read it at all.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::XmlParse(_) | Self::XmlAttribute(_) | Self::NotXml(_)
        )
    }
}
