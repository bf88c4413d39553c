//! Project descriptor reading
//!
//! Parses a single MSBuild-style project descriptor into a [`Project`]:
//! its identifier, output kind and declared project references.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

use crate::error::ParseError;

const IDENTIFIER_FIELD: &str = "ProjectGuid";
const OUTPUT_TYPE_FIELD: &str = "OutputType";
const REFERENCE_ENTRY: &str = "ProjectReference";
const REFERENCE_ID: &str = "Project";
const REFERENCE_NAME: &str = "Name";
const REFERENCE_PATH_ATTR: &str = "Include";

/// Kind of artifact a project produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Library (`<OutputType>Library</OutputType>`)
    Library,
    /// Anything else that was declared
    Executable,
    /// No output type declared
    Unknown,
}

impl OutputKind {
    /// Classify a raw output-type value
    pub fn from_declared(value: &str) -> Self {
        if value == "Library" {
            Self::Library
        } else {
            Self::Executable
        }
    }

    /// Short label used in build order listings
    pub fn short_label(self) -> &'static str {
        match self {
            Self::Library => "lib",
            // Only libraries are told apart when listing
            Self::Executable | Self::Unknown => "exe",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library => write!(f, "library"),
            Self::Executable => write!(f, "executable"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A declared reference to another project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectReference {
    /// Referenced project identifier (braces stripped, may be empty)
    pub identifier: String,
    /// Declared display name
    pub name: String,
    /// Declared path to the referenced descriptor
    pub path: String,
}

/// A parsed project descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    /// Unique name within the solution
    pub name: String,
    /// Opaque identifier used for cross-referencing
    pub identifier: String,
    /// Descriptor path
    pub path: PathBuf,
    /// Declared output kind
    pub output_kind: OutputKind,
    /// References in declaration order
    pub references: Vec<ProjectReference>,
}

impl Project {
    /// Read and parse the descriptor at `path`
    pub fn load(name: &str, path: &Path) -> Result<Self, ParseError> {
        let content = fs::read_to_string(path).map_err(|e| ParseError::from_io(path, &e))?;
        Self::parse(name, path, &content)
    }

    /// Parse descriptor content
    ///
    /// `path` is only used for error messages and is stored on the result.
    pub fn parse(name: &str, path: &Path, content: &str) -> Result<Self, ParseError> {
        let malformed = |message: String| ParseError::Malformed {
            path: path.to_path_buf(),
            message,
        };

        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<String> = Vec::new();
        let mut saw_root = false;
        let mut identifier: Option<String> = None;
        let mut output_type: Option<String> = None;
        let mut references: Vec<ProjectReference> = Vec::new();
        let mut current: Option<ProjectReference> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let tag = element_name(&e);
                    if stack.is_empty() {
                        saw_root = true;
                    }
                    if tag == REFERENCE_ENTRY {
                        current = Some(open_reference(&e).map_err(malformed)?);
                    }
                    stack.push(tag);
                }
                Ok(Event::Empty(e)) => {
                    if stack.is_empty() {
                        saw_root = true;
                    }
                    if element_name(&e) == REFERENCE_ENTRY {
                        references.push(open_reference(&e).map_err(malformed)?);
                    }
                }
                Ok(Event::End(_)) => {
                    if stack.pop().as_deref() == Some(REFERENCE_ENTRY) {
                        if let Some(reference) = current.take() {
                            references.push(reference);
                        }
                    }
                }
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| malformed(e.to_string()))?;
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    let tag = stack.last().map(String::as_str);
                    let parent = stack.len().checked_sub(2).map(|i| stack[i].as_str());
                    match (tag, parent, current.as_mut()) {
                        (Some(REFERENCE_ID), Some(REFERENCE_ENTRY), Some(reference)) => {
                            reference.identifier = strip_braces(text);
                        }
                        (Some(REFERENCE_NAME), Some(REFERENCE_ENTRY), Some(reference)) => {
                            reference.name = text.to_string();
                        }
                        (Some(IDENTIFIER_FIELD), _, None) if identifier.is_none() => {
                            identifier = Some(strip_braces(text)).filter(|id| !id.is_empty());
                        }
                        (Some(OUTPUT_TYPE_FIELD), _, None) if output_type.is_none() => {
                            output_type = Some(text.to_string());
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(malformed(format!(
                        "at byte {}: {e}",
                        reader.error_position()
                    )))
                }
            }
        }

        if !saw_root {
            return Err(malformed("no root element".to_string()));
        }
        if !stack.is_empty() {
            return Err(malformed(format!("unclosed element <{}>", stack.join("/"))));
        }

        let identifier = identifier.ok_or_else(|| ParseError::MissingField {
            path: path.to_path_buf(),
            field: IDENTIFIER_FIELD.to_string(),
        })?;

        let output_kind = output_type
            .as_deref()
            .map_or(OutputKind::Unknown, OutputKind::from_declared);

        tracing::debug!(
            "Parsed project {name} ({identifier}, {output_kind}) with {} references",
            references.len()
        );

        Ok(Self {
            name: name.to_string(),
            identifier,
            path: path.to_path_buf(),
            output_kind,
            references,
        })
    }

    /// Whether this project builds a library
    pub fn is_library(&self) -> bool {
        self.output_kind == OutputKind::Library
    }
}

/// Strip enclosing braces from an identifier
pub fn strip_braces(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .trim()
        .to_string()
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn open_reference(e: &BytesStart<'_>) -> Result<ProjectReference, String> {
    let path = match e
        .try_get_attribute(REFERENCE_PATH_ATTR)
        .map_err(|err| err.to_string())?
    {
        Some(attr) => attr
            .unescape_value()
            .map_err(|err| err.to_string())?
            .into_owned(),
        None => String::new(),
    };
    Ok(ProjectReference {
        identifier: String::new(),
        name: String::new(),
        path,
    })
}
