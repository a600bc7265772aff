use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Failure of a replica lookup.
///
/// Both variants are transparent: the transport or parser error is carried
/// as-is so callers can inspect it (`reqwest::Error::is_connect`, `status`, ...).
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Xml(#[from] XmlError),
}

/// The response body could not be turned into a document tree.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),
    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] AttrError),
    #[error("XML is not valid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),
    #[error("XML document has no root element")]
    NoRoot,
    #[error("XML document has more than one root element")]
    MultipleRoots,
    #[error("XML element <{0}> is never closed")]
    Unclosed(String),
    #[error("unexpected closing tag </{0}>")]
    UnexpectedEnd(String),
}

/// The file could not be opened or read while computing its checksum.
#[derive(Debug, Error)]
pub enum ChecksumError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ChecksumError {
    pub fn io_error(&self) -> &io::Error {
        match self {
            ChecksumError::Io { source, .. } => source,
        }
    }

    /// OS error number, when the failure came from the OS.
    pub fn errno(&self) -> Option<i32> {
        self.io_error().raw_os_error()
    }
}
