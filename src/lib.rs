//! File-replica lookup against the CMS PhEDEx data service, and Adler-32
//! checksums of local files.
//!
//! The two halves are independent and stateless:
//! - [`Client::file_replicas`] (or [`get_file_replicas`]) issues one blocking GET
//!   for `FileReplicas?dataset=<name>` and returns the reply as an owned
//!   [`Document`]. Errors from the transport or the XML parser are passed through.
//! - [`file_checksum`] streams a file through Adler-32 in 4096-byte chunks.
//!   [`calc_checksum`] wraps it and returns the 8-digit hex string, or `""` when
//!   the file cannot be read.
//!
//! ## Quick start
//!
//! ```no_run
//! use phedex::{calc_checksum, get_file_replicas};
//!
//! fn main() -> Result<(), phedex::LookupError> {
//!     let doc = get_file_replicas("/MinimumBias/Run2011A-v1/RAW")?;
//!     for file in doc.elements_by_tag_name("file") {
//!         println!("{:?} {:?}", file.attribute("name"), file.attribute("checksum"));
//!     }
//!
//!     let local = calc_checksum("run2011a.root");
//!     if local.is_empty() {
//!         eprintln!("checksum unavailable");
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod checksum;
mod client;
mod dom;
mod error;
mod logging;
mod util;

pub use checksum::{
    ADLER32_SEED, CHUNK_SIZE, Checksum, calc_checksum, checksum_reader, file_checksum,
};
pub use client::{Client, ClientConfig, FILE_REPLICAS_URL, get_file_replicas};
pub use dom::{Document, Element, Node};
pub use error::{ChecksumError, LookupError, XmlError};
pub use logging::init_logging;
