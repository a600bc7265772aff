//! Streaming Adler-32 checksums of local files.
//!
//! Files are read in fixed 4096-byte chunks and each chunk is folded into a
//! rolling accumulator, so memory use does not depend on file size.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use adler32::RollingAdler32;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ChecksumError;

/// Size of each read fed into the accumulator.
pub const CHUNK_SIZE: usize = 4096;

/// Adler-32 value of empty input.
pub const ADLER32_SEED: u32 = 1;

/// An Adler-32 checksum.
///
/// Displays as exactly 8 lowercase, zero-padded hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum(u32);

impl Checksum {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl fmt::LowerHex for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl From<Checksum> for u32 {
    fn from(checksum: Checksum) -> Self {
        checksum.0
    }
}

impl Serialize for Checksum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Checksum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.len() != 8 {
            return Err(de::Error::invalid_length(s.len(), &"8 hex digits"));
        }
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(de::Error::invalid_value(
                de::Unexpected::Str(&s),
                &"8 lowercase hex digits",
            ));
        }
        u32::from_str_radix(&s, 16)
            .map(Checksum)
            .map_err(de::Error::custom)
    }
}

/// Folds everything `reader` yields into an Adler-32 checksum, one chunk at a time.
pub fn checksum_reader<R: Read + ?Sized>(reader: &mut R) -> io::Result<Checksum> {
    let mut hasher = RollingAdler32::from_value(ADLER32_SEED);
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update_buffer(&buf[..n]);
    }
    Ok(Checksum(hasher.hash()))
}

/// Computes the Adler-32 checksum of the file at `path`.
pub fn file_checksum(path: impl AsRef<Path>) -> Result<Checksum, ChecksumError> {
    let path = path.as_ref();
    let io_err = |source| ChecksumError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_err)?;
    let checksum = checksum_reader(&mut file).map_err(io_err)?;
    tracing::debug!(path = %path.display(), %checksum, "computed adler32");
    Ok(checksum)
}

/// Hex checksum of the file at `path`, or an empty string if it could not be read.
///
/// The failure is printed to stderr and otherwise swallowed; an empty result
/// means "checksum unavailable", never the checksum of empty content.
pub fn calc_checksum(path: impl AsRef<Path>) -> String {
    match file_checksum(path) {
        Ok(checksum) => checksum.to_hex(),
        Err(err) => {
            let line = io_error_line(&err);
            eprintln!("{line}");
            tracing::error!(path = %err_path(&err).display(), "{line}");
            String::new()
        }
    }
}

/// `** I/O ERROR(<errno>): <message>`, with `-` when there is no OS error number.
pub(crate) fn io_error_line(err: &ChecksumError) -> String {
    let source = err.io_error();
    let message = source.to_string();
    match source.raw_os_error() {
        Some(code) => {
            let suffix = format!(" (os error {code})");
            let message = message.strip_suffix(&suffix).unwrap_or(&message);
            format!("** I/O ERROR({code}): {message}")
        }
        None => format!("** I/O ERROR(-): {message}"),
    }
}

fn err_path(err: &ChecksumError) -> &Path {
    match err {
        ChecksumError::Io { path, .. } => path,
    }
}
