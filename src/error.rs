// pcm-wave -- Load and write PCM wave files as normalized sample buffers.
// Copyright (c) 2016 Kevin Brothaler and the riff-wave project authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::result;

/// Represents an error that occurred while loading or writing a wave file.
#[derive(Debug)]
pub enum Error {
    /// The source or destination path could not be opened.
    FileNotFound { path: PathBuf, source: io::Error },
    /// Only 8-bit, 16-bit, 24-bit and 32-bit PCM files are supported.
    UnsupportedBitsPerSample(u16),
    /// The container is malformed or not a PCM wave file.
    Format(FormatErrorKind),
    /// Any other IO error.
    Io(io::Error),
}

/// Represents a result when loading or writing a wave file.
pub type Result<T> = result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::FileNotFound { ref path, ref source } => {
                write!(f, "File not found: {}: {}", path.display(), source)
            }
            Error::UnsupportedBitsPerSample(bits) => {
                write!(f, "{} bits per sample is not supported", bits)
            }
            Error::Format(ref err_kind) => write!(f, "Format error: {}", err_kind),
            Error::Io(ref err) => write!(f, "IO error: {}", err),
        }
    }
}

/// Represents a container error, when the wave file is malformed or unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// The file does not start with a "RIFF" tag and chunk size.
    NotARiffFile,
    /// The file doesn't continue with "WAVE" after the RIFF chunk header.
    NotAWaveFile,
    /// This file is not an uncompressed PCM wave file.
    NotAnUncompressedPcmWaveFile(u16),
    /// The "fmt " chunk is shorter than the 16 bytes of a PCM format body.
    FmtChunkTooShort,
    /// The number of channels is zero, which is invalid.
    NumChannelsIsZero,
    /// The sample rate is zero, which is invalid.
    SampleRateIsZero,
    /// A "data" chunk was found before any "fmt " chunk.
    MissingFmtChunk,
    /// The stream ended before a "data" chunk was found.
    MissingDataChunk,
    /// The stream ended inside a chunk body.
    Truncated,
    /// The sample buffer holds fewer channels or samples than the header describes.
    SampleBufferMismatch,
    /// `write()` was called on a wave file that has no associated path.
    NoPathToWrite,
}

impl FormatErrorKind {
    fn as_str(&self) -> &'static str {
        match *self {
            FormatErrorKind::NotARiffFile => "not a RIFF file",
            FormatErrorKind::NotAWaveFile => "not a WAVE file",
            FormatErrorKind::NotAnUncompressedPcmWaveFile(_) => "Not an uncompressed wave file",
            FormatErrorKind::FmtChunkTooShort => "fmt_ chunk is too short",
            FormatErrorKind::NumChannelsIsZero => "Number of channels is zero",
            FormatErrorKind::SampleRateIsZero => "Sample rate is zero",
            FormatErrorKind::MissingFmtChunk => "data chunk precedes the fmt_ chunk",
            FormatErrorKind::MissingDataChunk => "no data chunk found",
            FormatErrorKind::Truncated => "stream ended inside a chunk",
            FormatErrorKind::SampleBufferMismatch => "sample buffer does not match the header",
            FormatErrorKind::NoPathToWrite => "no path to write to",
        }
    }
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::FileNotFound { ref source, .. } => Some(source),
            Error::Io(ref err) => Some(err),
            Error::UnsupportedBitsPerSample(_) | Error::Format(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<FormatErrorKind> for Error {
    fn from(kind: FormatErrorKind) -> Error {
        Error::Format(kind)
    }
}

// Maps an unexpected end of stream to the given container error, and passes
// every other IO error through.
pub(crate) fn eof_as(kind: FormatErrorKind) -> impl Fn(io::Error) -> Error {
    move |err| {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::Format(kind)
        } else {
            Error::Io(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;
    use std::io;

    use super::{eof_as, Error, FormatErrorKind};

    #[test]
    fn test_display_unsupported_bits_per_sample() {
        let err = Error::UnsupportedBitsPerSample(12);
        assert_eq!("12 bits per sample is not supported", err.to_string());
    }

    #[test]
    fn test_display_format_error() {
        let err = Error::from(FormatErrorKind::NotARiffFile);
        assert_eq!("Format error: not a RIFF file", err.to_string());
    }

    #[test]
    fn test_file_not_found_has_io_source() {
        let err = Error::FileNotFound {
            path: "missing.wav".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("File not found: missing.wav"));
    }

    #[test]
    fn test_eof_as_maps_only_unexpected_eof() {
        let map = eof_as(FormatErrorKind::Truncated);
        match map(io::Error::new(io::ErrorKind::UnexpectedEof, "eof")) {
            Error::Format(FormatErrorKind::Truncated) => {}
            other => panic!("unexpected {:?}", other),
        }
        match map(io::Error::new(io::ErrorKind::PermissionDenied, "nope")) {
            Error::Io(ref err) if err.kind() == io::ErrorKind::PermissionDenied => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
