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

//! Loads uncompressed PCM wave files into per-channel buffers of normalized
//! floating-point samples, and writes them back at their original bit depth.
//!
//! ```no_run
//! use pcm_wave::WaveFile;
//!
//! # fn main() -> pcm_wave::Result<()> {
//! let wave: WaveFile = WaveFile::open("in.wav")?;
//! println!("{} channels, {} Hz, {} bits, {:.2} s",
//!          wave.num_channels(), wave.sample_rate(), wave.bit_depth(), wave.duration_seconds());
//! wave.write_to("out.wav")?;
//! # Ok(())
//! # }
//! ```
//!
//! # The wave file format
//!
//! A wave file is a RIFF container. It starts with a 12-byte descriptor,
//! followed by subchunks, each made of a 4-byte tag, a 4-byte little-endian
//! size and the chunk body:
//!
//! Offset | Size | Data            | Description
//! -----: | ---: | --------------- | -----------------------------------------
//!      0 |    4 | "RIFF"          | Identifies the main chunk.
//!      4 |    4 | chunk size      | Size of the file minus 8 bytes.
//!      8 |    4 | "WAVE"          | Identifies a wave file.
//!     12 |    4 | "fmt "          | Format subchunk.
//!     16 |    4 | subchunk size   | 16 for PCM.
//!     20 |    2 | format (1)      | 1 for uncompressed PCM.
//!     22 |    2 | num channels    | Channel count.
//!     24 |    4 | sample rate     | Samples per second, per channel.
//!     28 |    4 | byte rate       | sample rate × block align.
//!     32 |    2 | block align     | Bytes per frame (one sample for every channel).
//!     34 |    2 | bits per sample | 8, 16, 24 or 32.
//!     36 |    4 | "data"          | Data subchunk.
//!     40 |    4 | subchunk size   | Size of the sample payload.
//!     44 |  ... | audio data      | Interleaved little-endian samples.
//!
//! Files found in the wild often put other chunks ("LIST", "fact", "JUNK")
//! before the data chunk. These are skipped by their declared size when
//! loading and are not written back.
//!
//! # Sample conversion
//!
//! 8-bit samples are unsigned with a bias of 128; wider samples are signed
//! two's complement. Decoding divides by the magnitude of the most negative
//! value (128, 32768, 8388608 or 2147483648), so decoded samples lie in
//! [-1.0, 1.0). Encoding clamps to [-1.0, 1.0] and then scales according to
//! the chosen [`Scaling`].

#[cfg(test)]
#[macro_use]
mod test_util;

mod error;
mod header;
mod reader;
mod sample;
mod writer;

use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub use crate::error::{Error, FormatErrorKind, Result};
pub use crate::header::{WaveHeader, CANONICAL_HEADER_SIZE, DATA_TAG, FMT_TAG,
                        FORMAT_UNCOMPRESSED_PCM, PCM_FMT_CHUNK_SIZE, RIFF_TAG, WAVE_TAG};
pub use crate::reader::ReadWaveExt;
pub use crate::sample::{read_sample, write_sample, BitDepth, Sample, Scaling};
pub use crate::writer::WriteWaveExt;

/// A wave file held in memory: its header and one sample vector per channel.
///
/// The contents are replaced wholesale by [`load`](#method.load) and are
/// otherwise read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveFile<S: Sample = f32> {
    path: Option<PathBuf>,
    scaling: Scaling,
    header: WaveHeader,
    samples: Vec<Vec<S>>,
}

impl<S: Sample> WaveFile<S> {
    /// Returns an empty wave file that encodes with `Scaling::Legacy`.
    pub fn new() -> WaveFile<S> {
        WaveFile::with_scaling(Scaling::default())
    }

    /// Returns an empty wave file that encodes with the given scaling.
    pub fn with_scaling(scaling: Scaling) -> WaveFile<S> {
        WaveFile {
            path: None,
            scaling: scaling,
            header: WaveHeader::default(),
            samples: Vec::new(),
        }
    }

    /// Loads the wave file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<WaveFile<S>> {
        let mut wave = WaveFile::new();
        wave.load(path)?;
        Ok(wave)
    }

    /// Replaces the contents with the wave file at `path`, and remembers the
    /// path for [`write`](#method.write). On failure nothing is changed.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let result = File::open(path)
            .map_err(|err| {
                Error::FileNotFound {
                    path: path.to_path_buf(),
                    source: err,
                }
            })
            .and_then(|file| self.load_from(BufReader::new(file)));

        match result {
            Ok(()) => {
                self.path = Some(path.to_path_buf());
                Ok(())
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to load wave file");
                Err(err)
            }
        }
    }

    /// Replaces the contents with the wave file read from `reader`, which
    /// must be positioned at the start of the RIFF header, and forgets the
    /// remembered path. On failure nothing is changed.
    pub fn load_from<R: Read + Seek>(&mut self, mut reader: R) -> Result<()> {
        let (header, samples) = reader.read_wave::<S>()?;
        debug!(channels = header.num_channels,
               sample_rate = header.sample_rate,
               bits_per_sample = header.bits_per_sample,
               num_samples = header.num_samples(),
               "loaded wave file");
        self.path = None;
        self.header = header;
        self.samples = samples;
        Ok(())
    }

    /// Writes to the path this file was last loaded from.
    pub fn write(&self) -> Result<()> {
        match self.path {
            Some(ref path) => self.write_to(path),
            None => {
                warn!("no path to write wave file to");
                Err(Error::Format(FormatErrorKind::NoPathToWrite))
            }
        }
    }

    /// Writes a canonical wave file to `path`, replacing any existing file.
    ///
    /// The whole file is encoded before `path` is created, so an unsupported
    /// bit depth leaves no file behind.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let result = self.to_bytes().and_then(|bytes| {
            let mut file = File::create(path).map_err(|err| {
                Error::FileNotFound {
                    path: path.to_path_buf(),
                    source: err,
                }
            })?;
            file.write_all(&bytes)?;
            Ok(())
        });

        if let Err(ref err) = result {
            warn!(path = %path.display(), error = %err, "failed to write wave file");
        } else {
            debug!(path = %path.display(), "wrote wave file");
        }
        result
    }

    /// Writes a canonical wave file to `writer`.
    pub fn write_into<W: Write>(&self, mut writer: W) -> Result<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Encodes the header and samples as a canonical wave file.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let capacity = CANONICAL_HEADER_SIZE + self.header.data_chunk_size as usize;
        let mut bytes: Vec<u8> = Vec::with_capacity(capacity);
        bytes.write_wave(&self.header, &self.samples, self.scaling)?;
        Ok(bytes)
    }

    pub fn header(&self) -> &WaveHeader {
        &self.header
    }

    /// The decoded samples, one vector per channel. Every channel holds
    /// [`num_samples`](#method.num_samples) samples.
    pub fn samples(&self) -> &[Vec<S>] {
        &self.samples
    }

    /// The samples of one channel, if it exists.
    pub fn channel(&self, index: usize) -> Option<&[S]> {
        self.samples.get(index).map(|channel| &channel[..])
    }

    /// The path of the last successful `load`, cleared by `load_from`.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref().map(|path| path.as_path())
    }

    pub fn scaling(&self) -> Scaling {
        self.scaling
    }

    pub fn audio_format(&self) -> u16 {
        self.header.audio_format
    }

    pub fn num_channels(&self) -> u16 {
        self.header.num_channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.header.sample_rate
    }

    pub fn bit_depth(&self) -> u16 {
        self.header.bits_per_sample
    }

    /// Samples per channel.
    pub fn num_samples(&self) -> u32 {
        self.header.num_samples()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.header.duration_seconds()
    }
}

impl<S: Sample> Default for WaveFile<S> {
    fn default() -> WaveFile<S> {
        WaveFile::new()
    }
}

// MARK: Tests
