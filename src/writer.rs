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

use std::io;
use std::io::{Read, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{Error, FormatErrorKind, Result};
use crate::header::{WaveHeader, PCM_FMT_CHUNK_SIZE};
use crate::sample::{write_sample, Sample, Scaling};

/// Serializes a header and sample buffer as a canonical 44-byte-header wave
/// file. Chunks that were skipped while reading are not written.
pub trait WriteWaveExt: Write {
    /// Writes the header followed by the interleaved, encoded samples.
    ///
    /// Nothing is written if the bit depth is unsupported or if `samples`
    /// holds fewer channels or samples than the header describes.
    fn write_wave<S: Sample>(&mut self,
                             header: &WaveHeader,
                             samples: &[Vec<S>],
                             scaling: Scaling)
                             -> Result<()> {
        let bit_depth = header.bit_depth()?;
        let num_channels = header.num_channels as usize;
        let num_samples = header.num_samples() as usize;

        if samples.len() < num_channels
           || samples[..num_channels].iter().any(|channel| channel.len() < num_samples) {
            return Err(Error::Format(FormatErrorKind::SampleBufferMismatch));
        }

        self.write_wave_header(header)?;
        for index in 0..num_samples {
            for channel in &samples[..num_channels] {
                write_sample(self, channel[index], bit_depth, scaling)?;
            }
        }

        // Keep the payload as long as the declared data chunk size.
        let padding = header.data_chunk_size as u64 - header.frame_bytes(bit_depth);
        io::copy(&mut io::repeat(0).take(padding), self)?;
        Ok(())
    }

    /// Writes the 44-byte canonical header.
    ///
    /// Every field is written as stored, except the fmt chunk size, which is
    /// always 16 because only the PCM fields are written.
    fn write_wave_header(&mut self, header: &WaveHeader) -> io::Result<()> {
        self.write_all(&header.chunk_id)?;
        self.write_u32::<LittleEndian>(header.chunk_size)?;
        self.write_all(&header.format)?;

        self.write_all(&header.fmt_chunk_id)?;
        self.write_u32::<LittleEndian>(PCM_FMT_CHUNK_SIZE)?;
        self.write_u16::<LittleEndian>(header.audio_format)?;
        self.write_u16::<LittleEndian>(header.num_channels)?;
        self.write_u32::<LittleEndian>(header.sample_rate)?;
        self.write_u32::<LittleEndian>(header.byte_rate)?;
        self.write_u16::<LittleEndian>(header.block_align)?;
        self.write_u16::<LittleEndian>(header.bits_per_sample)?;

        self.write_all(&header.data_chunk_id)?;
        self.write_u32::<LittleEndian>(header.data_chunk_size)?;
        Ok(())
    }
}

impl<T> WriteWaveExt for T where T: Write + ?Sized {}

// MARK: Tests
