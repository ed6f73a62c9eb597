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
use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::debug;

use crate::error::{eof_as, Error, FormatErrorKind, Result};
use crate::header::{WaveHeader, DATA_TAG, FMT_TAG, FORMAT_UNCOMPRESSED_PCM, PCM_FMT_CHUNK_SIZE,
                    RIFF_TAG, WAVE_TAG};
use crate::sample::{read_sample, Sample};

// Caps the up-front allocation per channel, so that a bogus data chunk size
// can't reserve gigabytes before the first read fails.
const MAX_PREALLOCATED_SAMPLES: usize = 1 << 20;

/// Walks the chunks of a wave file and decodes its samples.
///
/// The reader must be positioned at the start of the RIFF header. Reading
/// stops right after the first "data" chunk; anything that follows it is left
/// unread.
pub trait ReadWaveExt: Read + Seek {
    /// Reads the whole file into a header and one sample vector per channel.
    fn read_wave<S: Sample>(&mut self) -> Result<(WaveHeader, Vec<Vec<S>>)> {
        let mut header = WaveHeader::default();
        self.read_riff_descriptor(&mut header)?;

        // Allocated once the "fmt " chunk has told us the channel count.
        let mut samples: Option<Vec<Vec<S>>> = None;

        loop {
            let tag = self.read_tag().map_err(eof_as(FormatErrorKind::MissingDataChunk))?;
            let chunk_size = self.read_chunk_size().map_err(eof_as(FormatErrorKind::Truncated))?;

            if &tag == FMT_TAG {
                header.fmt_chunk_id = tag;
                header.fmt_chunk_size = chunk_size;
                self.read_fmt_body(&mut header)?;
                samples = Some(vec![Vec::new(); header.num_channels as usize]);
            } else if &tag == DATA_TAG {
                let mut channels = samples.ok_or(Error::Format(FormatErrorKind::MissingFmtChunk))?;
                header.data_chunk_id = tag;
                header.data_chunk_size = chunk_size;
                self.read_data_body(&header, &mut channels)?;
                return Ok((header, channels));
            } else {
                debug!(tag = %String::from_utf8_lossy(&tag), size = chunk_size, "skipping chunk");
                self.seek(SeekFrom::Current(chunk_size.into()))?;
            }
        }
    }

    /// Reads the 12-byte RIFF descriptor and checks the "RIFF" and "WAVE" tags.
    fn read_riff_descriptor(&mut self, header: &mut WaveHeader) -> Result<()> {
        header.chunk_id = self.read_tag().map_err(eof_as(FormatErrorKind::NotARiffFile))?;
        if &header.chunk_id != RIFF_TAG {
            return Err(Error::Format(FormatErrorKind::NotARiffFile));
        }
        // The RIFF chunk size is kept but not validated, so that files with an
        // incorrect size can still be read.
        header.chunk_size = self.read_chunk_size().map_err(eof_as(FormatErrorKind::NotARiffFile))?;

        header.format = self.read_tag().map_err(eof_as(FormatErrorKind::NotAWaveFile))?;
        if &header.format != WAVE_TAG {
            return Err(Error::Format(FormatErrorKind::NotAWaveFile));
        }
        Ok(())
    }

    /// Reads the PCM fields of a "fmt " chunk whose id and size have already
    /// been stored in `header`, then skips any remaining bytes of the chunk.
    fn read_fmt_body(&mut self, header: &mut WaveHeader) -> Result<()> {
        if header.fmt_chunk_size < PCM_FMT_CHUNK_SIZE {
            return Err(Error::Format(FormatErrorKind::FmtChunkTooShort));
        }

        let truncated = eof_as(FormatErrorKind::Truncated);
        header.audio_format = self.read_u16::<LittleEndian>().map_err(&truncated)?;
        if header.audio_format != FORMAT_UNCOMPRESSED_PCM {
            return Err(Error::Format(
                FormatErrorKind::NotAnUncompressedPcmWaveFile(header.audio_format)));
        }

        header.num_channels = self.read_u16::<LittleEndian>().map_err(&truncated)?;
        header.sample_rate = self.read_u32::<LittleEndian>().map_err(&truncated)?;
        header.byte_rate = self.read_u32::<LittleEndian>().map_err(&truncated)?;
        header.block_align = self.read_u16::<LittleEndian>().map_err(&truncated)?;
        header.bits_per_sample = self.read_u16::<LittleEndian>().map_err(&truncated)?;

        if header.num_channels == 0 {
            return Err(Error::Format(FormatErrorKind::NumChannelsIsZero));
        } else if header.sample_rate == 0 {
            return Err(Error::Format(FormatErrorKind::SampleRateIsZero));
        }

        // Standard files may carry a two-byte extra info size after the PCM fields.
        let remainder = header.fmt_chunk_size - PCM_FMT_CHUNK_SIZE;
        if remainder > 0 {
            self.seek(SeekFrom::Current(remainder.into()))?;
        }
        Ok(())
    }

    /// Decodes the interleaved samples of a data chunk into `channels`, one
    /// vector per channel. Only whole frames are decoded.
    fn read_data_body<S: Sample>(&mut self,
                                 header: &WaveHeader,
                                 channels: &mut [Vec<S>])
                                 -> Result<()> {
        let bit_depth = header.bit_depth()?;
        let num_samples = header.num_samples() as usize;

        for channel in channels.iter_mut() {
            channel.reserve(num_samples.min(MAX_PREALLOCATED_SAMPLES));
        }

        let truncated = eof_as(FormatErrorKind::Truncated);
        for _ in 0..num_samples {
            for channel in channels.iter_mut() {
                channel.push(read_sample(self, bit_depth).map_err(&truncated)?);
            }
        }
        Ok(())
    }

    fn read_tag(&mut self) -> io::Result<[u8; 4]> {
        let mut tag: [u8; 4] = [0; 4];
        self.read_exact(&mut tag)?;
        Ok(tag)
    }

    fn read_chunk_size(&mut self) -> io::Result<u32> {
        self.read_u32::<LittleEndian>()
    }
}

impl<T> ReadWaveExt for T where T: Read + Seek {}

// MARK: Tests
