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

use crate::error::Result;
use crate::sample::BitDepth;

pub const RIFF_TAG: &[u8; 4] = b"RIFF";
pub const WAVE_TAG: &[u8; 4] = b"WAVE";
pub const FMT_TAG: &[u8; 4] = b"fmt ";
pub const DATA_TAG: &[u8; 4] = b"data";

pub const FORMAT_UNCOMPRESSED_PCM: u16 = 1;

/// Size of the PCM "fmt " body: format, channels, rate, byte rate, block
/// align and bits per sample.
pub const PCM_FMT_CHUNK_SIZE: u32 = 16;

/// Size of the canonical header, up to and including the data chunk size.
pub const CANONICAL_HEADER_SIZE: usize = 44;

/// The fields of the canonical 44-byte wave header, as read from the file.
///
/// `chunk_size`, `byte_rate` and `block_align` are kept as they were found and
/// are never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaveHeader {
    pub chunk_id: [u8; 4],
    pub chunk_size: u32,
    pub format: [u8; 4],

    pub fmt_chunk_id: [u8; 4],
    pub fmt_chunk_size: u32,
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,

    pub data_chunk_id: [u8; 4],
    pub data_chunk_size: u32,
}

impl WaveHeader {
    /// Returns the bit depth, or `UnsupportedBitsPerSample`.
    pub fn bit_depth(&self) -> Result<BitDepth> {
        BitDepth::from_bits(self.bits_per_sample)
    }

    /// The number of samples per channel held by the data chunk. Bytes that
    /// don't make up a whole frame are not counted. Returns 0 if the channel
    /// count or bits per sample is zero.
    pub fn num_samples(&self) -> u32 {
        let bits_per_frame = self.num_channels as u64 * self.bits_per_sample as u64;
        if bits_per_frame == 0 {
            return 0;
        }
        (self.data_chunk_size as u64 * 8 / bits_per_frame) as u32
    }

    /// Duration of the audio in seconds, or 0 if the sample rate is zero.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_samples() as f64 / self.sample_rate as f64
    }

    // Bytes of the data chunk that are covered by whole frames.
    pub(crate) fn frame_bytes(&self, bit_depth: BitDepth) -> u64 {
        self.num_samples() as u64 * self.num_channels as u64 * bit_depth.bytes() as u64
    }
}
