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

//! Conversions between little-endian PCM integers and normalized floats.

use std::fmt;
use std::io;
use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};

/// A floating-point type that decoded samples are stored as.
pub trait Sample: Copy + PartialOrd + Default + fmt::Debug {
    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl Sample for f32 {
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// The supported PCM container sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    /// Unsigned 8-bit, biased by 128.
    Eight,
    /// Signed 16-bit.
    Sixteen,
    /// Signed 24-bit, packed into three bytes.
    TwentyFour,
    /// Signed 32-bit.
    ThirtyTwo,
}

impl BitDepth {
    /// Returns the bit depth for a `bits_per_sample` header value.
    pub fn from_bits(bits_per_sample: u16) -> Result<BitDepth> {
        match bits_per_sample {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            24 => Ok(BitDepth::TwentyFour),
            32 => Ok(BitDepth::ThirtyTwo),
            _ => Err(Error::UnsupportedBitsPerSample(bits_per_sample)),
        }
    }

    /// The `bits_per_sample` header value.
    pub fn bits(self) -> u16 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
            BitDepth::TwentyFour => 24,
            BitDepth::ThirtyTwo => 32,
        }
    }

    /// Bytes taken by one sample of one channel.
    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    // Magnitude of the most negative value, 2^(bits - 1).
    fn negative_extreme(self) -> f64 {
        match self {
            BitDepth::Eight => 128.0,
            BitDepth::Sixteen => 32_768.0,
            BitDepth::TwentyFour => 8_388_608.0,
            BitDepth::ThirtyTwo => 2_147_483_648.0,
        }
    }

    // Largest representable value, 2^(bits - 1) - 1.
    fn positive_extreme(self) -> f64 {
        self.negative_extreme() - 1.0
    }
}

/// Selects the scale factors used when encoding samples.
///
/// Decoding always divides by the magnitude of the most negative value
/// (128, 32768, 8388608 or 2147483648).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaling {
    /// Encode by multiplying with the largest positive value (255 for 8-bit,
    /// 32767, 8388607, 2147483647) and truncating. Bit-exact with files
    /// written by earlier tools that used these factors, but a decoded
    /// non-zero sample loses one LSB of magnitude on every re-encode.
    Legacy,
    /// Encode with the same factors decode uses, rounding and saturating, so
    /// that decode followed by encode reproduces every integer sample.
    Symmetric,
}

impl Default for Scaling {
    fn default() -> Scaling {
        Scaling::Legacy
    }
}

/// Reads one little-endian sample and normalizes it.
pub fn read_sample<S, R>(reader: &mut R, bit_depth: BitDepth) -> io::Result<S>
    where S: Sample,
          R: Read + ?Sized
{
    let raw = match bit_depth {
        BitDepth::Eight => reader.read_u8()? as f64 - 128.0,
        BitDepth::Sixteen => reader.read_i16::<LittleEndian>()? as f64,
        BitDepth::TwentyFour => reader.read_i24::<LittleEndian>()? as f64,
        BitDepth::ThirtyTwo => reader.read_i32::<LittleEndian>()? as f64,
    };
    Ok(S::from_f64(raw / bit_depth.negative_extreme()))
}

/// Clamps a sample to [-1.0, 1.0] and writes it as a little-endian integer.
/// NaN is written as silence.
pub fn write_sample<S, W>(writer: &mut W,
                          sample: S,
                          bit_depth: BitDepth,
                          scaling: Scaling)
                          -> io::Result<()>
    where S: Sample,
          W: Write + ?Sized
{
    let value = sample.to_f64();
    let clamped = if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) };
    match bit_depth {
        BitDepth::Eight => writer.write_u8(encode_u8(clamped, scaling)),
        BitDepth::Sixteen => {
            writer.write_i16::<LittleEndian>(encode_signed(clamped, bit_depth, scaling) as i16)
        }
        BitDepth::TwentyFour => {
            writer.write_i24::<LittleEndian>(encode_signed(clamped, bit_depth, scaling))
        }
        BitDepth::ThirtyTwo => {
            writer.write_i32::<LittleEndian>(encode_signed(clamped, bit_depth, scaling))
        }
    }
}

fn encode_u8(clamped: f64, scaling: Scaling) -> u8 {
    match scaling {
        Scaling::Legacy => ((clamped + 1.0) / 2.0 * 255.0) as u8,
        Scaling::Symmetric => ((clamped * 128.0).round() + 128.0).clamp(0.0, 255.0) as u8,
    }
}

fn encode_signed(clamped: f64, bit_depth: BitDepth, scaling: Scaling) -> i32 {
    match scaling {
        // Float to int casts truncate toward zero.
        Scaling::Legacy => (clamped * bit_depth.positive_extreme()) as i32,
        Scaling::Symmetric => {
            let max = bit_depth.positive_extreme();
            let min = -bit_depth.negative_extreme();
            (clamped * bit_depth.negative_extreme()).round().clamp(min, max) as i32
        }
    }
}

// MARK: Tests
