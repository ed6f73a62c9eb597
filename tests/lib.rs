extern crate pcm_wave;
extern crate tempfile;

use std::fs;
use std::path::Path;

use pcm_wave::{Error, FormatErrorKind, Scaling, WaveFile};

// Builds a PCM wave file with the given extra chunks placed between "fmt "
// and "data".
fn wave_bytes(num_channels: u16,
              sample_rate: u32,
              bits_per_sample: u16,
              extra_chunks: &[u8],
              data: &[u8])
              -> Vec<u8> {
    let block_align = num_channels * bits_per_sample / 8;
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&((36 + extra_chunks.len() + data.len()) as u32).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&num_channels.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&bits_per_sample.to_le_bytes());
    bytes.extend_from_slice(extra_chunks);
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
    bytes.extend_from_slice(data);
    bytes
}

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_load_mono_16bit_8000() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "mono.wav", &wave_bytes(1, 8000, 16, &[], b"\x00\x00\xFF\x7F"));

    let wave: WaveFile = WaveFile::open(&path).unwrap();
    assert_eq!(1, wave.audio_format());
    assert_eq!(1, wave.num_channels());
    assert_eq!(8000, wave.sample_rate());
    assert_eq!(16, wave.bit_depth());
    assert_eq!(2, wave.num_samples());
    assert_eq!(0.00025, wave.duration_seconds());
    assert_eq!(&[0.0f32, 0.999969482421875][..], wave.channel(0).unwrap());
    assert_eq!(Some(path.as_path()), wave.path());
}

#[test]
fn test_every_channel_has_num_samples() {
    let dir = tempfile::tempdir().unwrap();
    let data: Vec<u8> = (0..3 * 3 * 10).map(|n| n as u8).collect();
    let path = write_file(dir.path(), "three.wav", &wave_bytes(3, 44100, 24, &[], &data));

    let wave: WaveFile = WaveFile::open(&path).unwrap();
    let expected = wave.header().data_chunk_size * 8 /
                   (wave.num_channels() as u32 * wave.bit_depth() as u32);
    assert_eq!(10, expected);
    assert_eq!(3, wave.samples().len());
    for channel in wave.samples() {
        assert_eq!(expected as usize, channel.len());
    }
}

#[test]
fn test_junk_chunk_loads_identically() {
    let dir = tempfile::tempdir().unwrap();
    let data = b"\x00\x00\x00\x80\x00\x40\x00\xC0";
    let plain = write_file(dir.path(), "plain.wav", &wave_bytes(2, 22050, 16, &[], data));
    let junk = write_file(dir.path(),
                          "junk.wav",
                          &wave_bytes(2,
                                      22050,
                                      16,
                                      b"JUNK\x08\x00\x00\x00\xDE\xAD\xBE\xEF\x01\x02\x03\x04",
                                      data));

    let plain: WaveFile = WaveFile::open(&plain).unwrap();
    let junk: WaveFile = WaveFile::open(&junk).unwrap();
    assert_eq!(plain.samples(), junk.samples());
    assert_eq!(plain.num_samples(), junk.num_samples());
    assert_eq!(plain.header().data_chunk_size, junk.header().data_chunk_size);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.wav");
    match WaveFile::<f32>::open(&path) {
        Err(Error::FileNotFound { path: ref p, .. }) => assert_eq!(&path, p),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_load_unsupported_bits_per_sample() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "12bit.wav", &wave_bytes(1, 8000, 12, &[], b"\x00\x00\x00"));
    match WaveFile::<f32>::open(&path) {
        Err(Error::UnsupportedBitsPerSample(12)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_write_unsupported_bits_per_sample_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.wav");

    let wave: WaveFile = WaveFile::new();
    match wave.write_to(&out) {
        Err(Error::UnsupportedBitsPerSample(0)) => {}
        other => panic!("unexpected {:?}", other),
    }
    assert!(!out.exists());
}

#[test]
fn test_load_not_a_wave_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "fake.wav", b"JPEG\x00\x00\x00\x00JFIF");
    match WaveFile::<f32>::open(&path) {
        Err(Error::Format(FormatErrorKind::NotARiffFile)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_write_to_unwritable_path() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_file(dir.path(), "in.wav", &wave_bytes(1, 8000, 8, &[], b"\x80"));
    let wave: WaveFile = WaveFile::open(&source).unwrap();

    let out = dir.path().join("no-such-dir").join("out.wav");
    match wave.write_to(&out) {
        Err(Error::FileNotFound { .. }) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_write_drops_unknown_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let data = b"\x00\x00\x00\x80";
    let source = write_file(dir.path(),
                            "list.wav",
                            &wave_bytes(1, 8000, 16, b"LIST\x04\x00\x00\x00INFO", data));

    let mut wave: WaveFile = WaveFile::with_scaling(Scaling::Symmetric);
    wave.load(&source).unwrap();
    let out = dir.path().join("out.wav");
    wave.write_to(&out).unwrap();

    let written = fs::read(&out).unwrap();
    assert_eq!(44 + data.len(), written.len());
    assert_eq!(&b"data"[..], &written[36..40]);
    assert_eq!(&data[..], &written[44..]);
}

#[test]
fn test_write_in_place_round_trips_every_depth_symmetrically() {
    let dir = tempfile::tempdir().unwrap();
    let cases: [(u16, &[u8]); 4] = [(8, b"\x00\x80\xFF\x01"),
                                    (16, b"\x00\x80\xFF\x7F\x34\x12\x00\x00"),
                                    (24, b"\x00\x00\x80\xFF\xFF\x7F\x56\x34\x12\x00\x00\x00"),
                                    (32, b"\x00\x00\x00\x80\xFF\xFF\xFF\x7F\x78\x56\x34\x12\x00\x00\x00\x00")];

    for &(bits, data) in cases.iter() {
        let bytes = wave_bytes(2, 48000, bits, &[], data);
        let path = write_file(dir.path(), &format!("{}.wav", bits), &bytes);

        let mut wave: WaveFile<f64> = WaveFile::with_scaling(Scaling::Symmetric);
        wave.load(&path).unwrap();
        wave.write().unwrap();

        assert_eq!(bytes, fs::read(&path).unwrap());
    }
}

#[test]
fn test_legacy_write_is_stable_at_zero_and_drifts_elsewhere() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "legacy.wav", &wave_bytes(1, 8000, 16, &[], b"\x00\x00\x00\x40"));

    let mut wave: WaveFile = WaveFile::new();
    wave.load(&path).unwrap();
    wave.write().unwrap();
    wave.load(&path).unwrap();

    // 16384 * 32767 / 32768 truncates to 16383.
    assert_eq!(&[0.0f32, 16383.0 / 32768.0][..], wave.channel(0).unwrap());
}

#[test]
fn test_f32_and_f64_agree() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(),
                          "precision.wav",
                          &wave_bytes(1, 8000, 32, &[], b"\x01\x00\x00\x00\xFF\xFF\xFF\x7F"));

    let single: WaveFile<f32> = WaveFile::open(&path).unwrap();
    let double: WaveFile<f64> = WaveFile::open(&path).unwrap();
    for (a, b) in single.channel(0).unwrap().iter().zip(double.channel(0).unwrap()) {
        assert_eq!(*a, *b as f32);
    }
    assert_eq!(1.0 / 2147483648.0, double.channel(0).unwrap()[0]);
}
