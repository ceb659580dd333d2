use std::io::Read;
use std::path::Path;

use hound::WavReader;
use log::debug;

use super::SampleBuffer;
use crate::error::{EchoError, Result};

/// Load one channel of a WAV file as a [`SampleBuffer`]
///
/// Float files are read as-is; integer files are scaled to `[-1, 1)`.
/// Multi-channel files are de-interleaved and only `channel` is kept.
pub fn load_wav<P: AsRef<Path>>(path: P, channel: usize) -> Result<SampleBuffer> {
    let reader = WavReader::open(path.as_ref())?;
    read_wav(reader, channel)
}

/// Same as [`load_wav`] for an already opened reader.
pub fn read_wav<R: Read>(reader: WavReader<R>, channel: usize) -> Result<SampleBuffer> {
    let spec = reader.spec();
    debug!(
        "WAV: {} Hz, {} channel(s), {} bit {:?}",
        spec.sample_rate, spec.channels, spec.bits_per_sample, spec.sample_format
    );

    let interleaved = read_samples(reader, &spec)?;
    SampleBuffer::from_interleaved(
        &interleaved,
        spec.channels as usize,
        channel,
        spec.sample_rate,
    )
}

fn read_samples<R: Read>(mut reader: WavReader<R>, spec: &hound::WavSpec) -> Result<Vec<f32>> {
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(EchoError::UnsupportedFormat(format!(
                    "{}-bit integer samples",
                    spec.bits_per_sample
                )));
            }
            let max_val = 2_f64.powi(spec.bits_per_sample as i32 - 1) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use std::io::Cursor;

    fn write_wav(spec: WavSpec, write: impl FnOnce(&mut WavWriter<&mut Cursor<Vec<u8>>>)) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            write(&mut writer);
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_read_int16_mono_is_normalized() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let bytes = write_wav(spec, |w| {
            w.write_sample(16384i16).unwrap();
            w.write_sample(-32768i16).unwrap();
            w.write_sample(0i16).unwrap();
        });

        let reader = WavReader::new(Cursor::new(bytes)).unwrap();
        let buffer = read_wav(reader, 0).unwrap();

        assert_eq!(buffer.sample_rate(), 8000);
        assert_eq!(buffer.samples(), &[0.5, -1.0, 0.0]);
    }

    #[test]
    fn test_read_float_stereo_channel() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let bytes = write_wav(spec, |w| {
            for (l, r) in [(0.1f32, 0.9f32), (0.2, 0.8)] {
                w.write_sample(l).unwrap();
                w.write_sample(r).unwrap();
            }
        });

        let reader = WavReader::new(Cursor::new(bytes.clone())).unwrap();
        assert_eq!(read_wav(reader, 1).unwrap().samples(), &[0.9, 0.8]);

        let reader = WavReader::new(Cursor::new(bytes)).unwrap();
        assert!(matches!(
            read_wav(reader, 2),
            Err(EchoError::ChannelOutOfRange { .. })
        ));
    }
}
