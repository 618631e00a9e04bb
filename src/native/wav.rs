//! WAV sample decoding (hound).

use std::path::Path;
use std::sync::Arc;

use crate::error::{Result, TrombaError};

/// Mono PCM for one recording.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleData {
    pub frames: Vec<f32>,
    pub sample_rate: u32,
}

impl SampleData {
    pub fn duration(&self) -> f64 {
        self.frames.len() as f64 / f64::from(self.sample_rate.max(1))
    }
}

fn load_error(path: &Path, message: impl ToString) -> TrombaError {
    TrombaError::SampleLoad {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Decode a WAV file to mono f32, averaging channels.
pub fn load_wav(path: &Path) -> Result<SampleData> {
    let mut reader = hound::WavReader::open(path).map_err(|e| load_error(path, e))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| load_error(path, e))?,
        hound::SampleFormat::Int => {
            let scale = match spec.bits_per_sample {
                8 | 16 | 24 | 32 => (1i64 << (spec.bits_per_sample - 1)) as f32,
                bits => return Err(load_error(path, format!("unsupported bit depth: {}", bits))),
            };
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| load_error(path, e))?
        }
    };

    let channels = usize::from(spec.channels.max(1));
    let frames = if channels == 1 {
        samples
    } else {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    Ok(SampleData { frames, sample_rate: spec.sample_rate })
}

/// Loader for [`SampleBank::load`](crate::SampleBank::load).
pub fn load_shared_wav(path: &Path) -> Result<Arc<SampleData>> {
    load_wav(path).map(Arc::new)
}
