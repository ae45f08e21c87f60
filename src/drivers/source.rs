use std::collections::VecDeque;
use std::f64::consts::TAU;
use std::time::{Duration, SystemTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::drivers::{AudioFrame, ScopeError};
/// Single batch of multi-channel audio samples, as delivered by a capture callback.
#[derive(Clone, Debug)]
pub struct SampleBatch {
    pub started_at: SystemTime,
    pub sample_rate_hz: f64,
    pub samples: Vec<Vec<f64>>, // channels x samples
}
impl SampleBatch {
    pub fn new(sample_rate_hz: f64, samples: Vec<Vec<f64>>) -> Self {
        Self {
            started_at: SystemTime::now(),
            sample_rate_hz,
            samples,
        }
    }
    pub fn validate(&self) -> Result<(), ScopeError> {
        if !(self.sample_rate_hz > 0.0) {
            return Err(ScopeError::InvalidSampleRate);
        }
        if self.samples.is_empty() {
            return Err(ScopeError::ChannelMismatch {
                expected: 1,
                actual: 0,
            });
        }
        let len = self.samples[0].len();
        if let Some(bad) = self.samples.iter().find(|c| c.len() != len) {
            return Err(ScopeError::ChannelLength {
                expected: len,
                actual: bad.len(),
            });
        }
        Ok(())
    }
    pub fn num_channels(&self) -> usize {
        self.samples.len()
    }
    pub fn samples_per_channel(&self) -> Option<usize> {
        self.samples.first().map(|c| c.len())
    }
    pub fn duration(&self) -> Option<Duration> {
        self.samples_per_channel()
            .map(|len| Duration::from_secs_f64(len as f64 / self.sample_rate_hz))
    }
}
/// Something that can yield sample batches on demand (capture callback, file, generator).
pub trait BatchSource {
    fn next_batch(&mut self) -> Result<Option<SampleBatch>, ScopeError>;
}
/// Read side of the audio buffer: the most recent `n` samples of every channel.
pub trait SampleSource {
    fn sampling_rate(&self) -> f64;
    fn channel_count(&self) -> usize;
    fn data(&self, n: usize) -> Result<AudioFrame, ScopeError>;
}
/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<SampleBatch>,
}
impl ManualSource {
    pub fn new(batches: impl IntoIterator<Item = SampleBatch>) -> Self {
        Self {
            queue: batches.into_iter().collect(),
        }
    }
}
impl BatchSource for ManualSource {
    fn next_batch(&mut self) -> Result<Option<SampleBatch>, ScopeError> {
        Ok(self.queue.pop_front())
    }
}
/// Synthetic sine generator standing in for a capture device.
///
/// Channel `k` plays `frequency_hz * (k + 1)`, so a stereo scope shows the
/// fundamental next to its octave. Optional uniform noise is seeded for
/// reproducible runs.
pub struct ToneSource {
    sample_rate_hz: f64,
    channels: usize,
    frequency_hz: f64,
    amplitude: f64,
    noise: f64,
    batch_len: usize,
    position: u64,
    rng: StdRng,
}
impl ToneSource {
    pub fn new(
        sample_rate_hz: f64,
        channels: usize,
        frequency_hz: f64,
        amplitude: f64,
        batch_len: usize,
    ) -> Result<Self, ScopeError> {
        if !(sample_rate_hz > 0.0) {
            return Err(ScopeError::InvalidSampleRate);
        }
        if channels == 0 {
            return Err(ScopeError::ChannelMismatch {
                expected: 1,
                actual: 0,
            });
        }
        Ok(Self {
            sample_rate_hz,
            channels,
            frequency_hz,
            amplitude,
            noise: 0.0,
            batch_len,
            position: 0,
            rng: StdRng::seed_from_u64(0x5c0b_e),
        })
    }
    pub fn with_noise(mut self, noise: f64, seed: u64) -> Self {
        self.noise = noise.abs();
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}
impl BatchSource for ToneSource {
    fn next_batch(&mut self) -> Result<Option<SampleBatch>, ScopeError> {
        let start = self.position;
        let mut samples = vec![Vec::with_capacity(self.batch_len); self.channels];
        for i in 0..self.batch_len {
            let t = (start + i as u64) as f64 / self.sample_rate_hz;
            for (k, channel) in samples.iter_mut().enumerate() {
                let f = self.frequency_hz * (k + 1) as f64;
                let mut v = self.amplitude * (TAU * f * t).sin();
                if self.noise > 0.0 {
                    v += self.rng.gen_range(-self.noise..=self.noise);
                }
                channel.push(v.clamp(-1.0, 1.0));
            }
        }
        self.position += self.batch_len as u64;
        Ok(Some(SampleBatch::new(self.sample_rate_hz, samples)))
    }
}
