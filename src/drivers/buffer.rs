use std::collections::VecDeque;
use ndarray::{Array2, ArrayView1};
use crate::drivers::{SampleBatch, SampleSource, ScopeError};
/// Immutable snapshot of multi-channel audio, shaped `[channels, samples]`.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioFrame {
    data: Array2<f64>,
}
impl AudioFrame {
    pub fn from_channels(channels: Vec<Vec<f64>>) -> Result<Self, ScopeError> {
        let rows = channels.len();
        if rows == 0 {
            return Err(ScopeError::ChannelMismatch {
                expected: 1,
                actual: 0,
            });
        }
        let cols = channels[0].len();
        if let Some(bad) = channels.iter().find(|c| c.len() != cols) {
            return Err(ScopeError::ChannelLength {
                expected: cols,
                actual: bad.len(),
            });
        }
        let data = Array2::from_shape_fn((rows, cols), |(r, c)| channels[r][c]);
        Ok(Self { data })
    }
    pub fn num_channels(&self) -> usize {
        self.data.nrows()
    }
    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.data.ncols()
    }
    pub fn is_empty(&self) -> bool {
        self.data.ncols() == 0
    }
    pub fn channel(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.data.nrows()).then(|| self.data.row(index))
    }
}
/// Rolling buffer that stores the most recent samples per channel.
pub struct AudioBuffer {
    per_channel: Vec<VecDeque<f64>>, // channel -> samples
    sample_rate_hz: f64,
    capacity: usize,
}
impl AudioBuffer {
    pub fn with_history_seconds(
        channels: usize,
        sample_rate_hz: f64,
        history_seconds: f64,
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
        let capacity = (sample_rate_hz * history_seconds).ceil().max(1.0) as usize;
        let per_channel = (0..channels)
            .map(|_| VecDeque::with_capacity(capacity))
            .collect();
        Ok(Self {
            per_channel,
            sample_rate_hz,
            capacity,
        })
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    /// Samples currently held per channel.
    pub fn available(&self) -> usize {
        self.per_channel.first().map(VecDeque::len).unwrap_or(0)
    }
    pub fn push_batch(&mut self, batch: &SampleBatch) -> Result<(), ScopeError> {
        batch.validate()?;
        if batch.sample_rate_hz != self.sample_rate_hz {
            return Err(ScopeError::SampleRateMismatch {
                expected: self.sample_rate_hz,
                actual: batch.sample_rate_hz,
            });
        }
        if batch.num_channels() != self.per_channel.len() {
            return Err(ScopeError::ChannelMismatch {
                expected: self.per_channel.len(),
                actual: batch.num_channels(),
            });
        }
        for (channel_queue, new_samples) in self.per_channel.iter_mut().zip(&batch.samples) {
            for &sample in new_samples {
                if channel_queue.len() == self.capacity {
                    channel_queue.pop_front();
                }
                channel_queue.push_back(sample);
            }
        }
        Ok(())
    }
}
impl SampleSource for AudioBuffer {
    fn sampling_rate(&self) -> f64 {
        self.sample_rate_hz
    }
    fn channel_count(&self) -> usize {
        self.per_channel.len()
    }
    fn data(&self, n: usize) -> Result<AudioFrame, ScopeError> {
        // waiting longer will not help here
        if n > self.capacity {
            return Err(ScopeError::HistoryTooShort {
                requested: n,
                capacity: self.capacity,
            });
        }
        let available = self.available();
        if available < n {
            return Err(ScopeError::InsufficientData {
                requested: n,
                available,
            });
        }
        let channels: Vec<Vec<f64>> = self
            .per_channel
            .iter()
            .map(|channel| channel.iter().skip(channel.len() - n).copied().collect())
            .collect();
        AudioFrame::from_channels(channels)
    }
}
