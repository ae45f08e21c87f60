use crate::drivers::error::ScopeError;
use crate::drivers::source::{BatchSource, SampleBatch, SampleSource};
use crate::drivers::AudioBuffer;
/// Moves batches from a source into the rolling buffer the views read from.
pub struct AudioPipeline<S: BatchSource> {
    source: S,
    buffer: Option<AudioBuffer>,
    history_seconds: f64,
}
impl<S: BatchSource> AudioPipeline<S> {
    pub fn new(source: S, history_seconds: f64) -> Self {
        Self {
            source,
            buffer: None,
            history_seconds,
        }
    }
    /// Pulls one batch. Returns `false` once the source has nothing pending.
    pub fn pump_once(&mut self) -> Result<bool, ScopeError> {
        let Some(batch) = self.source.next_batch()? else {
            return Ok(false);
        };
        self.push(batch)?;
        Ok(true)
    }
    /// Drains the source, at most `max_batches` at a time.
    pub fn pump_all(&mut self, max_batches: usize) -> Result<usize, ScopeError> {
        let mut pumped = 0;
        while pumped < max_batches && self.pump_once()? {
            pumped += 1;
        }
        Ok(pumped)
    }
    pub fn push(&mut self, batch: SampleBatch) -> Result<(), ScopeError> {
        let buffer = self.ensure_buffer(&batch)?;
        buffer.push_batch(&batch)
    }
    pub fn buffer(&self) -> Result<&AudioBuffer, ScopeError> {
        self.buffer.as_ref().ok_or(ScopeError::BufferUninitialized)
    }
    fn ensure_buffer(&mut self, batch: &SampleBatch) -> Result<&mut AudioBuffer, ScopeError> {
        if self.buffer.is_none() {
            batch.validate()?;
            let buffer = AudioBuffer::with_history_seconds(
                batch.num_channels(),
                batch.sample_rate_hz,
                self.history_seconds,
            )?;
            log::info!(
                "audio buffer: {} channel(s) at {} Hz, {} samples of history, first batch {:?}",
                buffer.channel_count(),
                buffer.sampling_rate(),
                buffer.capacity(),
                batch.duration().unwrap_or_default()
            );
            self.buffer = Some(buffer);
        }
        self.buffer
            .as_mut()
            .ok_or(ScopeError::BufferUninitialized)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::source::ManualSource;
    #[test]
    fn pipeline_buffers_batches_lazily() {
        let batches = vec![
            SampleBatch::new(250.0, vec![vec![0.0; 128], vec![1.0; 128]]),
            SampleBatch::new(250.0, vec![vec![0.5; 64], vec![-1.0; 64]]),
        ];
        let mut pipeline = AudioPipeline::new(ManualSource::new(batches), 1.0);
        assert!(matches!(
            pipeline.buffer(),
            Err(ScopeError::BufferUninitialized)
        ));
        assert_eq!(pipeline.pump_all(10).unwrap(), 2);
        assert!(!pipeline.pump_once().unwrap());
        let buffer = pipeline.buffer().unwrap();
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.sampling_rate(), 250.0);
        let frame = buffer.data(192).unwrap();
        assert_eq!(frame.channel(0).unwrap()[191], 0.5);
        assert_eq!(frame.channel(1).unwrap()[0], 1.0);
    }
    #[test]
    fn pump_all_respects_batch_limit() {
        let batches = (0..5).map(|_| SampleBatch::new(100.0, vec![vec![0.0; 10]]));
        let mut pipeline = AudioPipeline::new(ManualSource::new(batches), 1.0);
        assert_eq!(pipeline.pump_all(3).unwrap(), 3);
        assert_eq!(pipeline.buffer().unwrap().available(), 30);
    }
}
