//! Notification Sound
//!
//! Short sine tones for capture outcomes. Audio is best effort: when no
//! output is available, or playback fails, nothing user-visible happens.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Which tone to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// A sine tone with an exponential gain ramp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_secs: f32,
    pub start_gain: f32,
    pub end_gain: f32,
}

impl Tone {
    pub fn for_outcome(outcome: Outcome) -> Self {
        Self {
            frequency_hz: match outcome {
                Outcome::Success => 800.0,
                Outcome::Failure => 400.0,
            },
            duration_secs: 0.3,
            start_gain: 0.1,
            end_gain: 0.01,
        }
    }

    /// Gain at `t` seconds into the tone
    pub fn gain_at(&self, t: f32) -> f32 {
        let progress = (t / self.duration_secs).clamp(0.0, 1.0);
        self.start_gain * (self.end_gain / self.start_gain).powf(progress)
    }

    /// Mono PCM samples in [-1, 1]
    pub fn samples(&self, sample_rate: u32) -> Vec<f32> {
        let count = (self.duration_secs * sample_rate as f32).round() as usize;
        (0..count)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                let phase = 2.0 * std::f32::consts::PI * self.frequency_hz * t;
                phase.sin() * self.gain_at(t)
            })
            .collect()
    }
}

/// Something that can play PCM audio
pub trait AudioOutput: Send + Sync {
    fn sample_rate(&self) -> u32;

    fn play(&self, samples: &[f32]) -> Result<(), SoundError>;
}

/// Rings the terminal bell; the PCM buffer is not used
#[derive(Debug, Default)]
pub struct TerminalBell;

impl AudioOutput for TerminalBell {
    fn sample_rate(&self) -> u32 {
        8000
    }

    fn play(&self, samples: &[f32]) -> Result<(), SoundError> {
        if samples.is_empty() {
            return Ok(());
        }
        let mut stderr = std::io::stderr();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}

/// Discards everything
#[derive(Debug, Default)]
pub struct Silent;

impl AudioOutput for Silent {
    fn sample_rate(&self) -> u32 {
        8000
    }

    fn play(&self, _samples: &[f32]) -> Result<(), SoundError> {
        Ok(())
    }
}

/// Audio errors; never shown to the user
#[derive(Error, Debug)]
pub enum SoundError {
    #[error("Audio output unavailable")]
    Unavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Plays outcome tones when sound is enabled
pub struct Notifier {
    output: Option<Box<dyn AudioOutput>>,
    enabled: AtomicBool,
}

impl Notifier {
    pub fn new(output: Option<Box<dyn AudioOutput>>, enabled: bool) -> Self {
        Self {
            output,
            enabled: AtomicBool::new(enabled),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Play the tone for `outcome`, swallowing any failure
    pub fn notify(&self, outcome: Outcome) {
        if !self.is_enabled() {
            return;
        }

        let result = match &self.output {
            Some(output) => {
                let samples = Tone::for_outcome(outcome).samples(output.sample_rate());
                output.play(&samples)
            }
            None => Err(SoundError::Unavailable),
        };

        if let Err(e) = result {
            tracing::debug!(error = %e, "Audio not supported or blocked");
        }
    }
}
