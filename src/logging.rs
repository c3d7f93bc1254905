// src/logging.rs
//
// Event sinks for episode runs.
// - EventSink: trait used by the episode runner
// - NoopSink:  discards all events
// - LineSink:  writes one `key=value` line per event, gated by verbosity
//
// Per-step records are never persisted to files; sinks only report.

use std::io::{self, Write};

use crate::actions::Medication;
use crate::env::StepResult;
use crate::observation::Observation;
use crate::runner::EpisodeSummary;

/// Abstract sink for episode events.
pub trait EventSink {
    fn log_reset(&mut self, episode_id: u64, seed: u64, obs: &Observation);

    fn log_step(&mut self, episode_id: u64, medication: Medication, result: &StepResult);

    fn log_episode_end(&mut self, summary: &EpisodeSummary);
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn log_reset(&mut self, episode_id: u64, seed: u64, obs: &Observation) {
        (**self).log_reset(episode_id, seed, obs)
    }

    fn log_step(&mut self, episode_id: u64, medication: Medication, result: &StepResult) {
        (**self).log_step(episode_id, medication, result)
    }

    fn log_episode_end(&mut self, summary: &EpisodeSummary) {
        (**self).log_episode_end(summary)
    }
}

/// Sink that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn log_reset(&mut self, _episode_id: u64, _seed: u64, _obs: &Observation) {}

    fn log_step(&mut self, _episode_id: u64, _medication: Medication, _result: &StepResult) {}

    fn log_episode_end(&mut self, _summary: &EpisodeSummary) {}
}

/// Line-oriented sink.
///
/// Verbosity: 0 = silent, 1 = episode start/end, 2 = every step as well.
pub struct LineSink<W: Write> {
    writer: W,
    verbosity: u8,
}

/// Sink writing to stderr (keeps stdout free for renders / JSON output).
pub type StderrSink = LineSink<io::Stderr>;

impl LineSink<io::Stderr> {
    pub fn stderr(verbosity: u8) -> Self {
        Self::new(io::stderr(), verbosity)
    }
}

impl<W: Write> LineSink<W> {
    pub fn new(writer: W, verbosity: u8) -> Self {
        Self { writer, verbosity }
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, line: String) {
        // If logging fails we don't want to abort the episode,
        // so we deliberately ignore I/O errors.
        let _ = self.writer.write_all(line.as_bytes());
        let _ = self.writer.flush();
    }
}

impl<W: Write> EventSink for LineSink<W> {
    fn log_reset(&mut self, episode_id: u64, seed: u64, obs: &Observation) {
        if self.verbosity < 1 {
            return;
        }
        self.emit(format!(
            "event=reset episode={} seed={} age={:.2} bmi={:.2} glucose={:.2}\n",
            episode_id, seed, obs.age, obs.bmi, obs.glucose
        ));
    }

    fn log_step(&mut self, episode_id: u64, medication: Medication, result: &StepResult) {
        if self.verbosity < 2 {
            return;
        }
        self.emit(format!(
            "event=step episode={} step={} action={} glucose={:.2} reward={} band={} score={} done={}\n",
            episode_id,
            result.info.step,
            medication.name(),
            result.observation.glucose,
            result.reward,
            result.info.band.as_str(),
            result.info.score,
            result.done,
        ));
    }

    fn log_episode_end(&mut self, summary: &EpisodeSummary) {
        if self.verbosity < 1 {
            return;
        }
        self.emit(format!(
            "event=episode_end episode={} seed={} steps={} episode_score={} score={} total_reward={} time_in_range={:.3} mean_glucose={:.2}\n",
            summary.episode_id,
            summary.seed,
            summary.steps,
            summary.episode_score,
            summary.cumulative_score,
            summary.total_reward,
            summary.time_in_range,
            summary.mean_glucose,
        ));
    }
}
