use crate::algorithm::step::GraphStep;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    Finished,
    Cancelled,
}

/// Replays generated steps with a fixed delay between them.
///
/// Owns only the step list and a cursor; cancelling at any point leaves the
/// graph and the engine that produced the steps untouched.
pub struct Playback {
    steps: Vec<GraphStep>,
    position: usize,
    delay: Duration,
    last_advance: Instant,
    state: PlaybackState,
}

impl Playback {
    pub fn new(steps: Vec<GraphStep>, delay: Duration, now: Instant) -> Self {
        let state = if steps.len() > 1 {
            PlaybackState::Playing
        } else {
            PlaybackState::Finished
        };
        Self {
            steps,
            position: 0,
            delay,
            last_advance: now,
            state,
        }
    }

    pub fn current(&self) -> Option<&GraphStep> {
        match self.state {
            PlaybackState::Cancelled => None,
            _ => self.steps.get(self.position),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Advances when the delay has elapsed. Returns whether the frame changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.state != PlaybackState::Playing
            || now.saturating_duration_since(self.last_advance) < self.delay
        {
            return false;
        }
        self.last_advance = now;
        self.advance()
    }

    /// Moves one frame forward regardless of the delay.
    pub fn step_forward(&mut self) -> bool {
        match self.state {
            PlaybackState::Playing | PlaybackState::Paused => self.advance(),
            _ => false,
        }
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        self.state = match self.state {
            PlaybackState::Playing => PlaybackState::Paused,
            PlaybackState::Paused => {
                self.last_advance = now;
                PlaybackState::Playing
            }
            other => other,
        };
    }

    pub fn cancel(&mut self) {
        self.state = PlaybackState::Cancelled;
    }

    fn advance(&mut self) -> bool {
        if self.position + 1 >= self.steps.len() {
            self.state = PlaybackState::Finished;
            return false;
        }
        self.position += 1;
        if self.position + 1 == self.steps.len() {
            self.state = PlaybackState::Finished;
        }
        true
    }
}
