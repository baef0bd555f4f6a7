//! Delay-gated state counters
//!
//! The only time primitive in the simulation. Timers never sleep or schedule
//! anything; they are polled once per frame against the frame's wall-clock
//! sample and advance when enough real time has passed.

use std::time::{Duration, Instant};

/// Cycles through `max_states` states, advancing one state per `delay`.
///
/// With `once` set the animator latches `done` after the last state instead
/// of wrapping back to 0.
#[derive(Debug, Clone)]
pub struct Animator {
    delay: Duration,
    max_states: usize,
    once: bool,
    state: usize,
    done: bool,
    last_time: Instant,
}

impl Animator {
    pub fn new(delay: Duration, max_states: usize, once: bool, now: Instant) -> Self {
        Self {
            delay,
            max_states: max_states.max(1),
            once,
            state: 0,
            done: false,
            last_time: now,
        }
    }

    /// Repeating animator
    pub fn looping(delay: Duration, max_states: usize, now: Instant) -> Self {
        Self::new(delay, max_states, false, now)
    }

    /// Advance if `delay` has elapsed since the last advance; returns the state
    pub fn poll(&mut self, now: Instant) -> usize {
        if self.done {
            return self.state;
        }
        if now.saturating_duration_since(self.last_time) >= self.delay {
            self.last_time = now;
            self.state += 1;
            if self.state >= self.max_states {
                if self.once {
                    self.state = self.max_states - 1;
                    self.done = true;
                } else {
                    self.state = 0;
                }
            }
        }
        self.state
    }

    pub fn state(&self) -> usize {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Restart from state 0
    pub fn reset(&mut self, now: Instant) {
        self.state = 0;
        self.done = false;
        self.last_time = now;
    }
}

/// Binary armed/done latch.
///
/// `tick` reports `true` once `delay` has elapsed since `start`, and keeps
/// reporting `true` without side effects until the timer is started again.
#[derive(Debug, Clone)]
pub struct Timer {
    delay: Duration,
    started: Instant,
    done: bool,
}

impl Timer {
    /// Timer that starts in the done state (must be `start`ed to arm)
    pub fn new(delay: Duration, now: Instant) -> Self {
        Self {
            delay,
            started: now,
            done: true,
        }
    }

    /// Timer that is already armed and counting from `now`
    pub fn armed(delay: Duration, now: Instant) -> Self {
        Self {
            delay,
            started: now,
            done: false,
        }
    }

    /// Re-arm, counting from `now`
    pub fn start(&mut self, now: Instant) {
        self.started = now;
        self.done = false;
    }

    /// Force the done state
    pub fn stop(&mut self) {
        self.done = true;
    }

    /// Poll the timer; true once the delay has elapsed since `start`
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.done && now.saturating_duration_since(self.started) >= self.delay {
            self.done = true;
        }
        self.done
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }
}
