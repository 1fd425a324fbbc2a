//! Interval bookkeeping for the cooperative control loop.
//!
//! The loop reads the clock once per iteration and asks each
//! [`PeriodicTask`] whether it is due.  A task's timestamp only moves when
//! the caller reports that the task actually ran, so a task skipped for an
//! external reason (e.g. network down) fires as soon as it is allowed again.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    one loop iteration                        │
//! │                                                              │
//! │   now_ms ──▶ Sample (3 s) ──▶ edges ──▶ motor step           │
//! │                                                              │
//! │          ──▶ NetworkReport (10 s, only while connected)      │
//! │          ──▶ SerialReport (2 s)                              │
//! │          ──▶ alerts ──▶ connectivity check                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Time is a wrapping `u32` millisecond counter; all comparisons use
//! `wrapping_sub` so the loop survives the 49-day rollover.

use log::debug;

use crate::config::SystemConfig;

// ═══════════════════════════════════════════════════════════════
//  Periodic task
// ═══════════════════════════════════════════════════════════════

/// Interval + last-fired timestamp for one gated task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTask {
    interval_ms: u32,
    last_fired_ms: u32,
}

impl PeriodicTask {
    /// A task whose clock starts at boot (time 0).
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_fired_ms: 0,
        }
    }

    /// True once at least one interval has elapsed since the last run.
    pub fn is_due(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_fired_ms) >= self.interval_ms
    }

    /// Record that the task ran at `now_ms`.
    pub fn mark_fired(&mut self, now_ms: u32) {
        self.last_fired_ms = now_ms;
    }

    /// Make the task due on the next check, regardless of when it last ran.
    pub fn expedite(&mut self, now_ms: u32) {
        self.last_fired_ms = now_ms.wrapping_sub(self.interval_ms);
    }

    /// Run `f` if the task is due and `allowed`, updating the timestamp only
    /// when `f` actually runs.
    pub fn run_if_due<R>(
        &mut self,
        now_ms: u32,
        allowed: bool,
        f: impl FnOnce() -> R,
    ) -> Option<R> {
        if !allowed || !self.is_due(now_ms) {
            return None;
        }
        let out = f();
        self.mark_fired(now_ms);
        Some(out)
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn last_fired_ms(&self) -> u32 {
        self.last_fired_ms
    }
}

// ═══════════════════════════════════════════════════════════════
//  Task table
// ═══════════════════════════════════════════════════════════════

/// Tasks that run on an interval.  Edge polling, motor stepping, alerts and
/// the connectivity check run every iteration and are not listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TaskId {
    Sample = 0,
    NetworkReport = 1,
    SerialReport = 2,
}

impl TaskId {
    pub const COUNT: usize = 3;

    pub fn label(self) -> &'static str {
        match self {
            Self::Sample => "sample",
            Self::NetworkReport => "network-report",
            Self::SerialReport => "serial-report",
        }
    }
}

/// The loop's timers, indexed by [`TaskId`].
#[derive(Debug, Clone)]
pub struct TaskTimers {
    tasks: [PeriodicTask; TaskId::COUNT],
}

impl TaskTimers {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            tasks: [
                PeriodicTask::new(config.sample_interval_ms),
                PeriodicTask::new(config.network_interval_ms),
                PeriodicTask::new(config.serial_interval_ms),
            ],
        }
    }

    pub fn get(&self, id: TaskId) -> &PeriodicTask {
        &self.tasks[id as usize]
    }

    pub fn get_mut(&mut self, id: TaskId) -> &mut PeriodicTask {
        &mut self.tasks[id as usize]
    }

    pub fn is_due(&self, id: TaskId, now_ms: u32) -> bool {
        self.get(id).is_due(now_ms)
    }

    pub fn mark_fired(&mut self, id: TaskId, now_ms: u32) {
        self.get_mut(id).mark_fired(now_ms);
    }

    /// Force `id` to run on the next iteration.
    pub fn expedite(&mut self, id: TaskId, now_ms: u32) {
        debug!("Scheduler: '{}' expedited", id.label());
        self.get_mut(id).expedite(now_ms);
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_at_interval_not_before() {
        let task = PeriodicTask::new(3_000);
        assert!(!task.is_due(0));
        assert!(!task.is_due(2_999));
        assert!(task.is_due(3_000));
    }

    #[test]
    fn run_if_due_updates_timestamp_only_when_run() {
        let mut task = PeriodicTask::new(10_000);
        let mut runs = 0;

        // Due but not allowed (e.g. WiFi down): timestamp untouched.
        assert!(task.run_if_due(10_000, false, || runs += 1).is_none());
        assert_eq!(task.last_fired_ms(), 0);

        // Allowed later: fires immediately, no extra interval wait.
        assert!(task.run_if_due(12_000, true, || runs += 1).is_some());
        assert_eq!(task.last_fired_ms(), 12_000);
        assert_eq!(runs, 1);

        // Not due again until a full interval later.
        assert!(task.run_if_due(21_999, true, || runs += 1).is_none());
        assert!(task.run_if_due(22_000, true, || runs += 1).is_some());
        assert_eq!(runs, 2);
    }

    #[test]
    fn survives_millis_rollover() {
        let mut task = PeriodicTask::new(2_000);
        task.mark_fired(u32::MAX - 500);
        assert!(!task.is_due(1_000)); // 1501 ms elapsed across the wrap
        assert!(task.is_due(1_500)); // 2001 ms elapsed
    }

    #[test]
    fn expedite_makes_task_due_now() {
        let mut timers = TaskTimers::from_config(&SystemConfig::default());
        timers.mark_fired(TaskId::SerialReport, 5_000);
        assert!(!timers.is_due(TaskId::SerialReport, 5_050));
        timers.expedite(TaskId::SerialReport, 5_050);
        assert!(timers.is_due(TaskId::SerialReport, 5_050));
    }

    #[test]
    fn timers_take_intervals_from_config() {
        let timers = TaskTimers::from_config(&SystemConfig::default());
        assert_eq!(timers.get(TaskId::Sample).interval_ms(), 3_000);
        assert_eq!(timers.get(TaskId::NetworkReport).interval_ms(), 10_000);
        assert_eq!(timers.get(TaskId::SerialReport).interval_ms(), 2_000);
    }
}
