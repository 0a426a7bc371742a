//! The simulation clock: step counter plus calendar time.
//!
//! Created once consistency checks pass, advanced by exactly one
//! delta-t per run-loop iteration, and mutated only by the engine.

use std::error::Error;
use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// Errors from [`SimulationStatus::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusError {
    /// The end date is not strictly after the begin date.
    EndBeforeBegin {
        /// Configured begin date.
        begin: DateTime<Utc>,
        /// Configured end date.
        end: DateTime<Utc>,
    },
    /// The step duration is zero or negative.
    NonPositiveDeltaT {
        /// The invalid duration in seconds.
        seconds: i64,
    },
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndBeforeBegin { begin, end } => {
                write!(f, "end date {end} is not after begin date {begin}")
            }
            Self::NonPositiveDeltaT { seconds } => {
                write!(f, "delta-t must be positive, got {seconds}s")
            }
        }
    }
}

impl Error for StatusError {}

/// Mutable step counter and calendar clock driving the run loop.
#[derive(Clone, Debug)]
pub struct SimulationStatus {
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    delta_t: Duration,
    steps_count: usize,
    current_step: usize,
    current_time: DateTime<Utc>,
}

impl SimulationStatus {
    /// Build a status covering `[begin, end]` with a fixed step of
    /// `delta_t_seconds`.
    ///
    /// Step 0 falls on `begin`; the last step is the largest
    /// `begin + k * delta_t` that does not pass `end`.
    pub fn new(
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
        delta_t_seconds: i64,
    ) -> Result<Self, StatusError> {
        if delta_t_seconds <= 0 {
            return Err(StatusError::NonPositiveDeltaT {
                seconds: delta_t_seconds,
            });
        }
        if end <= begin {
            return Err(StatusError::EndBeforeBegin { begin, end });
        }
        let span = (end - begin).num_seconds();
        let steps_count = (span / delta_t_seconds) as usize + 1;
        Ok(Self {
            begin,
            end,
            delta_t: Duration::seconds(delta_t_seconds),
            steps_count,
            current_step: 0,
            current_time: begin,
        })
    }

    /// Begin date of the simulated period.
    pub fn begin(&self) -> DateTime<Utc> {
        self.begin
    }

    /// End date of the simulated period.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Fixed step duration.
    pub fn delta_t(&self) -> Duration {
        self.delta_t
    }

    /// Total number of steps the run loop will execute.
    pub fn steps_count(&self) -> usize {
        self.steps_count
    }

    /// Zero-based index of the current step.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Calendar time of the current step.
    pub fn current_time(&self) -> DateTime<Utc> {
        self.current_time
    }

    /// Whether the clock sits on step 0.
    pub fn is_first_step(&self) -> bool {
        self.current_step == 0
    }

    /// Whether the clock sits on the final step.
    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 == self.steps_count
    }

    /// Advance to the next step. Returns `false`, leaving the clock on
    /// the final step, when the next time would pass the end date.
    pub fn switch_to_next_step(&mut self) -> bool {
        let next_time = self.current_time + self.delta_t;
        if next_time > self.end {
            return false;
        }
        self.current_step += 1;
        self.current_time = next_time;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn daily_steps_over_ten_days() {
        // 10 whole days inclusive of both endpoints: 10 steps of 86400s
        // starting at begin, plus step 0 itself.
        let status = SimulationStatus::new(date(2001, 1, 1), date(2001, 1, 10), 86400).unwrap();
        assert_eq!(status.steps_count(), 10);
        assert!(status.is_first_step());
        assert!(!status.is_last_step());
    }

    #[test]
    fn advances_one_delta_t_per_switch() {
        let mut status = SimulationStatus::new(date(2001, 1, 1), date(2001, 1, 3), 86400).unwrap();
        assert_eq!(status.steps_count(), 3);

        assert!(status.switch_to_next_step());
        assert_eq!(status.current_step(), 1);
        assert_eq!(status.current_time(), date(2001, 1, 2));

        assert!(status.switch_to_next_step());
        assert!(status.is_last_step());

        // Terminal: no further step is available, clock stays put.
        assert!(!status.switch_to_next_step());
        assert_eq!(status.current_step(), 2);
        assert_eq!(status.current_time(), date(2001, 1, 3));
    }

    #[test]
    fn partial_final_interval_is_dropped() {
        // 2.5 hours with hourly steps: steps at 0h, 1h, 2h only.
        let begin = date(2001, 6, 1);
        let end = begin + Duration::seconds(9000);
        let status = SimulationStatus::new(begin, end, 3600).unwrap();
        assert_eq!(status.steps_count(), 3);
    }

    #[test]
    fn invalid_periods_rejected() {
        assert!(matches!(
            SimulationStatus::new(date(2001, 1, 10), date(2001, 1, 1), 60),
            Err(StatusError::EndBeforeBegin { .. })
        ));
        assert!(matches!(
            SimulationStatus::new(date(2001, 1, 1), date(2001, 1, 2), 0),
            Err(StatusError::NonPositiveDeltaT { .. })
        ));
    }
}
