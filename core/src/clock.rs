//! Practice timers — in-game time, section and star-grab timers, counters.
//!
//! The in-game-time counter is the frame stamp recorded by captures.

use crate::types::Frame;
use serde::{Deserialize, Serialize};

/// Host update rate assumed when converting frames to clock time.
pub const FRAMES_PER_SECOND: u32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PracticeTimers {
    pub igt_frames:        Frame,
    pub section_frames:    Frame,
    pub star_grab_frames:  Frame,
    pub attempts:          u32,
    pub lag_frames:        u32,
    pub running:           bool,
    pub show_centiseconds: bool,
}

impl Default for PracticeTimers {
    fn default() -> Self { Self::new() }
}

impl PracticeTimers {
    pub fn new() -> Self {
        Self {
            igt_frames:        0,
            section_frames:    0,
            star_grab_frames:  0,
            attempts:          0,
            lag_frames:        0,
            running:           true,
            show_centiseconds: true,
        }
    }

    /// Advance one frame. Does nothing while paused.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.igt_frames = self.igt_frames.wrapping_add(1);
        self.section_frames = self.section_frames.wrapping_add(1);
        self.star_grab_frames = self.star_grab_frames.wrapping_add(1);
    }

    pub fn pause(&mut self)  { self.running = false; }
    pub fn resume(&mut self) { self.running = true;  }

    pub fn reset_section(&mut self) {
        self.section_frames = 0;
    }

    pub fn reset_star_grab(&mut self) {
        self.star_grab_frames = 0;
    }

    pub fn increment_attempts(&mut self) {
        self.attempts += 1;
    }

    pub fn record_lag_frame(&mut self) {
        self.lag_frames += 1;
    }

    /// In-game time formatted for display.
    pub fn igt_display(&self) -> String {
        format_time(self.igt_frames, self.show_centiseconds)
    }
}

/// `MM:SS.CC` at 30 frames per second, or the raw frame count.
pub fn format_time(frames: Frame, centiseconds: bool) -> String {
    if !centiseconds {
        return frames.to_string();
    }
    let total_cs = u64::from(frames) * 100 / u64::from(FRAMES_PER_SECOND);
    let cs = total_cs % 100;
    let seconds = total_cs / 100;
    format!("{:02}:{:02}.{:02}", seconds / 60, seconds % 60, cs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_timers_do_not_advance() {
        let mut timers = PracticeTimers::new();
        timers.tick();
        timers.pause();
        timers.tick();
        assert_eq!(timers.igt_frames, 1);
        timers.resume();
        timers.tick();
        assert_eq!(timers.igt_frames, 2);
    }

    #[test]
    fn section_reset_leaves_igt_alone() {
        let mut timers = PracticeTimers::new();
        for _ in 0..10 {
            timers.tick();
        }
        timers.reset_section();
        assert_eq!(timers.section_frames, 0);
        assert_eq!(timers.igt_frames, 10);
        assert_eq!(timers.star_grab_frames, 10);
    }

    #[test]
    fn formats_minutes_seconds_centiseconds() {
        assert_eq!(format_time(0, true), "00:00.00");
        assert_eq!(format_time(30, true), "00:01.00");
        assert_eq!(format_time(45, true), "00:01.50");
        assert_eq!(format_time(30 * 61 + 1, true), "01:01.03");
        assert_eq!(format_time(1234, false), "1234");
    }
}
