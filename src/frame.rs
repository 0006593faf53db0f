//! Frame pacing for the driver loop.

use std::time::{Duration, Instant};

/// Timing of one frame as it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    pub number: u64,
    /// Time since the clock started.
    pub time: Duration,
    /// Duration of the previous frame; zero for the first one.
    pub delta: Duration,
}

/// Summary of every completed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    pub elapsed: Duration,
    pub fastest: Option<Duration>,
    pub slowest: Option<Duration>,
}

impl FrameStats {
    pub fn fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        }
    }
}

/// Yields a [`FrameInfo`] at the start of each frame, up to an optional limit.
///
/// A frame is complete once the next one is requested. When the limit is
/// reached, the request that returns `None` completes the last frame, so
/// [`FrameIterator::stats`] covers every yielded frame after a `for` loop.
#[derive(Debug)]
pub struct FrameIterator {
    limit: Option<u64>,
    started: u64,
    completed: u64,
    start: Instant,
    frame_start: Instant,
    fastest: Option<Duration>,
    slowest: Option<Duration>,
}

impl FrameIterator {
    pub fn unbounded() -> Self {
        Self::with_limit(None)
    }

    pub fn limited(frames: u64) -> Self {
        Self::with_limit(Some(frames))
    }

    fn with_limit(limit: Option<u64>) -> Self {
        let now = Instant::now();
        Self {
            limit,
            started: 0,
            completed: 0,
            start: now,
            frame_start: now,
            fastest: None,
            slowest: None,
        }
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frames: self.completed,
            elapsed: self.frame_start.duration_since(self.start),
            fastest: self.fastest,
            slowest: self.slowest,
        }
    }

    fn complete_frame(&mut self, now: Instant) -> Duration {
        let took = now.duration_since(self.frame_start);
        if self.started > self.completed {
            self.completed += 1;
            self.fastest = Some(self.fastest.map_or(took, |d| d.min(took)));
            self.slowest = Some(self.slowest.map_or(took, |d| d.max(took)));
        }
        self.frame_start = now;
        took
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let now = Instant::now();
        let delta = self.complete_frame(now);

        if self.limit.is_some_and(|limit| self.started >= limit) {
            return None;
        }

        let info = FrameInfo {
            number: self.started,
            time: now.duration_since(self.start),
            delta: if self.started == 0 { Duration::ZERO } else { delta },
        };
        self.started += 1;
        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn limited_clock_yields_numbered_frames() {
        let numbers: Vec<u64> = FrameIterator::limited(3).map(|f| f.number).collect();
        assert_eq!(numbers, vec![0, 1, 2]);
    }

    #[test]
    fn zero_limit_yields_nothing() {
        let mut frames = FrameIterator::limited(0);
        assert!(frames.next().is_none());
        assert_eq!(frames.stats().frames, 0);
        assert_eq!(frames.stats().fps(), 0.0);
    }

    #[test]
    fn first_delta_is_zero_then_tracks_frame_time() {
        let mut frames = FrameIterator::unbounded();
        assert_eq!(frames.next().map(|f| f.delta), Some(Duration::ZERO));

        thread::sleep(Duration::from_millis(10));
        let frame = frames.next().expect("frame");

        assert!(frame.delta >= Duration::from_millis(10));
        assert!(frame.time >= frame.delta);
    }

    #[test]
    fn stats_include_last_frame_after_loop() {
        let mut frames = FrameIterator::limited(2);
        for _ in frames.by_ref() {
            thread::sleep(Duration::from_millis(5));
        }

        let stats = frames.stats();
        assert_eq!(stats.frames, 2);
        assert!(stats.fastest.is_some_and(|d| d >= Duration::from_millis(5)));
        assert!(stats.slowest >= stats.fastest);
        assert!(stats.elapsed >= Duration::from_millis(10));
        assert!(stats.fps() > 0.0);
    }
}
