use std::time::{Duration, Instant};

/// Frame pacing for one render loop.
///
/// One pacer per viewport so independent loops never share timing state.
/// Scheduling compensates for render cost: the wait before the next tick is
/// the frame period minus the time the tick spent rendering, floored at zero.
/// A slow frame shortens the wait; it never pushes the deadline into the past.
#[derive(Debug, Clone)]
pub struct FramePacer {
    period: Duration,
    last_tick: Option<Instant>,
    rate: Option<f32>,
}

impl FramePacer {
    /// Creates a pacer targeting `target_rate` frames per second.
    ///
    /// The caller validates `target_rate > 0` before constructing.
    pub fn new(target_rate: f32) -> Self {
        Self {
            period: Duration::from_secs_f32(1.0 / target_rate),
            last_tick: None,
            rate: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Records a tick at `now` and updates the measured instantaneous rate
    /// (`1000 / elapsed_ms`) when a previous tick exists.
    pub fn begin_tick(&mut self, now: Instant) {
        if let Some(last) = self.last_tick {
            let elapsed_ms = now.saturating_duration_since(last).as_secs_f32() * 1000.0;
            if elapsed_ms > 0.0 {
                self.rate = Some(1000.0 / elapsed_ms);
            }
        }
        self.last_tick = Some(now);
    }

    /// Deadline for the next tick, given when this tick started and how long
    /// its render took.
    pub fn next_deadline(&self, tick_start: Instant, render_cost: Duration) -> Instant {
        tick_start + self.period.saturating_sub(render_cost)
    }

    /// Latest measured rate in frames per second.
    pub fn rate(&self) -> Option<f32> {
        self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_compensates_for_render_cost() {
        let pacer = FramePacer::new(50.0); // 20 ms period
        let start = Instant::now();
        let deadline = pacer.next_deadline(start, Duration::from_millis(5));
        assert_eq!(deadline - start, Duration::from_millis(15));
    }

    #[test]
    fn deadline_never_lands_before_the_tick() {
        // Render cost exceeding the period clamps the wait to zero.
        let pacer = FramePacer::new(50.0);
        let start = Instant::now();
        let deadline = pacer.next_deadline(start, Duration::from_millis(120));
        assert_eq!(deadline, start);
    }

    #[test]
    fn first_tick_has_no_rate() {
        let mut pacer = FramePacer::new(60.0);
        pacer.begin_tick(Instant::now());
        assert!(pacer.rate().is_none());
    }

    #[test]
    fn rate_is_measured_between_ticks() {
        let mut pacer = FramePacer::new(60.0);
        let t0 = Instant::now();
        pacer.begin_tick(t0);
        pacer.begin_tick(t0 + Duration::from_millis(20));
        let rate = pacer.rate().unwrap();
        assert!((rate - 50.0).abs() < 0.5, "rate was {rate}");
    }
}
