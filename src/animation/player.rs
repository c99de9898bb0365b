use std::time::Instant;

pub const MIN_PLAYBACK_SPEED: f32 = 0.1;
pub const MAX_PLAYBACK_SPEED: f32 = 4.0;

/// Time source for the playback clock, injectable so interpolation can be
/// tested without wall-clock delays.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall-clock time since construction.
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for deterministic tests.
#[derive(Default)]
pub struct ManualClock {
    now: std::cell::Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Playback head. Each advance computes a delta against the previous tick's
/// timestamp, so a long scheduling gap simply shows up as a larger delta
/// rather than corrupting state.
#[derive(Debug, Clone)]
pub struct Player {
    playing: bool,
    current_time_ms: f32,
    speed: f32,
    last_tick_ms: Option<f64>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            playing: false,
            current_time_ms: 0.0,
            speed: 1.0,
            last_tick_ms: None,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_time_ms(&self) -> f32 {
        self.current_time_ms
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(MIN_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED);
    }

    pub fn play(&mut self, clock: &dyn Clock) {
        self.playing = true;
        self.last_tick_ms = Some(clock.now_ms());
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.last_tick_ms = None;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.current_time_ms = 0.0;
        self.last_tick_ms = None;
    }

    pub fn seek(&mut self, time_ms: f32) {
        self.current_time_ms = time_ms.max(0.0);
    }

    /// Advances the head by scaled wall time, wrapping to zero once it
    /// reaches `loop_end_ms`. Returns the new head time.
    pub fn advance(&mut self, clock: &dyn Clock, loop_end_ms: f32) -> f32 {
        let now = clock.now_ms();
        let last = self.last_tick_ms.replace(now).unwrap_or(now);
        let delta = ((now - last) * self.speed as f64) as f32;
        self.current_time_ms += delta.max(0.0);
        if loop_end_ms > 0.0 && self.current_time_ms >= loop_end_ms {
            self.current_time_ms = 0.0;
        }
        self.current_time_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_scales_by_speed() {
        let clock = ManualClock::new();
        let mut player = Player::new();
        player.set_speed(2.0);
        player.play(&clock);

        clock.advance(100.0);
        assert_eq!(player.advance(&clock, 10_000.0), 200.0);
    }

    #[test]
    fn advance_wraps_at_loop_end() {
        let clock = ManualClock::new();
        let mut player = Player::new();
        player.play(&clock);

        clock.advance(999.0);
        assert_eq!(player.advance(&clock, 1000.0), 999.0);
        clock.advance(1.0);
        assert_eq!(player.advance(&clock, 1000.0), 0.0);
    }

    #[test]
    fn large_gap_is_just_a_larger_delta() {
        let clock = ManualClock::new();
        let mut player = Player::new();
        player.play(&clock);

        // A suspended host produces one big delta, never negative time.
        clock.advance(60_000.0);
        let t = player.advance(&clock, 100_000.0);
        assert_eq!(t, 60_000.0);
    }

    #[test]
    fn stop_resets_the_head() {
        let clock = ManualClock::new();
        let mut player = Player::new();
        player.play(&clock);
        clock.advance(500.0);
        player.advance(&clock, 10_000.0);
        player.stop();
        assert!(!player.is_playing());
        assert_eq!(player.current_time_ms(), 0.0);
    }

    #[test]
    fn speed_is_clamped() {
        let mut player = Player::new();
        player.set_speed(100.0);
        assert_eq!(player.speed(), MAX_PLAYBACK_SPEED);
        player.set_speed(0.0);
        assert_eq!(player.speed(), MIN_PLAYBACK_SPEED);
    }
}
