//! Rotation angle that follows wall-clock time and can be paused.

/// Tracks how much of the elapsed time the animation was paused for.
///
/// The angle in radians equals elapsed seconds minus total paused seconds, so
/// resuming continues from where the pause started.
#[derive(Debug, Clone, Default)]
pub struct Spin {
    paused_at: Option<f32>,
    paused_total: f32,
}

impl Spin {
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Pauses or resumes at `elapsed` seconds.
    pub fn toggle(&mut self, elapsed: f32) {
        match self.paused_at.take() {
            Some(start) => self.paused_total += (elapsed - start).max(0.0),
            None => self.paused_at = Some(elapsed),
        }
    }

    /// Rotation angle in radians at `elapsed` seconds.
    pub fn angle(&self, elapsed: f32) -> f32 {
        let now = self.paused_at.unwrap_or(elapsed);
        now - self.paused_total
    }
}
