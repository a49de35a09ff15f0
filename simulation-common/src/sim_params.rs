use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Simulation parameters derived from the configuration, used during every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    /// Side length of the square play area.
    pub surface_size: f32,
    /// Token radius: draw size and collision threshold.
    pub radius: f32,
    /// Tokens created per kind.
    pub amount_each: u32,
    /// Per-axis initial speed bounds (inclusive).
    pub min_speed: u32,
    pub max_speed: u32,
}

impl SimParams {
    pub const DEFAULT_MIN_SPEED: u32 = 3;
    pub const DEFAULT_MAX_SPEED: u32 = 6;

    pub fn new(amount_each: u32, surface_size: f32, radius: f32) -> Self {
        Self {
            surface_size,
            radius,
            amount_each,
            min_speed: Self::DEFAULT_MIN_SPEED,
            max_speed: Self::DEFAULT_MAX_SPEED,
        }
    }

    /// Total population: three kinds times `amount_each`.
    pub fn token_count(&self) -> usize {
        self.amount_each as usize * 3
    }

    /// Rejects parameters that would produce a degenerate or garbage layout.
    pub fn validate(&self) -> Result<()> {
        if self.amount_each == 0 {
            anyhow::bail!("amount_each must be greater than 0.");
        }
        if !self.surface_size.is_finite() || self.surface_size <= 0.0 {
            anyhow::bail!("surface size must be positive, got {}.", self.surface_size);
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            anyhow::bail!("radius must be positive, got {}.", self.radius);
        }
        if self.min_speed == 0 {
            anyhow::bail!("min_speed must be greater than 0.");
        }
        if self.min_speed > self.max_speed {
            anyhow::bail!(
                "min_speed ({}) must not exceed max_speed ({}).",
                self.min_speed,
                self.max_speed
            );
        }
        // A token bouncing off one wall must land clear of the opposite one.
        let free_span = self.surface_size - 2.0 * self.radius;
        if free_span <= 2.0 * self.max_speed as f32 {
            anyhow::bail!(
                "surface size {} leaves too little room for radius {} at speed {}.",
                self.surface_size,
                self.radius,
                self.max_speed
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = SimParams::new(20, 800.0, 30.0);
        assert!(params.validate().is_ok());
        assert_eq!(params.token_count(), 60);
    }

    #[test]
    fn rejects_non_positive_inputs() {
        assert!(SimParams::new(0, 800.0, 30.0).validate().is_err());
        assert!(SimParams::new(5, 0.0, 30.0).validate().is_err());
        assert!(SimParams::new(5, -10.0, 30.0).validate().is_err());
        assert!(SimParams::new(5, 800.0, 0.0).validate().is_err());
        assert!(SimParams::new(5, 800.0, -1.0).validate().is_err());
        assert!(SimParams::new(5, f32::NAN, 30.0).validate().is_err());
    }

    #[test]
    fn rejects_inverted_speed_range() {
        let mut params = SimParams::new(5, 800.0, 30.0);
        params.min_speed = 7;
        assert!(params.validate().is_err());
        params.min_speed = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_surface_too_small_for_radius() {
        assert!(SimParams::new(5, 60.0, 30.0).validate().is_err());
        assert!(SimParams::new(5, 72.0, 30.0).validate().is_err());
        assert!(SimParams::new(5, 73.0, 30.0).validate().is_ok());
    }
}
