//! Table settings
//!
//! Persisted as JSON. Every field has a default, so partial files are fine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};

/// Physical and numeric parameters of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Pocket radius, also drives the whole boundary outline
    pub pocket_radius: f64,
    /// Radius shared by every ball
    pub ball_radius: f64,
    pub cue_mass: f64,
    pub object_mass: f64,

    // === Stepping ===
    /// Per sub-step velocity damping in (0, 1]
    pub friction: f64,
    /// Furthest any ball may travel in one sub-step (defaults to the ball radius)
    pub max_advance_distance: Option<f64>,
    /// Speed under which a ball counts as at rest
    pub settle_speed: f64,

    /// Seed for shuffles, rack order and respot draws
    pub seed: u64,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            pocket_radius: DEFAULT_POCKET_RADIUS,
            ball_radius: DEFAULT_BALL_RADIUS,
            cue_mass: DEFAULT_CUE_MASS,
            object_mass: DEFAULT_OBJECT_MASS,

            friction: DEFAULT_FRICTION,
            max_advance_distance: None,
            settle_speed: DEFAULT_SETTLE_SPEED,

            seed: DEFAULT_SEED,
        }
    }
}

impl TableSettings {
    /// Default settings around a given pocket radius
    pub fn with_pocket_radius(pocket_radius: f64) -> Self {
        Self {
            pocket_radius,
            ..Self::default()
        }
    }

    /// Effective per sub-step displacement bound
    pub fn max_advance_distance(&self) -> f64 {
        self.max_advance_distance.unwrap_or(self.ball_radius)
    }

    /// Reject any setting the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        positive("pocket_radius", self.pocket_radius)?;
        positive("ball_radius", self.ball_radius)?;
        positive("cue_mass", self.cue_mass)?;
        positive("object_mass", self.object_mass)?;
        positive("settle_speed", self.settle_speed)?;
        positive("max_advance_distance", self.max_advance_distance())?;

        let (reach_x, reach_y) = rack_extent(self.ball_radius);
        if reach_x >= TABLE_HALF_LENGTH || reach_y >= TABLE_HALF_WIDTH {
            return Err(SimError::InvalidConfig(format!(
                "ball_radius {} is too large to rack on the table",
                self.ball_radius
            )));
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "friction must be in (0, 1], got {}",
                self.friction
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Self::from_json(&fs::read_to_string(path)?)?;
        log::info!("Loaded table settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Table settings saved to {}", path.display());
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

/// Furthest x and |y| reached by the edge of any racked ball
fn rack_extent(ball_radius: f64) -> (f64, f64) {
    let pitch = ball_radius + RACK_GAP / 2.0;
    let rows = (RACK_ROWS - 1) as f64;
    (
        RACK_APEX_X + rows * 3f64.sqrt() * pitch + ball_radius,
        rows * pitch + ball_radius,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = TableSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.max_advance_distance(), settings.ball_radius);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let bad = [
            TableSettings { ball_radius: 0.0, ..Default::default() },
            TableSettings { cue_mass: -1.0, ..Default::default() },
            TableSettings { object_mass: f64::NAN, ..Default::default() },
            TableSettings { pocket_radius: 0.0, ..Default::default() },
            TableSettings { max_advance_distance: Some(0.0), ..Default::default() },
            TableSettings { friction: 0.0, ..Default::default() },
            TableSettings { friction: 1.5, ..Default::default() },
            TableSettings { ball_radius: 1.0, ..Default::default() },
        ];
        for settings in &bad {
            assert!(
                matches!(settings.validate(), Err(SimError::InvalidConfig(_))),
                "{settings:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rack_must_fit_inside_rails() {
        let too_big = TableSettings { ball_radius: 0.3, ..Default::default() };
        assert!(matches!(too_big.validate(), Err(SimError::InvalidConfig(_))));

        let fits = TableSettings { ball_radius: 0.1, ..Default::default() };
        assert!(fits.validate().is_ok());
        let (x, y) = rack_extent(0.1);
        assert!(x < TABLE_HALF_LENGTH && y < TABLE_HALF_WIDTH);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = TableSettings::from_json(r#"{ "friction": 1.0, "seed": 7 }"#).unwrap();
        assert_eq!(settings.friction, 1.0);
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.ball_radius, DEFAULT_BALL_RADIUS);
    }

    #[test]
    fn test_invalid_json_values_rejected() {
        assert!(matches!(
            TableSettings::from_json(r#"{ "ball_radius": -0.1 }"#),
            Err(SimError::InvalidConfig(_))
        ));
        assert!(matches!(
            TableSettings::from_json("not json"),
            Err(SimError::Json(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("pocket_table_settings_{}.json", std::process::id()));
        let settings = TableSettings {
            friction: 0.95,
            max_advance_distance: Some(0.02),
            ..TableSettings::with_pocket_radius(0.12)
        };
        settings.save(&path).unwrap();
        let loaded = TableSettings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
