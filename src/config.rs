use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Tunables for the star field. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarFieldConfig {
    #[serde(default = "StarFieldConfig::default_star_count")]
    pub star_count: usize,
    /// RNG seed; `None` seeds from the clock.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "StarFieldConfig::default_fov_degrees")]
    pub fov_degrees: f32,
    #[serde(default = "StarFieldConfig::default_near")]
    pub near: f32,
    #[serde(default = "StarFieldConfig::default_far")]
    pub far: f32,
    #[serde(default = "StarFieldConfig::default_camera_position")]
    pub camera_position: [f32; 3],
    /// Largest orbital radius a star can get.
    #[serde(default = "StarFieldConfig::default_max_radius")]
    pub max_radius: f32,
    #[serde(default = "StarFieldConfig::default_max_shininess")]
    pub max_shininess: f32,
}

impl Default for StarFieldConfig {
    fn default() -> Self {
        Self {
            star_count: Self::default_star_count(),
            seed: None,
            fov_degrees: Self::default_fov_degrees(),
            near: Self::default_near(),
            far: Self::default_far(),
            camera_position: Self::default_camera_position(),
            max_radius: Self::default_max_radius(),
            max_shininess: Self::default_max_shininess(),
        }
    }
}

impl StarFieldConfig {
    const fn default_star_count() -> usize {
        1000
    }

    const fn default_fov_degrees() -> f32 {
        60.0
    }

    const fn default_near() -> f32 {
        1.0
    }

    const fn default_far() -> f32 {
        2000.0
    }

    const fn default_camera_position() -> [f32; 3] {
        [200.0, 0.0, 0.0]
    }

    const fn default_max_radius() -> f32 {
        100.0
    }

    const fn default_max_shininess() -> f32 {
        500.0
    }

    /// Parses a JSON override (as found in the canvas `data-config`
    /// attribute). Falls back to defaults when it does not parse.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<StarFieldConfig>(json) {
            Ok(config) => {
                info!("Loaded star field config");
                config.validate()
            }
            Err(err) => {
                warn!("Failed to parse star field config ({err}). Falling back to defaults.");
                Self::default()
            }
        }
    }

    /// Replaces values that cannot render with their defaults.
    pub fn validate(mut self) -> Self {
        let defaults = Self::default();
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            warn!("fov_degrees {} out of range; using {}", self.fov_degrees, defaults.fov_degrees);
            self.fov_degrees = defaults.fov_degrees;
        }
        if !(self.near > 0.0 && self.far > self.near) {
            warn!(
                "invalid clip planes near={} far={}; using {}..{}",
                self.near, self.far, defaults.near, defaults.far
            );
            self.near = defaults.near;
            self.far = defaults.far;
        }
        if !(self.max_radius > 0.0) {
            warn!("max_radius {} must be positive", self.max_radius);
            self.max_radius = defaults.max_radius;
        }
        if self.max_shininess < 0.0 {
            self.max_shininess = defaults.max_shininess;
        }
        self
    }
}
