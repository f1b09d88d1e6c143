/// Tunable game parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub movement: MovementConfig,
    /// Vision radius given to a player that does not declare one.
    pub default_vision_radius: u32,
}

impl GameConfig {
    pub const DEFAULT_VISION_RADIUS: u32 = 8;

    pub fn new() -> Self {
        Self {
            movement: MovementConfig::default(),
            default_vision_radius: Self::DEFAULT_VISION_RADIUS,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Speed thresholds used by the movement predictor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementConfig {
    /// Speed cap without turbo.
    pub base_max_speed: u32,
    /// Speed cap while turbo is equipped.
    pub turbo_max_speed: u32,
    /// At or below this magnitude, turns and reversals are instantaneous.
    pub slide_speed: u32,
    /// From this magnitude up, braking keeps sliding one more tile.
    pub medium_speed_threshold: u32,
}

impl MovementConfig {
    pub const BASE_MAX_SPEED: u32 = 5;
    pub const TURBO_MAX_SPEED: u32 = 7;
    pub const SLIDE_SPEED: u32 = 2;
    pub const MEDIUM_SPEED_THRESHOLD: u32 = 2;

    /// Cap for a mover. It never drops below the current magnitude.
    pub fn max_speed(&self, turbo: bool, magnitude: u32) -> u32 {
        let cap = if turbo {
            self.turbo_max_speed
        } else {
            self.base_max_speed
        };
        cap.max(magnitude)
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            base_max_speed: Self::BASE_MAX_SPEED,
            turbo_max_speed: Self::TURBO_MAX_SPEED,
            slide_speed: Self::SLIDE_SPEED,
            medium_speed_threshold: Self::MEDIUM_SPEED_THRESHOLD,
        }
    }
}
