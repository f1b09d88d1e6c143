use std::collections::BTreeMap;

/// Countdown state for a single named cooldown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownState {
    pub base: u32,
    pub current: u32,
    pub ready: bool,
}

impl CooldownState {
    /// Creates a cooldown that starts ready.
    pub fn new(base: u32) -> Self {
        Self {
            base,
            current: 0,
            ready: true,
        }
    }

    /// Advances the countdown by one tick.
    pub fn tick(&mut self) {
        self.current = self.current.saturating_sub(1);
        if self.current == 0 {
            self.ready = true;
        }
    }

    /// Restarts the countdown from `base`.
    pub fn trigger(&mut self) {
        self.current = self.base;
        self.ready = self.base == 0;
    }
}

/// Named cooldowns carried by an entity, e.g. `"move"` for enemy pacing.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldown {
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldowns: BTreeMap<String, CooldownState>,
}

impl Cooldown {
    pub fn with(mut self, name: impl Into<String>, base: u32) -> Self {
        self.cooldowns.insert(name.into(), CooldownState::new(base));
        self
    }

    pub fn get(&self, name: &str) -> Option<&CooldownState> {
        self.cooldowns.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut CooldownState> {
        self.cooldowns.get_mut(name)
    }

    /// Missing cooldowns count as ready.
    pub fn is_ready(&self, name: &str) -> bool {
        self.cooldowns.get(name).is_none_or(|state| state.ready)
    }

    pub fn tick_all(&mut self) {
        for state in self.cooldowns.values_mut() {
            state.tick();
        }
    }
}
