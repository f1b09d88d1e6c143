//! Scripted player input, one step per tick.
//!
//! A script is a whitespace-separated list of steps: a direction (`n`, `east`,
//! ...), `.` for no input, `brake` to brake for one tick, or `turbo`/`cruise`
//! to switch turbo on and off.
use std::str::FromStr;

use anyhow::{Result, bail};
use drift_core::Direction;
use drift_runtime::Simulation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Idle,
    Move(Direction),
    Brake,
    Turbo(bool),
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(token: &str) -> Result<Self> {
        let step = match token.to_ascii_lowercase().as_str() {
            "." => Step::Idle,
            "n" => Step::Move(Direction::North),
            "e" => Step::Move(Direction::East),
            "s" => Step::Move(Direction::South),
            "w" => Step::Move(Direction::West),
            "brake" | "b" => Step::Brake,
            "turbo" => Step::Turbo(true),
            "cruise" => Step::Turbo(false),
            other => match Direction::from_str(other) {
                Ok(direction) => Step::Move(direction),
                Err(_) => bail!("unknown input step '{token}'"),
            },
        };
        Ok(step)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputScript {
    steps: Vec<Step>,
}

impl InputScript {
    pub fn parse(script: &str) -> Result<Self> {
        let steps = script
            .split_whitespace()
            .map(Step::from_str)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { steps })
    }

    /// Step for the given zero-based tick; idle once the script runs out.
    pub fn step(&self, tick: u64) -> Step {
        usize::try_from(tick)
            .ok()
            .and_then(|index| self.steps.get(index))
            .copied()
            .unwrap_or(Step::Idle)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Feeds the step for the simulation's next tick.
    pub fn apply(&self, simulation: &mut Simulation) -> Result<()> {
        let step = self.step(simulation.tick_count());
        simulation.set_brake(step == Step::Brake)?;
        match step {
            Step::Move(direction) => simulation.buffer_input(direction, false)?,
            Step::Turbo(engaged) => simulation.set_turbo(engaged)?,
            Step::Idle | Step::Brake => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_forms() {
        let script = InputScript::parse("n East . brake turbo cruise W").expect("valid");
        assert_eq!(script.len(), 7);
        assert_eq!(script.step(0), Step::Move(Direction::North));
        assert_eq!(script.step(1), Step::Move(Direction::East));
        assert_eq!(script.step(2), Step::Idle);
        assert_eq!(script.step(3), Step::Brake);
        assert_eq!(script.step(4), Step::Turbo(true));
        assert_eq!(script.step(5), Step::Turbo(false));
        assert_eq!(script.step(6), Step::Move(Direction::West));
        assert_eq!(script.step(99), Step::Idle);
    }

    #[test]
    fn rejects_unknown_steps() {
        let err = InputScript::parse("n jump").expect_err("invalid");
        assert!(err.to_string().contains("jump"));
    }
}
