#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system translating player input into tower placement and hiring commands.

use polygon_defence_core::{Command, Event, Playfield, SessionPhase, SpotSnapshot, WorldPoint};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Playfield position the player pressed this frame, outside any button.
    pub pointer: Option<WorldPoint>,
    /// Indicates whether the hire button was pressed this frame.
    pub hire_helper: bool,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(pointer: Option<WorldPoint>, hire_helper: bool) -> Self {
        Self {
            pointer,
            hire_helper,
        }
    }
}

/// System that maps clicks onto free tower spots.
#[derive(Debug, Clone)]
pub struct Builder {
    phase: SessionPhase,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a new builder system waiting for a session to start.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: SessionPhase::SelectingDifficulty,
        }
    }

    /// Consumes world events and adapter-derived input to emit purchase commands.
    ///
    /// A pointer press places a tower on the first free spot whose circle
    /// contains it. Input is ignored unless a session is being played.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        spots: &[SpotSnapshot],
        playfield: Playfield,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::SessionStarted { .. } => self.phase = SessionPhase::Playing,
                Event::GameOver { .. } => self.phase = SessionPhase::GameOver,
                Event::SessionReset | Event::SessionEnded => {
                    self.phase = SessionPhase::SelectingDifficulty;
                }
                _ => {}
            }
        }

        if self.phase != SessionPhase::Playing {
            return;
        }

        if let Some(pointer) = input.pointer {
            let radius = playfield.spot_radius();
            if let Some(spot) = spots
                .iter()
                .find(|spot| spot.position.distance_to(pointer) <= radius)
            {
                out.push(Command::PlaceTower { spot: spot.id });
            }
        }

        if input.hire_helper {
            out.push(Command::HireHelper);
        }
    }
}
