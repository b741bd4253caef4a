//! Frame-driven pump connecting adapter input, the world and the pure systems.

use std::time::Duration;

use polygon_defence_core::{Command, Event, Playfield, WorldPoint};
use polygon_defence_rendering::FrameInput;
use polygon_defence_system_builder::{Builder, BuilderInput};
use polygon_defence_system_tower_combat::TowerCombat;
use polygon_defence_system_wave_generation::{Config as WaveGenerationConfig, WaveGeneration};
use polygon_defence_world::{self as world, query, World};
use tracing::{debug, trace};

/// Owns the authoritative world together with every system that reacts to it.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    wave_generation: WaveGeneration,
    tower_combat: TowerCombat,
    builder: Builder,
    events: Vec<Event>,
    pending: Vec<Command>,
    exit_requested: bool,
}

impl Simulation {
    /// Creates a simulation whose wave shuffles derive from `seed`.
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            world: World::new(),
            wave_generation: WaveGeneration::new(WaveGenerationConfig::new(seed)),
            tower_combat: TowerCombat::new(),
            builder: Builder::new(),
            events: Vec::new(),
            pending: Vec::new(),
            exit_requested: false,
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Reports whether the player asked to leave.
    pub(crate) fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Advances the simulation by one rendered frame.
    pub(crate) fn step(&mut self, dt: Duration, input: &FrameInput) {
        let mut commands = Vec::new();

        if let Some(playfield) = resized_playfield(query::playfield(&self.world), input) {
            commands.push(Command::ConfigurePlayfield {
                width: playfield.width(),
                height: playfield.height(),
            });
        }
        if let Some(difficulty) = input.difficulty {
            commands.push(Command::SelectDifficulty { difficulty });
        }
        if input.toggle_speed {
            commands.push(Command::ToggleSpeed);
        }

        let pointer = input
            .pointer_pressed
            .map(|point| WorldPoint::new(point.x, point.y));
        self.builder.handle(
            &[],
            BuilderInput::new(pointer, input.hire_helper),
            &query::available_spots(&self.world),
            query::playfield(&self.world),
            &mut commands,
        );

        if input.back {
            commands.push(Command::EndSession);
            self.exit_requested = true;
        }
        commands.push(Command::Tick { dt });
        self.dispatch(commands);

        let mut fire = Vec::new();
        self.tower_combat.handle(
            query::phase(&self.world),
            &query::tower_view(&self.world),
            &query::mob_view(&self.world),
            &mut fire,
        );
        self.dispatch(fire);
    }

    /// Applies commands and feeds the resulting events back to the systems
    /// until no further commands are produced.
    fn dispatch(&mut self, commands: Vec<Command>) {
        self.pending = commands;
        while !self.pending.is_empty() {
            self.events.clear();
            for command in self.pending.drain(..) {
                world::apply(&mut self.world, command, &mut self.events);
            }

            for event in &self.events {
                match event {
                    Event::TimeAdvanced { .. } => trace!(?event, "world event"),
                    _ => debug!(?event, "world event"),
                }
            }

            self.wave_generation.handle(&self.events, &mut self.pending);
            self.builder.handle(
                &self.events,
                BuilderInput::default(),
                &[],
                query::playfield(&self.world),
                &mut self.pending,
            );
        }
    }
}

fn resized_playfield(current: Playfield, input: &FrameInput) -> Option<Playfield> {
    let requested = Playfield::new(input.viewport.x, input.viewport.y);
    (requested.is_valid() && requested != current).then_some(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use polygon_defence_core::{Difficulty, GameSpeed, SessionPhase, STARTING_GOLD, TOWER_COST};

    const FRAME: Duration = Duration::from_millis(16);
    const VIEWPORT: Vec2 = Vec2::new(1_280.0, 720.0);

    fn idle() -> FrameInput {
        FrameInput {
            viewport: VIEWPORT,
            ..FrameInput::default()
        }
    }

    fn started(seed: u64, difficulty: Difficulty) -> Simulation {
        let mut simulation = Simulation::new(seed);
        simulation.step(
            FRAME,
            &FrameInput {
                difficulty: Some(difficulty),
                ..idle()
            },
        );
        simulation
    }

    #[test]
    fn choosing_a_difficulty_starts_the_first_wave() {
        let simulation = started(7, Difficulty::Medium);

        assert_eq!(query::phase(simulation.world()), SessionPhase::Playing);
        assert_eq!(query::round(simulation.world()), 1);
        assert_eq!(
            query::mobs_remaining(simulation.world()),
            Some(8),
            "round one queues eight mobs"
        );
    }

    #[test]
    fn clicking_a_free_spot_buys_a_tower() {
        let mut simulation = started(7, Difficulty::Easy);
        let spot = query::available_spots(simulation.world())[0];

        simulation.step(
            FRAME,
            &FrameInput {
                pointer_pressed: Some(Vec2::new(spot.position.x() + 3.0, spot.position.y())),
                ..idle()
            },
        );

        assert_eq!(query::tower_count(simulation.world()), 1);
        assert_eq!(
            query::gold(simulation.world()),
            STARTING_GOLD.checked_sub(TOWER_COST).expect("affordable")
        );
    }

    #[test]
    fn towers_defend_the_path_on_their_own() {
        let mut simulation = started(99, Difficulty::Easy);
        for index in [3_u32, 4, 7] {
            let spot = polygon_defence_core::TowerSpotId::new(index)
                .position()
                .expect("spot exists")
                .to_world(query::playfield(simulation.world()));
            simulation.step(
                FRAME,
                &FrameInput {
                    pointer_pressed: Some(Vec2::new(spot.x(), spot.y())),
                    ..idle()
                },
            );
        }
        assert_eq!(query::tower_count(simulation.world()), 3);
        let gold_after_purchases = query::gold(simulation.world());

        for _ in 0..(30 * 60) {
            simulation.step(FRAME, &idle());
        }

        assert!(
            query::gold(simulation.world()) > gold_after_purchases,
            "kills should have paid out gold"
        );
    }

    #[test]
    fn resizing_the_viewport_reconfigures_the_playfield() {
        let mut simulation = started(7, Difficulty::Hard);

        simulation.step(
            FRAME,
            &FrameInput {
                viewport: Vec2::new(800.0, 600.0),
                ..FrameInput::default()
            },
        );

        assert_eq!(
            query::playfield(simulation.world()),
            Playfield::new(800.0, 600.0)
        );
    }

    #[test]
    fn collapsed_viewport_keeps_the_previous_playfield() {
        let mut simulation = started(7, Difficulty::Hard);

        simulation.step(FRAME, &FrameInput::default());

        assert_eq!(
            query::playfield(simulation.world()),
            Playfield::new(VIEWPORT.x, VIEWPORT.y)
        );
    }

    #[test]
    fn speed_button_doubles_the_clock() {
        let mut simulation = started(7, Difficulty::Medium);
        simulation.step(
            FRAME,
            &FrameInput {
                toggle_speed: true,
                ..idle()
            },
        );
        assert_eq!(query::speed(simulation.world()), GameSpeed::Double);

        let before = query::clock(simulation.world());
        simulation.step(FRAME, &idle());

        assert_eq!(query::clock(simulation.world()) - before, FRAME * 2);
    }

    #[test]
    fn back_button_ends_the_session_and_requests_exit() {
        let mut simulation = started(7, Difficulty::Medium);

        simulation.step(
            FRAME,
            &FrameInput {
                back: true,
                ..idle()
            },
        );

        assert!(simulation.exit_requested());
        assert_eq!(
            query::phase(simulation.world()),
            SessionPhase::SelectingDifficulty
        );
        assert_eq!(query::pending_timers(simulation.world()), 0);
    }
}
