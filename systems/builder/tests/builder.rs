use polygon_defence_core::{
    Command, Difficulty, Event, Health, Playfield, SpotSnapshot, TowerSpotId, WorldPoint,
};
use polygon_defence_system_builder::{Builder, BuilderInput};

const PLAYFIELD: Playfield = Playfield::new(1_000.0, 500.0);

fn spots() -> Vec<SpotSnapshot> {
    vec![
        SpotSnapshot {
            id: TowerSpotId::new(3),
            position: WorldPoint::new(100.0, 100.0),
        },
        SpotSnapshot {
            id: TowerSpotId::new(5),
            position: WorldPoint::new(110.0, 100.0),
        },
        SpotSnapshot {
            id: TowerSpotId::new(8),
            position: WorldPoint::new(400.0, 300.0),
        },
    ]
}

fn started() -> Event {
    Event::SessionStarted {
        difficulty: Difficulty::Medium,
        health: Health::new(100),
    }
}

#[test]
fn click_inside_spot_places_tower() {
    let mut builder = Builder::new();
    let mut commands = Vec::new();

    builder.handle(
        &[started()],
        BuilderInput::new(Some(WorldPoint::new(410.0, 315.0)), false),
        &spots(),
        PLAYFIELD,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlaceTower {
            spot: TowerSpotId::new(8),
        }],
        "a click within the spot radius should request a tower",
    );
}

#[test]
fn overlapping_spots_resolve_to_the_first_match() {
    let mut builder = Builder::new();
    let mut commands = Vec::new();

    builder.handle(
        &[started()],
        BuilderInput::new(Some(WorldPoint::new(105.0, 100.0)), false),
        &spots(),
        PLAYFIELD,
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlaceTower {
            spot: TowerSpotId::new(3),
        }]
    );
}

#[test]
fn click_outside_every_spot_is_ignored() {
    let mut builder = Builder::new();
    let mut commands = Vec::new();

    builder.handle(
        &[started()],
        BuilderInput::new(Some(WorldPoint::new(400.0, 326.0)), false),
        &spots(),
        PLAYFIELD,
        &mut commands,
    );

    assert!(commands.is_empty(), "radius is 25 units on a 1000 wide field");
}

#[test]
fn hire_button_requests_a_helper() {
    let mut builder = Builder::new();
    let mut commands = Vec::new();

    builder.handle(
        &[started()],
        BuilderInput::new(None, true),
        &spots(),
        PLAYFIELD,
        &mut commands,
    );

    assert_eq!(commands, vec![Command::HireHelper]);
}

#[test]
fn input_is_ignored_outside_a_running_session() {
    let mut builder = Builder::new();
    let input = BuilderInput::new(Some(WorldPoint::new(100.0, 100.0)), true);
    let mut commands = Vec::new();

    builder.handle(&[], input, &spots(), PLAYFIELD, &mut commands);
    assert!(commands.is_empty(), "no session has started yet");

    builder.handle(&[started()], input, &spots(), PLAYFIELD, &mut commands);
    assert_eq!(commands.len(), 2);

    commands.clear();
    builder.handle(
        &[Event::GameOver { round: 4 }],
        input,
        &spots(),
        PLAYFIELD,
        &mut commands,
    );
    assert!(commands.is_empty(), "game over freezes purchases");

    builder.handle(
        &[Event::SessionReset],
        input,
        &spots(),
        PLAYFIELD,
        &mut commands,
    );
    assert!(commands.is_empty());
}
