use polygon_defence_core::Difficulty;
use polygon_defence_rendering_macroquad::ControlPanelInputState;

fn run_hire_sequence(sequence: &[bool]) -> Vec<bool> {
    let mut state = ControlPanelInputState::default();
    let mut hires = Vec::new();
    for &pressed in sequence {
        hires.push(state.take_hire_helper());
        if pressed {
            state.register_hire_helper();
        }
    }

    // Flush any trailing latched press so the harness observes the final hire.
    hires.push(state.take_hire_helper());
    hires
}

fn run_menu_sequence(sequence: &[Option<Difficulty>]) -> Vec<Option<Difficulty>> {
    let mut state = ControlPanelInputState::default();
    let mut choices = Vec::new();
    for &choice in sequence {
        choices.push(state.take_difficulty());
        if let Some(difficulty) = choice {
            state.register_difficulty(difficulty);
        }
    }
    choices.push(state.take_difficulty());
    choices
}

#[test]
fn hire_button_sequence_is_deterministic() {
    let button_sequence = [false, true, false, true, true, false];
    let expected = vec![false, false, true, false, true, true, false];

    let first_run = run_hire_sequence(&button_sequence);
    let second_run = run_hire_sequence(&button_sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn difficulty_menu_sequence_is_deterministic() {
    let button_sequence = [None, Some(Difficulty::Medium), None, Some(Difficulty::Hard)];
    let expected = vec![
        None,
        None,
        Some(Difficulty::Medium),
        None,
        Some(Difficulty::Hard),
    ];

    let first_run = run_menu_sequence(&button_sequence);
    let second_run = run_menu_sequence(&button_sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn speed_and_back_latches_are_independent() {
    let mut state = ControlPanelInputState::default();
    state.register_toggle_speed();

    assert!(!state.take_back());
    assert!(state.take_toggle_speed());
    assert!(!state.take_toggle_speed(), "latch clears after one read");

    state.register_back();
    assert!(!state.take_toggle_speed());
    assert!(state.take_back());
}
