//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use glam::Vec2;
use macroquad::{
    color::{Color, BLACK},
    math::{vec2, RectOffset},
    ui::{widgets, Ui},
};
use polygon_defence_core::{Difficulty, SessionPhase};

const BUTTON_HEIGHT: f32 = 32.0;
const MENU_BUTTON_SIZE: Vec2 = Vec2::new(200.0, 48.0);

/// Screen-space rectangle occupied by a button.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ButtonRect {
    pub(crate) origin: Vec2,
    pub(crate) size: Vec2,
}

impl ButtonRect {
    fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    pub(crate) fn contains(&self, point: Vec2) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.origin.x + self.size.x
            && point.y < self.origin.y + self.size.y
    }
}

/// Placement of every button for a viewport size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ButtonLayout {
    pub(crate) hire: ButtonRect,
    pub(crate) speed: ButtonRect,
    pub(crate) back: ButtonRect,
    pub(crate) difficulties: [(Difficulty, ButtonRect); 3],
}

impl ButtonLayout {
    /// Anchors the buttons to the corners and center of the viewport.
    pub(crate) fn new(viewport: Vec2) -> Self {
        let difficulties = [0_usize, 1, 2].map(|index| {
            let center_y = viewport.y * (40.0 + 15.0 * index as f32) / 100.0;
            let origin = Vec2::new(
                viewport.x / 2.0 - MENU_BUTTON_SIZE.x / 2.0,
                center_y - MENU_BUTTON_SIZE.y / 2.0,
            );
            (
                Difficulty::ALL[index],
                ButtonRect::new(origin, MENU_BUTTON_SIZE),
            )
        });

        Self {
            hire: ButtonRect::new(
                Vec2::new(10.0, viewport.y - 40.0),
                Vec2::new(120.0, BUTTON_HEIGHT),
            ),
            speed: ButtonRect::new(
                Vec2::new(viewport.x - 60.0, 10.0),
                Vec2::new(50.0, BUTTON_HEIGHT),
            ),
            back: ButtonRect::new(
                Vec2::new(viewport.x - 120.0, 10.0),
                Vec2::new(56.0, BUTTON_HEIGHT),
            ),
            difficulties,
        }
    }

    /// Reports whether a press at `point` lands on a button shown in `phase`.
    pub(crate) fn captures(&self, phase: SessionPhase, point: Vec2) -> bool {
        if self.back.contains(point) {
            return true;
        }
        match phase {
            SessionPhase::SelectingDifficulty => self
                .difficulties
                .iter()
                .any(|(_, rect)| rect.contains(point)),
            SessionPhase::Playing | SessionPhase::GameOver => {
                self.hire.contains(point) || self.speed.contains(point)
            }
        }
    }
}

/// Buttons pressed while drawing the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ControlsUiResult {
    pub(crate) hire_helper: bool,
    pub(crate) toggle_speed: bool,
    pub(crate) back: bool,
    pub(crate) difficulty: Option<Difficulty>,
}

/// Data required to draw the buttons of the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlsUiContext {
    pub(crate) layout: ButtonLayout,
    pub(crate) phase: SessionPhase,
    pub(crate) speed_label: &'static str,
}

/// Renders the buttons of the active phase and reports which were pressed.
pub(crate) fn draw_controls_ui(ui: &mut Ui, context: ControlsUiContext) -> ControlsUiResult {
    let mut skin = ui.default_skin();
    skin.button_style = button_style(ui, Color::from_rgba(0xff, 0xff, 0x00, 255), 24);
    let hire_skin = {
        let mut hire_skin = skin.clone();
        hire_skin.button_style = button_style(ui, Color::from_rgba(0x00, 0xff, 0x00, 255), 24);
        hire_skin
    };
    let back_skin = {
        let mut back_skin = skin.clone();
        back_skin.button_style = button_style(ui, Color::from_rgba(0xff, 0x00, 0x00, 255), 24);
        back_skin
    };
    let menu_skin = {
        let mut menu_skin = skin.clone();
        menu_skin.button_style = button_style(ui, Color::from_rgba(0xff, 0xff, 0x00, 255), 36);
        menu_skin
    };

    let mut result = ControlsUiResult::default();

    ui.push_skin(&back_skin);
    result.back = button(ui, context.layout.back, "Back");
    ui.pop_skin();

    match context.phase {
        SessionPhase::SelectingDifficulty => {
            ui.push_skin(&menu_skin);
            for (difficulty, rect) in context.layout.difficulties {
                if button(ui, rect, difficulty.label()) {
                    result.difficulty = Some(difficulty);
                }
            }
            ui.pop_skin();
        }
        SessionPhase::Playing | SessionPhase::GameOver => {
            ui.push_skin(&hire_skin);
            result.hire_helper = button(ui, context.layout.hire, "Hire Help");
            ui.pop_skin();

            ui.push_skin(&skin);
            result.toggle_speed = button(ui, context.layout.speed, context.speed_label);
            ui.pop_skin();
        }
    }

    result
}

fn button(ui: &mut Ui, rect: ButtonRect, label: &str) -> bool {
    widgets::Button::new(label)
        .position(vec2(rect.origin.x, rect.origin.y))
        .size(vec2(rect.size.x, rect.size.y))
        .ui(ui)
}

fn button_style(ui: &mut Ui, text: Color, font_size: u16) -> macroquad::ui::Style {
    let hovered = Color::from_rgba(0x20, 0x20, 0x20, 255);
    ui.style_builder()
        .text_color(text)
        .text_color_hovered(Color::from_rgba(0xff, 0xd7, 0x00, 255))
        .text_color_clicked(text)
        .font_size(font_size)
        .color(BLACK)
        .color_hovered(hovered)
        .color_clicked(BLACK)
        .color_selected(BLACK)
        .color_selected_hovered(hovered)
        .color_inactive(BLACK)
        .margin(RectOffset::new(6.0, 6.0, 2.0, 2.0))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_follow_the_viewport_corners() {
        let layout = ButtonLayout::new(Vec2::new(1_280.0, 720.0));

        assert_eq!(layout.hire.origin, Vec2::new(10.0, 680.0));
        assert_eq!(layout.speed.origin, Vec2::new(1_220.0, 10.0));
        assert_eq!(layout.back.origin, Vec2::new(1_160.0, 10.0));
        assert_eq!(layout.difficulties[0].0, Difficulty::Easy);
        assert_eq!(layout.difficulties[2].1.origin, Vec2::new(540.0, 480.0));
    }

    #[test]
    fn only_visible_buttons_capture_presses() {
        let layout = ButtonLayout::new(Vec2::new(1_280.0, 720.0));
        let on_hire = Vec2::new(20.0, 690.0);
        let on_easy = Vec2::new(640.0, 288.0);
        let on_back = Vec2::new(1_170.0, 20.0);

        assert!(layout.captures(SessionPhase::Playing, on_hire));
        assert!(!layout.captures(SessionPhase::SelectingDifficulty, on_hire));
        assert!(layout.captures(SessionPhase::SelectingDifficulty, on_easy));
        assert!(!layout.captures(SessionPhase::Playing, on_easy));
        assert!(layout.captures(SessionPhase::GameOver, on_back));
        assert!(!layout.captures(SessionPhase::Playing, Vec2::new(400.0, 400.0)));
    }
}
