#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Polygon Defence.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Buttons are drawn with Macroquad's immediate-mode UI module. All UI-specific
//! calls live inside the local `ui` module to avoid leaking Macroquad UI types
//! throughout the renderer.

mod ui;

use self::ui::{draw_controls_ui, ButtonLayout, ControlsUiContext, ControlsUiResult};
use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};
use polygon_defence_core::{Difficulty, SessionPhase};
use polygon_defence_rendering::{
    palette, AttackLinePresentation, BannerPresentation, Color, DiscPresentation, FrameInput,
    FrameSimulationBreakdown, HelperPresentation, HudPresentation, MobPresentation,
    PathPresentation, Presentation, RenderingBackend, Scene, ATTACK_LINE_THICKNESS,
};
use std::{
    sync::mpsc,
    time::{Duration, Instant},
};

const HUD_FONT_SIZE: f32 = 24.0;
const HUD_COST_FONT_SIZE: f32 = 18.0;
const BANNER_FONT_SIZE: u16 = 32;
const TITLE_FONT_SIZE: u16 = 48;

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlPanelInputState {
    hire_latched: bool,
    speed_latched: bool,
    back_latched: bool,
    difficulty_latched: Option<Difficulty>,
}

impl ControlPanelInputState {
    /// Returns whether the hire button was pressed and clears the latch so the
    /// action fires only once.
    pub fn take_hire_helper(&mut self) -> bool {
        std::mem::take(&mut self.hire_latched)
    }

    /// Records that the hire button was pressed this frame.
    pub fn register_hire_helper(&mut self) {
        self.hire_latched = true;
    }

    /// Returns whether the speed toggle was pressed, clearing the latch.
    pub fn take_toggle_speed(&mut self) -> bool {
        std::mem::take(&mut self.speed_latched)
    }

    /// Records that the speed toggle was pressed this frame.
    pub fn register_toggle_speed(&mut self) {
        self.speed_latched = true;
    }

    /// Returns whether the back button was pressed, clearing the latch.
    pub fn take_back(&mut self) -> bool {
        std::mem::take(&mut self.back_latched)
    }

    /// Records that the back button was pressed this frame.
    pub fn register_back(&mut self) {
        self.back_latched = true;
    }

    /// Returns the latched difficulty choice, clearing it so the action fires once.
    pub fn take_difficulty(&mut self) -> Option<Difficulty> {
        self.difficulty_latched.take()
    }

    /// Records that a difficulty was chosen from the menu this frame.
    pub fn register_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty_latched = Some(difficulty);
    }

    fn register(&mut self, pressed: ControlsUiResult) {
        if pressed.hire_helper {
            self.register_hire_helper();
        }
        if pressed.toggle_speed {
            self.register_toggle_speed();
        }
        if pressed.back {
            self.register_back();
        }
        if let Some(difficulty) = pressed.difficulty {
            self.register_difficulty(difficulty);
        }
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` closes the window.
    quit_requested: bool,
    /// `H` hires a helper.
    hire_helper: bool,
    /// `Space` toggles the game speed.
    toggle_speed: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            hire_helper: is_key_pressed(KeyCode::H),
            toggle_speed: is_key_pressed(KeyCode::Space),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    scene_population: Duration,
    render: Duration,
}

/// Frame and stage timings averaged over roughly one second of frames.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    stages: FrameBreakdown,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    avg_simulation: Duration,
    avg_scene_population: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.stages.simulation += breakdown.simulation;
        self.stages.scene_population += breakdown.scene_population;
        self.stages.render += breakdown.render;

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let frames = self.frames.max(1);
        let metrics = FpsMetrics {
            per_second: self.frames as f32 / self.elapsed.as_secs_f32(),
            avg_simulation: self.stages.simulation / frames,
            avg_scene_population: self.stages.scene_population / frames,
            avg_render: self.stages.render / frames,
        };
        *self = Self::default();
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> Result<FrameSimulationBreakdown> + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 1_280,
            window_height: 720,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (exit_sender, exit_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut control_panel_input = ControlPanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let viewport = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let layout = ButtonLayout::new(viewport);
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let frame_input = gather_frame_input(
                    &scene,
                    &layout,
                    viewport,
                    &mut control_panel_input,
                    keyboard,
                );
                let simulation_breakdown = match update_scene(frame_dt, frame_input, &mut scene) {
                    Ok(breakdown) => breakdown,
                    Err(error) => {
                        let _ = exit_sender.send(Err(error));
                        return;
                    }
                };
                if scene.exit_requested {
                    break;
                }

                let render_start = Instant::now();
                draw_scene(&scene, viewport);

                let speed_label = scene.hud.as_ref().map_or("x1", |hud| hud.speed_label);
                let pressed = {
                    let mut controls_ui = macroquad::ui::root_ui();
                    draw_controls_ui(
                        &mut controls_ui,
                        ControlsUiContext {
                            layout,
                            phase: scene.phase,
                            speed_label,
                        },
                    )
                };
                control_panel_input.register(pressed);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation: simulation_breakdown.simulation,
                    scene_population: simulation_breakdown.scene_population,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        avg_simulation,
                        avg_scene_population,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.1} | sim: {:>6.2}ms scene: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_scene_population.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }

            let _ = exit_sender.send(Ok(()));
        });

        exit_receiver
            .recv()
            .unwrap_or(Ok(()))
            .context("macroquad frame loop stopped with an error")
    }
}

fn gather_frame_input(
    scene: &Scene,
    layout: &ButtonLayout,
    viewport: Vec2,
    latches: &mut ControlPanelInputState,
    keyboard: KeyboardShortcuts,
) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    let clicked = is_mouse_button_pressed(MouseButton::Left);
    let mut input = gather_frame_input_from_observations(
        scene.phase,
        layout,
        viewport,
        Vec2::new(cursor_x, cursor_y),
        clicked,
        latches,
    );
    input.hire_helper |= keyboard.hire_helper;
    input.toggle_speed |= keyboard.toggle_speed;
    input
}

fn gather_frame_input_from_observations(
    phase: SessionPhase,
    layout: &ButtonLayout,
    viewport: Vec2,
    cursor_position: Vec2,
    clicked: bool,
    latches: &mut ControlPanelInputState,
) -> FrameInput {
    let inside_viewport = cursor_position.x >= 0.0
        && cursor_position.y >= 0.0
        && cursor_position.x <= viewport.x
        && cursor_position.y <= viewport.y;
    let pointer_pressed = (clicked
        && inside_viewport
        && !layout.captures(phase, cursor_position))
    .then_some(cursor_position);

    FrameInput {
        viewport,
        pointer_pressed,
        hire_helper: latches.take_hire_helper(),
        toggle_speed: latches.take_toggle_speed(),
        back: latches.take_back(),
        difficulty: latches.take_difficulty(),
    }
}

fn draw_scene(scene: &Scene, viewport: Vec2) {
    if scene.phase == SessionPhase::SelectingDifficulty {
        draw_centered_text(
            "Select Difficulty",
            viewport.x / 2.0,
            viewport.y * 0.2,
            TITLE_FONT_SIZE,
            palette::HUD_TEXT,
        );
        return;
    }

    if let Some(path) = &scene.path {
        draw_path(path);
    }
    draw_discs(&scene.spots, palette::SPOT);
    draw_discs(&scene.towers, palette::TOWER);
    draw_attack_lines(&scene.attack_lines);
    draw_mobs(&scene.mobs);
    draw_helpers(&scene.helpers);
    if let Some(hud) = &scene.hud {
        draw_hud(hud);
    }
    draw_banners(&scene.banners, viewport);
}

fn draw_path(path: &PathPresentation) {
    let color = to_macroquad_color(palette::PATH);
    let half_width = path.width / 2.0;
    for segment in path.points.windows(2) {
        let (start, end) = (segment[0], segment[1]);
        macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, path.width, color);
        macroquad::shapes::draw_circle(end.x, end.y, half_width, color);
    }
}

fn draw_discs(discs: &[DiscPresentation], fill: Color) {
    let color = to_macroquad_color(fill);
    for disc in discs {
        macroquad::shapes::draw_circle(disc.center.x, disc.center.y, disc.radius, color);
    }
}

fn draw_attack_lines(lines: &[AttackLinePresentation]) {
    let color = to_macroquad_color(palette::ATTACK_LINE);
    for line in lines {
        macroquad::shapes::draw_line(
            line.from.x,
            line.from.y,
            line.to.x,
            line.to.y,
            ATTACK_LINE_THICKNESS,
            color,
        );
    }
}

fn draw_mobs(mobs: &[MobPresentation]) {
    let outline = to_macroquad_color(palette::OUTLINE);
    for mob in mobs {
        macroquad::shapes::draw_poly(
            mob.center.x,
            mob.center.y,
            mob.sides,
            mob.radius,
            0.0,
            to_macroquad_color(mob.color),
        );
        macroquad::shapes::draw_poly_lines(
            mob.center.x,
            mob.center.y,
            mob.sides,
            mob.radius,
            0.0,
            1.0,
            outline,
        );
    }
}

fn draw_helpers(helpers: &[HelperPresentation]) {
    let outline = to_macroquad_color(palette::OUTLINE);
    for helper in helpers {
        macroquad::shapes::draw_circle(
            helper.center.x,
            helper.center.y,
            helper.radius,
            to_macroquad_color(helper.color),
        );
        macroquad::shapes::draw_circle_lines(
            helper.center.x,
            helper.center.y,
            helper.radius,
            1.0,
            outline,
        );
    }
}

fn draw_hud(hud: &HudPresentation) {
    let color = to_macroquad_color(palette::HUD_TEXT);
    let mut baseline = 10.0;
    for (index, line) in hud.lines().iter().enumerate() {
        // Status lines use the large font, price lines the small one.
        let font_size = if index < 3 {
            HUD_FONT_SIZE
        } else {
            HUD_COST_FONT_SIZE
        };
        baseline += font_size;
        macroquad::text::draw_text(line, 10.0, baseline, font_size, color);
        baseline += 6.0;
    }
}

fn draw_banners(banners: &[BannerPresentation], viewport: Vec2) {
    let mut center_y = viewport.y * 0.1;
    for banner in banners {
        let color = palette::BANNER.with_alpha(banner.alpha);
        draw_centered_text(
            &banner.text,
            viewport.x / 2.0,
            center_y,
            BANNER_FONT_SIZE,
            color,
        );
        center_y += f32::from(BANNER_FONT_SIZE) + 8.0;
    }
}

fn draw_centered_text(text: &str, center_x: f32, center_y: f32, font_size: u16, color: Color) {
    let dimensions = macroquad::text::measure_text(text, None, font_size, 1.0);
    macroquad::text::draw_text(
        text,
        center_x - dimensions.width / 2.0,
        center_y + dimensions.height / 2.0,
        f32::from(font_size),
        to_macroquad_color(color),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(1_280.0, 720.0);

    #[test]
    fn presses_on_buttons_never_reach_the_playfield() {
        let layout = ButtonLayout::new(VIEWPORT);
        let mut latches = ControlPanelInputState::default();

        let on_button = gather_frame_input_from_observations(
            SessionPhase::Playing,
            &layout,
            VIEWPORT,
            Vec2::new(30.0, 700.0),
            true,
            &mut latches,
        );
        let on_field = gather_frame_input_from_observations(
            SessionPhase::Playing,
            &layout,
            VIEWPORT,
            Vec2::new(400.0, 300.0),
            true,
            &mut latches,
        );

        assert_eq!(on_button.pointer_pressed, None);
        assert_eq!(on_field.pointer_pressed, Some(Vec2::new(400.0, 300.0)));
    }

    #[test]
    fn pointer_is_reported_only_on_click_inside_the_window() {
        let layout = ButtonLayout::new(VIEWPORT);
        let mut latches = ControlPanelInputState::default();

        let hover = gather_frame_input_from_observations(
            SessionPhase::Playing,
            &layout,
            VIEWPORT,
            Vec2::new(400.0, 300.0),
            false,
            &mut latches,
        );
        let outside = gather_frame_input_from_observations(
            SessionPhase::Playing,
            &layout,
            VIEWPORT,
            Vec2::new(-5.0, 300.0),
            true,
            &mut latches,
        );

        assert_eq!(hover.pointer_pressed, None);
        assert_eq!(outside.pointer_pressed, None);
        assert_eq!(hover.viewport, VIEWPORT);
    }

    #[test]
    fn latched_buttons_surface_once_in_frame_input() {
        let layout = ButtonLayout::new(VIEWPORT);
        let mut latches = ControlPanelInputState::default();
        latches.register(ControlsUiResult {
            hire_helper: true,
            toggle_speed: true,
            back: false,
            difficulty: Some(Difficulty::Hard),
        });

        let first = gather_frame_input_from_observations(
            SessionPhase::SelectingDifficulty,
            &layout,
            VIEWPORT,
            Vec2::ZERO,
            false,
            &mut latches,
        );
        let second = gather_frame_input_from_observations(
            SessionPhase::SelectingDifficulty,
            &layout,
            VIEWPORT,
            Vec2::ZERO,
            false,
            &mut latches,
        );

        assert!(first.hire_helper);
        assert!(first.toggle_speed);
        assert!(!first.back);
        assert_eq!(first.difficulty, Some(Difficulty::Hard));
        assert_eq!(
            second,
            FrameInput {
                viewport: VIEWPORT,
                ..FrameInput::default()
            }
        );
    }

    #[test]
    fn macroquad_colors_keep_every_channel() {
        let converted = to_macroquad_color(Color::new(0.1, 0.2, 0.3, 0.4));

        assert_eq!(converted.r, 0.1);
        assert_eq!(converted.g, 0.2);
        assert_eq!(converted.b, 0.3);
        assert_eq!(converted.a, 0.4);
    }

    #[test]
    fn fps_counter_reports_average_frames_per_second() {
        let mut counter = FpsCounter::default();
        let frame = |millis| FrameBreakdown {
            frame: Duration::from_millis(millis),
            ..FrameBreakdown::default()
        };
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());

        let metrics = counter
            .record_frame(frame(250))
            .expect("should report FPS after one second of samples");
        assert!((metrics.per_second - 4.0).abs() <= 1e-3);
        assert!(counter.record_frame(frame(250)).is_none());
    }

    #[test]
    fn fps_counter_averages_stage_durations() {
        let mut counter = FpsCounter::default();
        let frame = FrameBreakdown {
            frame: Duration::from_millis(500),
            simulation: Duration::from_millis(4),
            scene_population: Duration::from_millis(2),
            render: Duration::from_millis(6),
        };

        assert!(counter.record_frame(frame).is_none());
        let metrics = counter
            .record_frame(frame)
            .expect("one second elapsed after two frames");

        assert_eq!(metrics.avg_simulation, Duration::from_millis(4));
        assert_eq!(metrics.avg_scene_population, Duration::from_millis(2));
        assert_eq!(metrics.avg_render, Duration::from_millis(6));
    }
}
