#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Polygon Defence adapters.
//!
//! Scenes are expressed in playfield units. Backends keep the playfield the
//! same size as their viewport, so playfield units and screen pixels agree.

use anyhow::Result as AnyResult;
use glam::Vec2;
use polygon_defence_core::{Difficulty, SessionPhase};
use std::{error::Error, fmt, time::Duration};

/// Radius shared by mob polygons and helper circles.
pub const ENTITY_RADIUS: f32 = 15.0;

/// Width of the line drawn between a firing tower and its target.
pub const ATTACK_LINE_THICKNESS: f32 = 2.0;

/// Colors used by every backend.
pub mod palette {
    use super::Color;

    /// Grass behind the playfield.
    pub const BACKGROUND: Color = Color::from_rgb_u8(0x00, 0x99, 0x2d);
    /// Path stroke.
    pub const PATH: Color = Color::from_rgb_u8(0x8b, 0x45, 0x13);
    /// Free tower spots.
    pub const SPOT: Color = Color::new(0xd2 as f32 / 255.0, 0xa0 as f32 / 255.0, 0x87 as f32 / 255.0, 0.85);
    /// Built towers.
    pub const TOWER: Color = Color::from_rgb_u8(0x8c, 0x8c, 0x8c);
    /// Helpers with their full damage budget.
    pub const HELPER: Color = Color::from_rgb_u8(0x00, 0xff, 0xff);
    /// Tower attack lines.
    pub const ATTACK_LINE: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);
    /// Outline around mobs and helpers.
    pub const OUTLINE: Color = Color::from_rgb_u8(0x00, 0x00, 0x00);
    /// Banner text.
    pub const BANNER: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);
    /// HUD text.
    pub const HUD_TEXT: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
}

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Linearly interpolates the RGB channels towards `other`.
    ///
    /// `amount` is clamped to 0.0..=1.0; the alpha channel of `self` is kept.
    #[must_use]
    pub fn mix(self, other: Color, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: mix_channel(self.red, other.red, amount),
            green: mix_channel(self.green, other.green, amount),
            blue: mix_channel(self.blue, other.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the color with a replaced alpha channel.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

fn mix_channel(from: f32, to: f32, amount: f32) -> f32 {
    from + (to - from) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Size of the drawable area in pixels.
    pub viewport: Vec2,
    /// Playfield position pressed this frame, excluding presses on buttons.
    pub pointer_pressed: Option<Vec2>,
    /// Whether the hire button was pressed this frame.
    pub hire_helper: bool,
    /// Whether the speed toggle was pressed this frame.
    pub toggle_speed: bool,
    /// Whether the back button was pressed this frame.
    pub back: bool,
    /// Difficulty chosen from the menu this frame.
    pub difficulty: Option<Difficulty>,
}

/// Time spent by the simulation while producing a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSimulationBreakdown {
    /// Time spent advancing the world and its systems.
    pub simulation: Duration,
    /// Time spent translating world state into the scene.
    pub scene_population: Duration,
}

/// Path stroke drawn beneath every entity.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPresentation {
    /// Polyline approximating the path curve.
    pub points: Vec<Vec2>,
    /// Stroke width.
    pub width: f32,
}

impl PathPresentation {
    /// Creates a new path descriptor.
    ///
    /// Returns an error when fewer than two points are provided.
    pub fn new(points: Vec<Vec2>, width: f32) -> Result<Self, RenderingError> {
        if points.len() < 2 {
            return Err(RenderingError::DegeneratePath {
                points: points.len(),
            });
        }
        validate_radius(width)?;
        Ok(Self { points, width })
    }
}

/// Filled circle used for free spots and built towers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiscPresentation {
    /// Center of the disc.
    pub center: Vec2,
    /// Radius of the disc.
    pub radius: f32,
}

impl DiscPresentation {
    /// Creates a new disc descriptor.
    #[must_use]
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Mob drawn as a regular polygon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MobPresentation {
    /// Center of the polygon.
    pub center: Vec2,
    /// Number of polygon sides.
    pub sides: u8,
    /// Circumradius of the polygon.
    pub radius: f32,
    /// Fill color, already tinted by remaining health.
    pub color: Color,
}

impl MobPresentation {
    /// Creates a mob descriptor tinted from black towards `base` by `health_fraction`.
    ///
    /// Returns an error when the polygon has fewer than three sides.
    pub fn new(
        center: Vec2,
        sides: u8,
        radius: f32,
        base: Color,
        health_fraction: f32,
    ) -> Result<Self, RenderingError> {
        if sides < 3 {
            return Err(RenderingError::InvalidPolygonSides { sides });
        }
        validate_radius(radius)?;
        Ok(Self {
            center,
            sides,
            radius,
            color: Color::BLACK.mix(base, health_fraction),
        })
    }
}

/// Helper drawn as a circle darkening while it spends its budget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HelperPresentation {
    /// Center of the circle.
    pub center: Vec2,
    /// Radius of the circle.
    pub radius: f32,
    /// Fill color.
    pub color: Color,
}

impl HelperPresentation {
    /// Creates a helper descriptor tinted towards black by `budget_spent`.
    #[must_use]
    pub fn new(center: Vec2, radius: f32, budget_spent: f32) -> Self {
        Self {
            center,
            radius,
            color: palette::HELPER.mix(Color::BLACK, budget_spent),
        }
    }
}

/// Line connecting a tower to the mob it just hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackLinePresentation {
    /// Center of the firing tower.
    pub from: Vec2,
    /// Position of the target when it was hit.
    pub to: Vec2,
}

/// Player status shown in the top-left corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Remaining player health.
    pub health: u32,
    /// Gold available.
    pub gold: u32,
    /// Current round.
    pub round: u32,
    /// Mobs queued or alive, once the first wave started.
    pub mobs_remaining: Option<u32>,
    /// Price of a tower.
    pub tower_cost: u32,
    /// Price of a helper.
    pub helper_cost: u32,
    /// Label of the speed toggle.
    pub speed_label: &'static str,
}

impl HudPresentation {
    /// Text lines of the status block, top to bottom.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let round = match self.mobs_remaining {
            Some(remaining) => format!("Round: {} | Mobs Left: {remaining}", self.round),
            None => format!("Round: {}", self.round),
        };
        vec![
            format!("Health: {}", self.health),
            format!("Gold: {}", self.gold),
            round,
            format!("Tower Cost: {}", self.tower_cost),
            format!("Helper Cost: {}", self.helper_cost),
        ]
    }
}

/// Transient message fading out near the top of the screen.
#[derive(Clone, Debug, PartialEq)]
pub struct BannerPresentation {
    /// Text of the banner.
    pub text: String,
    /// Opacity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl BannerPresentation {
    /// Creates a new banner descriptor.
    #[must_use]
    pub fn new<T>(text: T, alpha: f32) -> Self
    where
        T: Into<String>,
    {
        Self {
            text: text.into(),
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

/// Scene description combining the path, its inhabitants and the overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Phase of the session; the difficulty menu is shown while selecting.
    pub phase: SessionPhase,
    /// Path stroke, absent until a playfield is known.
    pub path: Option<PathPresentation>,
    /// Spots still available for towers.
    pub spots: Vec<DiscPresentation>,
    /// Built towers.
    pub towers: Vec<DiscPresentation>,
    /// Live mobs.
    pub mobs: Vec<MobPresentation>,
    /// Active helpers.
    pub helpers: Vec<HelperPresentation>,
    /// Attack lines still visible.
    pub attack_lines: Vec<AttackLinePresentation>,
    /// Player status, absent while the difficulty menu is shown.
    pub hud: Option<HudPresentation>,
    /// Banners currently fading out.
    pub banners: Vec<BannerPresentation>,
    /// Set by the simulation when the backend should close the window.
    pub exit_requested: bool,
}

impl Scene {
    /// Creates an empty scene for the provided phase.
    #[must_use]
    pub fn new(phase: SessionPhase) -> Self {
        Self {
            phase,
            path: None,
            spots: Vec::new(),
            towers: Vec::new(),
            mobs: Vec::new(),
            helpers: Vec::new(),
            attack_lines: Vec::new(),
            hud: None,
            banners: Vec::new(),
            exit_requested: false,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Polygon Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta and
    /// the input captured by the adapter, and rewrites the scene before it is
    /// rendered. The backend stops once the scene sets `exit_requested`, or
    /// returns the error of the first frame that failed to update.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> AnyResult<FrameSimulationBreakdown>
            + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Polygons need at least three sides.
    InvalidPolygonSides {
        /// Provided side count that failed validation.
        sides: u8,
    },
    /// Radii and stroke widths must be positive and finite.
    InvalidRadius {
        /// Provided value that failed validation.
        radius: f32,
    },
    /// A path needs at least two points.
    DegeneratePath {
        /// Number of points provided.
        points: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPolygonSides { sides } => {
                write!(f, "polygons need at least 3 sides (received {sides})")
            }
            Self::InvalidRadius { radius } => {
                write!(f, "radius must be positive and finite (received {radius})")
            }
            Self::DegeneratePath { points } => {
                write!(f, "path needs at least 2 points (received {points})")
            }
        }
    }
}

impl Error for RenderingError {}

fn validate_radius(radius: f32) -> Result<(), RenderingError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(RenderingError::InvalidRadius { radius })
    }
}
