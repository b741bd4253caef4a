//! Translation of world queries into backend-agnostic scene descriptors.

use glam::Vec2;
use polygon_defence_core::{MobColor, SessionPhase, WorldPoint, HELPER_COST, TOWER_COST};
use polygon_defence_rendering::{
    AttackLinePresentation, BannerPresentation, Color, DiscPresentation, HelperPresentation,
    HudPresentation, MobPresentation, PathPresentation, RenderingError, Scene, ENTITY_RADIUS,
};
use polygon_defence_world::{query, World};

/// Segments used to approximate the path stroke.
const PATH_SEGMENTS: usize = 64;

/// Rewrites `scene` so it mirrors the current world state.
pub(crate) fn populate_scene(world: &World, scene: &mut Scene) -> Result<(), RenderingError> {
    let phase = query::phase(world);
    let playfield = query::playfield(world);
    scene.phase = phase;

    scene.path = Some(PathPresentation::new(
        query::path_polyline(world, PATH_SEGMENTS)
            .into_iter()
            .map(to_vec2)
            .collect(),
        playfield.path_width(),
    )?);

    scene.spots.clear();
    scene.spots.extend(
        query::available_spots(world)
            .into_iter()
            .map(|spot| DiscPresentation::new(to_vec2(spot.position), playfield.spot_radius())),
    );

    scene.towers.clear();
    scene.towers.extend(
        query::tower_view(world)
            .iter()
            .map(|tower| DiscPresentation::new(to_vec2(tower.position), playfield.tower_radius())),
    );

    scene.mobs.clear();
    for mob in query::mob_view(world).iter() {
        scene.mobs.push(MobPresentation::new(
            to_vec2(mob.position),
            mob.spec.sides(),
            ENTITY_RADIUS,
            to_color(mob.spec.color()),
            mob.health_fraction(),
        )?);
    }

    scene.helpers.clear();
    scene.helpers.extend(query::helpers(world).into_iter().map(|helper| {
        HelperPresentation::new(to_vec2(helper.position), ENTITY_RADIUS, helper.budget_spent)
    }));

    scene.attack_lines.clear();
    scene.attack_lines.extend(
        query::attack_lines(world)
            .into_iter()
            .map(|line| AttackLinePresentation {
                from: to_vec2(line.from),
                to: to_vec2(line.to),
            }),
    );

    scene.hud = (phase != SessionPhase::SelectingDifficulty).then(|| HudPresentation {
        health: query::health(world).get(),
        gold: query::gold(world).get(),
        round: query::round(world),
        mobs_remaining: query::mobs_remaining(world),
        tower_cost: TOWER_COST.get(),
        helper_cost: HELPER_COST.get(),
        speed_label: query::speed(world).label(),
    });

    scene.banners.clear();
    scene.banners.extend(query::banners(world).into_iter().map(|banner| {
        BannerPresentation::new(banner.message.to_string(), banner.remaining_fraction)
    }));

    Ok(())
}

fn to_vec2(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x(), point.y())
}

fn to_color(color: MobColor) -> Color {
    Color::from_rgb_u8(color.red(), color.green(), color.blue())
}
