//! Plain-text map rendering.
use drift_core::{ComponentKind, Entity, Point, World};

const UNSEEN: char = ' ';
const FLOOR: char = '.';
const BLOCKED: char = '#';
const PLAYER: char = '@';
const CREATURE: char = 'e';

/// Renders the world as one line per row.
///
/// With a player in the world, only discovered tiles are drawn and creatures
/// appear only where the player currently sees. Without one, everything is
/// drawn.
pub fn render(world: &World) -> String {
    let fog = world.get_player().is_ok();
    let mut out = String::with_capacity(((world.width() + 1) * world.height()) as usize);

    for y in 0..world.height() as i32 {
        for x in 0..world.width() as i32 {
            let point = Point::new(x, y);
            let glyph = if !fog || world.is_location_visible(point) {
                tile_glyph(world, point, true)
            } else if world.is_location_discovered(point) {
                tile_glyph(world, point, false)
            } else {
                UNSEEN
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn tile_glyph(world: &World, point: Point, visible: bool) -> char {
    world
        .get_entities_at(point)
        .into_iter()
        .filter(|entity| visible || !is_mobile(entity))
        .filter_map(|entity| entity_glyph(entity).map(|glyph| (z_index(entity), glyph)))
        .max_by_key(|(z, _)| *z)
        .map_or(FLOOR, |(_, glyph)| glyph)
}

fn entity_glyph(entity: &Entity) -> Option<char> {
    if let Some(symbol) = entity.symbol() {
        return Some(symbol.glyph);
    }
    if entity.is_player() {
        Some(PLAYER)
    } else if is_mobile(entity) {
        Some(CREATURE)
    } else if entity.has_component(ComponentKind::Impassable) || entity.is_opaque() {
        Some(BLOCKED)
    } else {
        None
    }
}

fn z_index(entity: &Entity) -> i32 {
    match entity.symbol() {
        Some(symbol) => symbol.z_index,
        None if entity.is_player() => i32::MAX,
        None => 0,
    }
}

fn is_mobile(entity: &Entity) -> bool {
    entity.is_player()
        || entity.has_component(ComponentKind::EnemyAi)
        || entity.has_component(ComponentKind::Follower)
        || entity.has_component(ComponentKind::Inertia)
}

#[cfg(test)]
mod tests {
    use drift_core::{Component, EnemyAi, EnemyAiKind, PLAYER_TAG, Vision};

    use super::*;

    #[test]
    fn draws_everything_without_a_player() {
        let mut world = World::new(3, 2);
        world.add_entity(Entity::new(Point::new(1, 0)).with_component(Component::Impassable));
        assert_eq!(render(&world), ".#.\n...\n");
    }

    #[test]
    fn fog_hides_undiscovered_tiles_and_remembered_creatures() {
        let mut world = World::new(7, 1);
        world.add_entity(
            Entity::with_id("hero".into(), Point::new(0, 0))
                .with_tag(PLAYER_TAG)
                .with_component(Vision::new(2)),
        );
        world.add_entity(Entity::with_id("grunt".into(), Point::new(2, 0)).with_component(
            EnemyAi {
                kind: EnemyAiKind::Stationary,
                aggro_radius: 1,
            },
        ));
        assert_eq!(render(&world), "@.e    \n");

        world.move_entity(&"hero".into(), Point::new(6, 0));
        assert_eq!(render(&world), "... ..@\n");
    }
}
