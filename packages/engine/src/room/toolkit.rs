/// Shared building blocks for room implementations: perimeter walls,
/// floors, exit doors, exit detection and camera updates.
use bevy_math::IVec2;
use bevy_math::IVec3;
use tracing::debug;

use crate::constants::ROOM_SIZE;
use crate::prelude::*;
use crate::room::Scroll;
use crate::sprite::Door;
use crate::sprite::Player;

/// Size of a room's floor area in cells.
pub fn room_extent(zones: IVec2) -> IVec2 {
    zones * ROOM_SIZE
}

/// The doorway cell on the wall line. Stepping into it leaves the room.
pub fn exit_trigger_cell(exit: &Exit, zones: IVec2) -> IVec3 {
    let extent = room_extent(zones);
    let z = exit.floor_z + 1;
    match exit.side {
        Direction::North => IVec3::new(exit.door_pos, extent.y, z),
        Direction::South => IVec3::new(exit.door_pos, -1, z),
        Direction::East => IVec3::new(extent.x, exit.door_pos, z),
        Direction::West => IVec3::new(-1, exit.door_pos, z),
    }
}

/// The cell just inside a doorway, where an arriving player appears.
pub fn exit_arrival_cell(exit: &Exit, zones: IVec2) -> IVec3 {
    exit_trigger_cell(exit, zones) - exit.side.delta()
}

/// Build the player for `entry`. Arriving through a door places it just
/// inside that door facing into the room. Entry indices are fixed by the
/// exit tables, so an index past the end is a programming error.
pub fn set_player_at_exit(
    exits: &[Exit],
    zones: IVec2,
    entry: Entry,
    start: (IVec3, Direction),
) -> Player {
    match entry {
        Entry::GameStart => Player::new(start.0, start.1),
        Entry::Door(index) => {
            assert!(
                index < exits.len(),
                "entry point {index} out of range for a room with {} exits",
                exits.len()
            );
            let exit = &exits[index];
            Player::new(exit_arrival_cell(exit, zones), exit.side.opposite())
        }
    }
}

/// Index of the exit whose doorway the player stands in, if any.
pub fn check_exits(player: &Player, exits: &[Exit], zones: IVec2) -> Option<usize> {
    if player.is_dead() {
        return None;
    }
    let position = player.position();
    exits
        .iter()
        .position(|exit| exit_trigger_cell(exit, zones) == position)
}

/// Queue the room change for the exit the player stands in. Returns true
/// if one was queued, after which the room should do nothing else this
/// tick.
pub fn leave_by_exit(ctx: &mut RoomContext, exits: &[Exit], zones: IVec2) -> bool {
    let Some(player) = ctx.sprites.player() else {
        return false;
    };
    let Some(index) = check_exits(player, exits, zones) else {
        return false;
    };
    let exit = &exits[index];
    debug!("leaving through exit {index} to {}", exit.destination);
    ctx.events.push(StoryEvent::RoomChange {
        destination: exit.destination,
        entry: Entry::Door(exit.entry_point),
    });
    true
}

/// A flat floor covering the whole room one level below the player.
pub fn add_floor(sprites: &mut SpriteManager, zones: IVec2, colour: Colour) -> SpriteId {
    let extent = room_extent(zones);
    sprites.add_sprite(BlockArray::slab(IVec3::new(0, 0, -1), extent.x, extent.y, colour))
}

/// Perimeter walls from `z_min` up to `z_max` inclusive, with a two cell
/// high gap at each doorway and a threshold block under it in the exit's
/// floor colour. The threshold is what the player stands on in the
/// doorway, so it is included even below `z_min`.
pub fn add_basic_walls(
    sprites: &mut SpriteManager,
    exits: &[Exit],
    zones: IVec2,
    z_min: i32,
    z_max: i32,
    colour: Colour,
) -> SpriteId {
    let extent = room_extent(zones);
    let doorways: Vec<(IVec3, Colour)> = exits
        .iter()
        .map(|exit| (exit_trigger_cell(exit, zones), exit.floor_colour))
        .collect();
    let bottom = doorways
        .iter()
        .map(|(cell, _)| cell.z - 1)
        .fold(z_min, i32::min);
    let origin = IVec3::new(-1, -1, bottom);
    let size = IVec3::new(extent.x + 2, extent.y + 2, z_max - bottom + 1);
    let walls = BlockArray::from_fn(origin, size, |local| {
        let cell = origin + local;
        for (doorway, floor_colour) in &doorways {
            if cell.x == doorway.x && cell.y == doorway.y {
                if cell.z == doorway.z - 1 {
                    return Some(*floor_colour);
                }
                if cell.z == doorway.z || cell.z == doorway.z + 1 {
                    return None;
                }
            }
        }
        let rim = cell.x == -1 || cell.y == -1 || cell.x == extent.x || cell.y == extent.y;
        (rim && cell.z >= z_min).then_some(colour)
    });
    sprites.add_sprite(walls)
}

/// A door sprite in every doorway, closed where `closed` says so.
/// Returns the door ids in exit order.
pub fn add_exit_doors(
    sprites: &mut SpriteManager,
    exits: &[Exit],
    zones: IVec2,
    colour: Colour,
    closed: impl Fn(usize) -> bool,
) -> Vec<SpriteId> {
    exits
        .iter()
        .enumerate()
        .map(|(index, exit)| {
            sprites.add_sprite(Door::new(exit_trigger_cell(exit, zones), closed(index), colour))
        })
        .collect()
}

/// Follow the player with the camera and announce any scroll.
pub fn update_camera(ctx: &mut RoomContext, zones: IVec2, levels: &[CameraLevel]) {
    let Some(position) = ctx.sprites.player().map(|player| player.position()) else {
        return;
    };
    let scrolls: [Option<Scroll>; 2] = [
        ctx.camera.check_horizontal_scroll(position, zones),
        ctx.camera.check_vertical_scroll(position.z, levels),
    ];
    for scroll in scrolls.into_iter().flatten() {
        ctx.events.push(StoryEvent::CameraScroll(scroll));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::palette;

    fn exits() -> Vec<Exit> {
        vec![
            Exit::new(Direction::East, 5, "A02", 0),
            Exit::new(Direction::North, 4, "B01", 0).with_floor(-1, palette::BROWN),
        ]
    }

    #[test]
    fn arrival_is_inside_the_doorway() {
        let zones = IVec2::ONE;
        let player = set_player_at_exit(&exits(), zones, Entry::Door(1), (IVec3::ZERO, Direction::North));
        assert_eq!(player.position(), IVec3::new(4, 9, 0));
        assert_eq!(player.facing, Direction::South);
    }

    #[test]
    #[should_panic]
    fn entry_out_of_range_panics() {
        set_player_at_exit(&exits(), IVec2::ONE, Entry::Door(2), (IVec3::ZERO, Direction::North));
    }

    #[test]
    fn exit_detection_is_exact() {
        let zones = IVec2::ONE;
        let exits = exits();
        let mut player = Player::new(IVec3::new(9, 5, 0), Direction::East);
        assert_eq!(check_exits(&player, &exits, zones), None);
        player.set_position(IVec3::new(10, 5, 0));
        assert_eq!(check_exits(&player, &exits, zones), Some(0));
        player.set_position(IVec3::new(10, 5, 1));
        assert_eq!(check_exits(&player, &exits, zones), None);
    }

    #[test]
    fn walls_leave_doorways_open() {
        let mut sprites = SpriteManager::new();
        let exits = exits();
        add_floor(&mut sprites, IVec2::ONE, palette::GREEN);
        add_basic_walls(&mut sprites, &exits, IVec2::ONE, -1, 1, palette::LIGHT_GREY);
        assert!(sprites.blocked(IVec3::new(10, 4, 0), None));
        assert!(sprites.blocked(IVec3::new(-1, 0, 1), None));
        assert!(!sprites.blocked(IVec3::new(10, 5, 0), None));
        assert!(!sprites.blocked(IVec3::new(4, 10, 1), None));
        assert!(sprites.platform_at(IVec3::new(4, 10, 0)));
        assert!(!sprites.blocked(IVec3::new(5, 5, 0), None));
    }
}
