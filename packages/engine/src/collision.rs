/// Movement rules on the cell grid. Everything here reads the world as
/// it was at the start of the tick.
use bevy_math::IVec3;

use crate::Direction;
use crate::SpriteId;
use crate::SpriteManager;

/// Whether something standing in `cell` has ground beneath it.
pub fn supported(world: &SpriteManager, cell: IVec3) -> bool {
    world.platform_at(cell)
}

/// The cell a walker ends up in after one step from `from`. With `climb`
/// a blocked step is retried one level up, provided the walker has
/// headroom and the raised cell has ground.
pub fn step_target(
    world: &SpriteManager,
    from: IVec3,
    direction: Direction,
    climb: bool,
    ignore: SpriteId,
) -> Option<IVec3> {
    let target = from + direction.delta();
    if !world.blocked(target, Some(ignore)) {
        return Some(target);
    }
    if !climb {
        return None;
    }
    let raised = target + IVec3::Z;
    let headroom = from + IVec3::Z;
    if !world.blocked(raised, Some(ignore))
        && !world.blocked(headroom, Some(ignore))
        && supported(world, raised)
    {
        return Some(raised);
    }
    None
}

/// Where an unsupported body is after one level of falling.
pub fn fall_step(world: &SpriteManager, cell: IVec3) -> IVec3 {
    if supported(world, cell) {
        cell
    } else {
        cell - IVec3::Z
    }
}

/// Whether a ground bound enemy may step into `cell`. Enemies never walk
/// off edges or into solid cells.
pub fn walkable(world: &SpriteManager, cell: IVec3, ignore: SpriteId) -> bool {
    !world.blocked(cell, Some(ignore)) && supported(world, cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::BlockArray;
    use crate::sprite::palette;

    #[test]
    fn falls_until_supported() {
        let mut world = SpriteManager::new();
        world.add_sprite(BlockArray::slab(IVec3::new(0, 0, -1), 2, 2, palette::GREEN));
        assert_eq!(fall_step(&world, IVec3::new(0, 0, 2)), IVec3::new(0, 0, 1));
        assert_eq!(fall_step(&world, IVec3::new(0, 0, 0)), IVec3::new(0, 0, 0));
        assert!(walkable(&world, IVec3::new(1, 1, 0), 0));
        assert!(!walkable(&world, IVec3::new(2, 1, 0), 0));
        assert!(!walkable(&world, IVec3::new(1, 1, -1), 0));
    }
}
