use bevy_math::IVec2;
use bevy_math::IVec3;

use crate::prelude::*;

/// Ticks per colour step of the flowing animation.
pub const FLOW_TICKS: u32 = 8;

sprite_struct!(
    /// A lethal pool covering a rectangle of cells at one height. An
    /// inactive pool is drained, drawn and treated as empty.
    pub struct Liquid {
        size: IVec2,
        colours: Vec<Colour>,
        active: bool,
        flow_timer: u32,
        frame: usize,
    }
);

impl Liquid {
    pub fn new(min: IVec3, size: IVec2, colours: Vec<Colour>) -> Self {
        assert!(!colours.is_empty(), "a liquid needs at least one colour");
        Self {
            state: BaseSpriteState::at(min),
            size,
            colours,
            active: true,
            flow_timer: FLOW_TICKS,
            frame: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn contains(&self, cell: IVec3) -> bool {
        let min = self.position();
        cell.z == min.z
            && cell.x >= min.x
            && cell.y >= min.y
            && cell.x < min.x + self.size.x
            && cell.y < min.y + self.size.y
    }

    pub fn colour(&self) -> Colour {
        self.colours[self.frame]
    }
}

impl Sprite for Liquid {
    fn is_lethal(&self, cell: IVec3) -> bool {
        self.active && self.contains(cell)
    }

    fn prestep(&self, _world: &SpriteManager) -> bool {
        self.active && self.colours.len() > 1
    }

    fn advance(&self, _world: &SpriteManager, next: &mut Self, _ctx: &mut TickContext) {
        if self.flow_timer > 0 {
            next.flow_timer = self.flow_timer - 1;
            return;
        }
        next.frame = (self.frame + 1) % self.colours.len();
        next.flow_timer = FLOW_TICKS;
    }

    fn draw(&self, list: &mut DrawList) {
        if !self.active {
            return;
        }
        let min = self.position();
        for y in (0..self.size.y).rev() {
            for x in 0..self.size.x {
                // liquid shows one level down, below the surface it kills at
                list.push_block(min + IVec3::new(x, y, -1), self.colour());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::palette;

    #[test]
    fn lethal_inside_the_surface_only() {
        let pool = Liquid::new(
            IVec3::new(2, 2, 0),
            IVec2::new(2, 3),
            vec![palette::BLUE, palette::LIGHT_BLUE],
        );
        assert!(pool.is_lethal(IVec3::new(3, 4, 0)));
        assert!(!pool.is_lethal(IVec3::new(4, 4, 0)));
        assert!(!pool.is_lethal(IVec3::new(3, 4, 1)));
        let mut drained = pool.clone();
        drained.set_active(false);
        assert!(!drained.is_lethal(IVec3::new(3, 4, 0)));
    }

    #[test]
    fn colours_cycle() {
        let mut manager = SpriteManager::new();
        let id = manager.add_sprite(Liquid::new(
            IVec3::ZERO,
            IVec2::ONE,
            vec![palette::BLUE, palette::LIGHT_BLUE],
        ));
        let mut env = Env::new(0);
        let mut events = StoryEvents::new();
        for _ in 0..=FLOW_TICKS {
            manager.advance(&mut env, &mut events);
        }
        assert_eq!(manager.get::<Liquid>(id).unwrap().colour(), palette::LIGHT_BLUE);
    }
}
