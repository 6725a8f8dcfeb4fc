use bevy_math::IVec3;
use serde::Deserialize;
use serde::Serialize;

use crate::prelude::*;

const EXTEND_TICKS: u32 = 4;
const EXTENDED_TICKS: u32 = 12;
const RETRACT_TICKS: u32 = 4;
/// Rest between cycles of repeating spikes.
const REST_TICKS: u32 = 24;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpikeState {
    Retracted,
    Extending,
    Extended,
    Retracting,
}

sprite_struct!(
    /// A floor trap. Lethal only while fully extended.
    pub struct Spikes {
        spike_state: SpikeState,
        timer: u32,
        armed: bool,
        /// Silent spikes skip their sound cue, for groups triggered together.
        pub silent: bool,
        /// Repeating spikes cycle on their own.
        pub repeat: bool,
    }
);

impl Spikes {
    pub fn new(position: IVec3, repeat: bool, silent: bool) -> Self {
        Self {
            state: BaseSpriteState::at(position),
            spike_state: SpikeState::Retracted,
            timer: if repeat { REST_TICKS } else { 0 },
            armed: false,
            silent,
            repeat,
        }
    }

    pub fn spike_state(&self) -> SpikeState {
        self.spike_state
    }

    /// Restart the cycle from retracted. The spikes begin extending on
    /// their next advance.
    pub fn trigger(&mut self) {
        self.spike_state = SpikeState::Retracted;
        self.timer = 0;
        self.armed = true;
    }
}

impl Sprite for Spikes {
    fn is_lethal(&self, cell: IVec3) -> bool {
        self.spike_state == SpikeState::Extended && cell == self.position()
    }

    fn prestep(&self, _world: &SpriteManager) -> bool {
        self.spike_state != SpikeState::Retracted || self.armed || self.repeat
    }

    fn advance(&self, _world: &SpriteManager, next: &mut Self, ctx: &mut TickContext) {
        if self.timer > 0 {
            next.timer = self.timer - 1;
            return;
        }
        let (state, timer) = match self.spike_state {
            SpikeState::Retracted => {
                if !self.armed && !self.repeat {
                    return;
                }
                next.armed = false;
                if !self.silent {
                    ctx.play(Sound::Spikes);
                }
                (SpikeState::Extending, EXTEND_TICKS)
            }
            SpikeState::Extending => (SpikeState::Extended, EXTENDED_TICKS),
            SpikeState::Extended => (SpikeState::Retracting, RETRACT_TICKS),
            SpikeState::Retracting => (
                SpikeState::Retracted,
                if self.repeat { REST_TICKS } else { 0 },
            ),
        };
        next.spike_state = state;
        next.timer = timer;
    }

    fn draw(&self, list: &mut DrawList) {
        let (glyph, frame) = match self.spike_state {
            SpikeState::Retracted => ('_', 0),
            SpikeState::Extending => ('^', 1),
            SpikeState::Extended => ('A', 2),
            SpikeState::Retracting => ('^', 1),
        };
        list.push_sprite(self.position(), glyph, frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(manager: &mut SpriteManager, env: &mut Env, events: &mut StoryEvents) {
        env.begin_tick(ActionInput::default());
        manager.advance(env, events);
    }

    #[test]
    fn triggered_cycle_is_lethal_only_when_extended() {
        let mut manager = SpriteManager::new();
        let cell = IVec3::new(1, 1, 0);
        let id = manager.add_sprite(Spikes::new(cell, false, false));
        let mut env = Env::new(0);
        let mut events = StoryEvents::new();
        step(&mut manager, &mut env, &mut events);
        assert_eq!(manager.get::<Spikes>(id).unwrap().spike_state(), SpikeState::Retracted);

        manager.get_mut::<Spikes>(id).unwrap().trigger();
        step(&mut manager, &mut env, &mut events);
        assert_eq!(manager.get::<Spikes>(id).unwrap().spike_state(), SpikeState::Extending);
        assert!(!manager.lethal_at(cell));

        let mut lethal_ticks = 0;
        for _ in 0..40 {
            step(&mut manager, &mut env, &mut events);
            if manager.lethal_at(cell) {
                lethal_ticks += 1;
            }
        }
        assert_eq!(lethal_ticks, EXTENDED_TICKS + 1);
        assert_eq!(manager.get::<Spikes>(id).unwrap().spike_state(), SpikeState::Retracted);
    }

    #[test]
    fn silent_spikes_make_no_sound() {
        let mut manager = SpriteManager::new();
        let loud = manager.add_sprite(Spikes::new(IVec3::new(0, 0, 0), false, false));
        let quiet = manager.add_sprite(Spikes::new(IVec3::new(1, 0, 0), false, true));
        let quieter = manager.add_sprite(Spikes::new(IVec3::new(2, 0, 0), false, true));
        for id in [loud, quiet, quieter] {
            manager.get_mut::<Spikes>(id).unwrap().trigger();
        }
        let mut env = Env::new(0);
        env.begin_tick(ActionInput::default());
        manager.advance(&mut env, &mut StoryEvents::new());
        assert_eq!(env.sounds(), &[Sound::Spikes]);
    }
}
