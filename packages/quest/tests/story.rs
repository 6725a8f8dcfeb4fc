//! Whole game scenarios driven through the public API: room changes,
//! cross-room state, respawns and save strings.

use bevy_math::IVec3;
use mq_engine::prelude::*;
use mq_quest::GameConfig;
use mq_quest::GameManager;
use mq_quest::RoomRegistry;
use mq_quest::rooms::BRIDGE_LEN;
use mq_quest::rooms::RoomA01;
use mq_quest::rooms::RoomB01;
use mq_quest::rooms::RoomB02;
use mq_quest::rooms::bridge_extent;

fn new_game() -> GameManager {
    GameManager::new(GameConfig::default()).unwrap()
}

fn hold(manager: &mut GameManager, direction: Direction, ticks: usize) {
    for _ in 0..ticks {
        manager.advance(ActionInput::moving(direction));
    }
}

fn idle(manager: &mut GameManager, ticks: usize) {
    for _ in 0..ticks {
        manager.advance(ActionInput::default());
    }
}

fn place_player(manager: &mut GameManager, position: IVec3, facing: Direction) {
    let player = manager.story_mut().sprites_mut().player_mut().unwrap();
    player.set_position(position);
    player.facing = facing;
}

fn lay_bridge(registry: &mut RoomRegistry) {
    let b01 = registry.find_mut::<RoomB01>("B01").unwrap();
    assert!(b01.throw_switch(true));
    while b01.bridge_moving() {
        b01.update_bridge();
    }
}

#[test]
fn courtyard_plate_opens_the_north_door() {
    let mut manager = new_game();
    hold(&mut manager, Direction::North, 30);
    let a01 = manager.story().rooms().find::<RoomA01>("A01").unwrap();
    assert!(a01.door_open());
    assert!(manager.take_save().is_some());
    assert!(manager.take_save().is_none());

    let mut resumed = new_game();
    assert!(resumed.restore(&manager.save_string()));
    let a01 = resumed.story().rooms().find::<RoomA01>("A01").unwrap();
    assert!(a01.door_open());
}

#[test]
fn walking_through_a_doorway_changes_room_once() {
    let mut manager = new_game();
    place_player(&mut manager, IVec3::new(8, 5, 0), Direction::East);
    let mut changes = 0;
    for _ in 0..30 {
        let records = manager.story().save_state().records;
        manager.advance(ActionInput::moving(Direction::East));
        let events = manager.story().last_events();
        changes += events
            .iter()
            .filter(|event| matches!(event, StoryEvent::RoomChange { .. }))
            .count();
        if manager.story().current_room().id() != "A01" {
            assert!(matches!(events.last(), Some(StoryEvent::RoomChange { .. })));
            assert_eq!(manager.story().save_state().records, records);
            break;
        }
    }
    assert_eq!(changes, 1);
    assert_eq!(manager.story().current_room().id(), "A02");
    let player = manager.story().sprites().player().unwrap();
    assert_eq!(player.position(), IVec3::new(0, 5, 0));
    assert_eq!(player.facing, Direction::East);
}

fn b02_bridge_extent(manager: &mut GameManager) -> u32 {
    let items = manager.story().items();
    let rooms = manager.story_mut().rooms_mut();
    let index = rooms.index_of("B02").unwrap();
    let (current, lookup) = rooms.split(index, items);
    assert_eq!(current.id(), "B02");
    bridge_extent(&lookup)
}

fn posts_visible(manager: &GameManager) -> bool {
    let b02 = manager.story().rooms().find::<RoomB02>("B02").unwrap();
    let posts = b02.posts().unwrap();
    manager
        .story()
        .sprites()
        .get::<BlockArray>(posts)
        .unwrap()
        .is_visible()
}

#[test]
fn far_room_follows_the_bridge() {
    let mut manager = new_game();
    lay_bridge(manager.story_mut().rooms_mut());
    let b02 = manager.story().rooms().index_of("B02").unwrap();
    manager.story_mut().enter_room(b02, Entry::Door(0));
    assert_eq!(b02_bridge_extent(&mut manager), BRIDGE_LEN);
    assert!(posts_visible(&manager));

    let b01 = manager.story_mut().rooms_mut().find_mut::<RoomB01>("B01").unwrap();
    assert!(b01.throw_switch(false));
    assert_eq!(b01.update_bridge(), BRIDGE_LEN - 1);
    idle(&mut manager, 1);
    assert_eq!(manager.story().current_room().id(), "B02");
    assert_eq!(b02_bridge_extent(&mut manager), BRIDGE_LEN - 1);
    assert!(!posts_visible(&manager));

    let rooms = manager.story().rooms();
    assert_eq!(rooms.find::<RoomB01>("B01").unwrap().bridge_extent(), BRIDGE_LEN - 1);
    let b02 = rooms.find::<RoomB02>("B02").unwrap();
    assert!(!b02.gate_open());
    assert!(!b02.chest_open());
}

#[test]
fn starting_in_the_chasm_room_is_safe() {
    let config = GameConfig {
        start_room: "B01".to_string(),
        ..GameConfig::default()
    };
    let mut manager = GameManager::new(config).unwrap();
    idle(&mut manager, 200);
    assert_eq!(manager.story().deaths(), 0);
    assert!(!manager.story().sprites().player().unwrap().is_dead());
}

#[test]
fn progress_in_every_room_survives_a_save() {
    let mut manager = new_game();
    hold(&mut manager, Direction::North, 30);
    lay_bridge(manager.story_mut().rooms_mut());
    let saved = manager.save_string();

    let mut resumed = new_game();
    assert!(resumed.restore(&saved));
    let rooms = resumed.story().rooms();
    assert!(rooms.find::<RoomA01>("A01").unwrap().door_open());
    assert_eq!(rooms.find::<RoomB01>("B01").unwrap().bridge_extent(), BRIDGE_LEN);
    assert_eq!(resumed.story().current_room().id(), "A01");
    assert_eq!(resumed.save_string(), saved);
}

#[test]
fn corrupt_saves_leave_the_game_alone() {
    let mut manager = new_game();
    hold(&mut manager, Direction::North, 30);
    let saved = manager.save_string();
    for text in ["", "   ", "?", "0", "zzzz", &saved[..saved.len() / 2]] {
        assert!(!manager.restore(text), "accepted {text:?}");
    }
    assert_eq!(manager.save_string(), saved);
}

#[test]
fn same_inputs_same_world() {
    let script = [
        Direction::North,
        Direction::East,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
    let mut a = new_game();
    let mut b = new_game();
    for (step, direction) in script.iter().cycle().take(200).enumerate() {
        let input = if step % 7 == 0 {
            ActionInput::attacking()
        } else {
            ActionInput::moving(*direction)
        };
        a.advance(input);
        b.advance(input);
        assert_eq!(
            a.story().sprites().state_hash().unwrap(),
            b.story().sprites().state_hash().unwrap()
        );
    }
    assert_eq!(a.save_string(), b.save_string());
}

#[test]
fn death_counts_and_respawns_at_the_entry() {
    let mut manager = new_game();
    let b01 = manager.story().rooms().index_of("B01").unwrap();
    manager.story_mut().enter_room(b01, Entry::Door(0));
    let arrival = manager.story().sprites().player().unwrap().position();
    assert_eq!(arrival, IVec3::new(4, 0, 0));

    place_player(&mut manager, IVec3::new(4, 3, 0), Direction::North);
    hold(&mut manager, Direction::North, 1);
    idle(&mut manager, 20);
    assert_eq!(manager.story().deaths(), 1);
    assert!(manager.story().is_respawning());

    idle(&mut manager, 60);
    assert!(!manager.story().is_respawning());
    let player = manager.story().sprites().player().unwrap();
    assert!(!player.is_dead());
    assert_eq!(player.position(), arrival);
    assert_eq!(manager.story().deaths(), 1);
}
