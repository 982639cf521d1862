use arena_duel::compute::{init_match, spawn_player};
use arena_duel::config::Rules;
use arena_duel::entities::*;

#[test]
fn entity_enums_compare() {
    // Enums derive PartialEq; equality comparisons must work
    assert_eq!(Level::Jump, Level::Jump);
    assert_ne!(Level::Jump, Level::Crouch);
    assert_eq!(PlayerId::P1, PlayerId::P1);
    assert_ne!(PlayerId::P1, PlayerId::P2);
    assert_eq!(ShotTier::Charged, ShotTier::Charged);
    assert_ne!(ShotTier::Charged, ShotTier::Normal);
    assert_eq!(PowerupKind::Shield, PowerupKind::Shield);
    assert_ne!(PowerupKind::Shield, PowerupKind::Shotgun);
    assert_eq!(ChargeState::Charging(3), ChargeState::Charging(3));
    assert_ne!(ChargeState::Charging(3), ChargeState::Idle);
    assert_eq!(RoundPhase::Active, RoundPhase::Active);
}

#[test]
fn player_id_other_flips() {
    assert_eq!(PlayerId::P1.other(), PlayerId::P2);
    assert_eq!(PlayerId::P2.other(), PlayerId::P1);
    assert_eq!(PlayerId::P1.idx(), 0);
    assert_eq!(PlayerId::P2.idx(), 1);
}

#[test]
fn match_state_clone_is_independent() {
    let original = init_match(40, 20, Rules::default());
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.players[0].x = 99;
    cloned.players[0].score = 7;
    cloned.projectiles.push(Projectile {
        owner: PlayerId::P1,
        x: 5,
        y: 5,
        dx: 1,
        dy: 0,
        level: Level::Normal,
        tier: ShotTier::Normal,
        life: 10,
    });

    assert_eq!(original.players[0].x, 8);
    assert_eq!(original.players[0].score, 0);
    assert!(original.projectiles.is_empty());
}

#[test]
fn spawned_player_defaults() {
    let p = spawn_player(PlayerId::P2, 44, 14);
    assert_eq!((p.x, p.y), (35, 7));
    assert_eq!(p.facing, (-1, 0));
    assert_eq!(p.level, Level::Normal);
    assert!(p.alive);
    assert_eq!(p.shield_charges, 0);
    assert_eq!(p.charge, ChargeState::Idle);
    assert!(p.trail.is_empty());
    assert_eq!(p.score, 0);
}
