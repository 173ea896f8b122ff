//! Progression: pickups, XP, level-ups and the upgrade offer flow

use glam::Vec2;
use rand::Rng;

use super::params::{GadgetKind, PowerUpKind, WeaponKind};
use super::state::{
    colors, FrameEvent, GadgetSlot, GamePhase, GameState, Offer, OfferItem, PauseReason,
    WeaponSlot, XpOrb,
};
use crate::consts::{ORB_RADIUS, POWERUP_RADIUS};

/// Orb homing speed near the player (pixels per unit of delta)
const MAGNET_BASE_SPEED: f32 = 4.0;
/// Extra homing speed per pixel of distance, so far orbs catch up
const MAGNET_PULL: f32 = 0.02;
/// Share of max HP restored by a Heal power-up / Recover offer
const HEAL_SHARE: f32 = 0.3;
/// Score credited per level reached
const LEVEL_SCORE: u64 = 50;

// ─── Pickups ────────────────────────────────────────────────────

/// Magnetize, move and collect XP orbs and power-ups
pub fn update_pickups(state: &mut GameState, delta: f32) {
    let player = state.player.pos;
    let pickup_r = state.player.stats.pickup_radius;
    let collect_r = state.player.radius + ORB_RADIUS;
    let vacuum = state.effects.is_active(PowerUpKind::Vacuum, state.now_ms);
    let elapsed = state.elapsed;
    let orb_lifetime = state.tuning.orb_lifetime_secs;

    let mut gained = 0.0;
    state.orbs.sweep(|orb| {
        let dist = orb.pos.distance(player);
        if vacuum || dist <= pickup_r {
            orb.magnetized = true;
        }
        if orb.magnetized {
            let speed = (MAGNET_BASE_SPEED + dist * MAGNET_PULL) * delta;
            let step = (player - orb.pos).normalize_or_zero() * speed.min(dist);
            orb.pos += step;
        }
        if orb.pos.distance(player) <= collect_r {
            gained += orb.value;
            return false;
        }
        orb.magnetized || elapsed - orb.spawned_at < orb_lifetime
    });
    if gained > 0.0 {
        gain_xp(state, gained);
    }

    let touch_r = state.player.radius + POWERUP_RADIUS;
    let powerup_lifetime = state.tuning.powerup_lifetime_secs;
    let mut collected = Vec::new();
    state.powerups.sweep(|p| {
        if p.pos.distance(player) <= touch_r {
            collected.push(p.kind);
            return false;
        }
        elapsed - p.spawned_at < powerup_lifetime
    });
    for kind in collected {
        apply_powerup(state, kind);
    }
}

/// Apply a collected power-up
pub fn apply_powerup(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Heal => {
            let amount = state.player.max_hp * HEAL_SHARE;
            state.player.heal(amount);
        }
        PowerUpKind::Vacuum => {
            for orb in state.orbs.iter_mut() {
                orb.magnetized = true;
            }
            state.effects.activate(kind, state.now_ms);
        }
        _ => state.effects.activate(kind, state.now_ms),
    }
    state.stats.powerups_collected += 1;
    let pos = state.player.pos;
    state.spawn_particles(pos, 8, colors::PICKUP);
    state.emit(FrameEvent::PowerUpCollected { kind });
    log::debug!("Power-up {} collected", kind.name());
}

/// Credit XP (scaled by the player's XP multiplier)
pub fn gain_xp(state: &mut GameState, raw: f32) {
    let amount = raw * state.player.stats.xp_mult;
    state.player.xp += amount;
    state.stats.xp_collected += amount;
}

// ─── Level-up ───────────────────────────────────────────────────

/// If XP covers the requirement: spend it, level up, and pause for offers.
/// Returns true when a level-up happened.
pub fn check_level_up(state: &mut GameState) -> bool {
    if state.player.xp < state.player.xp_needed {
        return false;
    }
    state.player.xp -= state.player.xp_needed;
    state.player.level += 1;
    state.player.xp_needed = state.tuning.xp_required(state.player.level);
    let level = state.player.level;
    state.score += LEVEL_SCORE * level as u64;

    let pos = state.player.pos;
    state.spawn_particles(pos, 16, colors::LEVEL_UP);
    state.emit(FrameEvent::LevelUp { new_level: level });
    log::info!("Level {level} at {:.1}s (next needs {:.1} XP)", state.elapsed, state.player.xp_needed);

    generate_offers(state);
    if state.phase != GamePhase::Paused(PauseReason::LevelUp) {
        state.phase = GamePhase::Paused(PauseReason::LevelUp);
        state.paused_at_ms = Some(state.now_ms);
    }
    true
}

/// Eligible offers with their draw weights
fn candidates(state: &GameState) -> Vec<(Offer, u32)> {
    let t = &state.tuning;
    let owned_w = t.owned_offer_weight.max(1);
    let mut out = Vec::new();

    for kind in WeaponKind::ALL {
        if state.banned.contains(&OfferItem::Weapon(kind)) {
            continue;
        }
        match state.weapon_level(kind) {
            0 if state.weapons.len() < t.max_weapons => out.push((Offer::NewWeapon(kind), 1)),
            0 => {}
            lv if lv < t.max_weapon_level => {
                out.push((Offer::UpgradeWeapon { kind, to_level: lv + 1 }, owned_w))
            }
            _ => {}
        }
    }
    for kind in GadgetKind::ALL {
        if state.banned.contains(&OfferItem::Gadget(kind)) {
            continue;
        }
        match state.gadget_stacks(kind) {
            0 if state.gadgets.len() < t.max_gadgets => out.push((Offer::NewGadget(kind), 1)),
            0 => {}
            n if n < t.max_gadget_stacks => {
                out.push((Offer::StackGadget { kind, to_stacks: n + 1 }, owned_w))
            }
            _ => {}
        }
    }
    out
}

/// Replace the current offers with a fresh weighted draw (without replacement)
pub fn generate_offers(state: &mut GameState) {
    let mut pool = candidates(state);
    let mut offers = Vec::with_capacity(state.tuning.offer_count);
    while offers.len() < state.tuning.offer_count && !pool.is_empty() {
        let total: u32 = pool.iter().map(|(_, w)| *w).sum();
        let mut roll = state.rng.random_range(0..total);
        let mut pick = pool.len() - 1;
        for (i, (_, w)) in pool.iter().enumerate() {
            if roll < *w {
                pick = i;
                break;
            }
            roll -= *w;
        }
        offers.push(pool.swap_remove(pick).0);
    }
    if offers.is_empty() {
        offers.push(Offer::Recover);
    }
    log::debug!("Offers: {offers:?}");
    state.offers = offers;
}

/// Spend a reroll on a fresh set of offers
pub fn reroll(state: &mut GameState) -> bool {
    if state.rerolls_left == 0 || state.offers.is_empty() {
        log::debug!("Reroll ignored ({} left)", state.rerolls_left);
        return false;
    }
    state.rerolls_left -= 1;
    generate_offers(state);
    true
}

/// Ban the item behind offer `index` for the rest of the run and redraw
pub fn ban(state: &mut GameState, index: usize) -> bool {
    if state.bans_left == 0 {
        log::debug!("Ban ignored: none left");
        return false;
    }
    let Some(item) = state.offers.get(index).and_then(Offer::item) else {
        log::debug!("Ban ignored: invalid offer index {index}");
        return false;
    };
    state.bans_left -= 1;
    state.banned.push(item);
    generate_offers(state);
    true
}

/// Take offer `index`. Invalid indices are ignored and return false.
pub fn choose(state: &mut GameState, index: usize) -> bool {
    let Some(offer) = state.offers.get(index).copied() else {
        log::debug!("Choice ignored: invalid offer index {index}");
        return false;
    };
    state.offers.clear();
    match offer {
        Offer::NewWeapon(kind) => {
            state.weapons.push(WeaponSlot::new(kind));
            state.stats.weapons_acquired += 1;
        }
        Offer::UpgradeWeapon { kind, .. } => {
            if let Some(slot) = state.weapons.iter_mut().find(|w| w.kind == kind) {
                slot.level = (slot.level + 1).min(state.tuning.max_weapon_level);
            }
        }
        Offer::NewGadget(kind) => {
            state.gadgets.push(GadgetSlot { kind, stacks: 1 });
            state.stats.gadgets_acquired += 1;
            apply_gadget(state, kind);
        }
        Offer::StackGadget { kind, .. } => {
            if let Some(slot) = state.gadgets.iter_mut().find(|g| g.kind == kind) {
                slot.stacks += 1;
            }
            apply_gadget(state, kind);
        }
        Offer::Recover => {
            let amount = state.player.max_hp * HEAL_SHARE;
            state.player.heal(amount);
        }
    }
    log::info!("Chose {offer:?}");
    true
}

/// Apply one stack of a gadget to player stats (once, at acquisition)
pub fn apply_gadget(state: &mut GameState, kind: GadgetKind) {
    let stats = &mut state.player.stats;
    match kind {
        GadgetKind::Boots => stats.speed_mult += 0.10,
        GadgetKind::Amplifier => stats.damage_mult += 0.10,
        GadgetKind::Magnet => stats.pickup_radius *= 1.20,
        GadgetKind::Plating => stats.defense = (stats.defense + 0.06).min(state.tuning.max_defense),
        GadgetKind::Tome => stats.xp_mult += 0.10,
        GadgetKind::Chrono => stats.cooldown_reduction += 0.06,
        GadgetKind::Halo => stats.invincibility_bonus_ms += 150.0,
        GadgetKind::Heart => {
            state.player.max_hp += 20.0;
            state.player.heal(20.0);
        }
    }
}

/// Drop an XP orb (used by tests and scripted rewards)
pub fn drop_orb(state: &mut GameState, pos: Vec2, value: f32) {
    let id = state.next_entity_id();
    state.orbs.push(XpOrb {
        id,
        pos,
        value,
        magnetized: false,
        spawned_at: state.elapsed,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::tuning::SimTuning;

    fn playing() -> GameState {
        let mut state = GameState::new(3, SimTuning::default(), &Settings::default());
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_level_up_carries_remainder() {
        let mut state = playing();
        let need = state.player.xp_needed;
        gain_xp(&mut state, need + 3.0);
        assert!(check_level_up(&mut state));
        assert_eq!(state.player.level, 2);
        assert!((state.player.xp - 3.0).abs() < 1e-4);
        let expected = state.tuning.xp_base * state.tuning.xp_growth;
        assert!((state.player.xp_needed - expected).abs() < 1e-4);
        assert_eq!(state.phase, GamePhase::Paused(PauseReason::LevelUp));
        assert_eq!(state.offers.len(), state.tuning.offer_count);
    }

    #[test]
    fn test_below_requirement_no_level() {
        let mut state = playing();
        let need = state.player.xp_needed;
        gain_xp(&mut state, need - 0.5);
        assert!(!check_level_up(&mut state));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_offers_are_distinct_and_respect_bans() {
        let mut state = playing();
        state.banned.push(OfferItem::Gadget(GadgetKind::Boots));
        for _ in 0..50 {
            generate_offers(&mut state);
            for (i, offer) in state.offers.iter().enumerate() {
                assert!(!state.offers[i + 1..].contains(offer));
            }
            assert!(!state.offers.contains(&Offer::NewGadget(GadgetKind::Boots)));
        }
    }

    #[test]
    fn test_maxed_items_excluded_and_recover_fallback() {
        let tuning = SimTuning {
            max_weapons: 1,
            max_gadgets: 0,
            max_weapon_level: 1,
            ..Default::default()
        };
        let mut state = GameState::new(3, tuning, &Settings::default());
        generate_offers(&mut state);
        assert_eq!(state.offers, vec![Offer::Recover]);
        state.player.hp = 10.0;
        assert!(choose(&mut state, 0));
        assert!(state.player.hp > 10.0);
    }

    #[test]
    fn test_owned_items_favoured() {
        let mut state = playing();
        let mut upgrades = 0;
        for _ in 0..300 {
            generate_offers(&mut state);
            if state
                .offers
                .iter()
                .any(|o| matches!(o, Offer::UpgradeWeapon { kind: WeaponKind::Blaster, .. }))
            {
                upgrades += 1;
            }
        }
        // 1 of 16 candidates at weight 3 of 18 total: well above uniform odds
        assert!(upgrades > 80, "{upgrades}");
    }

    #[test]
    fn test_reroll_and_ban_limits() {
        let mut state = playing();
        generate_offers(&mut state);
        for _ in 0..state.tuning.rerolls_per_run {
            assert!(reroll(&mut state));
        }
        assert!(!reroll(&mut state));

        assert!(!ban(&mut state, 99));
        let bans = state.tuning.bans_per_run;
        for _ in 0..bans {
            let item = state.offers[0].item();
            assert!(ban(&mut state, 0));
            assert!(state.banned.contains(&item.unwrap_or(OfferItem::Weapon(WeaponKind::Blaster))));
        }
        assert!(!ban(&mut state, 0));
        assert_eq!(state.bans_left, 0);
    }

    #[test]
    fn test_choose_invalid_index_ignored() {
        let mut state = playing();
        generate_offers(&mut state);
        let before = state.offers.clone();
        assert!(!choose(&mut state, 17));
        assert_eq!(state.offers, before);
    }

    #[test]
    fn test_choose_weapon_and_gadget() {
        let mut state = playing();
        state.offers = vec![
            Offer::UpgradeWeapon { kind: WeaponKind::Blaster, to_level: 2 },
            Offer::NewGadget(GadgetKind::Heart),
        ];
        assert!(choose(&mut state, 0));
        assert_eq!(state.weapon_level(WeaponKind::Blaster), 2);
        assert!(state.offers.is_empty());

        state.offers = vec![Offer::NewGadget(GadgetKind::Heart)];
        assert!(choose(&mut state, 0));
        assert_eq!(state.player.max_hp, 120.0);
        assert_eq!(state.player.hp, 120.0);
        assert_eq!(state.gadget_stacks(GadgetKind::Heart), 1);
    }

    #[test]
    fn test_plating_defense_capped() {
        let mut state = playing();
        for _ in 0..50 {
            apply_gadget(&mut state, GadgetKind::Plating);
        }
        assert!(state.player.stats.defense <= state.tuning.max_defense + 1e-6);
    }

    #[test]
    fn test_orbs_magnetize_and_collect() {
        let mut state = playing();
        let pos = state.player.pos;
        drop_orb(&mut state, pos + Vec2::new(60.0, 0.0), 2.0);
        drop_orb(&mut state, pos + Vec2::new(900.0, 0.0), 2.0);
        for _ in 0..60 {
            update_pickups(&mut state, 1.0);
        }
        assert!((state.player.xp - 2.0).abs() < 1e-4);
        assert_eq!(state.orbs.len(), 1);
        assert!(!state.orbs.get(0).is_some_and(|o| o.magnetized));
    }

    #[test]
    fn test_vacuum_pulls_everything() {
        let mut state = playing();
        let pos = state.player.pos;
        drop_orb(&mut state, pos + Vec2::new(900.0, 0.0), 1.0);
        apply_powerup(&mut state, PowerUpKind::Vacuum);
        for _ in 0..600 {
            update_pickups(&mut state, 1.0);
        }
        assert!(state.orbs.is_empty());
        assert!((state.player.xp - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_stale_orbs_expire() {
        let mut state = playing();
        let pos = state.player.pos;
        drop_orb(&mut state, pos + Vec2::new(900.0, 0.0), 1.0);
        state.elapsed = state.tuning.orb_lifetime_secs + 1.0;
        update_pickups(&mut state, 1.0);
        assert!(state.orbs.is_empty());
    }
}
