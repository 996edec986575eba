//! Successor generation: walk, push, block slap, popup conversion and
//! force-floor rides.
//!
//! Each candidate move mutates the configuration in place, runs the deadlock
//! patterns, encodes and emits, then undoes the mutation. The facing
//! direction is set to the direction being tried before any successor of
//! that direction is encoded; the encoder's normalization may collapse it in
//! place, and later successors of the same direction inherit the collapsed
//! value (this is part of the state-count contract).

use crate::core::grid::Dir;
use crate::domain::{Neighbour, SolveError};

use super::deadlock::deadlocked;
use super::{Cell, SokobanConfig, SokobanInstance, Tile};

pub(super) fn try_for_each_neighbour<E: From<SolveError>>(
    inst: &SokobanInstance,
    cfg: &mut SokobanConfig,
    mut f: impl FnMut(Neighbour) -> Result<(), E>,
) -> Result<(), E> {
    let player = inst.player_cell(cfg).map_err(E::from)?;
    let old_facing = cfg.facing;
    let result = visit_all(inst, cfg, player, old_facing, &mut f);
    cfg.facing = old_facing;
    result
}

fn visit_all<E: From<SolveError>>(
    inst: &SokobanInstance,
    cfg: &mut SokobanConfig,
    player: usize,
    old_facing: Option<Dir>,
    f: &mut impl FnMut(Neighbour) -> Result<(), E>,
) -> Result<(), E> {
    for d in Dir::ALL {
        if inst.options.slap {
            cfg.facing = Some(d);
        }
        let Some(mut target) = inst.step(player, d) else {
            continue;
        };
        if inst.wall_now(cfg, target) {
            continue;
        }

        let mut push_dir = d;
        let mut rode_conveyor = false;
        if let Cell::Force(_) = inst.cells[target] {
            match inst.force_exit[&target] {
                Some((landing, out_dir)) => {
                    target = landing;
                    push_dir = out_dir;
                    rode_conveyor = true;
                }
                None => continue,
            }
            // Rode a loop back onto the cell we started from.
            if target == player {
                continue;
            }
        }

        match cfg.tiles[target] {
            Tile::Empty | Tile::Popup => {
                // Plain walk; stepping onto a popup converts it when we
                // later step off (the leave tile becomes a permanent wall).
                let restore = cfg.tiles[target];
                cfg.tiles[player] = inst.leave_tile(player);
                cfg.tiles[target] = Tile::Player;
                emit(inst, cfg, f)?;
                if !rode_conveyor {
                    slaps(inst, cfg, player, d, old_facing, f)?;
                }
                cfg.tiles[player] = Tile::Player;
                cfg.tiles[target] = restore;
            }
            Tile::Block => {
                push(
                    inst,
                    cfg,
                    player,
                    target,
                    d,
                    push_dir,
                    rode_conveyor,
                    old_facing,
                    f,
                )?;
            }
            _ => {}
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn push<E: From<SolveError>>(
    inst: &SokobanInstance,
    cfg: &mut SokobanConfig,
    player: usize,
    target: usize,
    d: Dir,
    push_dir: Dir,
    mut rode_conveyor: bool,
    old_facing: Option<Dir>,
    f: &mut impl FnMut(Neighbour) -> Result<(), E>,
) -> Result<(), E> {
    let Some(mut beyond) = inst.step(target, push_dir) else {
        return Ok(());
    };
    if !can_receive_block(inst, cfg, beyond) {
        return Ok(());
    }
    if let Cell::Force(_) = inst.cells[beyond] {
        // A block may only be pushed onto a conveyor whose chain ends on
        // empty live floor.
        match inst.force_exit[&beyond] {
            Some((landing, _)) => beyond = landing,
            None => return Ok(()),
        }
        rode_conveyor = true;
        if !can_receive_block(inst, cfg, beyond) || matches!(inst.cells[beyond], Cell::Force(_)) {
            return Ok(());
        }
        // The block came to rest on the cell we pushed it from.
        if beyond == target {
            return Ok(());
        }
    }

    if beyond == player {
        // The chain delivered the block onto the cell the player vacates:
        // the two swap places.
        cfg.tiles[player] = Tile::Block;
        cfg.tiles[target] = Tile::Player;
        emit(inst, cfg, f)?;
        cfg.tiles[player] = Tile::Player;
        cfg.tiles[target] = Tile::Block;
    } else {
        cfg.tiles[player] = inst.leave_tile(player);
        cfg.tiles[target] = Tile::Player;
        cfg.tiles[beyond] = Tile::Block;
        emit(inst, cfg, f)?;
        if !rode_conveyor {
            slaps(inst, cfg, player, d, old_facing, f)?;
        }
        cfg.tiles[player] = Tile::Player;
        cfg.tiles[target] = Tile::Block;
        cfg.tiles[beyond] = Tile::Empty;
    }
    Ok(())
}

/// Whether a pushed block may come to rest on (or ride across) `idx`.
fn can_receive_block(inst: &SokobanInstance, cfg: &SokobanConfig, idx: usize) -> bool {
    if inst.wall_now(cfg, idx) {
        return false;
    }
    if matches!(inst.cells[idx], Cell::Dead | Cell::Popup) {
        return false;
    }
    cfg.tiles[idx] == Tile::Empty
}

/// Block slap: when the move continues the previous facing direction, a block
/// directly to the player's left or right may additionally be displaced one
/// cell farther out, onto empty live floor. Evaluated relative to the cell
/// the player moved from, after the walk or push has been applied.
fn slaps<E: From<SolveError>>(
    inst: &SokobanInstance,
    cfg: &mut SokobanConfig,
    player: usize,
    d: Dir,
    old_facing: Option<Dir>,
    f: &mut impl FnMut(Neighbour) -> Result<(), E>,
) -> Result<(), E> {
    if !inst.options.slap || old_facing != Some(d) {
        return Ok(());
    }
    for side in [d.ccw(), d.cw()] {
        let Some(near) = inst.step(player, side) else {
            continue;
        };
        let Some(far) = inst.step(near, side) else {
            continue;
        };
        if cfg.tiles[near] == Tile::Block && cfg.tiles[far] == Tile::Empty && inst.is_live(far) {
            cfg.tiles[near] = Tile::Empty;
            cfg.tiles[far] = Tile::Block;
            emit(inst, cfg, f)?;
            cfg.tiles[near] = Tile::Block;
            cfg.tiles[far] = Tile::Empty;
        }
    }
    Ok(())
}

fn emit<E: From<SolveError>>(
    inst: &SokobanInstance,
    cfg: &mut SokobanConfig,
    f: &mut impl FnMut(Neighbour) -> Result<(), E>,
) -> Result<(), E> {
    if deadlocked(inst, cfg) {
        return Ok(());
    }
    let bytes = inst.encode_config(cfg).map_err(E::from)?;
    let winning = inst.won(cfg);
    f(Neighbour { bytes, winning })
}
