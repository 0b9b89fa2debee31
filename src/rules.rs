//! Move legality and the win / stuck evaluation.
//!
//! Stuck detection is a heuristic: each legal move is classified as
//! progressive or futile, and the position is declared dead when (nearly) all
//! of them are futile. It is cheap, O(moves), and can misclassify positions in
//! both directions. [`crate::solver::Solver`] gives an exact answer when that
//! matters.

use tracing::debug;

use crate::model::{Container, Move};

/// Up to this many legal moves, every one must be futile for the position to be stuck.
pub const FEW_MOVES_THRESHOLD: usize = 3;
/// Above [`FEW_MOVES_THRESHOLD`], this share of futile moves means stuck.
pub const FUTILE_RATIO_THRESHOLD: f64 = 0.8;
/// Shortest leftover run that counts as a real color separation.
pub const MEANINGFUL_RUN: usize = 2;

/// Every legal pour, ordered by source then destination index.
pub fn enumerate_moves(containers: &[Container]) -> Vec<Move> {
    let mut moves = Vec::new();
    for (from, source) in containers.iter().enumerate() {
        let Some(top) = source.get_top_unit() else {
            continue;
        };
        for (to, target) in containers.iter().enumerate() {
            if from == to || !source.can_pour_into(target) {
                continue;
            }
            let quantity = source.top_run().len().min(target.available_space());
            if quantity > 0 {
                moves.push(Move {
                    from,
                    to,
                    quantity,
                    color: top.color(),
                });
            }
        }
    }
    moves
}

/// Every container is empty or full of a single color.
pub fn is_won(containers: &[Container]) -> bool {
    containers
        .iter()
        .all(|c| c.is_empty() || c.is_single_color_full())
}

pub fn is_stuck(containers: &[Container]) -> bool {
    let moves = enumerate_moves(containers);
    if moves.is_empty() {
        debug!("No legal moves left.");
        return true;
    }

    let futile = moves
        .iter()
        .filter(|m| !is_move_progressive(containers, m))
        .count();
    debug!("{} legal moves, {} futile", moves.len(), futile);

    if moves.len() <= FEW_MOVES_THRESHOLD {
        return futile == moves.len();
    }
    if futile as f64 / moves.len() as f64 >= FUTILE_RATIO_THRESHOLD {
        return true;
    }
    are_all_moves_just_shuffling(containers, &moves)
}

/// Whether `m` is likely to move the puzzle towards a solution.
///
/// `m` must come from [`enumerate_moves`] over the same containers.
///
/// # Panics
///
/// Panics if `m.from` or `m.to` is out of range for `containers`.
pub fn is_move_progressive(containers: &[Container], m: &Move) -> bool {
    let source = &containers[m.from];
    let target = &containers[m.to];

    if target.is_empty() {
        if m.quantity == source.len() {
            return true;
        }
        if separates_colors(source, m) {
            return true;
        }
    } else {
        if completes_container(target, m) {
            return true;
        }
        if m.quantity >= MEANINGFUL_RUN {
            return true;
        }
    }
    !can_move_be_immediately_reversed(containers, m)
}

/// Simulates `m` and reports whether the target could pour the same liquid
/// straight back, making the move a cyclic no-op.
///
/// # Panics
///
/// Panics if `m.from` or `m.to` is out of range for `containers`.
pub fn can_move_be_immediately_reversed(containers: &[Container], m: &Move) -> bool {
    let source = &containers[m.from];
    let target = &containers[m.to];

    if target.len() + m.quantity == target.get_capacity() {
        return false;
    }
    match source.exposed_run_after(m.quantity) {
        None => true,
        Some((color, _)) => color == m.color,
    }
}

/// True when no move would complete a container, empty one, or leave a
/// meaningful run of a different color behind at the source.
///
/// # Panics
///
/// Panics if any move indexes past the end of `containers`.
pub fn are_all_moves_just_shuffling(containers: &[Container], moves: &[Move]) -> bool {
    !moves.iter().any(|m| {
        let source = &containers[m.from];
        let target = &containers[m.to];
        completes_container(target, m) || m.quantity == source.len() || separates_colors(source, m)
    })
}

fn completes_container(target: &Container, m: &Move) -> bool {
    target.len() + m.quantity == target.get_capacity()
        && target.get_units().iter().all(|u| u.color() == m.color)
}

fn separates_colors(source: &Container, m: &Move) -> bool {
    matches!(
        source.exposed_run_after(m.quantity),
        Some((color, run)) if color != m.color && run >= MEANINGFUL_RUN
    )
}
