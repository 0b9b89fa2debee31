use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::gameplay::apply_pour;
use crate::model::*;
use crate::rules::{enumerate_moves, is_won};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveResult {
    /// Shortest sequence of pours that wins.
    Solved(Vec<Move>),
    /// Every reachable position was explored without finding a win.
    Unsolvable,
    /// The state budget ran out first.
    Inconclusive,
}

#[derive(Clone)]
struct GameStateWithHistory {
    state: GameState,
    history: Vec<Move>,
}
impl GameStateWithHistory {
    fn successors(&self) -> Vec<GameStateWithHistory> {
        let mut children = Vec::new();
        for m in enumerate_moves(&self.state.containers) {
            let source = &self.state.containers[m.from];
            let target = &self.state.containers[m.to];
            // Tipping a whole sorted container into an empty twin only relabels it.
            if target.is_empty()
                && source.is_sorted()
                && m.quantity == source.len()
                && target.get_capacity() == source.get_capacity()
            {
                continue;
            }
            let mut state = self.state.clone();
            match apply_pour(&mut state.containers, m.from, m.to) {
                Ok(result) if result.success => {}
                _ => continue,
            }
            let mut history = self.history.clone();
            history.push(m);
            children.push(GameStateWithHistory { state, history });
        }
        children
    }

    /// Container order doesn't matter when deduplicating positions.
    fn key(&self) -> Vec<String> {
        let mut key: Vec<String> = self
            .state
            .containers
            .iter()
            .map(Container::get_text_representation)
            .collect();
        key.sort_unstable();
        key
    }
}

/// Breadth-first search for a winning line, for when the stuck heuristic isn't
/// good enough.
pub struct Solver {
    starting_state: GameState,
    max_states: usize,
}

impl Solver {
    pub fn new(starting_state: GameState, max_states: usize) -> Solver {
        Solver {
            starting_state,
            max_states,
        }
    }

    pub fn solve(&self) -> SolveResult {
        if is_won(&self.starting_state.containers) {
            return SolveResult::Solved(Vec::new());
        }
        if self.starting_state.fast_is_definitely_unsolvable() {
            debug!("Fast definite unsolvability check failed.");
            return SolveResult::Unsolvable;
        }

        let start = GameStateWithHistory {
            state: self.starting_state.clone(),
            history: Vec::new(),
        };
        let mut visited_states: HashSet<Vec<String>> = HashSet::new();
        visited_states.insert(start.key());
        let mut considering_states = vec![start];
        let found = AtomicBool::new(false);
        let mut depth = 0;

        while !considering_states.is_empty() {
            depth += 1;
            let children: Vec<GameStateWithHistory> = considering_states
                .par_iter()
                .flat_map_iter(|node| {
                    // Another branch already hit a win at this depth.
                    if found.load(Ordering::Relaxed) {
                        return Vec::new();
                    }
                    let children = node.successors();
                    if children.iter().any(|c| is_won(&c.state.containers)) {
                        found.store(true, Ordering::Relaxed);
                    }
                    children
                })
                .collect();

            let mut next = Vec::new();
            for child in children {
                if is_won(&child.state.containers) {
                    info!("Solved in {} moves after visiting {} states", depth, visited_states.len());
                    return SolveResult::Solved(child.history);
                }
                if visited_states.insert(child.key()) {
                    next.push(child);
                }
            }
            debug!("Depth {}: {} new states, {} visited", depth, next.len(), visited_states.len());
            if visited_states.len() > self.max_states {
                info!("Gave up after visiting {} states", visited_states.len());
                return SolveResult::Inconclusive;
            }
            considering_states = next;
        }
        SolveResult::Unsolvable
    }
}

impl GameState {
    pub fn get_empty_spaces_count(&self) -> usize {
        self.containers.iter().map(Container::available_space).sum()
    }

    /// A solved board has every container empty or full, so each color count
    /// and the total free space must each be a sum of some container capacities.
    /// Doesn't account for a container only serving one color, so `false` may
    /// still be unsolvable.
    pub fn fast_is_definitely_unsolvable(&self) -> bool {
        let mut reachable_sizes: HashSet<usize> = HashSet::new();
        reachable_sizes.insert(0);
        for container in &self.containers {
            let current_sizes: Vec<usize> = reachable_sizes.iter().copied().collect();
            for r in current_sizes {
                reachable_sizes.insert(r + container.get_capacity());
            }
        }
        if self
            .color_counts()
            .values()
            .any(|count| !reachable_sizes.contains(count))
        {
            return true;
        }
        // All the empty space must be in containers too
        !reachable_sizes.contains(&self.get_empty_spaces_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::deal::deal_seeded;
    use crate::rules::is_stuck;

    fn parse(repr: &str) -> GameState {
        GameState::new_from_repr(repr).unwrap()
    }

    fn replay(state: &GameState, moves: &[Move]) -> GameState {
        let mut state = state.clone();
        for m in moves {
            let result = apply_pour(&mut state.containers, m.from, m.to).unwrap();
            assert!(result.success);
            assert_eq!(result.moved, m.quantity);
        }
        state
    }

    #[test]
    fn test_already_won() {
        let state = parse("AAAA\n....");
        assert_eq!(Solver::new(state, 10).solve(), SolveResult::Solved(vec![]));
    }

    #[test]
    fn test_small_puzzle_solution_replays_to_a_win() {
        let state = parse("AB\nBA\n..");
        let SolveResult::Solved(moves) = Solver::new(state.clone(), 1_000).solve() else {
            panic!("expected a solution");
        };
        assert_eq!(moves.len(), 3);
        assert!(is_won(&replay(&state, &moves).containers));
    }

    #[test]
    fn test_no_moves_is_unsolvable() {
        let state = parse("AB\nBA");
        assert!(!state.fast_is_definitely_unsolvable());
        assert_eq!(Solver::new(state, 1_000).solve(), SolveResult::Unsolvable);
    }

    #[test]
    fn test_fast_unsolvable_color_counts() {
        let state = parse("AAA.\nBBBB\n....");
        assert!(state.fast_is_definitely_unsolvable());
        assert_eq!(Solver::new(state, 1_000).solve(), SolveResult::Unsolvable);
    }

    #[test]
    fn test_budget_exhaustion_is_inconclusive() {
        let config = GameConfig {
            seed: Some(11),
            ..Default::default()
        };
        let state = deal_seeded(&config);
        assert_eq!(Solver::new(state, 1).solve(), SolveResult::Inconclusive);
    }

    #[test]
    fn test_heuristic_stuck_position_can_still_be_solved() {
        let state = parse("AB\nBA\nAB\nBA\n..\n..");
        assert!(is_stuck(&state.containers));
        let SolveResult::Solved(moves) = Solver::new(state.clone(), 10_000).solve() else {
            panic!("expected a solution");
        };
        assert!(is_won(&replay(&state, &moves).containers));
    }
}
