use tracing::{debug, info};

use crate::error::EngineError;
use crate::model::*;
use crate::rules::{is_stuck, is_won};

/// What a pour request did. A rejected pour (`success == false`) moved nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PourResult {
    pub success: bool,
    pub moved: usize,
}
impl PourResult {
    fn rejected() -> Self {
        PourResult {
            success: false,
            moved: 0,
        }
    }
}

fn check_indices(containers: &[Container], from: usize, to: usize) -> Result<(), EngineError> {
    let len = containers.len();
    if from >= len || to >= len {
        return Err(EngineError::InvalidArgument(format!(
            "container index out of range: {from} -> {to} with {len} containers"
        )));
    }
    if from == to {
        return Err(EngineError::InvalidArgument(format!(
            "cannot pour container {from} into itself"
        )));
    }
    Ok(())
}

pub fn can_pour(containers: &[Container], from: usize, to: usize) -> Result<bool, EngineError> {
    check_indices(containers, from, to)?;
    Ok(containers[from].can_pour_into(&containers[to]))
}

/// Pours the top run of `from` into `to`, bounded by the free space in `to`.
/// Either the whole amount moves or nothing does.
pub fn apply_pour(
    containers: &mut [Container],
    from: usize,
    to: usize,
) -> Result<PourResult, EngineError> {
    if !can_pour(containers, from, to)? {
        return Ok(PourResult::rejected());
    }
    let amount = containers[from]
        .top_run()
        .len()
        .min(containers[to].available_space());
    if amount == 0 {
        return Ok(PourResult::rejected());
    }
    for unit in containers[from].remove_consecutive_top(amount) {
        let added = containers[to].add_liquid(unit);
        debug_assert!(added, "pour amount exceeded target space");
    }
    debug!("Poured {} from {} into {}", amount, from, to);
    Ok(PourResult {
        success: true,
        moved: amount,
    })
}

/// Won is checked first: a solved board has nothing useful left to do.
pub fn evaluate(containers: &[Container]) -> GameOutcome {
    if is_won(containers) {
        GameOutcome::Won
    } else if is_stuck(containers) {
        GameOutcome::Stuck
    } else {
        GameOutcome::Playing
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionAction {
    Pour(usize, usize),
    Undo,
    Redo,
    Reset,
}

/// Holds the authoritative board for one game and gates moves on the outcome.
pub struct GameSession {
    state: GameState,
    starting_state: GameState,
    outcome: GameOutcome,
    moves: usize,
    undo_enable: bool,
    undo_stack: Vec<GameState>,
    redo_stack: Vec<GameState>,
}

impl GameSession {
    pub fn new(state: GameState, undo_enable: bool) -> Self {
        let outcome = evaluate(&state.containers);
        Self {
            starting_state: state.clone(),
            state,
            outcome,
            moves: 0,
            undo_enable,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn get_state(&self) -> &GameState {
        &self.state
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn move_count(&self) -> usize {
        self.moves
    }

    /// Only pours move liquid; every other action reports `moved == 0`.
    pub fn handle_action(&mut self, action: SessionAction) -> Result<PourResult, EngineError> {
        let success = match action {
            SessionAction::Pour(from, to) => return self.pour(from, to),
            SessionAction::Undo => self.undo(),
            SessionAction::Redo => self.redo(),
            SessionAction::Reset => {
                self.reset();
                true
            }
        };
        Ok(PourResult { success, moved: 0 })
    }

    /// Terminal sessions refuse further pours.
    pub fn pour(&mut self, from: usize, to: usize) -> Result<PourResult, EngineError> {
        check_indices(&self.state.containers, from, to)?;
        if self.outcome.is_terminal() {
            debug!("Ignoring pour {} -> {}, game is {}", from, to, self.outcome);
            return Ok(PourResult::rejected());
        }
        let snapshot = self.state.clone();
        let result = apply_pour(&mut self.state.containers, from, to)?;
        if result.success {
            if self.undo_enable {
                self.undo_stack.push(snapshot);
                self.redo_stack.clear();
            }
            self.moves += 1;
            self.refresh_outcome();
        }
        Ok(result)
    }

    /// A won game stays won; undo only rewinds stuck or ongoing games.
    pub fn undo(&mut self) -> bool {
        if !self.undo_enable || self.outcome == GameOutcome::Won {
            return false;
        }
        let Some(previous_state) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.state, previous_state);
        self.redo_stack.push(current);
        self.moves = self.moves.saturating_sub(1);
        self.refresh_outcome();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.undo_enable || self.outcome.is_terminal() {
            return false;
        }
        let Some(next_state) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.state, next_state);
        self.undo_stack.push(current);
        self.moves += 1;
        self.refresh_outcome();
        true
    }

    pub fn reset(&mut self) {
        self.state = self.starting_state.clone();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.moves = 0;
        self.refresh_outcome();
    }

    fn refresh_outcome(&mut self) {
        let outcome = evaluate(&self.state.containers);
        if outcome != self.outcome {
            info!("Game is now {} after {} moves", outcome, self.moves);
        }
        self.outcome = outcome;
    }
}
