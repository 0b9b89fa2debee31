use liquid_sort::rules::can_move_be_immediately_reversed;
use liquid_sort::*;
use proptest::prelude::*;

const R: ColorId = 0;
const B: ColorId = 1;

fn board(capacity: usize, stacks: &[&[ColorId]]) -> Vec<Container> {
    stacks
        .iter()
        .map(|colors| Container::from_colors(capacity, colors).unwrap())
        .collect()
}

fn colors(c: &Container) -> Vec<ColorId> {
    c.get_units().iter().map(LiquidUnit::color).collect()
}

#[test]
fn full_single_color_with_empties_is_won() {
    let containers = board(4, &[&[R, R, R, R], &[], &[], &[]]);
    assert!(is_won(&containers));
    assert_eq!(evaluate(&containers), GameOutcome::Won);
}

#[test]
fn mismatched_tops_only_pour_into_empty() {
    let mut containers = board(4, &[&[R, B], &[B, R], &[], &[]]);
    assert!(!can_pour(&containers, 0, 1).unwrap());
    assert!(can_pour(&containers, 0, 2).unwrap());

    let result = apply_pour(&mut containers, 0, 2).unwrap();
    assert!(result.success);
    assert_eq!(result.moved, 1);
    assert_eq!(colors(&containers[0]), vec![R]);
    assert_eq!(colors(&containers[1]), vec![B, R]);
    assert_eq!(colors(&containers[2]), vec![B]);
    assert!(containers[3].is_empty());
}

#[test]
fn full_board_without_free_space_has_no_moves() {
    let containers = board(1, &[&[R], &[R]]);
    assert!(enumerate_moves(&containers).is_empty());
    assert!(is_stuck(&containers));
}

#[test]
fn lone_unit_over_other_color_cannot_be_reversed() {
    let containers = board(4, &[&[R, B, R, B], &[]]);
    let moves = enumerate_moves(&containers);
    assert_eq!(moves, vec![Move { from: 0, to: 1, quantity: 1, color: B }]);
    assert!(!can_move_be_immediately_reversed(&containers, &moves[0]));
}

#[test]
fn session_over_a_dealt_game() {
    let config = GameConfig {
        colors: 3,
        extra_containers: 2,
        seed: Some(5),
        ..Default::default()
    };
    let state = deal::deal_seeded(&config);
    let mut session = GameSession::new(state.clone(), config.undo);
    assert_eq!(session.outcome(), GameOutcome::Playing);

    let m = enumerate_moves(&state.containers)[0];
    let result = session.handle_action(SessionAction::Pour(m.from, m.to)).unwrap();
    assert_eq!(result.moved, m.quantity);
    assert_eq!(session.move_count(), 1);

    session.handle_action(SessionAction::Reset).unwrap();
    assert_eq!(session.get_state(), &state);
}

#[test]
fn solver_finds_a_line_for_a_dealt_game() {
    let config = GameConfig {
        colors: 3,
        extra_containers: 2,
        seed: Some(8),
        ..Default::default()
    };
    let state = deal::deal_seeded(&config);
    let SolveResult::Solved(moves) = Solver::new(state.clone(), config.solver_max_states).solve()
    else {
        panic!("three colors with two spare containers should be solvable");
    };
    let mut containers = state.containers;
    for m in &moves {
        let result = apply_pour(&mut containers, m.from, m.to).unwrap();
        assert_eq!(result.moved, m.quantity);
    }
    assert!(is_won(&containers));
}

fn arb_board() -> impl Strategy<Value = Vec<Container>> {
    (1usize..5, 2usize..6).prop_flat_map(|(capacity, count)| {
        prop::collection::vec(prop::collection::vec(0usize..3, 0..=capacity), count).prop_map(
            move |stacks| {
                stacks
                    .iter()
                    .map(|colors| Container::from_colors(capacity, colors).unwrap())
                    .collect::<Vec<_>>()
            },
        )
    })
}

proptest! {
    #[test]
    fn pour_moves_exactly_run_bounded_by_space(
        containers in arb_board(),
        from in 0usize..6,
        to in 0usize..6,
    ) {
        prop_assume!(from < containers.len() && to < containers.len() && from != to);
        let allowed = containers[from].can_pour_into(&containers[to]);
        let expected = containers[from].top_run().len().min(containers[to].available_space());
        let total_before: usize = containers.iter().map(Container::len).sum();

        let mut after = containers.clone();
        let result = apply_pour(&mut after, from, to).unwrap();
        if allowed {
            prop_assert!(result.success);
            prop_assert_eq!(result.moved, expected);
            prop_assert_eq!(after[from].len(), containers[from].len() - expected);
        } else {
            prop_assert!(!result.success);
            prop_assert_eq!(result.moved, 0);
            prop_assert_eq!(&after, &containers);
        }
        prop_assert_eq!(after.iter().map(Container::len).sum::<usize>(), total_before);
        prop_assert!(after.iter().all(|c| c.len() <= c.get_capacity()));
    }

    #[test]
    fn enumerated_moves_are_legal_and_ordered(containers in arb_board()) {
        let moves = enumerate_moves(&containers);
        for m in &moves {
            prop_assert!(m.quantity > 0);
            prop_assert!(can_pour(&containers, m.from, m.to).unwrap());
        }
        let keys: Vec<(usize, usize)> = moves.iter().map(|m| (m.from, m.to)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }

    #[test]
    fn evaluate_is_idempotent(containers in arb_board()) {
        prop_assert_eq!(evaluate(&containers), evaluate(&containers));
    }

    #[test]
    fn won_session_stays_won(
        seed in 0u64..50,
        pours in prop::collection::vec((0usize..5, 0usize..5), 0..40),
    ) {
        let config = GameConfig { colors: 3, extra_containers: 2, seed: Some(seed), ..Default::default() };
        let mut session = GameSession::new(deal::deal_seeded(&config), true);
        let mut won = false;
        for (from, to) in pours {
            if from == to {
                continue;
            }
            session.pour(from, to).unwrap();
            session.undo();
            session.pour(from, to).unwrap();
            if won {
                prop_assert_eq!(session.outcome(), GameOutcome::Won);
            }
            won = session.outcome() == GameOutcome::Won;
        }
    }
}
