use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::gameplay::evaluate;
use crate::model::{Container, GameOutcome, GameState, LiquidUnit};

/// Reshuffles allowed before settling for a deal the evaluator already calls over.
pub const MAX_DEAL_ATTEMPTS: usize = 100;

/// Shuffles `colors * capacity` units into the first `colors` containers and
/// appends `extra_containers` empty ones. Deals the evaluator reports as won or
/// stuck are reshuffled, up to [`MAX_DEAL_ATTEMPTS`] times.
pub fn deal<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> GameState {
    let mut state = deal_once(config, rng);
    for attempt in 1..MAX_DEAL_ATTEMPTS {
        let outcome = evaluate(&state.containers);
        if outcome == GameOutcome::Playing {
            return state;
        }
        debug!("Deal {} is already {}, reshuffling", attempt, outcome);
        state = deal_once(config, rng);
    }
    if evaluate(&state.containers) != GameOutcome::Playing {
        warn!(
            "No playable deal found for {} colors x {} after {} attempts",
            config.colors, config.capacity, MAX_DEAL_ATTEMPTS
        );
    }
    state
}

/// Deals with the configured seed, or from OS entropy when there is none.
pub fn deal_seeded(config: &GameConfig) -> GameState {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    deal(config, &mut rng)
}

fn deal_once<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> GameState {
    let mut units: Vec<LiquidUnit> = (0..config.colors)
        .flat_map(|color| std::iter::repeat_n(LiquidUnit::new(color), config.capacity))
        .collect();
    units.shuffle(rng);

    let mut containers = Vec::with_capacity(config.container_count());
    let mut units = units.into_iter();
    for _ in 0..config.colors {
        let mut container = Container::new(config.capacity);
        for unit in units.by_ref().take(config.capacity) {
            container.add_liquid(unit);
        }
        containers.push(container);
    }
    containers.extend((0..config.extra_containers).map(|_| Container::new(config.capacity)));
    GameState::new(containers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MIN_CAPACITY, MIN_COLORS, MIN_EXTRA_CONTAINERS};

    fn config(colors: usize, extra: usize, seed: u64) -> GameConfig {
        GameConfig {
            colors,
            extra_containers: extra,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_deal_layout() {
        let config = config(6, 2, 42);
        let state = deal_seeded(&config);
        assert_eq!(state.containers.len(), 8);
        for container in &state.containers[..6] {
            assert_eq!(container.get_capacity(), 4);
            assert_eq!(container.len(), 4);
        }
        assert!(state.containers[6..].iter().all(Container::is_empty));
    }

    #[test]
    fn test_deal_is_fair() {
        let state = deal_seeded(&config(5, 2, 3));
        let counts = state.color_counts();
        assert_eq!(counts.len(), 5);
        assert!(counts.values().all(|&n| n == 4));
    }

    #[test]
    fn test_deal_is_reproducible_with_seed() {
        let a = deal_seeded(&config(6, 2, 1234));
        let b = deal_seeded(&config(6, 2, 1234));
        assert_eq!(a, b);
    }

    #[test]
    fn test_deal_prefers_playable_positions() {
        for seed in 0..20 {
            let state = deal_seeded(&config(6, 2, seed));
            assert_eq!(evaluate(&state.containers), GameOutcome::Playing);
        }
    }

    #[test]
    fn test_smallest_valid_config_deals_playable_games() {
        let mut config = config(MIN_COLORS, MIN_EXTRA_CONTAINERS, 0);
        config.capacity = MIN_CAPACITY;
        assert!(config.validate().is_ok());
        for seed in 0..10 {
            config.seed = Some(seed);
            let state = deal_seeded(&config);
            assert_eq!(state.containers.len(), 3);
            assert_eq!(evaluate(&state.containers), GameOutcome::Playing);
        }
    }
}
