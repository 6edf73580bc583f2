//! The stochastic combat engine.
//!
//! Drives a red and a blue [`Force`] from their initial state to a terminal
//! [`Outcome`] under one [`ActivationOrder`]:
//!
//! | order | activations per turn | casualties + adjudication |
//! |---|---|---|
//! | random-synchronous | `pool` draws with replacement | once, end of turn |
//! | uniform-synchronous | one permutation of the pool | once, end of turn |
//! | random/uniform-asynchronous | up to the live pool, with replacement | after every shot |
//!
//! Every stochastic choice is taken from the injected [`RandomSource`] in a
//! fixed order, so a seed plus a scenario fully determines the result.

use crate::error::{LanchesterError, Result};
use crate::force::{Force, Unit};
use crate::types::{ActivationOrder, Outcome};
use lanchester_env::RandomSource;

/// One casualty-removal step that removed at least one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasualtyEvent {
    /// Turn during which the removal happened (1-based)
    pub turn: u64,

    /// Red storage positions removed, as they were before this step
    pub red_removed: Vec<usize>,

    /// Blue storage positions removed, as they were before this step
    pub blue_removed: Vec<usize>,

    /// Red units left after the step
    pub red_remaining: usize,

    /// Blue units left after the step
    pub blue_remaining: usize,
}

/// Terminal state of one engagement.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Never `Outcome::Incomplete`
    pub outcome: Outcome,

    /// Turns elapsed, at least 1
    pub turns: u64,

    /// Casualty events in the order they happened
    pub trace: Vec<CasualtyEvent>,
}

/// One shot action: `actor` works through `target`'s current members in
/// storage order.
///
/// The actor's budget is `max_shots` evaluated enemies. Each evaluated enemy
/// costs one Bernoulli draw and one unit of budget whether it is hit or not;
/// enemies beyond the budget are not evaluated and consume no draws.
///
/// Returns the number of enemies evaluated.
pub fn shoot<R: RandomSource + ?Sized>(actor: &Unit, target: &mut Force, rng: &mut R) -> usize {
    let mut evaluated = 0;
    for enemy in target.units_mut().iter_mut().take(actor.max_shots as usize) {
        if rng.chance(actor.shot_prob) {
            enemy.health -= 1;
        }
        evaluated += 1;
    }
    evaluated
}

/// Decides whether either side has withdrawn.
///
/// Fractions are taken against each force's frozen original size.
pub fn adjudicate(red: &Force, blue: &Force) -> Outcome {
    match (red.has_breached(), blue.has_breached()) {
        (true, true) => Outcome::Tie,
        (true, false) => Outcome::BlueVictory,
        (false, true) => Outcome::RedVictory,
        (false, false) => Outcome::Incomplete,
    }
}

/// Runs engagements against a borrowed random stream.
pub struct CombatEngine<'r, R: RandomSource + ?Sized> {
    rng: &'r mut R,
    turn_limit: Option<u64>,
}

impl<'r, R: RandomSource + ?Sized> CombatEngine<'r, R> {
    /// Creates an engine with no turn limit.
    pub fn new(rng: &'r mut R) -> Self {
        Self {
            rng,
            turn_limit: None,
        }
    }

    /// Caps the number of turns. `None` lets a run continue until adjudicated,
    /// which never happens if neither side can inflict damage.
    pub fn with_turn_limit(mut self, limit: Option<u64>) -> Self {
        self.turn_limit = limit;
        self
    }

    /// Fights `red` against `blue` until adjudication is terminal.
    pub fn resolve(
        &mut self,
        red: &mut Force,
        blue: &mut Force,
        order: ActivationOrder,
    ) -> Result<Resolution> {
        check_preconditions(red, blue)?;

        let mut turns = 0;
        let mut trace = Vec::new();

        loop {
            if let Some(limit) = self.turn_limit {
                if turns >= limit {
                    return Err(LanchesterError::TurnLimitExceeded(limit));
                }
            }
            turns += 1;

            let outcome = if order.is_asynchronous() {
                self.asynchronous_turn(turns, red, blue, &mut trace)
            } else {
                self.synchronous_turn(order, red, blue);
                settle(turns, red, blue, &mut trace)
            };

            if outcome.is_terminal() {
                return Ok(Resolution {
                    outcome,
                    turns,
                    trace,
                });
            }
        }
    }

    /// One synchronous turn. Every activation sees the forces as they stood
    /// at the start of the turn; casualties are removed afterwards.
    fn synchronous_turn(&mut self, order: ActivationOrder, red: &mut Force, blue: &mut Force) {
        let pool = red.len() + blue.len();
        if order == ActivationOrder::UniformSynchronous {
            for active in self.rng.permutation(pool) {
                self.activate(active, red, blue);
            }
        } else {
            for _ in 0..pool {
                let active = self.rng.index(pool);
                self.activate(active, red, blue);
            }
        }
    }

    /// One asynchronous turn. The pool is re-read from the live forces before
    /// every iteration, so the turn shortens as units die.
    fn asynchronous_turn(
        &mut self,
        turn: u64,
        red: &mut Force,
        blue: &mut Force,
        trace: &mut Vec<CasualtyEvent>,
    ) -> Outcome {
        let mut iteration = 0;
        while iteration < red.len() + blue.len() {
            let pool = red.len() + blue.len();
            let active = self.rng.index(pool);
            self.activate(active, red, blue);

            let outcome = settle(turn, red, blue, trace);
            if outcome.is_terminal() {
                return outcome;
            }
            iteration += 1;
        }
        Outcome::Incomplete
    }

    /// Pool index `< red.len()` is a red shooter, the rest are blue.
    fn activate(&mut self, active: usize, red: &mut Force, blue: &mut Force) {
        let red_count = red.len();
        if active < red_count {
            let shooter = red.units()[active];
            shoot(&shooter, blue, &mut *self.rng);
        } else {
            let shooter = blue.units()[active - red_count];
            shoot(&shooter, red, &mut *self.rng);
        }
    }
}

/// Removes casualties from both forces, records them, and adjudicates.
fn settle(turn: u64, red: &mut Force, blue: &mut Force, trace: &mut Vec<CasualtyEvent>) -> Outcome {
    let red_removed = red.remove_casualties();
    let blue_removed = blue.remove_casualties();

    if !red_removed.is_empty() || !blue_removed.is_empty() {
        trace.push(CasualtyEvent {
            turn,
            red_removed,
            blue_removed,
            red_remaining: red.len(),
            blue_remaining: blue.len(),
        });
    }

    adjudicate(red, blue)
}

fn check_preconditions(red: &Force, blue: &Force) -> Result<()> {
    if red.is_empty() || blue.is_empty() {
        return Err(LanchesterError::scenario(
            "both forces must start with at least one unit",
        ));
    }
    for threshold in [red.retreat_threshold(), blue.retreat_threshold()] {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(LanchesterError::scenario(format!(
                "retreat threshold {} is outside [0, 1]",
                threshold
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanchester_env::{ScriptedSource, SeededSource};
    use proptest::prelude::*;

    /// Force of `size` with `survivors` still alive.
    fn depleted(size: usize, survivors: usize, threshold: f64) -> Force {
        let mut force = Force::new(size, 1, 1, 0.5, threshold);
        for unit in force.units_mut().iter_mut().skip(survivors) {
            unit.health = 0;
        }
        force.remove_casualties();
        force
    }

    #[test]
    fn test_adjudicate_red_breached_is_blue_victory() {
        let red = depleted(10, 4, 0.5);
        let blue = depleted(10, 8, 0.5);
        assert_eq!(adjudicate(&red, &blue), Outcome::BlueVictory);
    }

    #[test]
    fn test_adjudicate_blue_breached_is_red_victory() {
        let red = depleted(10, 6, 0.5);
        let blue = depleted(10, 5, 0.5);
        assert_eq!(adjudicate(&red, &blue), Outcome::RedVictory);
    }

    #[test]
    fn test_adjudicate_both_breached_is_tie() {
        let red = depleted(10, 4, 0.5);
        let blue = depleted(10, 2, 0.5);
        assert_eq!(adjudicate(&red, &blue), Outcome::Tie);
    }

    #[test]
    fn test_adjudicate_neither_breached_is_incomplete() {
        let red = depleted(10, 9, 0.5);
        let blue = depleted(10, 6, 0.5);
        assert_eq!(adjudicate(&red, &blue), Outcome::Incomplete);
    }

    #[test]
    fn test_shot_budget_caps_evaluations() {
        let actor = Unit::new(1.0, 1, 3);
        let mut target = Force::new(5, 2, 1, 0.5, 0.0);
        let mut rng = ScriptedSource::new();

        let evaluated = shoot(&actor, &mut target, &mut rng);

        assert_eq!(evaluated, 3);
        assert_eq!(rng.reals_drawn(), 3);
        let healths: Vec<i64> = target.units().iter().map(|u| u.health).collect();
        assert_eq!(healths, vec![1, 1, 1, 2, 2]);
    }

    #[test]
    fn test_misses_still_spend_budget() {
        let actor = Unit::new(0.5, 1, 3);
        let mut target = Force::new(5, 1, 1, 0.5, 0.0);
        let mut rng = ScriptedSource::new().with_reals([0.9, 0.1, 0.9]);

        let evaluated = shoot(&actor, &mut target, &mut rng);

        assert_eq!(evaluated, 3);
        let healths: Vec<i64> = target.units().iter().map(|u| u.health).collect();
        assert_eq!(healths, vec![1, 0, 1, 1, 1]);
    }

    #[test]
    fn test_budget_larger_than_target() {
        let actor = Unit::new(1.0, 1, 10);
        let mut target = Force::new(2, 1, 1, 0.5, 0.0);
        let mut rng = ScriptedSource::new();

        assert_eq!(shoot(&actor, &mut target, &mut rng), 2);
        assert_eq!(rng.reals_drawn(), 2);
    }

    #[test]
    fn test_synchronous_defers_casualties_to_end_of_turn() {
        // Red fires first and kills blue, but blue still gets its draw.
        let mut red = Force::new(1, 1, 1, 1.0, 0.0);
        let mut blue = Force::new(1, 1, 1, 1.0, 0.0);
        let mut rng = ScriptedSource::new().with_indices([0, 1]);

        let resolution = CombatEngine::new(&mut rng)
            .resolve(&mut red, &mut blue, ActivationOrder::RandomSynchronous)
            .unwrap();

        assert_eq!(resolution.outcome, Outcome::Tie);
        assert_eq!(resolution.turns, 1);
        assert_eq!(
            resolution.trace,
            vec![CasualtyEvent {
                turn: 1,
                red_removed: vec![0],
                blue_removed: vec![0],
                red_remaining: 0,
                blue_remaining: 0,
            }]
        );
    }

    #[test]
    fn test_asynchronous_resolves_after_each_shot() {
        let mut red = Force::new(1, 1, 1, 1.0, 0.0);
        let mut blue = Force::new(1, 1, 1, 1.0, 0.0);
        let mut rng = ScriptedSource::new().with_indices([0, 1]);

        let resolution = CombatEngine::new(&mut rng)
            .resolve(&mut red, &mut blue, ActivationOrder::RandomAsynchronous)
            .unwrap();

        assert_eq!(resolution.outcome, Outcome::RedVictory);
        assert_eq!(resolution.turns, 1);
        assert_eq!(rng.indices_drawn(), 1);
        assert_eq!(red.len(), 1);
    }

    #[test]
    fn test_asynchronous_pool_shrinks_within_turn() {
        // Red always activates and kills the first blue unit each shot.
        let mut red = Force::new(1, 1, 1, 1.0, 0.0);
        let mut blue = Force::new(3, 1, 1, 1.0, 0.0);
        let mut rng = ScriptedSource::new();

        let resolution = CombatEngine::new(&mut rng)
            .resolve(&mut red, &mut blue, ActivationOrder::UniformAsynchronous)
            .unwrap();

        assert_eq!(resolution.outcome, Outcome::RedVictory);
        assert_eq!(resolution.turns, 2);
        let turns: Vec<u64> = resolution.trace.iter().map(|e| e.turn).collect();
        assert_eq!(turns, vec![1, 1, 2]);
        assert_eq!(rng.indices_drawn(), 3);
    }

    #[test]
    fn test_uniform_synchronous_follows_permutation() {
        // Red shooters take one shot, blue shooters two, so the order of real
        // draws reveals who fired when. Pool 0..2 is red, 2..5 is blue.
        let mut red = Force::new(2, 1, 1, 0.5, 0.6);
        let mut blue = Force::new(3, 1, 2, 0.5, 0.7);
        let mut rng = ScriptedSource::new()
            .with_permutation(vec![4, 0, 2, 1, 3])
            .with_reals([0.9, 0.9, 0.1, 0.9, 0.9, 0.9, 0.9, 0.9]);

        let resolution = CombatEngine::new(&mut rng)
            .resolve(&mut red, &mut blue, ActivationOrder::UniformSynchronous)
            .unwrap();

        // Third draw belongs to red unit 0, whose hit drops blue to 2/3.
        // In storage order it would have been blue's first shot instead.
        assert_eq!(resolution.outcome, Outcome::RedVictory);
        assert_eq!(resolution.turns, 1);
        assert_eq!(
            resolution.trace,
            vec![CasualtyEvent {
                turn: 1,
                red_removed: vec![],
                blue_removed: vec![0],
                red_remaining: 2,
                blue_remaining: 2,
            }]
        );
        assert_eq!(rng.reals_drawn(), 8);
        assert_eq!(rng.indices_drawn(), 0);
    }

    #[test]
    fn test_random_synchronous_draws_pool_times() {
        let mut red = Force::new(2, 1, 1, 0.0, 0.0);
        let mut blue = Force::new(3, 1, 1, 0.0, 0.0);
        let mut rng = ScriptedSource::new().with_fallback_real(0.5);

        let result = CombatEngine::new(&mut rng)
            .with_turn_limit(Some(2))
            .resolve(&mut red, &mut blue, ActivationOrder::RandomSynchronous);

        assert!(result.is_err());
        assert_eq!(rng.indices_drawn(), 10);
    }

    #[test]
    fn test_empty_force_rejected() {
        let mut red = Force::new(0, 1, 1, 0.5, 0.5);
        let mut blue = Force::new(3, 1, 1, 0.5, 0.5);
        let mut rng = SeededSource::new(1);

        let result = CombatEngine::new(&mut rng).resolve(
            &mut red,
            &mut blue,
            ActivationOrder::RandomSynchronous,
        );
        assert!(matches!(result, Err(LanchesterError::InvalidScenario(_))));
    }

    #[test]
    fn test_same_seed_same_resolution() {
        for order in ActivationOrder::all() {
            let run = || {
                let mut red = Force::new(20, 2, 3, 0.3, 0.3);
                let mut blue = Force::new(15, 2, 4, 0.35, 0.4);
                let mut rng = SeededSource::new(42);
                CombatEngine::new(&mut rng)
                    .resolve(&mut red, &mut blue, order)
                    .unwrap()
            };
            assert_eq!(run(), run(), "{} is not deterministic", order);
        }
    }

    proptest! {
        #[test]
        fn prop_runs_terminate_with_consistent_trace(
            seed in any::<u64>(),
            order_idx in 0usize..4,
            red_size in 1usize..25,
            blue_size in 1usize..25,
            health in 1u32..4,
            max_shots in 1u32..6,
            red_p in 0.2f64..1.0,
            blue_p in 0.2f64..1.0,
            red_rt in 0.0f64..0.9,
            blue_rt in 0.0f64..0.9,
        ) {
            let order = ActivationOrder::all()[order_idx];
            let mut red = Force::new(red_size, health, max_shots, red_p, red_rt);
            let mut blue = Force::new(blue_size, health, max_shots, blue_p, blue_rt);
            let mut rng = SeededSource::new(seed);

            let resolution = CombatEngine::new(&mut rng)
                .resolve(&mut red, &mut blue, order)
                .unwrap();

            prop_assert!(resolution.outcome.is_terminal());
            prop_assert!(resolution.turns >= 1);
            prop_assert!(resolution.trace.windows(2).all(|w| w[0].turn <= w[1].turn));
            prop_assert!(resolution.trace.iter().all(|e| e.turn <= resolution.turns));
            prop_assert!(red.units().iter().all(|u| u.health > 0));
            prop_assert!(blue.units().iter().all(|u| u.health > 0));
            prop_assert_eq!(red.force_size(), red_size);
            prop_assert_eq!(adjudicate(&red, &blue), resolution.outcome);
        }
    }
}
