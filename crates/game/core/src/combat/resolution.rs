//! Single-turn resolution with the failure-stack bias.

use crate::action::profile::clamp01;
use crate::action::{Action, Outcome};
use crate::env::RollSource;
use crate::state::Combatant;

/// Success chance after adding the actor's failure-stack bonus.
///
/// # Formula
///
/// ```text
/// adjusted = clamp01(base + failure_stack × bonus)
/// ```
///
/// Negative or NaN bonuses count as zero, so the result never decreases as
/// the failure stack grows and always lies in `[0, 1]`.
pub fn adjusted_chance(base: f32, failure_stack: u32, bonus: f32) -> f32 {
    let bonus = if bonus.is_nan() { 0.0 } else { bonus.max(0.0) };
    clamp01(base + failure_stack as f32 * bonus)
}

/// Narration record for one resolved turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnResolution {
    pub actor: String,
    pub target: String,
    pub roll: f32,
    pub adjusted_chance: f32,
    pub outcome: Outcome,
    pub actor_hp: i32,
    pub target_hp: i32,
    pub target_max_hp: i32,
    /// Actor's failure stack after this turn.
    pub actor_failure_stack: u32,
}

/// Resolve one action by `actor` against `target`.
///
/// Draws a roll and compares it to the adjusted chance:
/// - `roll <= adjusted`: the success effect applies, the failure stack is kept
/// - otherwise: the failure effect applies and the actor's failure stack grows by one
///
/// An absent action still consumes a roll but resolves as a failure with an
/// adjusted chance of zero and changes nothing.
pub fn resolve_turn(
    rng: &mut (impl RollSource + ?Sized),
    failure_stack_bonus: f32,
    action: Option<&Action>,
    actor: &mut Combatant,
    target: &mut Combatant,
) -> TurnResolution {
    let roll = rng.next_roll();

    let (adjusted, outcome) = match action {
        Some(action) => {
            let adjusted = adjusted_chance(
                action.success_chance(),
                actor.failure_stack(),
                failure_stack_bonus,
            );
            let outcome = if roll <= adjusted {
                Outcome::Success
            } else {
                Outcome::Failure
            };

            action.effect_for(outcome).apply(actor, target);
            if outcome == Outcome::Failure {
                actor.record_failure();
            }
            (adjusted, outcome)
        }
        None => (0.0, Outcome::Failure),
    };

    TurnResolution {
        actor: actor.display_name().to_owned(),
        target: target.display_name().to_owned(),
        roll,
        adjusted_chance: adjusted,
        outcome,
        actor_hp: actor.current_hp(),
        target_hp: target.current_hp(),
        target_max_hp: target.max_hp(),
        actor_failure_stack: actor.failure_stack(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Effect;
    use crate::env::ScriptedRolls;

    const BONUS: f32 = 0.05;

    #[test]
    fn adjusted_chance_is_monotone_and_bounded() {
        for base in [0.0, 0.3, 0.7, 1.0] {
            let mut previous = adjusted_chance(base, 0, BONUS);
            for stack in 1..50 {
                let current = adjusted_chance(base, stack, BONUS);
                assert!(current >= previous);
                assert!((0.0..=1.0).contains(&current));
                previous = current;
            }
        }
    }

    #[test]
    fn negative_bonus_never_lowers_the_chance() {
        assert_eq!(adjusted_chance(0.5, 10, -0.1), 0.5);
        assert_eq!(adjusted_chance(0.5, 10, f32::NAN), 0.5);
    }

    #[test]
    fn success_applies_success_effect_and_keeps_stack() {
        let action = Action::new(0.5, Effect::on_target(-3), Effect::on_actor(-1));
        let mut player = Combatant::new("Player").with_failure_stack(2);
        let mut enemy = Combatant::new("Enemy");
        let mut rng = ScriptedRolls::constant(0.5);

        let turn = resolve_turn(&mut rng, BONUS, Some(&action), &mut player, &mut enemy);

        assert_eq!(turn.outcome, Outcome::Success);
        assert_eq!(enemy.current_hp(), 7);
        assert_eq!(player.current_hp(), 10);
        assert_eq!(player.failure_stack(), 2);
        assert_eq!(turn.target_hp, 7);
        assert_eq!(turn.actor, "Player");
    }

    #[test]
    fn failure_applies_failure_effect_and_grows_stack() {
        let action = Action::new(0.2, Effect::on_target(-3), Effect::on_actor(-1));
        let mut player = Combatant::new("Player");
        let mut enemy = Combatant::new("Enemy");
        let mut rng = ScriptedRolls::constant(0.9);

        let turn = resolve_turn(&mut rng, BONUS, Some(&action), &mut player, &mut enemy);

        assert_eq!(turn.outcome, Outcome::Failure);
        assert_eq!(player.current_hp(), 9);
        assert_eq!(enemy.current_hp(), 10);
        assert_eq!(player.failure_stack(), 1);
        assert_eq!(turn.actor_failure_stack, 1);
    }

    #[test]
    fn failure_stack_turns_a_miss_into_a_hit() {
        // 0.2 + 4 × 0.05 = 0.4 which covers a roll of 0.35
        let action = Action::new(0.2, Effect::on_target(-1), Effect::NONE);
        let mut player = Combatant::new("Player").with_failure_stack(4);
        let mut enemy = Combatant::new("Enemy");
        let mut rng = ScriptedRolls::constant(0.35);

        let turn = resolve_turn(&mut rng, BONUS, Some(&action), &mut player, &mut enemy);
        assert_eq!(turn.outcome, Outcome::Success);
    }

    #[test]
    fn stack_only_helps_its_owner() {
        let action = Action::new(0.0, Effect::NONE, Effect::NONE);
        let mut player = Combatant::new("Player").with_failure_stack(10);
        let mut enemy = Combatant::new("Enemy");
        let mut rng = ScriptedRolls::constant(0.3);

        let turn = resolve_turn(&mut rng, BONUS, Some(&action), &mut enemy, &mut player);
        assert_eq!(turn.adjusted_chance, 0.0);
        assert_eq!(turn.outcome, Outcome::Failure);
        assert_eq!(enemy.failure_stack(), 1);
        assert_eq!(player.failure_stack(), 10);
    }

    #[test]
    fn absent_action_is_a_no_op_failure() {
        let mut player = Combatant::new("Player").with_failure_stack(1);
        let mut enemy = Combatant::new("Enemy");
        let mut rng = ScriptedRolls::constant(0.0);

        let turn = resolve_turn(&mut rng, BONUS, None, &mut player, &mut enemy);

        assert_eq!(turn.adjusted_chance, 0.0);
        assert_eq!(turn.outcome, Outcome::Failure);
        assert_eq!(player, Combatant::new("Player").with_failure_stack(1));
        assert_eq!(enemy, Combatant::new("Enemy"));
        assert_eq!(rng.drawn(), 1);
    }
}
