use std::time::Duration;

use game_core::{
    Action, ActionProfile, BattleResult, ChoiceError, ChoiceSet, Combatant, Effect, FlowState,
    ScriptedRolls, StaticChoices,
};
use runtime::{
    BattleEvent, Event, FlowEvent, ImmediatePacer, PacingConfig, ProgressionEvent, Runtime,
    RuntimeConfig, RuntimeError, TimedPacer, Topic,
};
use tokio::sync::broadcast;

fn finisher() -> StaticChoices {
    StaticChoices::new(
        ChoiceSet::from_profiles(&[ActionProfile::new(1.0).on_success(Effect::on_target(-5))])
            .with_labels(["Finisher"]),
    )
}

fn drain_states(rx: &mut broadcast::Receiver<Event>) -> Vec<FlowState> {
    let mut states = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let Event::Flow(FlowEvent::StateChanged { to, .. }) = event {
            states.push(to);
        }
    }
    states
}

/// A won battle walks Choice -> Battle -> Result -> LevelUp -> Choice with one
/// state change per transition and banks the win reward.
#[tokio::test]
async fn won_battle_cycles_back_to_choice() {
    let runtime = Runtime::builder()
        .player(Combatant::new("Hero"))
        .enemy(Combatant::new("Slime").with_hp(2, 2))
        .choices(finisher())
        .rolls(ScriptedRolls::constant(0.0))
        .pacer(ImmediatePacer)
        .build();
    let mut flow_events = runtime.subscribe(Topic::Flow);

    runtime.start().await.unwrap();
    let summary = runtime.flow().select_choice(0).await.unwrap();

    assert!(summary.result.player_won());
    assert_eq!(summary.result.rounds(), 1);
    assert_eq!(summary.result.winner_name(), "Hero");
    assert_eq!(summary.gain.amount, 3);
    assert_eq!(runtime.flow().state().await, FlowState::Choice);

    assert_eq!(
        drain_states(&mut flow_events),
        vec![
            FlowState::Choice,
            FlowState::Battle,
            FlowState::Result,
            FlowState::LevelUp,
            FlowState::Choice,
        ]
    );

    let progression = runtime.progression().snapshot().await;
    assert_eq!(progression.level(), 1);
    assert_eq!(progression.current_xp(), 3);
}

/// The player never lands a hit; failures stack but the enemy wins in five
/// rounds and the loss reward is granted.
#[tokio::test]
async fn lost_battle_grants_loss_reward() {
    let runtime = Runtime::builder()
        .player(Combatant::new("Hero"))
        .enemy(Combatant::new("Ogre"))
        .choices(StaticChoices::new(ChoiceSet::from_profiles(&[
            ActionProfile::new(0.0),
        ])))
        .rolls(ScriptedRolls::constant(0.5))
        .pacer(ImmediatePacer)
        .build();

    runtime.start().await.unwrap();
    let summary = runtime.flow().select_choice(0).await.unwrap();

    assert!(!summary.result.player_won());
    assert_eq!(summary.result.rounds(), 5);
    assert_eq!(summary.result.winner_name(), "Ogre");
    assert_eq!(summary.result.player().current_hp(), 0);
    assert_eq!(summary.result.player().failure_stack(), 5);
    assert_eq!(summary.result.enemy().current_hp(), 10);
    assert_eq!(summary.gain.amount, 1);
}

/// Two wins cross the first threshold and publish a level-up.
#[tokio::test]
async fn repeated_wins_level_up() {
    let runtime = Runtime::builder()
        .enemy(Combatant::new("Slime").with_hp(2, 2))
        .choices(finisher())
        .rolls(ScriptedRolls::constant(0.0))
        .pacer(ImmediatePacer)
        .config(runtime::RuntimeConfig {
            restore_between_battles: true,
            ..Default::default()
        })
        .build();
    let mut progression_events = runtime.subscribe(Topic::Progression);

    runtime.start().await.unwrap();
    runtime.flow().select_choice(0).await.unwrap();
    let second = runtime.flow().select_choice(0).await.unwrap();

    assert!(second.result.player_won());
    assert_eq!(second.gain.levels_reached, vec![2]);

    let mut levels = Vec::new();
    while let Ok(event) = progression_events.try_recv() {
        if let Event::Progression(ProgressionEvent::LevelUp { level }) = event {
            levels.push(level);
        }
    }
    assert_eq!(levels, vec![2]);

    let progression = runtime.progression().snapshot().await;
    assert_eq!(progression.level(), 2);
    assert_eq!(progression.current_xp(), 1);
    assert_eq!(progression.xp_to_next_level(), 6);
}

#[tokio::test]
async fn selection_before_start_is_rejected() {
    let runtime = Runtime::builder().pacer(ImmediatePacer).build();
    let mut flow_events = runtime.subscribe(Topic::Flow);

    let err = runtime.flow().select_choice(0).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Flow(_)));
    assert_eq!(runtime.flow().state().await, FlowState::None);
    assert!(flow_events.try_recv().is_err());
}

#[tokio::test]
async fn out_of_range_choice_is_rejected_without_side_effects() {
    let runtime = Runtime::builder()
        .rolls(ScriptedRolls::constant(0.0))
        .pacer(ImmediatePacer)
        .build();
    runtime.start().await.unwrap();
    let mut flow_events = runtime.subscribe(Topic::Flow);
    let mut battle_events = runtime.subscribe(Topic::Battle);

    let err = runtime.flow().select_choice(3).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Choice(ChoiceError::InvalidIndex { index: 3, len: 3 })
    ));

    assert_eq!(runtime.flow().state().await, FlowState::Choice);
    assert!(flow_events.try_recv().is_err());
    assert!(battle_events.try_recv().is_err());
    let (player, enemy) = runtime.battles().combatants().await;
    assert_eq!(player.current_hp(), 10);
    assert_eq!(enemy.current_hp(), 10);
}

/// A stale battle result outside the battle phases is dropped.
#[tokio::test]
async fn stale_battle_result_is_rejected_in_choice() {
    let runtime = Runtime::builder().pacer(ImmediatePacer).build();
    runtime.start().await.unwrap();

    let stale = BattleResult::new(true, Combatant::new("Hero"), Combatant::new("Slime"), 1);
    let err = runtime.flow().on_battle_ended(stale).await.unwrap_err();

    assert!(matches!(err, RuntimeError::Flow(_)));
    assert_eq!(runtime.flow().state().await, FlowState::Choice);
    assert_eq!(runtime.progression().snapshot().await.current_xp(), 0);
}

/// A newer result arriving mid-advance cancels the pending advance; the
/// session reaches LevelUp and Choice exactly once afterwards.
#[tokio::test(start_paused = true)]
async fn newer_result_supersedes_pending_advance() {
    let pacing = PacingConfig {
        turn_delay: Duration::ZERO,
        result_delay: Duration::from_secs(1),
        level_up_delay: Duration::from_secs(1),
    };
    let runtime = Runtime::builder()
        .player(Combatant::new("Hero"))
        .enemy(Combatant::new("Slime").with_hp(2, 2))
        .choices(finisher())
        .rolls(ScriptedRolls::constant(0.0))
        .pacer(TimedPacer::new(pacing))
        .build();
    let mut flow_events = runtime.subscribe(Topic::Flow);
    runtime.start().await.unwrap();

    let flow = runtime.flow();
    let first = tokio::spawn({
        let flow = flow.clone();
        async move { flow.select_choice(0).await }
    });

    loop {
        if let Event::Flow(FlowEvent::StateChanged {
            to: FlowState::Result,
            ..
        }) = flow_events.recv().await.unwrap()
        {
            break;
        }
    }

    let late = BattleResult::new(false, Combatant::new("Hero"), Combatant::new("Slime"), 3);
    let post = flow.on_battle_ended(late).await.unwrap();
    assert_eq!(post.gain().amount, 1);
    post.settled().await.unwrap();

    let err = first.await.unwrap().unwrap_err();
    assert!(matches!(err, RuntimeError::ContinuationSuperseded));

    assert_eq!(
        drain_states(&mut flow_events),
        vec![FlowState::Result, FlowState::LevelUp, FlowState::Choice]
    );
    assert_eq!(flow.state().await, FlowState::Choice);
    assert_eq!(runtime.progression().snapshot().await.current_xp(), 4);
}

/// Dropping the selection future mid-battle does not strand the session: the
/// battle and the post-battle phases still run and the next pick is accepted.
#[tokio::test(start_paused = true)]
async fn dropped_selection_still_finishes_battle() {
    let pacing = PacingConfig {
        turn_delay: Duration::from_secs(1),
        result_delay: Duration::ZERO,
        level_up_delay: Duration::ZERO,
    };
    let config = RuntimeConfig {
        pacing,
        restore_between_battles: true,
        ..RuntimeConfig::default()
    };
    let runtime = Runtime::builder()
        .config(config)
        .rolls(ScriptedRolls::constant(0.5))
        .pacer(TimedPacer::new(pacing))
        .build();
    let mut battle_events = runtime.subscribe(Topic::Battle);
    runtime.start().await.unwrap();

    let flow = runtime.flow();
    let timed_out = tokio::time::timeout(Duration::from_millis(1500), flow.select_choice(0)).await;
    assert!(timed_out.is_err());

    while flow.state().await != FlowState::Choice {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(!runtime.battles().is_battling());
    assert!(runtime.progression().snapshot().await.current_xp() > 0);

    let mut ended = 0;
    while let Ok(event) = battle_events.try_recv() {
        if let Event::Battle(BattleEvent::Ended(_)) = event {
            ended += 1;
        }
    }
    assert_eq!(ended, 1);

    let summary = flow.select_choice(0).await.unwrap();
    assert!(summary.result.rounds() > 0);
    assert_eq!(flow.state().await, FlowState::Choice);
}

/// A pick made while a battle started elsewhere is still running is refused
/// and leaves the session untouched.
#[tokio::test(start_paused = true)]
async fn selection_during_running_battle_is_rejected() {
    let pacing = PacingConfig {
        turn_delay: Duration::from_secs(1),
        ..PacingConfig::default()
    };
    let runtime = Runtime::builder()
        .rolls(ScriptedRolls::constant(0.5))
        .pacer(TimedPacer::new(pacing))
        .build();
    runtime.start().await.unwrap();
    let mut flow_events = runtime.subscribe(Topic::Flow);

    let battles = runtime.battles();
    let running = tokio::spawn({
        let battles = battles.clone();
        async move { battles.begin_battle(Some(Action::default())).await }
    });
    while !battles.is_battling() {
        tokio::task::yield_now().await;
    }

    let err = runtime.flow().select_choice(0).await.unwrap_err();
    assert!(matches!(err, RuntimeError::BattleInProgress));
    assert_eq!(runtime.flow().state().await, FlowState::Choice);
    assert!(flow_events.try_recv().is_err());

    running.abort();
}
