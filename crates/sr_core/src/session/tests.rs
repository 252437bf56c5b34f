use super::*;
use crate::clock::{FixedOffsetCalendar, ManualClock};
use crate::cosmetics::EquipSlot;
use crate::error::SettlementStage;
use crate::progression::{level_from_total_xp, total_xp_for_level};
use crate::quest::{Difficulty, QuestCategory, StatBoosts, StatKind};
use crate::store::{MemoryProfileStore, StoreError, StoreOp};
use chrono::{Duration, NaiveDate, TimeZone};

type TestSession = GameSession<MemoryProfileStore, ManualClock, FixedOffsetCalendar>;

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap()
}

fn read_quest() -> Quest {
    Quest {
        id: "q-read".to_string(),
        name: "Read a chapter".to_string(),
        description: "One chapter of any book".to_string(),
        category: QuestCategory::Study,
        difficulty: Difficulty::Easy,
        estimated_minutes: 30,
        xp_reward: 100,
        gold_reward: 50,
        stat_boosts: StatBoosts::new(),
    }
}

fn setup_with(profile: UserProfile) -> (TestSession, MemoryProfileStore, ManualClock) {
    let store = MemoryProfileStore::new();
    store.insert_profile(profile);
    let clock = ManualClock::new(start_time());
    let mut session = GameSession::new(
        "u1",
        store.clone(),
        clock.clone(),
        FixedOffsetCalendar::utc(),
        BalanceConfig::default(),
    );
    session.load_profile().unwrap();
    (session, store, clock)
}

fn setup() -> (TestSession, MemoryProfileStore, ManualClock) {
    setup_with(UserProfile::new("u1", "hunter"))
}

/// Drive the timer the way a one-second tick source would.
fn run_for(session: &mut TestSession, clock: &ManualClock, secs: i64) {
    for _ in 0..secs {
        session.tick();
    }
    clock.advance_secs(secs);
}

#[test]
fn test_early_completion_end_to_end() {
    let (mut session, store, clock) = setup();
    session.start_quest(read_quest()).unwrap();
    run_for(&mut session, &clock, 1_500);
    assert_eq!(session.active_quest().unwrap().remaining_seconds, 300);

    let reward = session.complete_quest().unwrap();
    assert!(!reward.was_late);
    assert_eq!(reward.xp_earned, 100);
    assert_eq!(reward.gold_earned, 50);
    let expected = level_from_total_xp(100);
    assert_eq!((reward.level, reward.current_xp), (expected.level, expected.current_xp));
    assert_eq!(reward.achievements_unlocked, vec!["ach-first-steps".to_string()]);
    assert_eq!(reward.quests_completed_today, 1);

    assert_eq!(session.timer_state(), TimerState::Idle);
    let stored = store.profile("u1").unwrap();
    assert_eq!(stored.total_xp, 100);
    assert_eq!(stored.gold, 50);
    assert_eq!(stored.total_quests_completed, 1);
    assert_eq!(session.profile(), Some(&stored));
    assert_eq!(store.completed_quests("u1").len(), 1);
}

#[test]
fn test_late_completion_end_to_end() {
    let (mut session, store, clock) = setup();
    session.start_quest(read_quest()).unwrap();
    run_for(&mut session, &clock, 1_800 + 700);
    assert_eq!(session.active_quest().unwrap().remaining_seconds, -700);

    let reward = session.complete_quest().unwrap();
    assert!(reward.was_late);
    assert_eq!(reward.penalty_percent, 75);
    assert_eq!(reward.xp_earned, 25);
    assert_eq!(reward.gold_earned, 50);

    let history = store.completed_quests("u1");
    assert_eq!(history[0].xp_earned, 25);
    assert!(history[0].was_late);
}

#[test]
fn test_zero_remaining_is_on_time_and_minus_one_is_late() {
    let (mut session, _store, clock) = setup();
    session.start_quest(read_quest()).unwrap();
    run_for(&mut session, &clock, 1_800);
    let reward = session.complete_quest().unwrap();
    assert!(!reward.was_late);
    assert_eq!(reward.xp_earned, 100);

    session.start_quest(read_quest()).unwrap();
    run_for(&mut session, &clock, 1_801);
    let reward = session.complete_quest().unwrap();
    assert!(reward.was_late);
    assert_eq!(reward.penalty_percent, 50);
    assert_eq!(reward.xp_earned, 50);
}

#[test]
fn test_completion_gate() {
    let (mut session, store, clock) = setup();
    assert_eq!(session.seconds_until_completable(), 0);
    assert!(!session.can_complete_quest());

    session.start_quest(read_quest()).unwrap();
    // 60% of 1800s
    assert_eq!(session.seconds_until_completable(), 1_080);

    run_for(&mut session, &clock, 600);
    session.pause_quest().unwrap();
    clock.advance_secs(300);
    // wall clock keeps counting while paused
    assert_eq!(session.seconds_until_completable(), 180);

    let err = session.complete_quest().unwrap_err();
    assert!(matches!(err, CoreError::NotYetCompletable { seconds_remaining: 180 }));
    assert!(err.is_recoverable());
    assert_eq!(session.timer_state(), TimerState::Paused);
    assert!(store.completed_quests("u1").is_empty());

    clock.advance_secs(180);
    assert!(session.can_complete_quest());
    let reward = session.complete_quest().unwrap();
    assert_eq!(reward.time_taken_seconds, 600);
}

#[test]
fn test_gate_can_be_disabled() {
    let (mut session, _store, _clock) = setup();
    session.config.enforce_completion_gate = false;
    session.start_quest(read_quest()).unwrap();
    assert!(session.complete_quest().is_ok());
}

#[test]
fn test_second_start_leaves_first_quest_unchanged() {
    let (mut session, _store, clock) = setup();
    session.start_quest(read_quest()).unwrap();
    run_for(&mut session, &clock, 10);
    let before = session.active_quest().cloned();

    let mut other = read_quest();
    other.id = "q-run".to_string();
    let err = session.start_quest(other).unwrap_err();
    assert!(matches!(err, CoreError::QuestAlreadyActive(_)));
    assert_eq!(session.active_quest().cloned(), before);
}

#[test]
fn test_pause_resume_tracks_paused_time_only() {
    let (mut session, _store, clock) = setup();
    session.start_quest(read_quest()).unwrap();
    run_for(&mut session, &clock, 20);
    let remaining = session.active_quest().unwrap().remaining_seconds;

    session.pause_quest().unwrap();
    assert!(!session.is_ticking());
    // ticks arriving while paused are ignored
    run_for(&mut session, &clock, 75);

    assert_eq!(session.resume_quest().unwrap(), 75);
    let active = session.active_quest().unwrap();
    assert_eq!(active.total_paused_seconds, 75);
    assert_eq!(active.remaining_seconds, remaining);
    assert!(session.is_ticking());
}

#[test]
fn test_history_failure_keeps_quest_active() {
    let (mut session, store, clock) = setup();
    session.start_quest(read_quest()).unwrap();
    run_for(&mut session, &clock, 1_500);

    store.fail(StoreOp::InsertCompletedQuest);
    let err = session.complete_quest().unwrap_err();
    assert!(matches!(err, CoreError::Settlement { stage: SettlementStage::InsertHistory, .. }));
    assert!(err.is_recoverable());
    assert_eq!(session.timer_state(), TimerState::Running);
    assert_eq!(session.profile().unwrap().total_xp, 0);
    assert_eq!(store.profile("u1").unwrap().total_xp, 0);
    assert!(session.status().settlement_pending);

    store.recover(StoreOp::InsertCompletedQuest);
    let reward = session.complete_quest().unwrap();
    assert_eq!(reward.xp_earned, 100);
    assert_eq!(store.completed_quests("u1").len(), 1);
}

#[test]
fn test_profile_update_failure_retries_without_duplicate_history() {
    let (mut session, store, clock) = setup();
    session.start_quest(read_quest()).unwrap();
    run_for(&mut session, &clock, 1_500);

    store.fail(StoreOp::UpdateProfile);
    let err = session.complete_quest().unwrap_err();
    assert!(matches!(err, CoreError::Settlement { stage: SettlementStage::UpdateProfile, .. }));
    assert_eq!(store.completed_quests("u1").len(), 1);
    assert_eq!(session.profile().unwrap().total_quests_completed, 0);
    assert!(session.active_quest().is_some());

    // ticks during the outage do not change the frozen reward
    run_for(&mut session, &clock, 1_000);
    store.recover(StoreOp::UpdateProfile);
    let reward = session.complete_quest().unwrap();
    assert!(!reward.was_late);
    assert_eq!(reward.xp_earned, 100);
    assert_eq!(store.completed_quests("u1").len(), 1);
    assert_eq!(store.profile("u1").unwrap().total_quests_completed, 1);
    assert!(!session.status().settlement_pending);
}

#[test]
fn test_abandon_has_no_side_effects() {
    let (mut session, store, clock) = setup();
    session.start_quest(read_quest()).unwrap();
    run_for(&mut session, &clock, 1_500);

    let abandoned = session.abandon_quest().unwrap();
    assert_eq!(abandoned.quest.id, "q-read");
    assert_eq!(session.timer_state(), TimerState::Idle);
    assert!(store.completed_quests("u1").is_empty());
    assert_eq!(store.profile("u1").unwrap(), UserProfile::new("u1", "hunter"));
    assert!(store.unlock_records("u1").is_empty());
    assert!(matches!(session.complete_quest(), Err(CoreError::NoActiveQuest)));
}

#[test]
fn test_load_profile_distinguishes_missing_from_failure() {
    let store = MemoryProfileStore::new();
    let clock = ManualClock::new(start_time());
    let mut session = GameSession::new(
        "ghost",
        store.clone(),
        clock,
        FixedOffsetCalendar::utc(),
        BalanceConfig::default(),
    );
    let err = session.load_profile().unwrap_err();
    assert!(matches!(err, CoreError::ProfileNotFound(ref id) if id == "ghost"));
    assert!(!err.is_recoverable());

    store.fail(StoreOp::GetProfile);
    let err = session.load_profile().unwrap_err();
    assert!(matches!(err, CoreError::Store(StoreError::Transport(_))));
    assert!(err.is_recoverable());
}

#[test]
fn test_complete_requires_loaded_profile() {
    let store = MemoryProfileStore::new();
    store.insert_profile(UserProfile::new("u1", "hunter"));
    let clock = ManualClock::new(start_time());
    let mut session = GameSession::new(
        "u1",
        store,
        clock.clone(),
        FixedOffsetCalendar::utc(),
        BalanceConfig::default(),
    );
    session.start_quest(read_quest()).unwrap();
    clock.advance_secs(1_500);
    assert!(matches!(session.complete_quest(), Err(CoreError::ProfileNotLoaded)));
    assert_eq!(session.timer_state(), TimerState::Running);
}

#[test]
fn test_stat_boosts_capped_through_completion() {
    let mut profile = UserProfile::new("u1", "hunter");
    profile.stats.strength = 99;
    let (mut session, store, clock) = setup_with(profile);

    let quest = Quest::from_duration("q-gym", "Gym", QuestCategory::Fitness, Difficulty::Hard, 60, 80)
        .with_boost(StatKind::Strength, 3)
        .with_boost(StatKind::Endurance, 2);
    session.start_quest(quest).unwrap();
    run_for(&mut session, &clock, 3_600);
    session.complete_quest().unwrap();

    let stats = store.profile("u1").unwrap().stats;
    assert_eq!(stats.strength, 100);
    assert_eq!(stats.endurance, 2);
}

#[test]
fn test_level_10_unlock_is_recorded_once() {
    let mut profile = UserProfile::new("u1", "hunter");
    profile.total_xp = total_xp_for_level(10) - 50;
    profile.level = 9;
    profile.current_xp = level_from_total_xp(profile.total_xp).current_xp;
    let (mut session, store, clock) = setup_with(profile);

    session.start_quest(read_quest()).unwrap();
    run_for(&mut session, &clock, 1_500);
    let reward = session.complete_quest().unwrap();
    assert!(reward.leveled_up);
    assert_eq!(reward.new_level, Some(10));
    assert_eq!(reward.gold_earned, 50 + 5_000);
    assert!(reward.achievements_unlocked.contains(&"ach-level-10".to_string()));

    session.start_quest(read_quest()).unwrap();
    run_for(&mut session, &clock, 1_500);
    let reward = session.complete_quest().unwrap();
    assert!(!reward.achievements_unlocked.contains(&"ach-level-10".to_string()));

    let records = store.unlock_records("u1");
    assert_eq!(records.iter().filter(|id| *id == "ach-level-10").count(), 1);
}

#[test]
fn test_daily_counter_and_streak_roll_over() {
    let (mut session, store, clock) = setup();
    for expected in 1..=2 {
        session.start_quest(read_quest()).unwrap();
        run_for(&mut session, &clock, 1_500);
        assert_eq!(session.complete_quest().unwrap().quests_completed_today, expected);
    }
    assert_eq!(session.quests_completed_today(), 2);

    clock.advance(Duration::days(1));
    assert_eq!(session.quests_completed_today(), 0);
    session.start_quest(read_quest()).unwrap();
    run_for(&mut session, &clock, 1_500);
    assert_eq!(session.complete_quest().unwrap().quests_completed_today, 1);

    let stored = store.profile("u1").unwrap();
    assert_eq!(stored.current_streak, 2);
    assert_eq!(stored.longest_streak, 2);
}

#[test]
fn test_missed_days_penalty_applied_once() {
    let mut profile = UserProfile::new("u1", "hunter");
    profile.gold = 50_000;
    profile.current_streak = 5;
    profile.longest_streak = 5;
    // active on May 28; June 1 is today, so May 29-31 were missed
    profile.last_active_day = NaiveDate::from_ymd_opt(2026, 5, 28);
    let (mut session, store, _clock) = setup_with(profile);

    let outcome = session.settle_missed_days().unwrap();
    assert_eq!(
        outcome,
        MissedDaysOutcome {
            days_missed: 3,
            gold_deducted: 42_500,
            // the longest streak already qualifies, the pass just never ran
            achievements_unlocked: vec!["ach-streak-3".to_string()],
        }
    );
    assert_eq!(store.unlock_records("u1").len(), 1);

    let stored = store.profile("u1").unwrap();
    assert_eq!(stored.gold, 7_500);
    assert_eq!(stored.missed_days, 3);
    assert_eq!(stored.current_streak, 0);
    assert_eq!(stored.longest_streak, 5);
    assert_eq!(session.profile(), Some(&stored));

    assert_eq!(session.settle_missed_days().unwrap(), MissedDaysOutcome::default());
    assert_eq!(store.profile("u1").unwrap().gold, 7_500);
}

#[test]
fn test_missed_days_penalty_never_goes_negative() {
    let mut profile = UserProfile::new("u1", "hunter");
    profile.gold = 1_000;
    profile.last_active_day = NaiveDate::from_ymd_opt(2026, 5, 30);
    let (mut session, store, clock) = setup_with(profile);

    let outcome = session.settle_missed_days().unwrap();
    assert_eq!(
        outcome,
        MissedDaysOutcome { days_missed: 1, gold_deducted: 1_000, achievements_unlocked: vec![] }
    );
    assert_eq!(store.profile("u1").unwrap().gold, 0);

    // a day later with no activity counts exactly one more missed day
    clock.advance(Duration::days(1));
    let outcome = session.settle_missed_days().unwrap();
    assert_eq!(outcome.days_missed, 1);
    assert_eq!(store.profile("u1").unwrap().missed_days, 2);
}

#[test]
fn test_no_missed_days_when_active_yesterday() {
    let mut profile = UserProfile::new("u1", "hunter");
    profile.last_active_day = NaiveDate::from_ymd_opt(2026, 5, 31);
    let (mut session, _store, _clock) = setup_with(profile);
    assert_eq!(session.settle_missed_days().unwrap(), MissedDaysOutcome::default());
}

fn frame() -> Cosmetic {
    Cosmetic {
        id: "frame-gold".to_string(),
        name: "Gold Frame".to_string(),
        category: CosmeticCategory::Frames,
        price: 300,
        required_level: 1,
    }
}

#[test]
fn test_purchase_and_equip_cosmetic() {
    let mut profile = UserProfile::new("u1", "hunter");
    profile.gold = 500;
    let (mut session, store, _clock) = setup_with(profile);

    assert!(matches!(session.equip_cosmetic(&frame()), Err(CoreError::CosmeticNotOwned(_))));

    let outcome = session.purchase_cosmetic(&frame()).unwrap();
    assert_eq!(outcome.gold_remaining, 200);
    assert_eq!(outcome.achievements_unlocked, vec!["ach-first-cosmetic".to_string()]);
    assert_eq!(store.profile("u1").unwrap().gold, 200);
    assert_eq!(store.unlock_records("u1").len(), 1);

    let err = session.purchase_cosmetic(&frame()).unwrap_err();
    assert!(matches!(err, CoreError::InsufficientGold { needed: 300, available: 200 }));

    session.equip_cosmetic(&frame()).unwrap();
    let stored = store.profile("u1").unwrap();
    assert_eq!(stored.equipped.get(EquipSlot::Frame), Some("frame-gold"));
    assert_eq!(stored.active_title, None);
}

#[test]
fn test_equipping_title_sets_active_title() {
    let mut profile = UserProfile::new("u1", "hunter");
    profile.gold = 1_000;
    let (mut session, store, _clock) = setup_with(profile);

    let title = Cosmetic {
        id: "title-shadow".to_string(),
        name: "Shadow Monarch".to_string(),
        category: CosmeticCategory::Titles,
        price: 1_000,
        required_level: 1,
    };
    session.purchase_cosmetic(&title).unwrap();
    session.equip_cosmetic(&title).unwrap();

    let stored = store.profile("u1").unwrap();
    assert_eq!(stored.equipped.get(EquipSlot::Title), Some("title-shadow"));
    assert_eq!(stored.active_title.as_deref(), Some("Shadow Monarch"));
}

#[test]
fn test_purchase_requires_level() {
    let mut profile = UserProfile::new("u1", "hunter");
    profile.gold = 10_000;
    let (mut session, store, _clock) = setup_with(profile);

    let mut locked = frame();
    locked.required_level = 20;
    assert!(matches!(session.purchase_cosmetic(&locked), Err(CoreError::InvalidParameter(_))));
    assert_eq!(store.profile("u1").unwrap().gold, 10_000);
}

#[test]
fn test_rebuying_owned_cosmetic_is_rejected() {
    let mut profile = UserProfile::new("u1", "hunter");
    profile.gold = 1_000;
    let (mut session, store, _clock) = setup_with(profile);

    session.purchase_cosmetic(&frame()).unwrap();
    let err = session.purchase_cosmetic(&frame()).unwrap_err();
    assert!(matches!(err, CoreError::CosmeticAlreadyOwned(ref id) if id == "frame-gold"));
    assert!(!err.is_recoverable());
    assert_eq!(store.profile("u1").unwrap().gold, 700);
}

#[test]
fn test_purchase_retry_after_failed_gold_write() {
    let mut profile = UserProfile::new("u1", "hunter");
    profile.gold = 500;
    let (mut session, store, _clock) = setup_with(profile);

    store.fail(StoreOp::UpdateProfile);
    let err = session.purchase_cosmetic(&frame()).unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(session.status().purchase_pending.as_deref(), Some("frame-gold"));
    assert_eq!(session.profile().unwrap().gold, 500);

    // another item has to wait for the half-finished one
    let mut badge = frame();
    badge.id = "frame-silver".to_string();
    assert!(matches!(session.purchase_cosmetic(&badge), Err(CoreError::PendingWrite(_))));
    assert!(matches!(session.settle_missed_days(), Err(CoreError::PendingWrite(_))));

    store.recover(StoreOp::UpdateProfile);
    let outcome = session.purchase_cosmetic(&frame()).unwrap();
    assert_eq!(outcome.gold_remaining, 200);
    assert_eq!(session.status().purchase_pending, None);
    assert_eq!(store.profile("u1").unwrap().gold, 200);
    assert_eq!(store.list_owned_cosmetic_ids("u1").unwrap(), vec!["frame-gold".to_string()]);
}

#[test]
fn test_pending_settlement_blocks_other_profile_writes() {
    let mut profile = UserProfile::new("u1", "hunter");
    profile.gold = 500;
    profile.last_active_day = NaiveDate::from_ymd_opt(2026, 5, 28);
    let (mut session, store, clock) = setup_with(profile);

    session.start_quest(read_quest()).unwrap();
    run_for(&mut session, &clock, 1_500);
    store.fail(StoreOp::UpdateProfile);
    assert!(session.complete_quest().is_err());
    assert!(session.status().settlement_pending);
    store.recover(StoreOp::UpdateProfile);

    assert!(matches!(session.purchase_cosmetic(&frame()), Err(CoreError::PendingWrite(_))));
    assert!(matches!(session.settle_missed_days(), Err(CoreError::PendingWrite(_))));
    assert!(store.list_owned_cosmetic_ids("u1").unwrap().is_empty());
    assert_eq!(store.profile("u1").unwrap().gold, 500);

    let reward = session.complete_quest().unwrap();
    assert_eq!(reward.gold_earned, 50);
    assert_eq!(store.profile("u1").unwrap().gold, 550);

    let outcome = session.purchase_cosmetic(&frame()).unwrap();
    assert_eq!(outcome.gold_remaining, 250);
    let stored = store.profile("u1").unwrap();
    assert_eq!(stored.gold, 250);
    assert_eq!(session.profile().unwrap().gold, 250);
}
