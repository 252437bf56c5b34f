//! Starter quests
//!
//! Default quest board shown before a user has created anything. XP follows
//! the duration table, so only gold and boosts are tuned here.

use once_cell::sync::Lazy;

use crate::quest::{Difficulty, Quest, QuestCategory, StatKind};

fn starter(
    id: &str,
    name: &str,
    category: QuestCategory,
    difficulty: Difficulty,
    minutes: u32,
    gold: u64,
) -> Quest {
    Quest::from_duration(id, name, category, difficulty, minutes, gold)
}

pub static STARTER_QUESTS: Lazy<Vec<Quest>> = Lazy::new(|| {
    use Difficulty::{Easy, Hard, Medium};
    use QuestCategory::{Coding, Fitness, Money, Social, Study};

    vec![
        // Study
        starter("starter-read-chapter", "Read a chapter", Study, Easy, 30, 50)
            .with_description("One chapter of any non-fiction book")
            .with_boost(StatKind::Intelligence, 1),
        starter("starter-course-lesson", "Finish a course lesson", Study, Medium, 60, 100)
            .with_boost(StatKind::Intelligence, 2)
            .with_boost(StatKind::Willpower, 1),
        // Fitness
        starter("starter-morning-run", "Morning run", Fitness, Medium, 30, 60)
            .with_boost(StatKind::Endurance, 2)
            .with_boost(StatKind::Strength, 1),
        starter("starter-gym-session", "Gym session", Fitness, Hard, 90, 150)
            .with_boost(StatKind::Strength, 3)
            .with_boost(StatKind::Endurance, 1),
        // Coding
        starter("starter-leetcode", "Solve a leetcode problem", Coding, Medium, 45, 80)
            .with_boost(StatKind::Intelligence, 2),
        starter("starter-side-project", "Ship a side project commit", Coding, Hard, 120, 200)
            .with_boost(StatKind::Intelligence, 2)
            .with_boost(StatKind::Willpower, 2),
        // Money
        starter("starter-budget-review", "Review this week's budget", Money, Easy, 15, 40)
            .with_boost(StatKind::Willpower, 1),
        starter("starter-invest-research", "Invest research session", Money, Medium, 60, 120)
            .with_boost(StatKind::Intelligence, 1)
            .with_boost(StatKind::Willpower, 1),
        // Social
        starter("starter-call-family", "Call family", Social, Easy, 20, 40)
            .with_boost(StatKind::Social, 2),
        starter("starter-meetup", "Attend a meetup", Social, Medium, 90, 120)
            .with_boost(StatKind::Social, 3)
            .with_boost(StatKind::Willpower, 1),
    ]
});

pub fn starter_quests() -> &'static [Quest] {
    &STARTER_QUESTS
}

pub fn starter_quests_in(category: QuestCategory) -> impl Iterator<Item = &'static Quest> {
    STARTER_QUESTS.iter().filter(move |q| q.category == category)
}

pub fn find_starter_quest(id: &str) -> Option<&'static Quest> {
    STARTER_QUESTS.iter().find(|q| q.id == id)
}
