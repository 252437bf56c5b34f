pub mod timer;
pub mod types;

pub use timer::{ActiveQuest, QuestTimer, TimerState};
pub use types::{CompletedQuest, Difficulty, Quest, QuestCategory, StatBoosts, StatKind};
