//! Cosmetic shop items and equip slots

use serde::{Deserialize, Serialize};

/// Shop category. Plural, as listed in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CosmeticCategory {
    Avatars,
    Frames,
    Titles,
    Themes,
    Effects,
}

/// Where an equipped cosmetic goes on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    Avatar,
    Frame,
    Title,
    Theme,
    Effect,
}

impl CosmeticCategory {
    pub fn equip_slot(&self) -> EquipSlot {
        match self {
            CosmeticCategory::Avatars => EquipSlot::Avatar,
            CosmeticCategory::Frames => EquipSlot::Frame,
            CosmeticCategory::Titles => EquipSlot::Title,
            CosmeticCategory::Themes => EquipSlot::Theme,
            CosmeticCategory::Effects => EquipSlot::Effect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cosmetic {
    pub id: String,
    pub name: String,
    pub category: CosmeticCategory,
    pub price: u64,
    /// Minimum profile level to buy
    #[serde(default)]
    pub required_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EquippedCosmetics {
    pub avatar: Option<String>,
    pub frame: Option<String>,
    pub title: Option<String>,
    pub theme: Option<String>,
    pub effect: Option<String>,
}

impl EquippedCosmetics {
    pub fn get(&self, slot: EquipSlot) -> Option<&str> {
        match slot {
            EquipSlot::Avatar => self.avatar.as_deref(),
            EquipSlot::Frame => self.frame.as_deref(),
            EquipSlot::Title => self.title.as_deref(),
            EquipSlot::Theme => self.theme.as_deref(),
            EquipSlot::Effect => self.effect.as_deref(),
        }
    }

    /// Put `cosmetic_id` in `slot`, returning what was there.
    pub fn set(&mut self, slot: EquipSlot, cosmetic_id: impl Into<String>) -> Option<String> {
        let target = match slot {
            EquipSlot::Avatar => &mut self.avatar,
            EquipSlot::Frame => &mut self.frame,
            EquipSlot::Title => &mut self.title,
            EquipSlot::Theme => &mut self.theme,
            EquipSlot::Effect => &mut self.effect,
        };
        target.replace(cosmetic_id.into())
    }
}
