use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::PayloadError;

/// Total experience in a skill.
pub type Experience = u64;

/// Experience per skill.
pub type Skills = BTreeMap<Skill, Experience>;

/// A trainable skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Skill {
    Agility,
    Attack,
    Construction,
    Cooking,
    Crafting,
    Defence,
    Farming,
    Firemaking,
    Fishing,
    Fletching,
    Herblore,
    Hitpoints,
    Hunter,
    Magic,
    Mining,
    Prayer,
    Ranged,
    Runecraft,
    Slayer,
    Smithing,
    Strength,
    Thieving,
    Woodcutting,
    Sailing,
}

impl Skill {
    /// All skills in backend order. Positional skill arrays follow this.
    pub const ALL: [Self; 24] = [
        Self::Agility,
        Self::Attack,
        Self::Construction,
        Self::Cooking,
        Self::Crafting,
        Self::Defence,
        Self::Farming,
        Self::Firemaking,
        Self::Fishing,
        Self::Fletching,
        Self::Herblore,
        Self::Hitpoints,
        Self::Hunter,
        Self::Magic,
        Self::Mining,
        Self::Prayer,
        Self::Ranged,
        Self::Runecraft,
        Self::Slayer,
        Self::Smithing,
        Self::Strength,
        Self::Thieving,
        Self::Woodcutting,
        Self::Sailing,
    ];

    /// Display name, as used on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Agility => "Agility",
            Self::Attack => "Attack",
            Self::Construction => "Construction",
            Self::Cooking => "Cooking",
            Self::Crafting => "Crafting",
            Self::Defence => "Defence",
            Self::Farming => "Farming",
            Self::Firemaking => "Firemaking",
            Self::Fishing => "Fishing",
            Self::Fletching => "Fletching",
            Self::Herblore => "Herblore",
            Self::Hitpoints => "Hitpoints",
            Self::Hunter => "Hunter",
            Self::Magic => "Magic",
            Self::Mining => "Mining",
            Self::Prayer => "Prayer",
            Self::Ranged => "Ranged",
            Self::Runecraft => "Runecraft",
            Self::Slayer => "Slayer",
            Self::Smithing => "Smithing",
            Self::Strength => "Strength",
            Self::Thieving => "Thieving",
            Self::Woodcutting => "Woodcutting",
            Self::Sailing => "Sailing",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Skill {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|skill| skill.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PayloadError::UnknownSkill(s.to_string()))
    }
}
