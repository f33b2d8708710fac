//! Planet catalog
//!
//! The journey runs from Pluto inward to the Sun. Each planet fixes the largest
//! operand the generator may draw, so digit width grows as the player advances.

use serde::{Deserialize, Serialize};

/// Difficulty class of a planet (digit width of its operands)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Single,
    Double,
    Triple,
    Quad,
    /// Final planet, five digit operands
    Boss,
}

/// A planet on the journey
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub name: &'static str,
    pub emoji: &'static str,
    pub image: &'static str,
    pub difficulty: Difficulty,
    /// Largest operand the generator may draw on this planet
    pub max_num: u32,
    /// Fun fact shown when the rocket arrives
    pub fact: &'static str,
}

impl Stage {
    pub fn is_boss(&self) -> bool {
        self.difficulty == Difficulty::Boss
    }

    /// Text for the arrival notification
    pub fn arrival_text(&self) -> &'static str {
        if self.is_boss() {
            BOSS_WARNING
        } else {
            self.fact
        }
    }
}

/// Shown instead of the Sun's fact when the player reaches it
pub const BOSS_WARNING: &str =
    "⚠️ BOSS BATTLE! The Sun awaits with 5-digit challenges. Can you handle the heat?";

/// Number of planets on the journey
pub const STAGE_COUNT: usize = 10;

/// Journey order, Pluto first, Sun last
pub const STAGES: [Stage; STAGE_COUNT] = [
    Stage {
        name: "Pluto",
        emoji: "🪐",
        image: "assets/planets/pluto.png",
        difficulty: Difficulty::Single,
        max_num: 9,
        fact: "Pluto is smaller than Earth's Moon! It was discovered in 1930.",
    },
    Stage {
        name: "Neptune",
        emoji: "🔵",
        image: "assets/planets/neptune.png",
        difficulty: Difficulty::Single,
        max_num: 9,
        fact: "Neptune has the strongest winds in the solar system, up to 1,200 mph!",
    },
    Stage {
        name: "Uranus",
        emoji: "💎",
        image: "assets/planets/uranus.png",
        difficulty: Difficulty::Double,
        max_num: 99,
        fact: "Uranus rotates on its side like a rolling ball! It's the only planet that does this.",
    },
    Stage {
        name: "Saturn",
        emoji: "🪐",
        image: "assets/planets/saturn.png",
        difficulty: Difficulty::Double,
        max_num: 99,
        fact: "Saturn's rings are made of ice and rock. You could fit 764 Earths inside Saturn!",
    },
    Stage {
        name: "Jupiter",
        emoji: "🟠",
        image: "assets/planets/jupiter.png",
        difficulty: Difficulty::Triple,
        max_num: 999,
        fact: "Jupiter is so big that all the other planets could fit inside it! It has 95 moons.",
    },
    Stage {
        name: "Mars",
        emoji: "🔴",
        image: "assets/planets/mars.png",
        difficulty: Difficulty::Triple,
        max_num: 999,
        fact: "Mars has the tallest volcano in the solar system. Olympus Mons is 3x taller than Mt. Everest!",
    },
    Stage {
        name: "Earth",
        emoji: "🌍",
        image: "assets/planets/earth.png",
        difficulty: Difficulty::Triple,
        max_num: 999,
        fact: "You're passing by home! Earth is the only planet we know has life.",
    },
    Stage {
        name: "Venus",
        emoji: "🟡",
        image: "assets/planets/venus.png",
        difficulty: Difficulty::Quad,
        max_num: 9999,
        fact: "A day on Venus is longer than its year! It spins very, very slowly.",
    },
    Stage {
        name: "Mercury",
        emoji: "⚫",
        image: "assets/planets/mercury.png",
        difficulty: Difficulty::Quad,
        max_num: 9999,
        fact: "Mercury is the fastest planet. It zooms around the Sun in just 88 Earth days!",
    },
    Stage {
        name: "Sun",
        emoji: "☀️",
        image: "assets/planets/sun.png",
        difficulty: Difficulty::Boss,
        max_num: 99999,
        fact: "🏆 BOSS DEFEATED! You conquered the Sun! It's so big that 1.3 million Earths could fit inside!",
    },
];

/// Look up a planet by journey index (`None` past the Sun)
pub fn stage(index: usize) -> Option<&'static Stage> {
    STAGES.get(index)
}
