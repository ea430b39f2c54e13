use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Skill category offered by the plan form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Programming,
    Art,
    Music,
    Fitness,
    Cooking,
    Languages,
    Learning,
    Business,
}

const ALL: [Category; 8] = [
    Category::Programming,
    Category::Art,
    Category::Music,
    Category::Fitness,
    Category::Cooking,
    Category::Languages,
    Category::Learning,
    Category::Business,
];

impl Category {
    pub fn all() -> &'static [Category] {
        &ALL
    }

    /// Plain name, as accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Programming => "Programming",
            Category::Art => "Art",
            Category::Music => "Music",
            Category::Fitness => "Fitness",
            Category::Cooking => "Cooking",
            Category::Languages => "Languages",
            Category::Learning => "Learning",
            Category::Business => "Business",
        }
    }

    /// Display label substituted into the prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Programming => "Programming 💻",
            Category::Art => "Art 🎨",
            Category::Music => "Music 🎶",
            Category::Fitness => "Fitness 🏋️",
            Category::Cooking => "Cooking 🍳",
            Category::Languages => "Languages 🌍",
            Category::Learning => "Learning ✍️",
            Category::Business => "Business 📈",
        }
    }

    /// Parse a category by plain name or full label, ignoring case.
    pub fn parse(input: &str) -> Result<Self, ApiError> {
        let trimmed = input.trim();
        ALL.iter()
            .copied()
            .find(|category| {
                category.name().eq_ignore_ascii_case(trimmed) || category.label() == trimmed
            })
            .ok_or_else(|| {
                let names: Vec<&str> = ALL.iter().map(|c| c.name()).collect();
                ApiError::InvalidRequest(format!(
                    "Unknown category '{}'. Must be one of: {}",
                    trimmed,
                    names.join(", ")
                ))
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
