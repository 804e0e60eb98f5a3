use serde::{Deserialize, Serialize};

use super::wire;

/// Exercise catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireCatalogExercise")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub muscle_group: Option<String>,
    pub exercise_type: Option<String>,
    pub equipment: Option<String>,
    pub difficulty: Option<String>,
}

/// Catalog entry as the backend sends it. Each spelling is its own field so
/// an entry carrying two of them does not fail the whole list.
#[derive(Debug, Deserialize)]
struct WireCatalogExercise {
    #[serde(deserialize_with = "wire::loose_string")]
    id: String,

    #[serde(default)]
    name: String,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    muscle_group: Option<String>,
    #[serde(default, rename = "muscleGroup")]
    muscle_group_camel: Option<String>,
    #[serde(default)]
    primary_muscle: Option<String>,

    #[serde(default)]
    exercise_type: Option<String>,
    #[serde(default, rename = "exerciseType")]
    exercise_type_camel: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    category: Option<String>,

    #[serde(default)]
    equipment: Option<String>,

    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    difficulty_level: Option<String>,
}

impl From<WireCatalogExercise> for Exercise {
    fn from(raw: WireCatalogExercise) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            muscle_group: raw
                .muscle_group
                .or(raw.muscle_group_camel)
                .or(raw.primary_muscle),
            exercise_type: raw
                .exercise_type
                .or(raw.exercise_type_camel)
                .or(raw.kind)
                .or(raw.category),
            equipment: raw.equipment,
            difficulty: raw.difficulty.or(raw.difficulty_level),
        }
    }
}

/// `GET /api/exercises/` response envelope
#[derive(Debug, Deserialize)]
pub struct ExerciseListResponse {
    #[serde(default = "default_success")]
    pub success: bool,

    #[serde(default)]
    pub exercises: Vec<Exercise>,

    #[serde(default)]
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

impl std::fmt::Display for Exercise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.muscle_group {
            Some(group) => write!(f, "{} ({})", self.name, group),
            None => write!(f, "{}", self.name),
        }
    }
}
