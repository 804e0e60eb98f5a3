use serde::{Deserialize, Serialize};

use super::exercise::Exercise;
use super::wire;

pub const DEFAULT_TARGET_SETS: &str = "3";
pub const DEFAULT_TARGET_REPS: &str = "10-12";
pub const DEFAULT_REST_SECONDS: u32 = 60;

/// Which persistence path a plan belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    /// Authored or copied by the user, saved as a whole
    Custom,
    /// Generated from a template, saved through discrete calls
    Standard,
}

/// Training plan, tagged by the endpoint family that persists it
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Custom(PlanDetails),
    Standard(PlanDetails),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PlanDetails {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub goal_type: Option<String>,
    pub difficulty_level: Option<String>,
    pub training_days_per_week: u32,
    pub equipment_required: Vec<String>,
    /// `None` marks a system template
    pub owner_id: Option<String>,
    pub is_active: bool,
    pub days: Vec<Day>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Day {
    pub id: Option<String>,
    pub title: String,
    pub order: u32,
    pub exercises: Vec<PlanExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanExercise {
    /// Server id of this slot; the `{exId}` of the standard-plan endpoints
    pub entry_id: Option<String>,
    /// Catalog id of the exercise occupying the slot
    pub exercise_id: String,
    pub name: String,
    pub muscle_group: Option<String>,
    pub target_sets: String,
    pub target_reps: String,
    pub rest_seconds: u32,
    pub order: u32,
    #[serde(skip)]
    pub modified: bool,
}

impl Plan {
    pub fn new(kind: PlanKind, details: PlanDetails) -> Self {
        match kind {
            PlanKind::Custom => Plan::Custom(details),
            PlanKind::Standard => Plan::Standard(details),
        }
    }

    pub fn kind(&self) -> PlanKind {
        match self {
            Plan::Custom(_) => PlanKind::Custom,
            Plan::Standard(_) => PlanKind::Standard,
        }
    }

    pub fn details(&self) -> &PlanDetails {
        match self {
            Plan::Custom(details) | Plan::Standard(details) => details,
        }
    }

    pub fn details_mut(&mut self) -> &mut PlanDetails {
        match self {
            Plan::Custom(details) | Plan::Standard(details) => details,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.details().id.as_deref()
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Plan::Custom(_))
    }

    /// Standard plans without an owner are system templates and read-only.
    /// Custom plans always belong to the user, even before their first save.
    pub fn is_system(&self) -> bool {
        matches!(self, Plan::Standard(details) if details.owner_id.is_none())
    }

    pub fn days(&self) -> &[Day] {
        &self.details().days
    }
}

impl PlanExercise {
    /// New slot for a catalog exercise with the default training parameters
    pub fn from_catalog(exercise: &Exercise, order: u32) -> Self {
        Self {
            entry_id: None,
            exercise_id: exercise.id.clone(),
            name: exercise.name.clone(),
            muscle_group: exercise.muscle_group.clone(),
            target_sets: DEFAULT_TARGET_SETS.to_string(),
            target_reps: DEFAULT_TARGET_REPS.to_string(),
            rest_seconds: DEFAULT_REST_SECONDS,
            order,
            modified: false,
        }
    }
}

impl Day {
    pub fn new(title: impl Into<String>, order: u32) -> Self {
        Self {
            id: None,
            title: title.into(),
            order,
            exercises: Vec::new(),
        }
    }

    pub fn contains_exercise(&self, exercise_id: &str) -> bool {
        self.exercises.iter().any(|e| e.exercise_id == exercise_id)
    }

    /// Rewrite exercise `order` fields as 1..N in list order
    pub fn renumber(&mut self) {
        for (index, exercise) in self.exercises.iter_mut().enumerate() {
            exercise.order = index as u32 + 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Incoming payloads
// ---------------------------------------------------------------------------

/// Plan detail envelope shared by the standard and custom endpoints
#[derive(Debug, Deserialize)]
pub struct PlanResponse {
    #[serde(default = "default_true")]
    pub success: bool,

    #[serde(default)]
    pub plan: Option<WirePlan>,
    #[serde(default)]
    pub custom_plan: Option<WirePlan>,

    #[serde(default)]
    pub error: Option<String>,
}

impl PlanResponse {
    pub fn into_wire_plan(self) -> Option<WirePlan> {
        self.plan.or(self.custom_plan)
    }
}

/// Plan as the backend sends it, before normalization. Snake and camel
/// spellings are separate fields so a payload carrying both still parses.
#[derive(Debug, Default, Deserialize)]
pub struct WirePlan {
    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub goal_type: Option<String>,
    #[serde(default, rename = "goalType")]
    pub goal_type_camel: Option<String>,

    #[serde(default)]
    pub difficulty_level: Option<String>,
    #[serde(default, rename = "difficultyLevel")]
    pub difficulty_level_camel: Option<String>,

    #[serde(default, deserialize_with = "wire::opt_loose_u32")]
    pub training_days_per_week: Option<u32>,
    #[serde(
        default,
        rename = "trainingDaysPerWeek",
        deserialize_with = "wire::opt_loose_u32"
    )]
    pub training_days_per_week_camel: Option<u32>,

    #[serde(default, deserialize_with = "wire::string_list")]
    pub equipment_required: Vec<String>,
    #[serde(default, rename = "equipmentRequired", deserialize_with = "wire::string_list")]
    pub equipment_required_camel: Vec<String>,

    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub owner_id: Option<String>,
    #[serde(default, rename = "ownerId", deserialize_with = "wire::opt_loose_string")]
    pub owner_id_camel: Option<String>,

    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, rename = "isActive")]
    pub is_active_camel: Option<bool>,

    #[serde(default)]
    pub days: Vec<WireDay>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireDay {
    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub day_name: Option<String>,

    #[serde(default, deserialize_with = "wire::opt_loose_u32")]
    pub order: Option<u32>,
    #[serde(default, deserialize_with = "wire::opt_loose_u32")]
    pub day_order: Option<u32>,
    #[serde(default, deserialize_with = "wire::opt_loose_u32")]
    pub day_number: Option<u32>,

    #[serde(default)]
    pub exercises: Vec<WireExercise>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireExerciseRef {
    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub muscle_group: Option<String>,
    #[serde(default, rename = "muscleGroup")]
    pub muscle_group_camel: Option<String>,
}

/// One slot as sent by either endpoint family; every alias is a separate
/// field so a payload carrying two spellings still parses.
#[derive(Debug, Default, Deserialize)]
pub struct WireExercise {
    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub exercise_id: Option<String>,
    #[serde(default, rename = "exerciseId", deserialize_with = "wire::opt_loose_string")]
    pub exercise_id_camel: Option<String>,
    #[serde(default)]
    pub exercise: Option<WireExerciseRef>,

    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exercise_name: Option<String>,

    #[serde(default)]
    pub muscle_group: Option<String>,
    #[serde(default, rename = "muscleGroup")]
    pub muscle_group_camel: Option<String>,

    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub target_sets: Option<String>,
    #[serde(default, rename = "targetSets", deserialize_with = "wire::opt_loose_string")]
    pub target_sets_camel: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub sets: Option<String>,

    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub target_reps: Option<String>,
    #[serde(default, rename = "targetReps", deserialize_with = "wire::opt_loose_string")]
    pub target_reps_camel: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub reps: Option<String>,

    #[serde(default, deserialize_with = "wire::opt_loose_u32")]
    pub rest_seconds: Option<u32>,
    #[serde(default, rename = "restSeconds", deserialize_with = "wire::opt_loose_u32")]
    pub rest_seconds_camel: Option<u32>,
    #[serde(default, deserialize_with = "wire::opt_loose_u32")]
    pub rest: Option<u32>,

    #[serde(default, deserialize_with = "wire::opt_loose_u32")]
    pub order: Option<u32>,
    #[serde(default, deserialize_with = "wire::opt_loose_u32")]
    pub exercise_order: Option<u32>,
}

fn default_true() -> bool {
    true
}

impl WirePlan {
    /// Normalize into the canonical model for the given endpoint family
    pub fn into_plan(self, kind: PlanKind) -> Plan {
        let mut days: Vec<Day> = self
            .days
            .into_iter()
            .enumerate()
            .map(|(index, day)| day.into_day(index as u32 + 1))
            .collect();
        days.sort_by_key(|day| day.order);

        let training_days_per_week = self
            .training_days_per_week
            .or(self.training_days_per_week_camel)
            .filter(|n| *n > 0)
            .unwrap_or(days.len() as u32);

        let equipment_required = if self.equipment_required.is_empty() {
            self.equipment_required_camel
        } else {
            self.equipment_required
        };

        Plan::new(
            kind,
            PlanDetails {
                id: self.id,
                name: self.name,
                description: self.description.unwrap_or_default(),
                goal_type: self.goal_type.or(self.goal_type_camel),
                difficulty_level: self.difficulty_level.or(self.difficulty_level_camel),
                training_days_per_week,
                equipment_required,
                owner_id: self.owner_id.or(self.owner_id_camel),
                is_active: self.is_active.or(self.is_active_camel).unwrap_or(false),
                days,
            },
        )
    }
}

impl WireDay {
    fn into_day(self, fallback_order: u32) -> Day {
        let order = self
            .order
            .or(self.day_order)
            .or(self.day_number)
            .unwrap_or(fallback_order);

        let title = self
            .title
            .or(self.name)
            .or(self.day_name)
            .unwrap_or_else(|| format!("Day {}", order));

        let mut exercises: Vec<PlanExercise> = self
            .exercises
            .into_iter()
            .enumerate()
            .filter_map(|(index, exercise)| exercise.into_exercise(index as u32 + 1))
            .collect();
        exercises.sort_by_key(|e| e.order);

        Day {
            id: self.id,
            title,
            order,
            exercises,
        }
    }
}

impl WireExercise {
    /// `None` when the slot carries no catalog id at all
    fn into_exercise(self, fallback_order: u32) -> Option<PlanExercise> {
        let nested = self.exercise.unwrap_or_default();

        // A flat or nested catalog id means `id` is the slot's own row id.
        let explicit_id = self.exercise_id.or(self.exercise_id_camel).or(nested.id);
        let (entry_id, exercise_id) = match explicit_id {
            Some(exercise_id) => (self.id, exercise_id),
            None => (None, self.id?),
        };

        Some(PlanExercise {
            entry_id,
            exercise_id,
            name: self
                .exercise_name
                .or(self.name)
                .or(nested.name)
                .unwrap_or_default(),
            muscle_group: self
                .muscle_group
                .or(self.muscle_group_camel)
                .or(nested.muscle_group)
                .or(nested.muscle_group_camel),
            target_sets: self
                .target_sets
                .or(self.target_sets_camel)
                .or(self.sets)
                .unwrap_or_else(|| DEFAULT_TARGET_SETS.to_string()),
            target_reps: self
                .target_reps
                .or(self.target_reps_camel)
                .or(self.reps)
                .unwrap_or_else(|| DEFAULT_TARGET_REPS.to_string()),
            rest_seconds: self
                .rest_seconds
                .or(self.rest_seconds_camel)
                .or(self.rest)
                .unwrap_or(DEFAULT_REST_SECONDS),
            order: self.order.or(self.exercise_order).unwrap_or(fallback_order),
            modified: false,
        })
    }
}

// ---------------------------------------------------------------------------
// Outgoing payloads
// ---------------------------------------------------------------------------

/// Full-replace body for custom plans (create and update)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomPlanPayload {
    pub name: String,
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_days_per_week: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_required: Option<Vec<String>>,

    pub days: Vec<DayPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPayload {
    pub name: String,
    pub day_order: u32,
    pub exercises: Vec<ExercisePayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExercisePayload {
    pub exercise_id: serde_json::Value,
    pub target_sets: String,
    pub target_reps: String,
    pub rest_seconds: u32,
    pub exercise_order: u32,
}

/// `PUT /api/recommendations/plans/{id}/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardPlanUpdate {
    pub name: String,
    pub description: String,
}

/// `PUT /api/recommendations/plans/{id}/exercises/{exId}/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseParamsUpdate {
    pub target_sets: String,
    pub target_reps: String,
    pub rest_seconds: u32,
}

/// `POST /api/recommendations/plans/{id}/exercises/{exId}/replace/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaceExerciseRequest {
    pub new_exercise_id: serde_json::Value,
}

impl PlanDetails {
    /// Serialize the day tree for the custom-plan endpoints. Slots without a
    /// catalog id are dropped, then days left empty are dropped, and the
    /// survivors are numbered 1..N.
    pub fn to_custom_payload(&self, with_metadata: bool) -> CustomPlanPayload {
        let days = self
            .days
            .iter()
            .filter_map(|day| {
                let exercises: Vec<ExercisePayload> = day
                    .exercises
                    .iter()
                    .filter(|e| !e.exercise_id.trim().is_empty())
                    .enumerate()
                    .map(|(index, e)| ExercisePayload {
                        exercise_id: wire::id_value(&e.exercise_id),
                        target_sets: e.target_sets.clone(),
                        target_reps: e.target_reps.clone(),
                        rest_seconds: e.rest_seconds,
                        exercise_order: index as u32 + 1,
                    })
                    .collect();

                if exercises.is_empty() {
                    None
                } else {
                    Some((day.title.clone(), exercises))
                }
            })
            .enumerate()
            .map(|(index, (name, exercises))| DayPayload {
                name,
                day_order: index as u32 + 1,
                exercises,
            })
            .collect();

        CustomPlanPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            goal_type: self.goal_type.clone().filter(|_| with_metadata),
            difficulty_level: self.difficulty_level.clone().filter(|_| with_metadata),
            training_days_per_week: Some(self.training_days_per_week).filter(|_| with_metadata),
            equipment_required: Some(self.equipment_required.clone()).filter(|_| with_metadata),
            days,
        }
    }

    pub fn standard_update(&self) -> StandardPlanUpdate {
        StandardPlanUpdate {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

impl From<&PlanExercise> for ExerciseParamsUpdate {
    fn from(exercise: &PlanExercise) -> Self {
        Self {
            target_sets: exercise.target_sets.clone(),
            target_reps: exercise.target_reps.clone(),
            rest_seconds: exercise.rest_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_standard_plan_normalization() {
        let raw = json!({
            "id": 12,
            "name": "Strength Basics",
            "goal_type": "strength",
            "training_days_per_week": 3,
            "owner_id": 5,
            "days": [
                {
                    "id": 2,
                    "day_number": 2,
                    "title": "Pull",
                    "exercises": [
                        {"id": 901, "exercise": {"id": 14, "name": "Row", "muscle_group": "Back"},
                         "sets": 4, "reps": "8", "rest_seconds": 90, "order": 1}
                    ]
                },
                {
                    "id": 1,
                    "day_number": 1,
                    "title": "Push",
                    "exercises": []
                }
            ]
        });

        let wire: WirePlan = serde_json::from_value(raw).unwrap();
        let plan = wire.into_plan(PlanKind::Standard);

        assert_eq!(plan.kind(), PlanKind::Standard);
        assert_eq!(plan.id(), Some("12"));
        assert!(!plan.is_system());

        let days = plan.days();
        assert_eq!(days[0].title, "Push");
        assert_eq!(days[1].title, "Pull");

        let row = &days[1].exercises[0];
        assert_eq!(row.entry_id.as_deref(), Some("901"));
        assert_eq!(row.exercise_id, "14");
        assert_eq!(row.name, "Row");
        assert_eq!(row.muscle_group.as_deref(), Some("Back"));
        assert_eq!(row.target_sets, "4");
        assert_eq!(row.target_reps, "8");
        assert_eq!(row.rest_seconds, 90);
    }

    #[test]
    fn test_custom_plan_normalization() {
        let raw = json!({
            "id": "c-1",
            "name": "My Split",
            "ownerId": "u-1",
            "days": [
                {"name": "Legs", "day_order": 1, "exercises": [
                    {"exercise_id": 3, "exercise_name": "Squat", "targetSets": "5",
                     "target_reps": "5", "restSeconds": "120", "exercise_order": 1},
                    {"exercise_name": "Mystery"}
                ]}
            ]
        });

        let wire: WirePlan = serde_json::from_value(raw).unwrap();
        let plan = wire.into_plan(PlanKind::Custom);
        let day = &plan.days()[0];

        assert_eq!(day.title, "Legs");
        assert_eq!(day.exercises.len(), 1);
        let squat = &day.exercises[0];
        assert_eq!(squat.entry_id, None);
        assert_eq!(squat.exercise_id, "3");
        assert_eq!(squat.target_sets, "5");
        assert_eq!(squat.rest_seconds, 120);
        assert_eq!(plan.details().training_days_per_week, 1);
    }

    #[test]
    fn test_both_spellings_of_a_field_still_parse() {
        let raw = json!({
            "id": 3,
            "name": "Hybrid",
            "goal_type": "strength",
            "goalType": "endurance",
            "trainingDaysPerWeek": "4",
            "owner_id": null,
            "ownerId": 9,
            "is_active": true,
            "isActive": false,
            "equipmentRequired": "barbell, bench",
            "days": []
        });

        let wire: WirePlan = serde_json::from_value(raw).unwrap();
        let plan = wire.into_plan(PlanKind::Standard);
        let details = plan.details();

        assert_eq!(details.goal_type.as_deref(), Some("strength"));
        assert_eq!(details.training_days_per_week, 4);
        assert_eq!(details.owner_id.as_deref(), Some("9"));
        assert!(details.is_active);
        assert_eq!(details.equipment_required, vec!["barbell", "bench"]);
        assert!(!plan.is_system());
    }

    #[test]
    fn test_response_accepts_custom_plan_key() {
        let raw = json!({"success": true, "custom_plan": {"id": 8, "name": "Mine"}});
        let response: PlanResponse = serde_json::from_value(raw).unwrap();
        let plan = response.into_wire_plan().unwrap().into_plan(PlanKind::Custom);
        assert_eq!(plan.id(), Some("8"));
    }

    #[test]
    fn test_missing_parameters_get_defaults() {
        let raw = json!({"exercise_id": 8, "name": "Plank"});
        let wire: WireExercise = serde_json::from_value(raw).unwrap();
        let exercise = wire.into_exercise(4).unwrap();

        assert_eq!(exercise.target_sets, DEFAULT_TARGET_SETS);
        assert_eq!(exercise.target_reps, DEFAULT_TARGET_REPS);
        assert_eq!(exercise.rest_seconds, DEFAULT_REST_SECONDS);
        assert_eq!(exercise.order, 4);
    }

    #[test]
    fn test_custom_payload_drops_empty_days() {
        let mut details = PlanDetails {
            name: "Split".to_string(),
            ..Default::default()
        };

        let bench = Exercise {
            id: "1".to_string(),
            name: "Bench".to_string(),
            description: None,
            muscle_group: Some("Chest".to_string()),
            exercise_type: None,
            equipment: None,
            difficulty: None,
        };

        let mut push = Day::new("Push", 1);
        push.exercises.push(PlanExercise::from_catalog(&bench, 1));
        let rest = Day::new("Rest", 2);
        let mut again = Day::new("Push again", 3);
        again.exercises.push(PlanExercise::from_catalog(&bench, 1));
        details.days = vec![push, rest, again];

        let payload = details.to_custom_payload(false);
        assert_eq!(payload.days.len(), 2);
        assert_eq!(payload.days[1].name, "Push again");
        assert_eq!(payload.days[1].day_order, 2);
        assert_eq!(payload.goal_type, None);

        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            body["days"][0]["exercises"][0],
            json!({
                "exercise_id": 1,
                "target_sets": "3",
                "target_reps": "10-12",
                "rest_seconds": 60,
                "exercise_order": 1
            })
        );
        assert!(body.get("training_days_per_week").is_none());
    }
}
