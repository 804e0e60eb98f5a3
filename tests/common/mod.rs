// Shared fixtures for integration tests
#![allow(dead_code)]

use lasko::{ApiClient, Config, Exercise};
use serde_json::{json, Value};

pub const TOKEN: &str = "test-token";

pub fn config_for(server: &mockito::ServerGuard) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.url();
    config.api.timeout_seconds = 5;
    config.auth.token = TOKEN.to_string();
    config
}

pub fn client_for(server: &mockito::ServerGuard) -> ApiClient {
    ApiClient::new(&config_for(server)).expect("client")
}

pub fn bearer() -> String {
    format!("Bearer {}", TOKEN)
}

pub fn catalog_exercise(id: &str, name: &str, group: &str) -> Exercise {
    Exercise {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        muscle_group: Some(group.to_string()),
        exercise_type: Some("strength".to_string()),
        equipment: None,
        difficulty: None,
    }
}

/// Standard plan owned by user 5 with two slots on day one
pub fn standard_plan_body() -> Value {
    json!({
        "success": true,
        "plan": {
            "id": 12,
            "name": "Strength Basics",
            "description": "Three full-body days",
            "goal_type": "strength",
            "difficulty_level": "beginner",
            "training_days_per_week": 3,
            "owner_id": 5,
            "days": [
                {
                    "id": 1,
                    "day_number": 1,
                    "title": "Full body A",
                    "exercises": [
                        {"id": 101, "exercise": {"id": 1, "name": "Squat", "muscle_group": "Legs"},
                         "sets": 4, "reps": "8", "rest_seconds": 90, "order": 1},
                        {"id": 102,
                         "exercise": {"id": 2, "name": "Bench Press", "muscle_group": "Chest"},
                         "sets": 3, "reps": "10-12", "rest_seconds": 60, "order": 2}
                    ]
                }
            ]
        }
    })
}

/// System template: same plan without an owner
pub fn system_plan_body() -> Value {
    let mut body = standard_plan_body();
    body["plan"]["owner_id"] = Value::Null;
    body
}

pub fn custom_plan_body(id: &str, days: usize) -> Value {
    let days: Vec<Value> = (1..=days)
        .map(|n| {
            json!({
                "name": format!("Day {}", n),
                "day_order": n,
                "exercises": [
                    {"exercise_id": n, "exercise_name": format!("Exercise {}", n),
                     "target_sets": "3", "target_reps": "10-12", "rest_seconds": 60,
                     "exercise_order": 1}
                ]
            })
        })
        .collect();

    json!({
        "success": true,
        "plan": {
            "id": id,
            "name": "My Split",
            "description": "",
            "owner_id": "u-1",
            "training_days_per_week": days.len(),
            "days": days
        }
    })
}
