mod common;

use assert_matches::assert_matches;
use lasko::editor::ExerciseField;
use lasko::models::{Day, PlanDetails};
use lasko::{Notifier, Plan, PlanKind, PlanSession, SaveError, Severity};
use mockito::Matcher;
use serde_json::json;

use common::*;

async fn open_standard(server: &mut mockito::ServerGuard, notifier: &Notifier) -> PlanSession {
    server
        .mock("GET", "/api/recommendations/plans/12/")
        .match_header("authorization", bearer().as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(standard_plan_body().to_string())
        .create_async()
        .await;

    PlanSession::open(client_for(server), notifier.clone(), PlanKind::Standard, "12")
        .await
        .expect("plan loads")
}

#[tokio::test]
async fn test_system_plan_edit_is_blocked() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/recommendations/plans/12/")
        .with_status(200)
        .with_body(system_plan_body().to_string())
        .create_async()
        .await;

    let notifier = Notifier::new();
    let mut session =
        PlanSession::open(client_for(&server), notifier.clone(), PlanKind::Standard, "12")
            .await
            .unwrap();

    assert!(!session.begin_edit());
    assert!(session.editor().draft().is_none());

    let active = notifier.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].severity, Severity::Warning);
    assert!(active[0].message.contains("Copy the plan first"));

    let copy = session.copy_template();
    assert!(copy.is_custom());
    assert_eq!(copy.details().owner_id, None);
    assert_eq!(copy.id(), None);
    assert_eq!(copy.days()[0].exercises.len(), 2);
    assert!(copy.days()[0].exercises.iter().all(|e| e.entry_id.is_none()));
}

#[tokio::test]
async fn test_create_and_activate_custom_plan() {
    let mut server = mockito::Server::new_async().await;

    let create = server
        .mock("POST", "/api/recommendations/custom-plans/create/")
        .match_header("authorization", bearer().as_str())
        .match_body(Matcher::PartialJson(json!({
            "name": "My Split",
            "days": [
                {"name": "Day 1", "day_order": 1, "exercises": [
                    {"exercise_id": 1, "target_sets": "3", "target_reps": "10-12",
                     "rest_seconds": 60, "exercise_order": 1}
                ]},
                {"name": "Day 2", "day_order": 2, "exercises": [
                    {"exercise_id": 2, "target_sets": "3", "target_reps": "10-12",
                     "rest_seconds": 60, "exercise_order": 1}
                ]},
                {"name": "Day 3", "day_order": 3, "exercises": [
                    {"exercise_id": 3, "target_sets": "3", "target_reps": "10-12",
                     "rest_seconds": 60, "exercise_order": 1}
                ]}
            ]
        })))
        .with_status(201)
        .with_body(r#"{"success": true, "plan_id": 77}"#)
        .expect(1)
        .create_async()
        .await;

    let reload = server
        .mock("GET", "/api/recommendations/custom-plans/77/")
        .with_status(200)
        .with_body(custom_plan_body("77", 3).to_string())
        .create_async()
        .await;

    let activate = server
        .mock("POST", "/api/recommendations/custom-plans/77/activate/")
        .match_header("authorization", bearer().as_str())
        .with_status(200)
        .with_body(r#"{"success": true, "message": "Plan activated"}"#)
        .expect(1)
        .create_async()
        .await;

    let blank = Plan::Custom(PlanDetails {
        name: "My Split".to_string(),
        training_days_per_week: 3,
        ..Default::default()
    });

    let notifier = Notifier::new();
    let mut session = PlanSession::for_new_plan(client_for(&server), notifier.clone(), blank);

    for n in 1..=3 {
        let day = session.add_day(&format!("Day {}", n)).unwrap();
        let exercise = catalog_exercise(&n.to_string(), &format!("Exercise {}", n), "Legs");
        assert!(session.add_exercise(day, &exercise).unwrap());
    }
    // An empty fourth day is not sent
    session.add_day("Rest").unwrap();

    session.save().await.expect("save succeeds");
    create.assert_async().await;
    reload.assert_async().await;

    assert!(!session.editor().is_editing());
    assert_eq!(session.plan().id(), Some("77"));
    assert_eq!(session.plan().days().len(), 3);

    session.activate().await.expect("activate succeeds");
    activate.assert_async().await;
    assert!(session.plan().details().is_active);

    let messages: Vec<String> = notifier.active().into_iter().map(|n| n.message).collect();
    assert!(messages.contains(&"Plan saved".to_string()));
    assert!(messages.contains(&"Plan activated".to_string()));
}

#[tokio::test]
async fn test_custom_plan_update_sends_full_days() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/recommendations/custom-plans/5/")
        .with_status(200)
        .with_body(custom_plan_body("5", 2).to_string())
        .create_async()
        .await;

    let update = server
        .mock("PUT", "/api/recommendations/custom-plans/5/update/")
        .match_body(Matcher::Json(json!({
            "name": "My Split",
            "description": "",
            "days": [
                {"name": "Day 2", "day_order": 1, "exercises": [
                    {"exercise_id": 9, "target_sets": "3", "target_reps": "10-12",
                     "rest_seconds": 45, "exercise_order": 1}
                ]}
            ]
        })))
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .expect(1)
        .create_async()
        .await;

    let notifier = Notifier::new();
    let mut session = PlanSession::open(client_for(&server), notifier, PlanKind::Custom, "5")
        .await
        .unwrap();

    assert!(session.begin_edit());
    // Custom plans edit locally: no replace/delete endpoint is called
    session.remove_exercise(0, 0).await.unwrap();
    session
        .replace_exercise(1, 0, &catalog_exercise("9", "Goblet Squat", "Legs"))
        .await
        .unwrap();
    session
        .update_exercise_field(1, 0, ExerciseField::RestSeconds, "45s")
        .unwrap();

    session.save().await.unwrap();
    update.assert_async().await;
}

#[tokio::test]
async fn test_standard_save_sends_modified_exercises_only() {
    let mut server = mockito::Server::new_async().await;
    let notifier = Notifier::new();
    let mut session = open_standard(&mut server, &notifier).await;

    let plan_update = server
        .mock("PUT", "/api/recommendations/plans/12/")
        .match_body(Matcher::Json(json!({
            "name": "Strength Basics v2",
            "description": "Three full-body days"
        })))
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .expect(1)
        .create_async()
        .await;

    let bench_update = server
        .mock("PUT", "/api/recommendations/plans/12/exercises/102/")
        .match_body(Matcher::Json(json!({
            "target_sets": "5",
            "target_reps": "5",
            "rest_seconds": 60
        })))
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .expect(1)
        .create_async()
        .await;

    let squat_update = server
        .mock("PUT", "/api/recommendations/plans/12/exercises/101/")
        .expect(0)
        .create_async()
        .await;

    assert!(session.begin_edit());
    session.set_name("Strength Basics v2").unwrap();
    session
        .update_exercise_field(0, 1, ExerciseField::TargetSets, "5")
        .unwrap();
    session
        .update_exercise_field(0, 1, ExerciseField::TargetReps, "5")
        .unwrap();

    session.save().await.unwrap();

    plan_update.assert_async().await;
    bench_update.assert_async().await;
    squat_update.assert_async().await;
    assert!(!session.editor().is_editing());
}

#[tokio::test]
async fn test_standard_save_reports_partial_failure() {
    let mut server = mockito::Server::new_async().await;
    let notifier = Notifier::new();
    let mut session = open_standard(&mut server, &notifier).await;

    server
        .mock("PUT", "/api/recommendations/plans/12/")
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    server
        .mock("PUT", "/api/recommendations/plans/12/exercises/101/")
        .with_status(500)
        .with_body(r#"{"error": "database unavailable"}"#)
        .create_async()
        .await;

    assert!(session.begin_edit());
    session
        .update_exercise_field(0, 0, ExerciseField::RestSeconds, "120")
        .unwrap();

    let error = session.save().await.unwrap_err();
    assert_matches!(error, SaveError::Partial { completed: 1, total: 2, .. });

    // The draft survives so the user can retry
    assert!(session.editor().is_dirty());
    assert_eq!(session.editor().exercise(0, 0).unwrap().rest_seconds, 120);

    let errors: Vec<_> = notifier
        .active()
        .into_iter()
        .filter(|n| n.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("1 of 2"));
}

#[tokio::test]
async fn test_standard_replace_rolls_back_on_failure() {
    let mut server = mockito::Server::new_async().await;
    let notifier = Notifier::new();
    let mut session = open_standard(&mut server, &notifier).await;

    let replace = server
        .mock("POST", "/api/recommendations/plans/12/exercises/101/replace/")
        .match_body(Matcher::Json(json!({"new_exercise_id": 30})))
        .with_status(400)
        .with_body(r#"{"error": "Exercise not allowed"}"#)
        .expect(1)
        .create_async()
        .await;

    assert!(session.begin_edit());
    let result = session
        .replace_exercise(0, 0, &catalog_exercise("30", "Leg Press", "Legs"))
        .await;

    replace.assert_async().await;
    assert_matches!(result, Err(SaveError::Request(_)));

    let slot = session.editor().exercise(0, 0).unwrap();
    assert_eq!(slot.exercise_id, "1");
    assert_eq!(slot.name, "Squat");
    assert!(!session.editor().is_dirty());
}

#[tokio::test]
async fn test_standard_delete_is_immediate() {
    let mut server = mockito::Server::new_async().await;
    let notifier = Notifier::new();
    let mut session = open_standard(&mut server, &notifier).await;

    let delete = server
        .mock("DELETE", "/api/recommendations/plans/12/exercises/101/delete/")
        .match_header("authorization", bearer().as_str())
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    assert!(session.begin_edit());
    session.remove_exercise(0, 0).await.unwrap();
    delete.assert_async().await;

    let day: &Day = &session.plan().days()[0];
    assert_eq!(day.exercises.len(), 1);
    assert_eq!(day.exercises[0].name, "Bench Press");
    assert_eq!(day.exercises[0].order, 1);
}

#[tokio::test]
async fn test_cancel_after_delete_reloads_from_server() {
    let mut server = mockito::Server::new_async().await;
    let notifier = Notifier::new();

    let initial = server
        .mock("GET", "/api/recommendations/plans/12/")
        .with_status(200)
        .with_body(standard_plan_body().to_string())
        .expect(1)
        .create_async()
        .await;
    let mut session =
        PlanSession::open(client_for(&server), notifier.clone(), PlanKind::Standard, "12")
            .await
            .expect("plan loads");
    initial.assert_async().await;
    initial.remove_async().await;

    server
        .mock("DELETE", "/api/recommendations/plans/12/exercises/101/delete/")
        .with_status(204)
        .create_async()
        .await;

    let mut after_delete = standard_plan_body();
    after_delete["plan"]["name"] = json!("Strength Basics v2");
    after_delete["plan"]["days"][0]["exercises"] =
        json!([standard_plan_body()["plan"]["days"][0]["exercises"][1].clone()]);
    let refetch = server
        .mock("GET", "/api/recommendations/plans/12/")
        .match_header("authorization", bearer().as_str())
        .with_status(200)
        .with_body(after_delete.to_string())
        .expect(1)
        .create_async()
        .await;

    assert!(session.begin_edit());
    session.remove_exercise(0, 0).await.unwrap();
    session.cancel().await.unwrap();
    refetch.assert_async().await;

    assert!(!session.editor().is_editing());
    let saved = session.editor().saved();
    assert_eq!(saved.details().name, "Strength Basics v2");
    let slots = &saved.days()[0].exercises;
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].entry_id.as_deref(), Some("102"));
}

#[tokio::test]
async fn test_cancel_discards_local_edits() {
    let mut server = mockito::Server::new_async().await;
    let notifier = Notifier::new();
    let mut session = open_standard(&mut server, &notifier).await;

    assert!(session.begin_edit());
    session
        .update_exercise_field(0, 0, ExerciseField::TargetSets, "5")
        .unwrap();
    session.cancel().await.unwrap();

    assert!(!session.editor().is_editing());
    assert_eq!(session.plan().days()[0].exercises[0].target_sets, "4");
}

#[tokio::test]
async fn test_replace_preserves_parameters_on_standard_plan() {
    let mut server = mockito::Server::new_async().await;
    let notifier = Notifier::new();
    let mut session = open_standard(&mut server, &notifier).await;

    server
        .mock("POST", "/api/recommendations/plans/12/exercises/101/replace/")
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    assert!(session.begin_edit());
    session
        .replace_exercise(0, 0, &catalog_exercise("31", "Front Squat", "Quads"))
        .await
        .unwrap();

    let slot = session.editor().exercise(0, 0).unwrap();
    assert_eq!(slot.exercise_id, "31");
    assert_eq!(slot.muscle_group.as_deref(), Some("Quads"));
    assert_eq!(slot.target_sets, "4");
    assert_eq!(slot.target_reps, "8");
    assert_eq!(slot.rest_seconds, 90);
}
