use std::sync::Arc;
use std::time::Duration;

use classdeck::api::ApiError;
use classdeck::service::{Mutation, MutationKind, RefreshTarget, Refreshed};
use classdeck::ui::core::{Action, TaskManager};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::common::FakeBackend;

async fn settle(tasks: &TaskManager) {
    while tasks.is_busy() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

fn drain(rx: &mut UnboundedReceiver<Action>) -> Vec<Action> {
    let mut actions = Vec::new();
    while let Ok(action) = rx.try_recv() {
        actions.push(action);
    }
    actions
}

#[tokio::test]
async fn test_mutation_refreshes_before_reporting() {
    let backend = Arc::new(FakeBackend::seeded());
    let (mut tasks, mut rx) = TaskManager::new(backend.clone());

    tasks.spawn_mutation(
        Mutation::DeleteUser {
            user_id: 3,
            username: "bob".to_string(),
        },
        vec![RefreshTarget::Users, RefreshTarget::AdminOverview],
    );
    settle(&tasks).await;

    let actions = drain(&mut rx);
    assert_eq!(actions.len(), 3);

    match &actions[0] {
        Action::Loaded(Refreshed::Users(rows)) => {
            assert!(rows.iter().all(|r| r.user.username != "bob"));
        }
        other => panic!("unexpected action: {:?}", other),
    }
    match &actions[1] {
        // Counted from a fresh fetch, not adjusted locally
        Action::Loaded(Refreshed::AdminOverview(overview)) => assert_eq!(overview.student_count, 1),
        other => panic!("unexpected action: {:?}", other),
    }
    assert!(matches!(
        &actions[2],
        Action::MutationApplied {
            kind: MutationKind::DeleteUser,
            ..
        }
    ));
    assert_eq!(backend.call_count("delete_user"), 1);
}

#[tokio::test]
async fn test_failed_mutation_skips_refresh() {
    let backend = Arc::new(FakeBackend::seeded());
    backend.fail(
        "delete_user",
        ApiError::Request {
            status: 500,
            detail: "boom".to_string(),
        },
    );
    let (mut tasks, mut rx) = TaskManager::new(backend.clone());

    tasks.spawn_mutation(
        Mutation::DeleteUser {
            user_id: 3,
            username: "bob".to_string(),
        },
        vec![RefreshTarget::Users],
    );
    settle(&tasks).await;

    let actions = drain(&mut rx);
    assert_eq!(actions.len(), 1);
    assert!(matches!(
        &actions[0],
        Action::MutationFailed {
            kind: MutationKind::DeleteUser,
            ..
        }
    ));
    assert_eq!(backend.call_count("list_users"), 0);
}

#[tokio::test]
async fn test_session_expiry_is_silent() {
    let backend = Arc::new(FakeBackend::seeded());
    backend.fail("delete_user", ApiError::SessionExpired);
    backend.fail("list_classes", ApiError::SessionExpired);
    let (mut tasks, mut rx) = TaskManager::new(backend);

    tasks.spawn_mutation(
        Mutation::DeleteUser {
            user_id: 3,
            username: "bob".to_string(),
        },
        vec![RefreshTarget::Users],
    );
    tasks.spawn_load(vec![RefreshTarget::Classes]);
    settle(&tasks).await;

    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_load_failure_is_reported_per_target() {
    let backend = Arc::new(FakeBackend::seeded());
    backend.fail("flashcard_categories", ApiError::Network("down".to_string()));
    let (mut tasks, mut rx) = TaskManager::new(backend);

    tasks.spawn_load(vec![RefreshTarget::Categories, RefreshTarget::Classes]);
    settle(&tasks).await;

    let actions = drain(&mut rx);
    assert_eq!(actions.len(), 2);
    assert!(matches!(
        &actions[0],
        Action::LoadFailed {
            target: RefreshTarget::Categories,
            ..
        }
    ));
    match &actions[1] {
        Action::Loaded(Refreshed::Classes(classes)) => assert_eq!(classes.len(), 2),
        other => panic!("unexpected action: {:?}", other),
    }
}

#[tokio::test]
async fn test_login_resolves_user() {
    let backend = Arc::new(FakeBackend::seeded());
    let (mut tasks, mut rx) = TaskManager::new(backend);

    tasks.spawn_login("alice".to_string(), "pw".to_string());
    tasks.spawn_login("mallory".to_string(), "pw".to_string());
    settle(&tasks).await;

    let actions = drain(&mut rx);
    assert!(actions
        .iter()
        .any(|a| matches!(a, Action::LoginSucceeded(user) if user.username == "alice")));
    assert!(actions.iter().any(|a| matches!(a, Action::LoginFailed(_))));
}

#[tokio::test]
async fn test_chat_reply() {
    let backend = Arc::new(FakeBackend::seeded());
    let (mut tasks, mut rx) = TaskManager::new(backend);

    tasks.spawn_chat("hello".to_string());
    settle(&tasks).await;

    match rx.recv().await {
        Some(Action::ChatReplied(text)) => assert_eq!(text, "echo: hello"),
        other => panic!("unexpected action: {:?}", other),
    }
}

#[tokio::test]
async fn test_finished_tasks_are_cleaned_up() {
    let backend = Arc::new(FakeBackend::seeded());
    let (mut tasks, _rx) = TaskManager::new(backend);

    let id = tasks.spawn_load(vec![RefreshTarget::Classes]);
    settle(&tasks).await;

    assert_eq!(tasks.task_count(), 1);
    assert_eq!(tasks.cleanup_finished_tasks(), vec![id]);
    assert_eq!(tasks.task_count(), 0);
}
