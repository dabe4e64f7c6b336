use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use classdeck::api::SessionEvent;
use classdeck::constants::ERROR_SESSION_EXPIRED;
use classdeck::service::{Mutation, RefreshTarget};
use classdeck::ui::core::{Action, AppContext, BannerKind, DialogType, EventType, Screen};
use classdeck::ui::AppComponent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::common::{flashcard, FakeBackend};

fn app(backend: Arc<FakeBackend>, downloads: &Path) -> (AppComponent, UnboundedSender<SessionEvent>) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let ctx = AppContext {
        downloads_dir: downloads.to_path_buf(),
        ..AppContext::default()
    };
    (AppComponent::new(backend, events_rx, ctx), events_tx)
}

async fn press(app: &mut AppComponent, code: KeyCode) {
    app.handle_event(EventType::Key(KeyEvent::new(code, KeyModifiers::NONE)))
        .await
        .unwrap();
}

async fn type_text(app: &mut AppComponent, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c)).await;
    }
}

/// Let background work finish and feed its results back through the app.
async fn settle(app: &mut AppComponent) {
    loop {
        while app.is_busy() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let actions = app.process_background_actions();
        if actions.is_empty() && !app.is_busy() {
            break;
        }
        for action in actions {
            app.dispatch(action).await;
        }
    }
}

async fn logged_in(username: &str) -> (AppComponent, UnboundedSender<SessionEvent>, Arc<FakeBackend>, tempfile::TempDir) {
    let backend = Arc::new(FakeBackend::seeded());
    let dir = tempfile::tempdir().unwrap();
    let (mut app, events) = app(backend.clone(), dir.path());

    type_text(&mut app, username).await;
    press(&mut app, KeyCode::Tab).await;
    type_text(&mut app, "password").await;
    press(&mut app, KeyCode::Enter).await;
    settle(&mut app).await;

    (app, events, backend, dir)
}

#[tokio::test]
async fn test_admin_login_loads_dashboard() {
    let (app, _events, backend, _dir) = logged_in("admin").await;

    assert_eq!(app.screen(), Screen::Admin);
    assert_eq!(app.user().map(|u| u.username.as_str()), Some("admin"));
    assert_eq!(app.admin().overview().classes.len(), 2);
    assert_eq!(app.admin().overview().student_count, 2);
    assert_eq!(backend.call_count("login"), 1);
}

#[tokio::test]
async fn test_student_login_loads_enrolled_classes() {
    let (app, _events, _backend, _dir) = logged_in("alice").await;

    assert_eq!(app.screen(), Screen::Student);
    let names: Vec<&str> = app.student().classes().iter().map(|c| c.class.name.as_str()).collect();
    assert_eq!(names, vec!["Biology"]);
}

#[tokio::test]
async fn test_rejected_login_stays_on_login() {
    let (app, _events, _backend, _dir) = logged_in("mallory").await;

    assert_eq!(app.screen(), Screen::Login);
    assert!(app.login().error().is_some());
    assert!(!app.login().is_pending());
}

#[tokio::test]
async fn test_login_screen_keeps_global_keys_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _events) = app(Arc::new(FakeBackend::seeded()), dir.path());

    type_text(&mut app, "q?GL").await;

    assert!(!app.should_quit());
    assert!(!app.dialog().is_visible());
    assert_eq!(app.login().form().value("username"), "q?GL");
}

#[tokio::test]
async fn test_ctrl_c_always_quits() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _events) = app(Arc::new(FakeBackend::seeded()), dir.path());

    app.handle_event(EventType::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)))
        .await
        .unwrap();

    assert!(app.should_quit());
}

#[tokio::test]
async fn test_global_keys_on_dashboard() {
    let (mut app, _events, _backend, _dir) = logged_in("admin").await;

    press(&mut app, KeyCode::Char('?')).await;
    assert_eq!(app.dialog().dialog_type, Some(DialogType::Help));
    press(&mut app, KeyCode::Esc).await;
    assert!(!app.dialog().is_visible());

    // With a form open, 'q' is text
    press(&mut app, KeyCode::Char('c')).await;
    press(&mut app, KeyCode::Char('q')).await;
    assert!(!app.should_quit());
    press(&mut app, KeyCode::Esc).await;

    press(&mut app, KeyCode::Char('q')).await;
    assert!(app.should_quit());
}

#[tokio::test]
async fn test_logout_key_returns_to_login() {
    let (mut app, _events, backend, _dir) = logged_in("admin").await;

    press(&mut app, KeyCode::Char('L')).await;
    settle(&mut app).await;

    assert_eq!(app.screen(), Screen::Login);
    assert!(app.user().is_none());
    assert_eq!(backend.call_count("logout"), 1);
}

#[tokio::test]
async fn test_expired_session_returns_to_login() {
    let (mut app, events, _backend, _dir) = logged_in("admin").await;
    press(&mut app, KeyCode::Char('u')).await;
    settle(&mut app).await;

    events.send(SessionEvent::Expired).unwrap();
    settle(&mut app).await;

    assert_eq!(app.screen(), Screen::Login);
    assert_eq!(app.login().error(), Some(ERROR_SESSION_EXPIRED));
    assert!(!app.admin().modals.any_open());
}

#[tokio::test]
async fn test_deleted_student_disappears_after_refresh() {
    let (mut app, _events, backend, _dir) = logged_in("admin").await;
    press(&mut app, KeyCode::Char('u')).await;
    settle(&mut app).await;
    assert_eq!(app.admin().dialogs.manage_users.users().len(), 2);

    app.dispatch(Action::Mutate {
        mutation: Mutation::DeleteUser {
            user_id: 3,
            username: "bob".to_string(),
        },
        refresh: vec![RefreshTarget::Users, RefreshTarget::AdminOverview],
    })
    .await;
    settle(&mut app).await;

    assert_eq!(backend.call_count("delete_user"), 1);
    assert_eq!(app.admin().dialogs.manage_users.users().len(), 1);
    assert_eq!(app.admin().overview().student_count, 1);
}

#[tokio::test]
async fn test_export_writes_csv_into_downloads() {
    let (mut app, _events, _backend, dir) = logged_in("admin").await;

    app.dispatch(Action::ExportFlashcards {
        class_name: Some("Biology".to_string()),
        flashcards: vec![flashcard(20, "Cell", Some("Bio"))],
    })
    .await;

    let written: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("Biology_flashcards_"));
    assert!(written[0].ends_with(".csv"));

    let content = std::fs::read_to_string(dir.path().join(&written[0])).unwrap();
    assert!(content.starts_with("Term,Definition,Category\n"));
    assert_eq!(app.admin().banner().current().map(|b| b.kind), Some(BannerKind::Success));
}

#[tokio::test]
async fn test_empty_export_is_an_error() {
    let (mut app, _events, _backend, dir) = logged_in("admin").await;

    app.dispatch(Action::ExportFlashcards {
        class_name: None,
        flashcards: Vec::new(),
    })
    .await;

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(app.admin().banner().current().map(|b| b.kind), Some(BannerKind::Error));
}

#[tokio::test]
async fn test_stored_session_is_verified() {
    let backend = Arc::new(FakeBackend::seeded());
    backend.with(|s| {
        s.stored_token = true;
        s.current_user = s.users.iter().find(|u| u.username == "alice").cloned();
    });
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _events) = app(backend, dir.path());

    app.verify_stored_session();
    settle(&mut app).await;

    assert_eq!(app.screen(), Screen::Student);
}
