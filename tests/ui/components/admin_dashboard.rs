use std::time::{Duration, Instant};

use classdeck::api::ApiError;
use classdeck::constants::{ERROR_CLASS_EXISTS, INFO_RESOURCE_UPLOAD, VALIDATION_CLASS_NAME_SHORT};
use classdeck::service::{AdminOverview, Mutation, MutationKind, RefreshTarget, Refreshed, UserRow};
use classdeck::ui::components::admin_dashboard::owning_modal;
use classdeck::ui::components::dialogs::user_dialogs::UsersFocus;
use classdeck::ui::components::dialogs::ModalDialog;
use classdeck::ui::components::AdminDashboard;
use classdeck::ui::core::{Action, AppContext, BannerKind, Component, DeleteTarget, ModalContext, ModalKind};
use classdeck::validation::ValidationError;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, Terminal};

use crate::common::{class, slide, user};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn press(dashboard: &mut AdminDashboard, code: KeyCode) -> Action {
    dashboard.handle_key_events(key(code))
}

fn type_text(dashboard: &mut AdminDashboard, text: &str) {
    for c in text.chars() {
        press(dashboard, KeyCode::Char(c));
    }
}

fn dashboard() -> AdminDashboard {
    let mut dashboard = AdminDashboard::new(&AppContext::default());
    dashboard.enter(user(1, "admin", true));
    dashboard.update(Action::Loaded(Refreshed::AdminOverview(AdminOverview {
        classes: vec![class(10, "Biology"), class(11, "Chemistry")],
        student_count: 2,
        ..AdminOverview::default()
    })));
    dashboard
}

fn render(dashboard: &mut AdminDashboard) {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| dashboard.render(f, f.area())).unwrap();
}

#[test]
fn test_enter_requests_overview() {
    let mut dashboard = AdminDashboard::new(&AppContext::default());
    let action = dashboard.enter(user(1, "admin", true));

    assert!(matches!(action, Action::Load(targets) if targets == vec![RefreshTarget::AdminOverview]));
    assert!(dashboard.overview().classes.is_empty());
}

#[test]
fn test_class_selection_opens_configure() {
    let mut dashboard = dashboard();

    press(&mut dashboard, KeyCode::Char('j'));
    press(&mut dashboard, KeyCode::Down);
    assert_eq!(dashboard.selected(), 1, "Selection should stop at the last class");

    press(&mut dashboard, KeyCode::Enter);
    assert_eq!(dashboard.modals.top(), Some(ModalKind::ConfigureClass));
    assert_eq!(
        dashboard.modals.context(ModalKind::ConfigureClass),
        &ModalContext::Class {
            id: 11,
            name: "Chemistry".to_string()
        }
    );
}

#[test]
fn test_choosing_flashcards_replaces_configure_modal() {
    let mut dashboard = dashboard();
    press(&mut dashboard, KeyCode::Enter);

    let action = press(&mut dashboard, KeyCode::Char('f'));

    assert!(!dashboard.modals.is_open(ModalKind::ConfigureClass));
    assert_eq!(dashboard.modals.open_modals(), &[ModalKind::ClassFlashcards]);
    match action {
        Action::Load(targets) => assert_eq!(
            targets,
            vec![
                RefreshTarget::ClassFlashcardAssignments { class_id: 10 },
                RefreshTarget::Categories
            ]
        ),
        other => panic!("unexpected action: {:?}", other),
    }
}

#[test]
fn test_document_list_opens_viewer_at_selection() {
    let mut dashboard = dashboard();
    press(&mut dashboard, KeyCode::Enter);
    press(&mut dashboard, KeyCode::Char('c'));
    assert_eq!(dashboard.modals.open_modals(), &[ModalKind::ClassDocuments]);
    dashboard.update(Action::Loaded(Refreshed::ClassSlides {
        class_id: 10,
        slides: vec![slide(30, "Intro", 10), slide(31, "Cells", 10), slide(32, "Genes", 10)],
    }));

    press(&mut dashboard, KeyCode::Char('j'));
    let action = press(&mut dashboard, KeyCode::Char('v'));

    assert!(matches!(action, Action::None));
    assert_eq!(
        dashboard.modals.open_modals(),
        &[ModalKind::ClassDocuments, ModalKind::DocumentViewer]
    );
    let viewer = dashboard.dialogs.document_viewer.navigator();
    assert_eq!(viewer.index(), 1);
    assert_eq!(viewer.counter(), "2 / 3");
    assert!(viewer.has_previous());
    assert!(viewer.has_next());

    press(&mut dashboard, KeyCode::Right);
    let viewer = dashboard.dialogs.document_viewer.navigator();
    assert_eq!(viewer.current().map(|s| s.title.as_str()), Some("Genes"));
    assert!(!viewer.has_next());

    // Downloading happens from inside the viewer
    match press(&mut dashboard, KeyCode::Char('o')) {
        Action::OpenDocument(opened) => assert_eq!(opened.id, 32),
        other => panic!("unexpected action: {:?}", other),
    }

    press(&mut dashboard, KeyCode::Esc);
    assert_eq!(dashboard.modals.top(), Some(ModalKind::ClassDocuments));
}

#[test]
fn test_short_class_name_sends_nothing() {
    let mut dashboard = dashboard();
    press(&mut dashboard, KeyCode::Char('c'));
    type_text(&mut dashboard, "A");

    let action = press(&mut dashboard, KeyCode::Enter);

    assert!(matches!(action, Action::None));
    assert!(dashboard.modals.is_open(ModalKind::CreateClass));
    assert_eq!(
        dashboard.dialogs.create_class.form().error("name"),
        Some(VALIDATION_CLASS_NAME_SHORT)
    );
}

#[test]
fn test_create_class_submits_with_overview_refresh() {
    let mut dashboard = dashboard();
    press(&mut dashboard, KeyCode::Char('c'));
    // 'c' and 'u' go to the text field while the form is focused
    type_text(&mut dashboard, "  Calculus ");

    match press(&mut dashboard, KeyCode::Enter) {
        Action::Mutate {
            mutation: Mutation::CreateClass(new),
            refresh,
        } => {
            assert_eq!(new.name, "Calculus");
            assert_eq!(new.description, None);
            assert_eq!(refresh, vec![RefreshTarget::AdminOverview]);
        }
        other => panic!("unexpected action: {:?}", other),
    }
}

#[test]
fn test_create_form_starts_blank_on_reopen() {
    let mut dashboard = dashboard();
    press(&mut dashboard, KeyCode::Char('c'));
    type_text(&mut dashboard, "Draft");
    press(&mut dashboard, KeyCode::Esc);
    assert!(!dashboard.modals.any_open());

    press(&mut dashboard, KeyCode::Char('c'));
    assert_eq!(dashboard.dialogs.create_class.form().value("name"), "");
    assert_eq!(dashboard.modals.setup_count(ModalKind::CreateClass), 1);
}

#[test]
fn test_delete_student_confirmation() {
    let mut dashboard = dashboard();

    let action = press(&mut dashboard, KeyCode::Char('u'));
    assert!(
        matches!(action, Action::Load(targets) if targets == vec![RefreshTarget::Users, RefreshTarget::Classes])
    );

    dashboard.update(Action::Loaded(Refreshed::Users(vec![
        UserRow {
            user: user(2, "alice", false),
            classes: Some(Vec::new()),
        },
        UserRow {
            user: user(3, "bob", false),
            classes: None,
        },
    ])));

    for _ in 0..4 {
        press(&mut dashboard, KeyCode::Tab);
    }
    assert_eq!(dashboard.dialogs.manage_users.focus(), UsersFocus::List);

    press(&mut dashboard, KeyCode::Char('d'));
    assert_eq!(dashboard.modals.top(), Some(ModalKind::ConfirmDelete));
    assert_eq!(
        dashboard.dialogs.confirm_delete.target(),
        Some(&DeleteTarget::User {
            id: 2,
            username: "alice".to_string()
        })
    );

    match press(&mut dashboard, KeyCode::Enter) {
        Action::Mutate { mutation, refresh } => {
            assert_eq!(
                mutation,
                Mutation::DeleteUser {
                    user_id: 2,
                    username: "alice".to_string()
                }
            );
            assert_eq!(refresh, vec![RefreshTarget::Users, RefreshTarget::AdminOverview]);
        }
        other => panic!("unexpected action: {:?}", other),
    }
    assert_eq!(dashboard.modals.top(), Some(ModalKind::ManageUsers));
}

#[test]
fn test_cancelled_delete_sends_nothing() {
    let mut dashboard = dashboard();
    dashboard.open(
        ModalKind::ConfirmDelete,
        ModalContext::Delete(DeleteTarget::Flashcard {
            id: 20,
            term: "Cell".to_string(),
        }),
    );

    let action = press(&mut dashboard, KeyCode::Char('n'));

    assert!(matches!(action, Action::None));
    assert!(!dashboard.modals.is_open(ModalKind::ConfirmDelete));
}

#[test]
fn test_success_banner_then_auto_close() {
    let mut dashboard = dashboard();
    press(&mut dashboard, KeyCode::Char('c'));

    dashboard.update(Action::MutationApplied {
        kind: MutationKind::CreateClass,
        message: "Class created successfully!".to_string(),
    });

    let banner = dashboard.dialogs.create_class.banner_mut().current().cloned().unwrap();
    assert_eq!(banner.kind, BannerKind::Success);
    assert_eq!(banner.message, "Class created successfully!");

    dashboard.tick(Instant::now());
    assert!(dashboard.modals.is_open(ModalKind::CreateClass));

    dashboard.tick(Instant::now() + Duration::from_secs(2));
    assert!(!dashboard.modals.is_open(ModalKind::CreateClass));
}

#[test]
fn test_duplicate_name_shows_on_field() {
    let mut dashboard = dashboard();
    press(&mut dashboard, KeyCode::Char('c'));

    dashboard.update(Action::MutationFailed {
        kind: MutationKind::CreateClass,
        error: ApiError::Validation(ValidationError::new("name", ERROR_CLASS_EXISTS)),
    });

    assert_eq!(dashboard.dialogs.create_class.form().error("name"), Some(ERROR_CLASS_EXISTS));
    assert!(dashboard.dialogs.create_class.banner_mut().current().is_none());
}

#[test]
fn test_failure_with_owner_closed_goes_to_dashboard() {
    let mut dashboard = dashboard();

    dashboard.update(Action::MutationFailed {
        kind: MutationKind::DeleteFlashcard,
        error: ApiError::Request {
            status: 500,
            detail: "boom".to_string(),
        },
    });

    let banner = dashboard.banner().current().unwrap();
    assert_eq!(banner.kind, BannerKind::Error);
    assert!(banner.message.contains("boom"));
}

#[test]
fn test_overview_load_failure_banner() {
    let mut dashboard = dashboard();

    dashboard.update(Action::LoadFailed {
        target: RefreshTarget::AdminOverview,
        error: "offline".to_string(),
    });

    assert_eq!(
        dashboard.banner().current().map(|b| b.message.as_str()),
        Some("Failed to load dashboard data: offline")
    );
}

#[test]
fn test_refresh_targets_per_mutation() {
    let dashboard = dashboard();

    assert_eq!(
        dashboard.refresh_for(&Mutation::SaveFlashcardAssignments {
            class_id: 10,
            class_name: "Biology".to_string(),
            add: vec![21],
            remove: Vec::new(),
            assigned_total: 3,
        }),
        vec![
            RefreshTarget::ClassFlashcardAssignments { class_id: 10 },
            RefreshTarget::AdminOverview
        ]
    );
    assert_eq!(
        dashboard.refresh_for(&Mutation::SetUserAssignments {
            user_id: 2,
            username: "alice".to_string(),
            add: Vec::new(),
            remove: vec![10],
        }),
        vec![RefreshTarget::UserAssignments { user_id: 2 }, RefreshTarget::Users]
    );
    assert!(dashboard
        .refresh_for(&Mutation::DeleteFlashcard { id: 20 })
        .ends_with(&[RefreshTarget::AdminOverview]));
}

#[test]
fn test_owning_modals() {
    assert_eq!(owning_modal(MutationKind::DeleteUser), ModalKind::ManageUsers);
    assert_eq!(owning_modal(MutationKind::UploadSlides), ModalKind::ClassDocuments);
    assert_eq!(owning_modal(MutationKind::UpdateFlashcard), ModalKind::FlashcardForm);
}

#[test]
fn test_backdrop_click_dismisses() {
    let mut dashboard = dashboard();
    press(&mut dashboard, KeyCode::Char('c'));
    render(&mut dashboard);
    assert!(dashboard.modals.area(ModalKind::CreateClass).is_some());

    dashboard.handle_mouse_events(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    });

    assert!(!dashboard.modals.any_open());
}

#[test]
fn test_input_capture() {
    let mut dashboard = dashboard();
    assert!(!dashboard.captures_input());

    press(&mut dashboard, KeyCode::Tab);
    assert!(dashboard.chat.is_focused());
    assert!(dashboard.captures_input());

    press(&mut dashboard, KeyCode::Esc);
    assert!(!dashboard.captures_input());

    press(&mut dashboard, KeyCode::Char('r'));
    assert_eq!(
        dashboard.banner().current().map(|b| b.message.as_str()),
        Some(INFO_RESOURCE_UPLOAD)
    );
}

#[test]
fn test_renders_without_data() {
    let mut dashboard = AdminDashboard::new(&AppContext::default());
    dashboard.enter(user(1, "admin", true));
    render(&mut dashboard);

    // Tiny terminals must not panic
    let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
    terminal.draw(|f| dashboard.render(f, f.area())).unwrap();
}
