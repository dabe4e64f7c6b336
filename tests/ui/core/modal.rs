use std::time::{Duration, Instant};

use classdeck::ui::core::{
    DeleteTarget, DismissReason, ModalBinding, ModalCommand, ModalContext, ModalController, ModalKind, ModalTrigger,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn bindings() -> Vec<ModalBinding> {
    vec![
        ModalBinding::key(KeyCode::Enter, ModalTrigger::Submit),
        ModalBinding::command(KeyCode::Char('j'), ModalCommand::Down),
        ModalBinding::ctrl('q', ModalTrigger::Dismiss(DismissReason::CancelButton)),
    ]
}

#[test]
fn test_setup_runs_once_across_reopens() {
    let mut modals = ModalController::new();
    let mut setups = 0;

    for _ in 0..3 {
        modals.open(ModalKind::CreateClass, ModalContext::None, || {
            setups += 1;
            bindings()
        });
        modals.close(ModalKind::CreateClass);
    }

    assert_eq!(setups, 1);
    assert_eq!(modals.setup_count(ModalKind::CreateClass), 1);
    assert!(modals.bindings_attached(ModalKind::CreateClass));
}

#[test]
fn test_one_key_one_trigger_after_reopens() {
    let mut modals = ModalController::new();
    for _ in 0..3 {
        modals.open(ModalKind::CreateClass, ModalContext::None, bindings);
    }

    assert_eq!(modals.dispatch_key(&key(KeyCode::Enter)), vec![ModalTrigger::Submit]);
    assert_eq!(modals.open_modals(), &[ModalKind::CreateClass]);
}

#[test]
fn test_open_reports_creation_reset() {
    let mut modals = ModalController::new();

    let opened = modals.open(ModalKind::CreateClass, ModalContext::None, bindings);
    assert!(opened.attached_bindings);
    assert!(opened.reset_form);

    let opened = modals.open(ModalKind::CreateClass, ModalContext::None, bindings);
    assert!(!opened.attached_bindings);

    let opened = modals.open(ModalKind::ManageUsers, ModalContext::None, Vec::new);
    assert!(!opened.reset_form);
}

#[test]
fn test_context_replaced_on_every_open() {
    let mut modals = ModalController::new();
    let first = ModalContext::Class {
        id: 1,
        name: "Biology".to_string(),
    };
    let second = ModalContext::Class {
        id: 2,
        name: "Chemistry".to_string(),
    };

    modals.open(ModalKind::ConfigureClass, first, Vec::new);
    modals.close(ModalKind::ConfigureClass);
    modals.open(ModalKind::ConfigureClass, second.clone(), Vec::new);

    assert_eq!(modals.context(ModalKind::ConfigureClass), &second);
    assert_eq!(modals.context(ModalKind::ClassDocuments), &ModalContext::None);
}

#[test]
fn test_escape_dismisses_and_only_top_receives_keys() {
    let mut modals = ModalController::new();
    modals.open(ModalKind::ManageUsers, ModalContext::None, bindings);
    modals.open(ModalKind::ConfirmDelete, ModalContext::None, Vec::new);

    // The confirm modal has no 'j' binding, so the users list below does not move
    assert!(modals.dispatch_key(&key(KeyCode::Char('j'))).is_empty());
    assert_eq!(
        modals.dispatch_key(&key(KeyCode::Esc)),
        vec![ModalTrigger::Dismiss(DismissReason::Escape)]
    );

    assert_eq!(modals.close_top(), Some(ModalKind::ConfirmDelete));
    assert_eq!(modals.top(), Some(ModalKind::ManageUsers));
}

#[test]
fn test_ctrl_binding_needs_modifier() {
    let mut modals = ModalController::new();
    modals.open(ModalKind::CreateClass, ModalContext::None, bindings);

    assert!(modals.dispatch_key(&key(KeyCode::Char('q'))).is_empty());
    assert_eq!(
        modals.dispatch_key(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)),
        vec![ModalTrigger::Dismiss(DismissReason::CancelButton)]
    );
}

#[test]
fn test_backdrop_and_close_button_clicks() {
    let mut modals = ModalController::new();
    modals.open(ModalKind::CreateClass, ModalContext::None, bindings);

    // No area recorded yet, clicks are ignored
    assert_eq!(modals.dispatch_click(0, 0), None);

    let area = Rect::new(10, 5, 40, 10);
    modals.set_area(ModalKind::CreateClass, area);

    assert_eq!(
        modals.dispatch_click(2, 2),
        Some(ModalTrigger::Dismiss(DismissReason::Backdrop))
    );
    assert_eq!(modals.dispatch_click(20, 8), None);
    // "[x]" sits at the right end of the top border
    assert_eq!(
        modals.dispatch_click(area.right() - 4, area.y),
        Some(ModalTrigger::Dismiss(DismissReason::CloseButton))
    );
}

#[test]
fn test_scheduled_close() {
    let mut modals = ModalController::new();
    let now = Instant::now();
    modals.open(ModalKind::CreateClass, ModalContext::None, bindings);
    modals.schedule_close(ModalKind::CreateClass, now + Duration::from_millis(1500));

    assert!(modals.tick(now + Duration::from_millis(1000)).is_empty());
    assert_eq!(modals.tick(now + Duration::from_millis(1500)), vec![ModalKind::CreateClass]);
    assert!(!modals.is_open(ModalKind::CreateClass));

    // Reopening clears any stale schedule
    modals.open(ModalKind::CreateClass, ModalContext::None, bindings);
    assert!(modals.tick(now + Duration::from_secs(10)).is_empty());
}

#[test]
fn test_close_all() {
    let mut modals = ModalController::new();
    modals.open(ModalKind::ManageFlashcards, ModalContext::None, Vec::new);
    modals.open(ModalKind::FlashcardForm, ModalContext::Flashcard { id: 3 }, Vec::new);

    modals.close_all();
    assert!(!modals.any_open());
    assert!(!modals.close(ModalKind::FlashcardForm));
}

#[test]
fn test_delete_prompts() {
    let target = DeleteTarget::User {
        id: 2,
        username: "alice".to_string(),
    };
    assert_eq!(
        target.prompt(),
        "Are you sure you want to delete user \"alice\"? This action cannot be undone."
    );
}
