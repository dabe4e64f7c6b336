use std::path::PathBuf;

use classdeck::constants::VALIDATION_TERM_REQUIRED;
use classdeck::service::{Mutation, RefreshTarget};
use classdeck::ui::components::dialogs::slide_dialogs::{parse_upload_paths, DocumentsFocus};
use classdeck::ui::components::dialogs::{
    open_dialog, route_key, ClassDocumentsDialog, ClassFlashcardsDialog, ConfirmDeleteDialog, FlashcardFormDialog,
    ModalDialog,
};
use classdeck::ui::core::{Action, DeleteTarget, ModalContext, ModalController, ModalKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::common::{flashcard, slide};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn press(modals: &mut ModalController, dialog: &mut dyn ModalDialog, code: KeyCode) -> Vec<Action> {
    route_key(modals, dialog, key(code))
}

fn type_text(modals: &mut ModalController, dialog: &mut dyn ModalDialog, text: &str) {
    for c in text.chars() {
        press(modals, dialog, KeyCode::Char(c));
    }
}

fn biology() -> ModalContext {
    ModalContext::Class {
        id: 10,
        name: "Biology".to_string(),
    }
}

fn class_flashcards(modals: &mut ModalController) -> ClassFlashcardsDialog {
    let mut dialog = ClassFlashcardsDialog::new();
    open_dialog(modals, &mut dialog, biology());
    dialog.set_categories(vec!["Bio".to_string(), "Chem".to_string()]);
    dialog.apply_assignments(
        10,
        vec![
            flashcard(20, "Cell", Some("Bio")),
            flashcard(21, "Atom", Some("Chem")),
            flashcard(22, "Gene", Some("Bio")),
        ],
        vec![20, 22],
    );
    dialog
}

#[test]
fn test_class_flashcards_loads_on_open() {
    let mut modals = ModalController::new();
    let mut dialog = ClassFlashcardsDialog::new();

    let action = open_dialog(&mut modals, &mut dialog, biology());

    assert!(matches!(
        action,
        Action::Load(targets) if targets == vec![
            RefreshTarget::ClassFlashcardAssignments { class_id: 10 },
            RefreshTarget::Categories
        ]
    ));
    assert_eq!(dialog.class_id(), Some(10));
}

#[test]
fn test_class_flashcards_summary_follows_toggles() {
    let mut modals = ModalController::new();
    let mut dialog = class_flashcards(&mut modals);
    assert_eq!(dialog.summary(), "2 flashcards assigned to this class");

    // Unassign "Cell"
    press(&mut modals, &mut dialog, KeyCode::Char(' '));
    assert_eq!(dialog.summary(), "1 flashcard assigned to this class");

    // Assign "Atom"
    press(&mut modals, &mut dialog, KeyCode::Char('j'));
    press(&mut modals, &mut dialog, KeyCode::Char(' '));

    match press(&mut modals, &mut dialog, KeyCode::Char('s')).pop() {
        Some(Action::Mutate { mutation, .. }) => assert_eq!(
            mutation,
            Mutation::SaveFlashcardAssignments {
                class_id: 10,
                class_name: "Biology".to_string(),
                add: vec![21],
                remove: vec![20],
                assigned_total: 2,
            }
        ),
        other => panic!("unexpected action: {:?}", other),
    }
}

#[test]
fn test_class_flashcards_filter_keeps_draft() {
    let mut modals = ModalController::new();
    let mut dialog = class_flashcards(&mut modals);

    press(&mut modals, &mut dialog, KeyCode::Char('f'));
    assert_eq!(dialog.filter(), Some("Bio"));
    let terms: Vec<&str> = dialog.visible().iter().map(|c| c.term.as_str()).collect();
    assert_eq!(terms, vec!["Cell", "Gene"]);

    press(&mut modals, &mut dialog, KeyCode::Char('f'));
    assert_eq!(dialog.filter(), Some("Chem"));
    press(&mut modals, &mut dialog, KeyCode::Char(' '));

    press(&mut modals, &mut dialog, KeyCode::Char('f'));
    assert_eq!(dialog.filter(), None);
    assert!(dialog.draft().is_assigned(21), "Toggles survive filter changes");
    assert_eq!(dialog.draft().assigned_count(), 3);
}

#[test]
fn test_class_flashcards_ignores_other_class_data() {
    let mut modals = ModalController::new();
    let mut dialog = class_flashcards(&mut modals);

    dialog.apply_assignments(11, vec![flashcard(21, "Atom", Some("Chem"))], vec![21]);

    assert_eq!(dialog.visible().len(), 3);
    assert_eq!(dialog.draft().assigned_count(), 2);
}

#[test]
fn test_confirm_delete_maps_targets() {
    let mut modals = ModalController::new();
    let mut dialog = ConfirmDeleteDialog::new();
    open_dialog(
        &mut modals,
        &mut dialog,
        ModalContext::Delete(DeleteTarget::Slide {
            id: 30,
            title: "Intro".to_string(),
            class_id: 10,
        }),
    );

    match press(&mut modals, &mut dialog, KeyCode::Char('y')).pop() {
        Some(Action::Mutate { mutation, .. }) => assert_eq!(
            mutation,
            Mutation::DeleteSlide {
                slide_id: 30,
                title: "Intro".to_string()
            }
        ),
        other => panic!("unexpected action: {:?}", other),
    }
}

#[test]
fn test_flashcard_form_validates_and_edits() {
    let mut modals = ModalController::new();
    let mut dialog = FlashcardFormDialog::new();
    open_dialog(&mut modals, &mut dialog, ModalContext::None);

    assert!(matches!(press(&mut modals, &mut dialog, KeyCode::Enter).pop(), Some(Action::None)));
    assert_eq!(dialog.form().error("term"), Some(VALIDATION_TERM_REQUIRED));

    dialog.prefill(&flashcard(20, "Cell", Some("Bio")));
    match press(&mut modals, &mut dialog, KeyCode::Enter).pop() {
        Some(Action::Mutate {
            mutation: Mutation::UpdateFlashcard { id, draft },
            ..
        }) => {
            assert_eq!(id, 20);
            assert_eq!(draft.term, "Cell");
            assert_eq!(draft.category.as_deref(), Some("Bio"));
        }
        other => panic!("unexpected action: {:?}", other),
    }

    // Reopening for a new card starts blank
    modals.close(ModalKind::FlashcardForm);
    open_dialog(&mut modals, &mut dialog, ModalContext::None);
    assert_eq!(dialog.editing(), None);
    assert_eq!(dialog.form().value("term"), "");
}

#[test]
fn test_documents_upload_rejects_non_pdf() {
    let mut modals = ModalController::new();
    let mut dialog = ClassDocumentsDialog::new();
    open_dialog(&mut modals, &mut dialog, biology());
    dialog.apply_slides(10, vec![slide(30, "Intro", 10)]);

    press(&mut modals, &mut dialog, KeyCode::Tab);
    assert_eq!(dialog.focus(), DocumentsFocus::Upload);
    type_text(&mut modals, &mut dialog, "notes.docx");

    assert!(matches!(press(&mut modals, &mut dialog, KeyCode::Enter).pop(), Some(Action::None)));
}

#[test]
fn test_documents_upload_submits_every_path() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.pdf");
    let second = dir.path().join("b.pdf");
    std::fs::write(&first, b"%PDF-1.4").unwrap();
    std::fs::write(&second, b"%PDF-1.4").unwrap();

    let mut modals = ModalController::new();
    let mut dialog = ClassDocumentsDialog::new();
    open_dialog(&mut modals, &mut dialog, biology());
    press(&mut modals, &mut dialog, KeyCode::Tab);
    type_text(
        &mut modals,
        &mut dialog,
        &format!("{}; {}", first.display(), second.display()),
    );

    match press(&mut modals, &mut dialog, KeyCode::Enter).pop() {
        Some(Action::Mutate {
            mutation: Mutation::UploadSlides { class_id, paths },
            ..
        }) => {
            assert_eq!(class_id, 10);
            assert_eq!(paths, vec![first, second]);
        }
        other => panic!("unexpected action: {:?}", other),
    }

    // A second submit while uploading is ignored
    assert!(matches!(press(&mut modals, &mut dialog, KeyCode::Enter).pop(), Some(Action::None)));
}

#[test]
fn test_parse_upload_paths() {
    assert_eq!(
        parse_upload_paths(" a.pdf ;b.pdf;; "),
        vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]
    );
    assert!(parse_upload_paths("  ").is_empty());
}
