use classdeck::ui::core::AssignmentDraft;

#[test]
fn test_draft_diffs_against_baseline() {
    let mut draft = AssignmentDraft::new([1, 2, 3]);
    assert!(!draft.is_dirty());

    assert!(!draft.toggle(2));
    assert!(draft.toggle(5));

    assert!(draft.is_dirty());
    assert_eq!(draft.to_add(), vec![5]);
    assert_eq!(draft.to_remove(), vec![2]);
    assert_eq!(draft.assigned_count(), 3);
}

#[test]
fn test_toggling_back_is_clean() {
    let mut draft = AssignmentDraft::new([1]);
    draft.toggle(1);
    draft.toggle(1);

    assert!(!draft.is_dirty());
    assert!(draft.to_add().is_empty());
    assert!(draft.to_remove().is_empty());
}

#[test]
fn test_reset_drops_local_edits() {
    let mut draft = AssignmentDraft::new([1]);
    draft.toggle(4);

    draft.reset([4, 7]);
    assert!(!draft.is_dirty());
    assert!(draft.is_assigned(7));
    assert!(!draft.is_assigned(1));
}
