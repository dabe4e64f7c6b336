use classdeck::ui::core::{Navigator, Position};

#[test]
fn test_navigation_never_wraps() {
    let mut nav = Navigator::new(vec!["a", "b", "c"]);
    assert_eq!(nav.current(), Some(&"a"));
    assert!(!nav.has_previous());
    assert!(!nav.previous());

    assert!(nav.next());
    assert!(nav.next());
    assert_eq!(nav.current(), Some(&"c"));
    assert!(!nav.has_next());
    assert!(!nav.next());
    assert_eq!(nav.index(), 2);
}

#[test]
fn test_jump_ignores_out_of_range() {
    let mut nav = Navigator::new(vec![10, 20, 30]);
    assert!(nav.jump_to(2));
    assert!(!nav.jump_to(3));
    assert!(!nav.jump_to(2));
    assert_eq!(nav.current(), Some(&30));
}

#[test]
fn test_load_resets_cursor() {
    let mut nav = Navigator::new(vec![1, 2, 3]);
    nav.jump_to(2);

    nav.load(vec![4, 5]);
    assert_eq!(nav.index(), 0);
    assert_eq!(nav.counter(), "1 / 2");

    nav.clear();
    assert!(nav.is_empty());
    assert_eq!(nav.current(), None);
    assert_eq!(nav.counter(), "");
    assert!(!nav.has_next());
    assert!(!nav.has_previous());
}

#[test]
fn test_render_receives_position() {
    let mut nav = Navigator::new(vec!["x", "y"]);
    nav.next();

    let rendered = nav.render(|item, position| (item.to_string(), position));
    assert_eq!(
        rendered,
        Some(("y".to_string(), Position { index: 1, total: 2 }))
    );
    assert!(rendered.unwrap().1.is_last());

    let empty: Navigator<&str> = Navigator::default();
    assert!(empty.render(|_, _| ()).is_none());
}
