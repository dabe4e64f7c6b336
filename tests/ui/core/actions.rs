use classdeck::ui::core::actions::Screen;

use crate::common::user;

#[test]
fn test_screen_for_user() {
    assert_eq!(Screen::default(), Screen::Login);
    assert_eq!(Screen::for_user(&user(1, "admin", true)), Screen::Admin);
    assert_eq!(Screen::for_user(&user(2, "alice", false)), Screen::Student);
}
