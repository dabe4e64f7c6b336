use classdeck::constants::{CHAT_APOLOGY, CHAT_GREETING};
use classdeck::ui::components::chat_panel::Speaker;
use classdeck::ui::components::ChatPanel;
use classdeck::ui::core::{Action, Component};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(chat: &mut ChatPanel, text: &str) {
    for c in text.chars() {
        chat.handle_key_events(key(KeyCode::Char(c)));
    }
}

#[test]
fn test_starts_with_greeting() {
    let chat = ChatPanel::new();
    assert_eq!(chat.messages().len(), 1);
    assert_eq!(chat.messages()[0].speaker, Speaker::Assistant);
    assert_eq!(chat.messages()[0].text, CHAT_GREETING);
}

#[test]
fn test_unfocused_panel_ignores_keys() {
    let mut chat = ChatPanel::new();
    type_text(&mut chat, "hi");
    assert!(matches!(chat.handle_key_events(key(KeyCode::Enter)), Action::None));
    assert_eq!(chat.messages().len(), 1);
}

#[test]
fn test_send_and_reply() {
    let mut chat = ChatPanel::new();
    chat.focus();
    type_text(&mut chat, "What is a cell?");

    match chat.handle_key_events(key(KeyCode::Enter)) {
        Action::SendChat(message) => assert_eq!(message, "What is a cell?"),
        other => panic!("unexpected action: {:?}", other),
    }
    assert!(chat.is_waiting());

    // Nothing else goes out until the reply arrives
    type_text(&mut chat, "again");
    assert!(matches!(chat.handle_key_events(key(KeyCode::Enter)), Action::None));

    chat.update(Action::ChatReplied("The basic unit of life.".to_string()));
    assert!(!chat.is_waiting());
    let last = chat.messages().last().unwrap();
    assert_eq!(last.speaker, Speaker::Assistant);
    assert_eq!(last.text, "The basic unit of life.");
}

#[test]
fn test_failure_apologizes() {
    let mut chat = ChatPanel::new();
    chat.focus();
    type_text(&mut chat, "hello");
    chat.handle_key_events(key(KeyCode::Enter));

    chat.update(Action::ChatFailed);

    assert_eq!(chat.messages().last().unwrap().text, CHAT_APOLOGY);
    assert_eq!(chat.messages().len(), 3);
}

#[test]
fn test_blank_message_not_sent() {
    let mut chat = ChatPanel::new();
    chat.focus();
    type_text(&mut chat, "   ");

    assert!(matches!(chat.handle_key_events(key(KeyCode::Enter)), Action::None));
    assert!(!chat.is_waiting());
}

#[test]
fn test_escape_leaves_chat() {
    let mut chat = ChatPanel::new();
    chat.focus();
    chat.handle_key_events(key(KeyCode::Esc));
    assert!(!chat.is_focused());
}
