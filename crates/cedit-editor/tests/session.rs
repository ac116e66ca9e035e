//! End-to-end editing: open a file, drive a session with edit events,
//! render it, save, and reload.

use std::fs;

use cedit_editor::buffer::{Limits, LineStore};
use cedit_editor::config::Config;
use cedit_editor::highlight::{comment_state_at, CommentState};
use cedit_editor::position::Position;
use cedit_editor::session::{EditEvent, Outcome, Session};
use cedit_editor::view::View;
use cedit_term::buffer::FrameBuffer;
use cedit_theme::Theme;

fn type_str(session: &mut Session, text: &str) {
    for ch in text.chars() {
        let event = if ch == '\n' { EditEvent::SplitLine } else { EditEvent::Insert(ch) };
        session.apply(event).unwrap();
    }
}

#[test]
fn write_a_c_file_from_scratch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.c");

    let (mut session, report) = Session::open(&path, &Config::default()).unwrap();
    assert!(report.is_clean());
    assert!(!path.exists());

    type_str(
        &mut session,
        "#include <stdio.h>\n/* entry\n   point */\nint main(void) {\n\treturn 0;\n}",
    );
    assert_eq!(session.cursor().position(), Position::new(5, 1));
    assert_eq!(comment_state_at(session.store(), 2), CommentState::InBlockComment);
    assert_eq!(comment_state_at(session.store(), 3), CommentState::Code);

    let outcome = session.apply(EditEvent::Save).unwrap();
    assert!(matches!(outcome, Outcome::Saved { lines: 6, .. }));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "#include <stdio.h>\n/* entry\n   point */\nint main(void) {\n\treturn 0;\n}\n"
    );

    let (reopened, _) = Session::open(&path, &Config::default()).unwrap();
    assert_eq!(
        reopened.store().lines().collect::<Vec<_>>(),
        session.store().lines().collect::<Vec<_>>()
    );
}

#[test]
fn edit_existing_file_and_render() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.c");
    fs::write(&path, "int a;\r\nint b;\r\n").unwrap();

    let (mut session, _) = Session::open(&path, &Config::default()).unwrap();
    session.apply(EditEvent::MoveDown).unwrap();
    session.apply(EditEvent::DeleteBefore).unwrap();
    assert_eq!(session.store().line(0), Some("int a;int b;"));
    assert_eq!(session.cursor().position(), Position::new(0, 6));

    session.apply(EditEvent::SplitLine).unwrap();
    assert_eq!(session.store().line_count(), 2);

    let mut view = View::new();
    let mut frame = FrameBuffer::new(40, 6);
    let cursor = view.render(&session, &Theme::terminal(), &mut frame);
    assert_eq!(cursor, Some((0, 1)));
    assert!(frame.row_text(0).starts_with("int a;"));
    assert!(frame.row_text(1).starts_with("int b;"));
    assert!(frame.row_text(4).contains("x.c [+]"));

    session.apply(EditEvent::Save).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "int a;\nint b;\n");
}

#[test]
fn limits_flow_from_config() {
    let config = Config {
        limits: Limits { max_lines: 2, max_cols: 4 },
        ..Config::default()
    };
    let mut session = Session::new(&config);
    type_str(&mut session, "abcd");
    assert!(session.apply(EditEvent::Insert('e')).unwrap_err().is_capacity());

    session.apply(EditEvent::SplitLine).unwrap();
    assert!(session.apply(EditEvent::SplitLine).unwrap_err().is_capacity());
    assert_eq!(session.store().lines().collect::<Vec<_>>(), vec!["abcd", ""]);
    assert_eq!(session.cursor().position(), Position::new(1, 0));
}

#[test]
fn oversized_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.txt");
    fs::write(&path, "123456\na\nb\nc\n").unwrap();

    let limits = Limits { max_lines: 3, max_cols: 4 };
    let (store, report) = LineStore::load(&path, limits).unwrap();
    assert_eq!(store.lines().collect::<Vec<_>>(), vec!["1234", "56", "a"]);
    assert_eq!(report.wrapped_lines, 1);
    assert_eq!(report.dropped_lines, 2);
}
