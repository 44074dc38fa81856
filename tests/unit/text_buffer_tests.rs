// TextBuffer 单元测试

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use znote::core::buffer::{BufferChange, Selection, TextBuffer};
use znote::EditorError;

#[test]
fn test_replace_length_property() {
    let cases = [
        ("Hello, world!", 0, 5, "Bye"),
        ("Hello, world!", 7, 7, "big "),
        ("Hello, world!", 0, 13, ""),
        ("", 0, 0, "fresh"),
    ];

    for (text, start, end, replacement) in cases {
        let mut buffer = TextBuffer::from_text(text);
        buffer.replace(start, end, replacement);

        assert_eq!(buffer.length(), text.len() - (end - start) + replacement.len());
        assert!(buffer.is_dirty());
    }
}

#[test]
fn test_search_forward_never_returns_before_from() {
    let buffer = TextBuffer::from_text("aXaXaXa");

    for from in 0..=buffer.length() {
        if let Some(offset) = buffer.search_forward(from, "Xa") {
            assert!(offset >= from);
            assert!(offset + 2 <= buffer.length());
        }
    }
    assert_eq!(buffer.search_forward(6, "Xa"), None);
}

#[test]
fn test_load_missing_keeps_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut buffer = TextBuffer::from_text("keep me");
    buffer.insert(7, "!");
    assert!(buffer.is_dirty());

    let err = buffer.load(dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, EditorError::Io { .. }));
    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));

    assert_eq!(buffer.text(), "keep me!");
    assert!(buffer.is_dirty());
}

#[test]
fn test_save_then_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    let content = "line one\r\nline two 世界\n\ttabbed";

    let mut original = TextBuffer::new();
    original.insert(0, content);
    original.save(&path).unwrap();
    assert!(!original.is_dirty());
    assert_eq!(original.path(), Some(path.as_path()));

    let mut fresh = TextBuffer::new();
    fresh.load(&path).unwrap();
    assert_eq!(fresh.text(), content);
    assert!(!fresh.is_dirty());
    assert_eq!(fs::read(&path).unwrap(), content.as_bytes());
}

#[test]
fn test_save_failure_keeps_dirty() {
    let dir = tempfile::tempdir().unwrap();
    let mut buffer = TextBuffer::from_text("x");
    buffer.insert(1, "y");

    // 目录不存在，无法创建文件
    let result = buffer.save(dir.path().join("no-such-dir").join("out.txt"));
    assert!(matches!(result, Err(EditorError::Io { .. })));
    assert!(buffer.is_dirty());
    assert_eq!(buffer.path(), None);
}

#[test]
fn test_insert_file_at_offset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snippet.txt");
    fs::write(&path, "MIDDLE").unwrap();

    let mut buffer = TextBuffer::from_text("start end");
    buffer.insert_file(&path, 6).unwrap();

    assert_eq!(buffer.text(), "start MIDDLEend");
    assert!(buffer.is_dirty());

    // 越界偏移截断到文档末尾
    buffer.insert_file(&path, 1000).unwrap();
    assert_eq!(buffer.text(), "start MIDDLEendMIDDLE");
}

#[test]
fn test_load_invalid_utf8_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.txt");
    fs::write(&path, [0xc3, 0x28]).unwrap();

    let mut buffer = TextBuffer::from_text("before");
    let err = buffer.load(&path).unwrap_err();
    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::InvalidData));
    assert_eq!(buffer.text(), "before");
}

#[test]
fn test_selection_follows_edits() {
    let mut buffer = TextBuffer::from_text("0123456789");
    buffer.select(6, 8);

    buffer.replace(0, 2, "abcd");
    assert_eq!(buffer.selection(), Selection::new(8, 10));
    assert_eq!(buffer.selected_text(), "67");

    // 选区尾部被删除，收缩到删除点
    buffer.replace(9, 12, "");
    assert_eq!(buffer.selection(), Selection::new(8, 9));
}

#[test]
fn test_clear_resets_everything() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "content").unwrap();

    let mut buffer = TextBuffer::new();
    buffer.load(&path).unwrap();
    buffer.insert(0, "x");
    buffer.clear();

    assert!(buffer.is_empty());
    assert!(!buffer.is_dirty());
    assert_eq!(buffer.path(), None);
    assert_eq!(buffer.selection(), Selection::default());
}

/// 订阅缓冲区并收集所有事件
fn record(buffer: &mut TextBuffer) -> Rc<RefCell<Vec<BufferChange>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    buffer.subscribe(move |change| sink.borrow_mut().push(*change));
    events
}

#[test]
fn test_listeners_see_file_operations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    let snippet = dir.path().join("snippet.txt");
    fs::write(&path, "hello world").unwrap();
    fs::write(&snippet, "big ").unwrap();

    let mut buffer = TextBuffer::new();
    let events = record(&mut buffer);

    buffer.load(&path).unwrap();
    buffer.insert_file(&snippet, 6).unwrap();
    buffer.select(0, 6);
    assert_eq!(buffer.remove_selection(), "hello ");
    buffer.save(&path).unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            BufferChange::Reloaded { length: 11 },
            BufferChange::Edited { offset: 6, deleted: 0, inserted: 4 },
            BufferChange::Edited { offset: 0, deleted: 6, inserted: 0 },
            BufferChange::Saved,
        ]
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), "big world");
}

#[test]
fn test_failed_operations_emit_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut buffer = TextBuffer::from_text("keep");
    let events = record(&mut buffer);

    assert!(buffer.load(dir.path().join("missing.txt")).is_err());
    assert!(buffer.insert_file(dir.path().join("missing.txt"), 0).is_err());
    assert!(buffer.save(dir.path().join("no-such-dir").join("out.txt")).is_err());
    // 空选区删除不是编辑
    assert_eq!(buffer.remove_selection(), "");

    assert!(events.borrow().is_empty());
    assert_eq!(buffer.text(), "keep");
}

#[test]
fn test_replace_all_reports_each_substitution() {
    let mut buffer = TextBuffer::from_text("a-a-a");
    let events = record(&mut buffer);

    let edits = buffer.replace_all("a", "xyz");
    assert_eq!(buffer.text(), "xyz-xyz-xyz");
    // 每次替换发生时的偏移，已计入前面替换造成的平移
    assert_eq!(edits, vec![0, 4, 8]);
    assert_eq!(
        *events.borrow(),
        edits
            .iter()
            .map(|&offset| BufferChange::Edited { offset, deleted: 1, inserted: 3 })
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_cursor_follows_edits() {
    let mut buffer = TextBuffer::from_text("a b target");
    buffer.set_cursor(3);

    // 光标之前的替换使光标平移，之后的不影响
    buffer.replace_all("a", "aaaa");
    assert_eq!(buffer.text(), "aaaa b taaaarget");
    assert_eq!(buffer.cursor(), 6);

    buffer.insert(0, "++");
    assert_eq!(buffer.cursor(), 8);

    // 光标所在区间被删除，移到删除点
    buffer.replace(4, 10, "");
    assert_eq!(buffer.cursor(), 4);

    buffer.set_cursor(999);
    assert_eq!(buffer.cursor(), buffer.length());
}
