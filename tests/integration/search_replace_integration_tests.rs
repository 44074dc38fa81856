// 查找与替换集成测试

use std::time::{Duration, Instant};

use znote::core::buffer::TextBuffer;
use znote::{EditorError, FindResult, SearchController};

fn collect_matches(
    buffer: &mut TextBuffer,
    search: &mut SearchController,
    term: &str,
) -> Vec<usize> {
    let mut found = Vec::new();
    loop {
        let cursor = search.cursor();
        match search.find_next(buffer, term, cursor).unwrap() {
            FindResult::Found { offset } => found.push(offset),
            FindResult::NotFound => break,
        }
    }
    found
}

#[test]
fn test_find_next_visits_each_occurrence_once() {
    let text = "fn main() {\n    println!(\"Hello\");\n    println!(\"World\");\n}";
    let mut buffer = TextBuffer::from_text(text);
    let mut search = SearchController::new();

    let found = collect_matches(&mut buffer, &mut search, "println!");
    assert_eq!(found, vec![16, 39]);

    // 之后一直返回 NotFound，直到光标被外部重置
    for _ in 0..3 {
        assert_eq!(search.find_again(&mut buffer).unwrap(), FindResult::NotFound);
    }

    search.set_cursor(0);
    assert_eq!(search.find_again(&mut buffer).unwrap(), FindResult::Found { offset: 16 });
}

#[test]
fn test_find_non_overlapping() {
    let mut buffer = TextBuffer::from_text("aaaa");
    let mut search = SearchController::new();

    assert_eq!(collect_matches(&mut buffer, &mut search, "aa"), vec![0, 2]);
}

#[test]
fn test_find_after_edits_spanning_pieces() {
    let mut buffer = TextBuffer::from_text("Line 1\nLine 2\nLine 3");
    buffer.insert(13, " inserted");
    buffer.insert(6, "ab");
    let mut search = SearchController::new();

    // "Line 1ab\nLine 2 inserted\nLine 3"
    assert_eq!(
        search.find_next(&mut buffer, "2 ins", 0).unwrap(),
        FindResult::Found { offset: 14 }
    );
    assert_eq!(buffer.selected_text(), "2 ins");
    assert_eq!(
        search.find_next(&mut buffer, "1ab\nL", 0).unwrap(),
        FindResult::Found { offset: 5 }
    );
}

#[test]
fn test_replace_all_counts_and_rewrites() {
    let mut buffer = TextBuffer::from_text("the cat sat on the cat mat");
    let mut search = SearchController::new();

    let result = search.replace_all(&mut buffer, "cat", "dog").unwrap();
    assert_eq!(result.count, 2);
    assert_eq!(buffer.text(), "the dog sat on the dog mat");
    assert!(buffer.is_dirty());
}

#[test]
fn test_replace_all_growing_replacement_terminates() {
    let mut buffer = TextBuffer::from_text("a-a-a");
    let mut search = SearchController::new();

    let result = search.replace_all(&mut buffer, "a", "aa").unwrap();
    assert_eq!(result.count, 3);
    assert_eq!(buffer.text(), "aa-aa-aa");
}

#[test]
fn test_replace_all_missing_term_is_byte_identical() {
    let text = "Hello 世界\r\n";
    let mut buffer = TextBuffer::from_text(text);
    let mut search = SearchController::new();

    let result = search.replace_all(&mut buffer, "absent", "x").unwrap();
    assert!(result.is_empty());
    assert_eq!(buffer.text().as_bytes(), text.as_bytes());
}

#[test]
fn test_replace_all_multibyte() {
    let mut buffer = TextBuffer::from_text("世界，世界");
    let mut search = SearchController::new();

    let result = search.replace_all(&mut buffer, "世界", "world").unwrap();
    assert_eq!(result.count, 2);
    assert_eq!(buffer.text(), "world，world");
}

#[test]
fn test_empty_terms_mutate_nothing() {
    let mut buffer = TextBuffer::from_text("abc");
    buffer.select(1, 2);
    let mut search = SearchController::new();
    search.set_cursor(2);

    assert!(matches!(search.find_next(&mut buffer, "", 2), Err(EditorError::EmptyQuery)));
    assert!(matches!(search.replace_all(&mut buffer, "", "z"), Err(EditorError::EmptyQuery)));

    assert_eq!(buffer.text(), "abc");
    assert_eq!(buffer.selected_text(), "b");
    assert!(!buffer.is_dirty());
    assert_eq!(search.cursor(), 2);
}

#[test]
fn test_replace_all_large_document_is_linear() {
    let line = "foo bar\n";
    let lines = 40_000;
    let mut buffer = TextBuffer::from_text(&line.repeat(lines));
    let mut search = SearchController::new();

    let start = Instant::now();
    let result = search.replace_all(&mut buffer, "foo", "bazz").unwrap();
    let elapsed = start.elapsed();

    assert_eq!(result.count, lines);
    assert_eq!(buffer.length(), (line.len() + 1) * lines);
    assert_eq!(buffer.text_range(0..18), "bazz bar\nbazz bar\n");
    assert!(elapsed < Duration::from_secs(3), "全部替换耗时 {elapsed:?}");

    // 替换后继续做大量小编辑，Piece合并不能退化为每次全表扫描
    let start = Instant::now();
    for i in 0..500 {
        buffer.insert(i * 10, "#");
    }
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(buffer.length(), (line.len() + 1) * lines + 500);
}
