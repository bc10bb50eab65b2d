use super::*;

#[test]
fn test_short_message_no_split() {
    assert_eq!(split_message("hello world", 100), vec!["hello world"]);
}

#[test]
fn test_exact_limit_no_split() {
    let msg = "a".repeat(100);
    let result = split_message(&msg, 100);
    assert_eq!(result.len(), 1);
}

#[test]
fn test_lines_are_packed_and_never_broken() {
    let lines: Vec<String> = (0..10).map(|i| format!("12:00:0{i} alice searched")).collect();
    let msg = lines.join("\n");
    let result = split_message(&msg, 60);
    assert!(result.len() > 1);
    for chunk in &result {
        assert!(chunk.chars().count() <= 60);
        for line in chunk.lines() {
            assert!(lines.contains(&line.to_string()), "broken line: {line}");
        }
    }
    assert_eq!(result.join("\n"), msg);
}

#[test]
fn test_hard_cut_long_line() {
    let msg = "a".repeat(250);
    let result = split_message(&msg, 100);
    let lens: Vec<usize> = result.iter().map(String::len).collect();
    assert_eq!(lens, vec![100, 100, 50]);
}

#[test]
fn test_long_line_tail_joins_following_lines() {
    let msg = format!("{}\nshort", "b".repeat(15));
    let result = split_message(&msg, 10);
    assert_eq!(result, vec!["b".repeat(10), "bbbbb\nshort".to_string()]);
}

#[test]
fn test_counts_characters_not_bytes() {
    // 4-byte characters: 30 of them fit in a 30-char limit
    let msg = "\u{1F600}".repeat(30);
    assert_eq!(split_message(&msg, 30).len(), 1);
    let result = split_message(&msg, 7);
    assert!(result.iter().all(|c| c.chars().count() <= 7));
    assert_eq!(result.concat(), msg);
}

#[test]
fn test_empty_message() {
    assert_eq!(split_message("", 100), vec![""]);
}

#[test]
fn test_caption() {
    assert_eq!(caption("  ", 10), None);
    assert_eq!(caption(" sunset ", 10).as_deref(), Some("sunset"));
    assert_eq!(caption("abcdefghijkl", 4).as_deref(), Some("abcd"));
}
