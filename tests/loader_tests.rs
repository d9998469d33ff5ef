//! Loader behaviour against real files.
//!
//! Verifies:
//! - Loading the same unchanged file twice yields identical collections
//! - Normalization is a fixed point: re-normalizing its output changes nothing
//! - The async loader matches the synchronous one

use camino::Utf8PathBuf;
use pools::models::{Limits, OverlongPolicy, PoolKind, PoolSource};
use pools::services::loader::{FsLoader, load_off_thread, load_source, normalize_lines};
use pools::services::PatternFilter;
use proptest::prelude::*;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn lines_source(path: Utf8PathBuf) -> PoolSource {
    PoolSource {
        kind: PoolKind::Lines,
        name: path.file_name().unwrap_or_default().to_string(),
        root: "lines".to_string(),
        path,
        filter: PatternFilter::default(),
        extensions: vec![".txt".to_string()],
    }
}

fn limits(max_lines: usize, max_chars: usize, overlong: OverlongPolicy) -> Limits {
    Limits {
        max_lines,
        max_chars,
        overlong,
    }
}

fn policy() -> impl Strategy<Value = OverlongPolicy> {
    prop_oneof![Just(OverlongPolicy::Truncate), Just(OverlongPolicy::Reject)]
}

proptest! {
    #[test]
    fn loading_twice_is_identical(
        text in "[a-zA-Zé \u{301}\t\r\n\u{feff}]{0,400}",
        max_lines in 1usize..50,
        max_chars in 1usize..40,
        overlong in policy(),
    ) {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().join("pool.txt")).unwrap();
        fs::write(&path, &text).unwrap();

        let source = lines_source(path);
        let limits = limits(max_lines, max_chars, overlong);
        let first = load_source(&source, &limits).unwrap();
        let second = load_source(&source, &limits).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn normalization_is_a_fixed_point(
        text in "[a-z \u{301}\r\n]{0,300}",
        max_chars in 1usize..30,
    ) {
        let limits = limits(10_000, max_chars, OverlongPolicy::Truncate);
        let (lines, _) = normalize_lines(&text, &limits);
        prop_assert!(lines.len() <= limits.max_lines);
        prop_assert!(lines.iter().all(|line| !line.is_empty()));
        prop_assert!(lines.iter().all(|line| line.chars().count() <= max_chars));
        prop_assert!(lines.iter().all(|line| line.trim() == line.as_str()));

        let (again, report) = normalize_lines(&lines.join("\n"), &limits);
        prop_assert_eq!(report.ignored_blank, 0);
        prop_assert_eq!(report.truncated, 0);
        prop_assert_eq!(again, lines);
    }
}

#[tokio::test]
async fn test_off_thread_load_matches_sync() {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp_dir.path().join("hello.txt")).unwrap();
    fs::write(&path, "Hi\nHello\nHey\n").unwrap();

    let source = lines_source(path);
    let sync = load_source(&source, &Limits::default()).unwrap();
    let off_thread = load_off_thread(Arc::new(FsLoader), source, Limits::default())
        .await
        .unwrap();
    assert_eq!(sync, off_thread);
    assert_eq!(off_thread.len(), 3);
}
