//! Pool discovery: enumerates candidate sources when no pools are configured.
//!
//! - Lines: one source per matching file directly under the root.
//! - Media: one source per immediate subfolder holding at least one matching file.
//!
//! Results are sorted by name and capped at [`MAX_POOLS_PER_KIND`].

use std::fs;

use camino::Utf8Path;

use crate::models::config::MAX_POOLS_PER_KIND;
use crate::models::{PoolKind, PoolSource};
use crate::services::patterns::{PatternFilter, has_allowed_extension};

/// Discover pool sources under `root_dir`.
///
/// `root_label` is the root as configured; it is kept on each source for URL
/// mapping. A missing or unreadable root yields no sources.
pub fn discover_sources(
    root_dir: &Utf8Path,
    root_label: &str,
    kind: PoolKind,
    extensions: &[String],
    filter: &PatternFilter,
) -> Vec<PoolSource> {
    let names = match sorted_entries(root_dir) {
        Ok(names) => names,
        Err(e) => {
            tracing::debug!("Discovery skipped, {} root {} not readable: {}", kind, root_dir, e);
            return Vec::new();
        }
    };

    let mut sources = Vec::new();
    for name in names {
        if sources.len() >= MAX_POOLS_PER_KIND {
            break;
        }

        let path = root_dir.join(&name);
        let keep = match kind {
            PoolKind::Lines => {
                path.is_file() && has_allowed_extension(&name, extensions) && filter.matches(&name)
            }
            PoolKind::Media => path.is_dir() && folder_has_media(&path, extensions, filter),
        };
        if keep {
            sources.push(PoolSource {
                kind,
                path,
                root: root_label.to_string(),
                name,
                filter: filter.clone(),
                extensions: extensions.to_vec(),
            });
        }
    }

    tracing::debug!(
        "Discovered {} {} pools in {}",
        sources.len(),
        kind,
        root_dir
    );
    sources
}

fn sorted_entries(dir: &Utf8Path) -> std::io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    Ok(names)
}

fn folder_has_media(dir: &Utf8Path, extensions: &[String], filter: &PatternFilter) -> bool {
    match sorted_entries(dir) {
        Ok(names) => names
            .iter()
            .any(|name| has_allowed_extension(name, extensions) && filter.matches(name)),
        Err(e) => {
            tracing::debug!("Cannot list media folder {}: {}", dir, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        (temp_dir, root)
    }

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|e| e.to_string()).collect()
    }

    fn names(sources: &[PoolSource]) -> Vec<&str> {
        sources.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_discover_lines_files() {
        let (_temp_dir, root) = temp_root();
        for name in ["jokes.txt", "hello.TXT", "readme.md", "draft.txt"] {
            fs::write(root.join(name), "x").unwrap();
        }
        fs::create_dir(root.join("folder.txt")).unwrap();

        let filter = PatternFilter::new(&[], &["draft*".to_string()]).unwrap();
        let sources = discover_sources(&root, "lines", PoolKind::Lines, &exts(&[".txt"]), &filter);

        assert_eq!(names(&sources), vec!["hello.TXT", "jokes.txt"]);
        assert!(sources.iter().all(|s| s.kind == PoolKind::Lines && s.root == "lines"));
        assert_eq!(sources[1].path, root.join("jokes.txt"));
    }

    #[test]
    fn test_discover_media_folders_with_media_only() {
        let (_temp_dir, root) = temp_root();
        fs::create_dir(root.join("alerts")).unwrap();
        fs::write(root.join("alerts/siren.mp3"), "x").unwrap();
        fs::create_dir(root.join("empty")).unwrap();
        fs::create_dir(root.join("docs")).unwrap();
        fs::write(root.join("docs/readme.txt"), "x").unwrap();
        fs::write(root.join("loose.mp3"), "x").unwrap();

        let sources = discover_sources(
            &root,
            "www/sounds",
            PoolKind::Media,
            &exts(&[".mp3"]),
            &PatternFilter::default(),
        );

        assert_eq!(names(&sources), vec!["alerts"]);
        assert_eq!(sources[0].root, "www/sounds");
    }

    #[test]
    fn test_discover_media_respects_include() {
        let (_temp_dir, root) = temp_root();
        fs::create_dir(root.join("bells")).unwrap();
        fs::write(root.join("bells/ding.mp3"), "x").unwrap();
        fs::create_dir(root.join("doors")).unwrap();
        fs::write(root.join("doors/door_open.mp3"), "x").unwrap();

        let filter = PatternFilter::new(&["door_*".to_string()], &[]).unwrap();
        let sources = discover_sources(&root, "media", PoolKind::Media, &exts(&[".mp3"]), &filter);
        assert_eq!(names(&sources), vec!["doors"]);
    }

    #[test]
    fn test_discover_caps_sources() {
        let (_temp_dir, root) = temp_root();
        for i in 0..(MAX_POOLS_PER_KIND + 5) {
            fs::write(root.join(format!("pool_{:03}.txt", i)), "x").unwrap();
        }

        let sources = discover_sources(
            &root,
            "lines",
            PoolKind::Lines,
            &exts(&[".txt"]),
            &PatternFilter::default(),
        );
        assert_eq!(sources.len(), MAX_POOLS_PER_KIND);
        assert_eq!(sources[0].name, "pool_000.txt");
        assert_eq!(sources[MAX_POOLS_PER_KIND - 1].name, "pool_254.txt");
    }

    #[test]
    fn test_discover_missing_root() {
        let (_temp_dir, root) = temp_root();
        let sources = discover_sources(
            &root.join("nope"),
            "nope",
            PoolKind::Media,
            &exts(&[".mp3"]),
            &PatternFilter::default(),
        );
        assert!(sources.is_empty());
    }
}
