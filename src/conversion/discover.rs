use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ConversionConfig;
use crate::utils::get_file_extension;

pub const SOURCE_EXTENSION: &str = "png";
pub const OUTPUT_EXTENSION: &str = "jpg";

/// One PNG scheduled for conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub source: PathBuf,
    /// Position of the source below the input directory
    pub relative: PathBuf,
    pub output: PathBuf,
}

impl FileTask {
    pub fn new(source: PathBuf, relative: PathBuf, output_root: &Path) -> Self {
        let output = output_path_for(&relative, output_root);
        Self {
            source,
            relative,
            output,
        }
    }
}

/// A filesystem entry found while walking the input directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Png(FileTask),
    NotPng { path: PathBuf, relative: PathBuf },
    Unreadable {
        path: PathBuf,
        relative: PathBuf,
        error: String,
    },
}

impl Candidate {
    pub fn path(&self) -> &Path {
        match self {
            Candidate::Png(task) => &task.source,
            Candidate::NotPng { path, .. } | Candidate::Unreadable { path, .. } => path,
        }
    }
}

/// Mirror `relative` below `output_root` with a `.jpg` extension
pub fn output_path_for(relative: &Path, output_root: &Path) -> PathBuf {
    output_root.join(relative).with_extension(OUTPUT_EXTENSION)
}

/// Case-insensitive `.png` check
pub fn is_png(path: &Path) -> bool {
    get_file_extension(path).as_deref() == Some(SOURCE_EXTENSION)
}

/// List every candidate below the input directory, sorted by path
///
/// Only direct children are listed unless the config is recursive.
/// Directories are never candidates. When the output directory sits inside
/// the input directory its subtree is left out, so earlier results are not
/// picked up again.
pub fn discover_candidates(config: &ConversionConfig) -> Vec<Candidate> {
    let input_dir = &config.input_dir;
    let excluded = config.output_dir.canonicalize().ok();

    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let walker = WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !is_excluded(entry.path(), excluded.as_deref())
        });

    let mut candidates = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_dir() {
                    continue;
                }

                let relative = relative_to(path, input_dir);
                if is_png(path) {
                    candidates.push(Candidate::Png(FileTask::new(
                        path.to_path_buf(),
                        relative,
                        &config.output_dir,
                    )));
                } else {
                    candidates.push(Candidate::NotPng {
                        path: path.to_path_buf(),
                        relative,
                    });
                }
            }
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| input_dir.clone());
                let relative = relative_to(&path, input_dir);
                candidates.push(Candidate::Unreadable {
                    path,
                    relative,
                    error: err.to_string(),
                });
            }
        }
    }

    // Sort for consistent processing order
    candidates.sort_by(|a, b| a.path().cmp(b.path()));

    for (first, second) in output_collisions(&candidates) {
        warn!(
            "{} and {} both convert to {}; the later file overwrites the earlier one",
            first.source.display(),
            second.source.display(),
            second.output.display()
        );
    }

    debug!(
        "Found {} candidates in {}",
        candidates.len(),
        input_dir.display()
    );
    candidates
}

/// Pairs of tasks deriving the same output path, e.g. `a.png` and `a.PNG`
///
/// Each pair is (first claimant, later task) in processing order.
pub fn output_collisions(candidates: &[Candidate]) -> Vec<(&FileTask, &FileTask)> {
    let mut claimed: HashMap<&Path, &FileTask> = HashMap::new();
    let mut collisions = Vec::new();
    for candidate in candidates {
        if let Candidate::Png(task) = candidate {
            match claimed.get(task.output.as_path()) {
                Some(first) => collisions.push((*first, task)),
                None => {
                    claimed.insert(&task.output, task);
                }
            }
        }
    }
    collisions
}

fn is_excluded(path: &Path, excluded: Option<&Path>) -> bool {
    match excluded {
        Some(excluded) if path.is_dir() => path
            .canonicalize()
            .map(|canonical| canonical == excluded)
            .unwrap_or(false),
        _ => false,
    }
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.file_name().map(PathBuf::from).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn relatives(candidates: &[Candidate]) -> Vec<(String, bool)> {
        candidates
            .iter()
            .map(|c| match c {
                Candidate::Png(task) => (task.relative.display().to_string(), true),
                Candidate::NotPng { relative, .. } => (relative.display().to_string(), false),
                Candidate::Unreadable { relative, .. } => (relative.display().to_string(), false),
            })
            .collect()
    }

    #[test]
    fn test_is_png() {
        assert!(is_png(Path::new("a.png")));
        assert!(is_png(Path::new("dir/B.PNG")));
        assert!(is_png(Path::new("c.Png")));
        assert!(!is_png(Path::new("d.jpg")));
        assert!(!is_png(Path::new("png")));
        assert!(!is_png(Path::new("e.png.txt")));
    }

    #[test]
    fn test_output_path_for() {
        let out = Path::new("/out");
        assert_eq!(
            output_path_for(Path::new("a.png"), out),
            PathBuf::from("/out/a.jpg")
        );
        assert_eq!(
            output_path_for(Path::new("sub/X.PNG"), out),
            PathBuf::from("/out/sub/X.jpg")
        );
        assert_eq!(
            output_path_for(Path::new("my.photo.png"), out),
            PathBuf::from("/out/my.photo.jpg")
        );
    }

    #[test]
    fn test_discover_non_recursive() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        touch(&input.path().join("b.png"));
        touch(&input.path().join("a.txt"));
        touch(&input.path().join("sub/c.png"));

        let config = ConversionConfig::new(input.path(), output.path());
        let candidates = discover_candidates(&config);
        assert_eq!(
            relatives(&candidates),
            vec![("a.txt".to_string(), false), ("b.png".to_string(), true)]
        );
    }

    #[test]
    fn test_discover_recursive_is_sorted() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        touch(&input.path().join("z.png"));
        touch(&input.path().join("sub/b.png"));
        touch(&input.path().join("sub/a.png"));
        touch(&input.path().join("a.png"));

        let config = ConversionConfig::new(input.path(), output.path()).with_recursive(true);
        let candidates = discover_candidates(&config);
        let names: Vec<String> = relatives(&candidates).into_iter().map(|(r, _)| r).collect();
        let expected: Vec<String> = ["a.png", "sub/a.png", "sub/b.png", "z.png"]
            .iter()
            .map(|p| PathBuf::from(p).display().to_string())
            .collect();
        assert_eq!(names, expected);

        match &candidates[1] {
            Candidate::Png(task) => {
                assert_eq!(task.output, output.path().join("sub").join("a.jpg"));
            }
            other => panic!("expected png candidate, got {:?}", other),
        }
    }

    #[test]
    fn test_discover_skips_nested_output_dir() {
        let input = TempDir::new().unwrap();
        touch(&input.path().join("a.png"));
        touch(&input.path().join("converted/a.jpg"));

        let config =
            ConversionConfig::new(input.path(), input.path().join("converted")).with_recursive(true);
        let candidates = discover_candidates(&config);
        assert_eq!(relatives(&candidates), vec![("a.png".to_string(), true)]);
    }

    #[test]
    fn test_discover_output_same_as_input() {
        let input = TempDir::new().unwrap();
        touch(&input.path().join("a.png"));

        let config = ConversionConfig::new(input.path(), input.path());
        let candidates = discover_candidates(&config);
        assert_eq!(relatives(&candidates), vec![("a.png".to_string(), true)]);
    }

    #[test]
    fn test_output_collisions() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        touch(&input.path().join("a.png"));
        touch(&input.path().join("b.png"));

        let config = ConversionConfig::new(input.path(), output.path());
        let mut candidates = discover_candidates(&config);
        assert!(output_collisions(&candidates).is_empty());

        // Case-sensitive filesystems can hold both spellings side by side
        candidates.push(Candidate::Png(FileTask::new(
            input.path().join("a.PNG"),
            PathBuf::from("a.PNG"),
            output.path(),
        )));
        let collisions = output_collisions(&candidates);
        assert_eq!(collisions.len(), 1);
        let (first, second) = collisions[0];
        assert_eq!(first.relative, PathBuf::from("a.png"));
        assert_eq!(second.relative, PathBuf::from("a.PNG"));
        assert_eq!(first.output, second.output);
    }
}
