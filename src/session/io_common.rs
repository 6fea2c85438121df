use std::path::{Path, PathBuf};

/// Keeps the non-blank picks, trimmed.
pub fn collect_picks<'a, I: Iterator<Item = &'a str>>(cells: I) -> Vec<String> {
    cells
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Resolves the path of a ballot file relative to the directory of the session file.
pub fn resolve_path(root: &Path, file_path: &str) -> String {
    let p: PathBuf = [root, Path::new(file_path)].iter().collect();
    p.as_path().display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_skip_blanks() {
        let cells = vec!["ana", "", "  ", " bo "];
        assert_eq!(
            collect_picks(cells.into_iter()),
            vec!["ana".to_string(), "bo".to_string()]
        );
    }

    #[test]
    fn relative_paths() {
        assert_eq!(resolve_path(Path::new("/a/b"), "c.csv"), "/a/b/c.csv");
        assert_eq!(resolve_path(Path::new("/a/b"), "/d/c.csv"), "/d/c.csv");
    }
}
