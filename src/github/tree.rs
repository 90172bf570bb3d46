//! Repository tree listing
//!
//! Formats a flat list of paths into the newline-delimited indented listing
//! interpolated into the task prompt: alphabetical (case-insensitive),
//! directories suffixed `/`, depth shown by repeated `--` markers.

use std::collections::HashSet;

/// One entry of a recursive tree listing
#[derive(Debug, Clone)]
pub struct TreeEntry {
    /// Full path relative to the repository root
    pub path: String,
    pub is_dir: bool,
}

impl TreeEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }
}

/// Render entries as an indented listing, parent directories emitted once
pub fn format_tree(entries: &[TreeEntry]) -> String {
    let mut sorted: Vec<&TreeEntry> = entries.iter().collect();
    sorted.sort_by_key(|entry| entry.path.to_lowercase());

    let mut structure = String::new();
    let mut added_dirs: HashSet<String> = HashSet::new();

    for entry in sorted {
        let parts: Vec<&str> = entry.path.split('/').collect();
        let mut current = String::new();

        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                current.push('/');
            }
            current.push_str(part);

            let leaf = i == parts.len() - 1;
            if leaf && !entry.is_dir {
                structure.push_str(&format!("{}- {}\n", "--".repeat(i), part));
            } else if !added_dirs.contains(&current) {
                structure.push_str(&format!("{}- {}/\n", "--".repeat(i), part));
                added_dirs.insert(current.clone());
            }
        }
    }

    structure.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_a_repo_listing() {
        let entries = vec![
            TreeEntry::file("README.md"),
            TreeEntry::file(".gitignore"),
            TreeEntry::dir("app"),
            TreeEntry::file("app/favicon.ico"),
            TreeEntry::file("app/globals.css"),
            TreeEntry::file("app/layout.tsx"),
            TreeEntry::file("app/page.tsx"),
            TreeEntry::file(".eslintrc.json"),
            TreeEntry::file("bun.lockb"),
            TreeEntry::file("next.config.mjs"),
            TreeEntry::file("package.json"),
            TreeEntry::file("postcss.config.mjs"),
            TreeEntry::file("tailwind.config.ts"),
            TreeEntry::file("tsconfig.json"),
        ];

        let expected = "\
- .eslintrc.json
- .gitignore
- app/
--- favicon.ico
--- globals.css
--- layout.tsx
--- page.tsx
- bun.lockb
- next.config.mjs
- package.json
- postcss.config.mjs
- README.md
- tailwind.config.ts
- tsconfig.json";

        assert_eq!(format_tree(&entries), expected);
    }

    #[test]
    fn test_emits_missing_parent_directories_once() {
        // recursive listings sometimes omit intermediate tree entries
        let entries = vec![
            TreeEntry::file("src/bin/main.rs"),
            TreeEntry::file("src/lib.rs"),
        ];

        let expected = "\
- src/
--- bin/
----- main.rs
--- lib.rs";

        assert_eq!(format_tree(&entries), expected);
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(format_tree(&[]), "");
    }
}
