//! `go.mod` discovery and import-path resolution.

use std::path::{Path, PathBuf};

/// A Go module: the directory holding `go.mod` and its declared path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    pub root: PathBuf,
    pub path: String,
}

/// Walk `start` and its parents for a `go.mod` with a `module` line.
pub fn find_module(start: &Path) -> Option<GoModule> {
    let mut current = start;

    loop {
        let manifest = current.join("go.mod");
        if manifest.is_file() {
            let text = std::fs::read_to_string(&manifest).ok()?;
            let path = parse_module_path(&text)?;
            return Some(GoModule {
                root: current.to_path_buf(),
                path,
            });
        }

        current = current.parent()?;
    }
}

/// The `module` directive of a `go.mod` file.
pub fn parse_module_path(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or_default().trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.trim().trim_matches('"');
        (!path.is_empty()).then(|| path.to_string())
    })
}

impl GoModule {
    /// Import path of the package in `dir`, if `dir` is inside the module.
    pub fn import_path(&self, dir: &Path) -> Option<String> {
        let rel = dir.strip_prefix(&self.root).ok()?;
        let mut path = self.path.clone();
        for part in rel.components() {
            path.push('/');
            path.push_str(&part.as_os_str().to_string_lossy());
        }
        Some(path)
    }

    /// Directory of the package with `import_path`, if it belongs to this module.
    pub fn package_dir(&self, import_path: &str) -> Option<PathBuf> {
        if import_path == self.path {
            return Some(self.root.clone());
        }
        let rest = import_path.strip_prefix(&self.path)?.strip_prefix('/')?;
        Some(rest.split('/').fold(self.root.clone(), |dir, part| dir.join(part)))
    }
}
