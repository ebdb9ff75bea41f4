use std::fs;
use std::path::{Path, PathBuf};

/// Only the artifact store may write or rename files; everything else goes
/// through `ArtifactBundle::save`.
const ALLOWED_WRITERS: &[&str] = &["src/persistence/artifacts.rs"];

const WRITE_CALLS: &[&str] = &["fs::write(", "fs::rename(", "File::create("];

fn collect_rust_files(root: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rust_files(&path, out);
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) == Some("rs") {
            out.push(path);
        }
    }
}

#[test]
fn file_writes_are_limited_to_the_artifact_store() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut files = Vec::new();
    collect_rust_files(&repo_root.join("src"), &mut files);
    assert!(!files.is_empty(), "no sources found under src/");

    let mut offenders = Vec::new();
    for file in files {
        let rel = file
            .strip_prefix(repo_root)
            .unwrap()
            .to_string_lossy()
            .replace('\\', "/");
        if ALLOWED_WRITERS.contains(&rel.as_str()) {
            continue;
        }
        let content = fs::read_to_string(&file).unwrap();
        // Unit tests may stage fixtures.
        let production = content.split("#[cfg(test)]").next().unwrap_or("");
        for (line_no, line) in production.lines().enumerate() {
            if WRITE_CALLS.iter().any(|call| line.contains(call)) {
                offenders.push(format!("{rel}:{}: {}", line_no + 1, line.trim()));
            }
        }
    }

    assert!(
        offenders.is_empty(),
        "unexpected file writes outside the artifact store:\n{}",
        offenders.join("\n")
    );
}
