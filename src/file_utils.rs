use anyhow::{Context, Result, anyhow};
use log::warn;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @generates: Output path for a translated caption file
    // @params: source_file, output_dir, locale
    // @returns: {output_dir}/{basename}.{locale}{ext}
    pub fn output_path_for<P1: AsRef<Path>, P2: AsRef<Path>>(
        source_file: P1,
        output_dir: P2,
        locale: &str,
    ) -> PathBuf {
        let source_file = source_file.as_ref();

        let stem = source_file.file_stem().unwrap_or_default();
        let extension = source_file
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(locale);
        output_filename.push_str(&extension);

        output_dir.as_ref().join(output_filename)
    }

    /// Find files matching a glob pattern (`*`, `?`, `**`, `[...]`, `{a,b}`)
    ///
    /// The walk starts at the longest directory prefix free of glob syntax.
    /// Results are sorted.
    pub fn find_matching(pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = normalize_separators(pattern);
        let matcher = glob_to_regex(&pattern)?;
        let root = literal_root(&pattern);

        let mut result = Vec::new();
        if !root.exists() {
            return Ok(result);
        }

        let mut walker = WalkDir::new(&root).follow_links(true);
        if let Some(depth) = walk_depth(&pattern) {
            walker = walker.max_depth(depth);
        }

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let candidate = normalize_separators(&path.to_string_lossy());
            if matcher.is_match(&candidate) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub async fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating the parent directory if needed
    pub async fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}

// Forward slashes, no leading "./"
fn normalize_separators(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut trimmed = path.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.to_string()
}

fn is_glob_segment(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{'])
}

// Leading segments without glob syntax; the last segment always names files
fn literal_segment_count(segments: &[&str]) -> usize {
    segments
        .iter()
        .take(segments.len().saturating_sub(1))
        .take_while(|segment| !is_glob_segment(segment))
        .count()
}

// How deep below the root a match can lie; unbounded with `**`
fn walk_depth(pattern: &str) -> Option<usize> {
    if pattern.contains("**") {
        return None;
    }
    let segments: Vec<&str> = pattern.split('/').collect();
    Some(segments.len() - literal_segment_count(&segments))
}

// Directory to start walking from: every leading segment without glob syntax
fn literal_root(pattern: &str) -> PathBuf {
    let segments: Vec<&str> = pattern.split('/').collect();
    let literal_count = literal_segment_count(&segments);

    let root = segments[..literal_count].join("/");
    if root.is_empty() {
        if pattern.starts_with('/') {
            PathBuf::from("/")
        } else {
            PathBuf::from(".")
        }
    } else {
        PathBuf::from(root)
    }
}

/// Translate a glob pattern into an anchored regex over '/'-separated paths
pub fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut regex = String::from("^");
    let mut in_braces = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    regex.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    regex.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            '[' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == ']')
                    .map(|offset| i + 1 + offset)
                    .ok_or_else(|| anyhow!("Unclosed '[' in glob pattern: {}", pattern))?;
                let mut class: String = chars[i + 1..close].iter().collect();
                if let Some(rest) = class.strip_prefix('!') {
                    class = format!("^{}", rest);
                }
                regex.push('[');
                regex.push_str(&class.replace('\\', "\\\\"));
                regex.push(']');
                i = close + 1;
                continue;
            }
            '{' => {
                in_braces += 1;
                regex.push_str("(?:");
            }
            '}' if in_braces > 0 => {
                in_braces -= 1;
                regex.push(')');
            }
            ',' if in_braces > 0 => regex.push('|'),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
        i += 1;
    }

    if in_braces > 0 {
        return Err(anyhow!("Unclosed '{{' in glob pattern: {}", pattern));
    }

    regex.push('$');
    Regex::new(&regex).with_context(|| format!("Invalid glob pattern: {}", pattern))
}
