//! Finds uploaded photos whose stored name no longer matches the file.

use std::path::{Path, PathBuf};

use base64::Engine;
use tracing::{debug, warn};

/// Prefixes the upload layer has been known to prepend to stored names.
const KNOWN_PREFIXES: &[&str] = &[
    "file://",
    "/public/uploads/",
    "public/uploads/",
    "./uploads/",
    "/uploads/",
    "uploads/",
    "/",
];

/// Locates stored photo references inside one uploads directory.
#[derive(Debug, Clone)]
pub struct PhotoResolver {
    uploads_root: PathBuf,
}

/// Which rule located the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    StrippedPrefix,
    Basename,
    Raw,
    ExactName,
    Substring,
    FieldPrefix,
}

impl PhotoResolver {
    pub fn new(uploads_root: impl Into<PathBuf>) -> Self {
        Self {
            uploads_root: uploads_root.into(),
        }
    }

    pub fn uploads_root(&self) -> &Path {
        &self.uploads_root
    }

    /// Absolute path of the file behind `stored_name`, or `None`.
    ///
    /// A miss, including an unreadable uploads directory, is not an error:
    /// the certificate is rendered with a photo placeholder instead.
    pub fn resolve(&self, stored_name: &str) -> Option<PathBuf> {
        self.resolve_with_rule(stored_name).map(|(path, _)| path)
    }

    pub fn resolve_with_rule(&self, stored_name: &str) -> Option<(PathBuf, MatchRule)> {
        let raw = stored_name.trim();
        if raw.is_empty() {
            return None;
        }
        let normalized = raw.replace('\\', "/");
        let stripped = strip_known_prefixes(&normalized);
        let basename = stripped.rsplit('/').next().unwrap_or(stripped);
        if basename.is_empty() {
            warn!(stored = raw, "photo reference names a directory, not a file");
            return None;
        }

        let direct = [
            (stripped, MatchRule::StrippedPrefix),
            (basename, MatchRule::Basename),
            (raw, MatchRule::Raw),
        ];
        for (candidate, rule) in direct {
            if let Some(path) = self.existing_file(candidate) {
                debug!(stored = raw, path = %path.display(), ?rule, "resolved photo");
                return Some((path, rule));
            }
        }

        let names = match self.list_files() {
            Ok(names) => names,
            Err(err) => {
                warn!(
                    root = %self.uploads_root.display(),
                    error = %err,
                    "uploads directory unreadable"
                );
                return None;
            }
        };

        let wanted = basename.to_lowercase();
        let found = names
            .iter()
            .find(|name| name.to_lowercase() == wanted)
            .map(|name| (name, MatchRule::ExactName))
            .or_else(|| {
                names
                    .iter()
                    .find(|name| {
                        let name = name.to_lowercase();
                        wanted.contains(&name) || name.contains(&wanted)
                    })
                    .map(|name| (name, MatchRule::Substring))
            })
            .or_else(|| {
                let (prefix, _) = basename.split_once('-')?;
                if prefix.is_empty() {
                    return None;
                }
                names
                    .iter()
                    .find(|name| name.starts_with(prefix))
                    .map(|name| (name, MatchRule::FieldPrefix))
            });

        match found {
            Some((name, rule)) => {
                let path = absolute(&self.uploads_root.join(name));
                debug!(stored = raw, path = %path.display(), ?rule, "resolved photo by listing");
                Some((path, rule))
            }
            None => {
                warn!(stored = raw, root = %self.uploads_root.display(), "photo not found");
                None
            }
        }
    }

    /// Joins `candidate` onto the root and keeps it only if it is a regular
    /// file that stays inside the uploads directory.
    fn existing_file(&self, candidate: &str) -> Option<PathBuf> {
        if candidate.is_empty() {
            return None;
        }
        let path = self.uploads_root.join(candidate);
        if !path.is_file() {
            return None;
        }
        let canonical = path.canonicalize().ok()?;
        let root = self.uploads_root.canonicalize().ok()?;
        canonical.starts_with(&root).then_some(canonical)
    }

    /// File names in the uploads root, sorted so lookups are deterministic.
    fn list_files(&self) -> std::io::Result<Vec<String>> {
        let mut names: Vec<String> = std::fs::read_dir(&self.uploads_root)?
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        Ok(names)
    }
}

fn strip_known_prefixes(name: &str) -> &str {
    let mut current = name;
    loop {
        let next = KNOWN_PREFIXES
            .iter()
            .find_map(|prefix| current.strip_prefix(prefix));
        match next {
            Some(rest) if !rest.is_empty() => current = rest,
            _ => return current,
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Reads `path` into a `data:` URI so the renderer never needs file access.
pub fn embed(path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not read photo for embedding");
            return None;
        }
    };
    let mime = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream");
    Some(format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    ))
}
