mod photos;

pub use photos::{embed, MatchRule, PhotoResolver};

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

pub fn generate_certificate_id() -> String {
    format!(
        "CERT-{}-{}",
        Utc::now().format("%Y%m%d"),
        Uuid::new_v4().simple().to_string()[..12].to_uppercase()
    )
}

pub fn ensure_dirs(upload_folder: &Path, certificates_folder: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(upload_folder)?;
    std::fs::create_dir_all(certificates_folder)?;
    Ok(())
}

/// Writes `<certificate_id>.<extension>` into `dir` through a temp file, so
/// a failed write never leaves a truncated artifact behind.
pub fn write_artifact(
    dir: &Path,
    certificate_id: &str,
    extension: &str,
    bytes: &[u8],
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let target = dir.join(format!("{certificate_id}.{extension}"));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(&target).map_err(|err| err.error)?;
    Ok(target)
}
