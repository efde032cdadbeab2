use std::path::{Path, PathBuf};

use rand::Rng;

/// One uploaded resume, exactly as received from the multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub original_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Resumes above this size are rejected before any bytes are stored.
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_MIME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

impl ResumeUpload {
    /// Pure precondition check: MIME type and size. Runs before storage so a
    /// rejected upload leaves nothing on disk.
    pub fn check_acceptable(&self) -> Result<(), FileError> {
        let declared = self
            .mime_type
            .parse::<mime::Mime>()
            .map_err(|_| FileError::InvalidType(self.mime_type.clone()))?;

        if !ALLOWED_MIME_TYPES.contains(&declared.essence_str()) {
            return Err(FileError::InvalidType(self.mime_type.clone()));
        }

        if self.bytes.len() > MAX_RESUME_BYTES {
            return Err(FileError::TooLarge {
                limit: MAX_RESUME_BYTES,
                found: self.bytes.len(),
            });
        }

        Ok(())
    }

    fn extension(&self) -> Option<&str> {
        Path::new(&self.original_name)
            .extension()
            .and_then(|ext| ext.to_str())
    }
}

/// Failures specific to the career resume upload.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("resume file is required")]
    Missing,
    #[error("invalid file type '{0}': only PDF, DOC, and DOCX are allowed")]
    InvalidType(String),
    #[error("file too large: {found} bytes exceeds the {limit} byte limit")]
    TooLarge { limit: usize, found: usize },
    #[error("resume storage failed: {0}")]
    Storage(String),
}

/// Pluggable storage capability for accepted resumes. The returned path is
/// stored as an opaque string on the application record; swapping local disk
/// for object storage means providing another implementation of this trait.
pub trait ResumeStorage: Send + Sync {
    fn store(&self, upload: &ResumeUpload) -> Result<String, FileError>;
}

/// Local-disk backend. Filenames combine a millisecond timestamp with a
/// random suffix so concurrent submissions cannot collide, and preserve the
/// original extension.
#[derive(Debug, Clone)]
pub struct LocalResumeStorage {
    dir: PathBuf,
}

impl LocalResumeStorage {
    /// Create the backend, ensuring the target directory exists.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, FileError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|err| FileError::Storage(err.to_string()))?;
        Ok(Self { dir })
    }

    fn generated_name(&self, upload: &ResumeUpload) -> String {
        let stamp = chrono::Utc::now().timestamp_millis();
        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        match upload.extension() {
            Some(ext) => format!("resume-{stamp}-{suffix}.{ext}"),
            None => format!("resume-{stamp}-{suffix}"),
        }
    }
}

impl ResumeStorage for LocalResumeStorage {
    fn store(&self, upload: &ResumeUpload) -> Result<String, FileError> {
        let target = self.dir.join(self.generated_name(upload));
        std::fs::write(&target, &upload.bytes)
            .map_err(|err| FileError::Storage(err.to_string()))?;
        Ok(target.to_string_lossy().into_owned())
    }
}
