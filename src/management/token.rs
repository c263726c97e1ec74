use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use crate::{
    error::{AuthError, AuthResult},
    types::TokenRecord,
};

/// Owns the token cache file between runs.
///
/// The file holds a single JSON object, no history. `expires_at` is written
/// exactly as the record carries it; the safety margin has already been
/// applied when the record was produced.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached record. A missing file is `Ok(None)`.
    pub async fn load(&self) -> AuthResult<Option<TokenRecord>> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AuthError::Io(e)),
        };

        let record: TokenRecord =
            serde_json::from_str(&content).map_err(|source| AuthError::Decode {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(record))
    }

    /// Replaces the cached record.
    ///
    /// Writes to a sibling temp file first and renames it into place, so a
    /// crash mid-write never leaves a truncated cache behind. The temp file
    /// is created owner-only and removed again if the write or rename fails.
    pub async fn save(&self, record: &TokenRecord) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(record).map_err(|e| {
            AuthError::Io(std::io::Error::new(ErrorKind::InvalidData, e.to_string()))
        })?;

        let tmp = self.tmp_path();
        match async_fs::remove_file(&tmp).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(AuthError::Io(e)),
        }
        create_private(&tmp).await?;

        let written = match async_fs::write(&tmp, json).await {
            Ok(()) => async_fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = async_fs::remove_file(&tmp).await;
            return Err(AuthError::Io(e));
        }
        Ok(())
    }

    /// Deletes the cache file. Returns whether there was one.
    pub async fn clear(&self) -> AuthResult<bool> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AuthError::Io(e)),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "token.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Creates an empty file that only the owner can read, failing if it exists.
async fn create_private(path: &Path) -> io::Result<()> {
    let mut options = async_fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use async_fs::unix::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path).await?;
    Ok(())
}
