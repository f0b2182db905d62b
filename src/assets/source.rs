use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;

use crate::assets::decode::{LogoImage, decode_logo};
use crate::foundation::error::{EngraveError, EngraveResult};

/// Normalize a relative asset path to `a/b/c` form.
///
/// Backslashes become `/`; empty and `.` segments are dropped. Absolute paths and `..` are
/// rejected.
pub fn normalize_rel_path(source: &str) -> EngraveResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(EngraveError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(EngraveError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(EngraveError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(EngraveError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Milliseconds since the Unix epoch, `0` if the clock is before it.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A request for one asset by normalized relative path, optionally cache-busted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetRequest {
    path: String,
    cache_bust: Option<u64>,
}

impl AssetRequest {
    pub fn new(path: &str) -> EngraveResult<Self> {
        Ok(Self {
            path: normalize_rel_path(path)?,
            cache_bust: None,
        })
    }

    /// Request that always bypasses caches by carrying a `?t=<millis>` query.
    pub fn cache_busted(path: &str, millis: u64) -> EngraveResult<Self> {
        Ok(Self {
            cache_bust: Some(millis),
            ..Self::new(path)?
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn cache_bust(&self) -> Option<u64> {
        self.cache_bust
    }

    /// Relative URL including the cache-busting query, if any.
    pub fn url(&self) -> String {
        match self.cache_bust {
            Some(t) => format!("{}?t={t}", self.path),
            None => self.path.clone(),
        }
    }
}

/// Where page assets come from: a directory, an HTTP origin, an in-memory bundle.
pub trait AssetSource {
    fn fetch(&self, request: &AssetRequest) -> EngraveResult<Vec<u8>>;
}

impl<S: AssetSource + ?Sized> AssetSource for Arc<S> {
    fn fetch(&self, request: &AssetRequest) -> EngraveResult<Vec<u8>> {
        (**self).fetch(request)
    }
}

/// Assets read from a directory on disk; the cache-buster is ignored.
#[derive(Clone, Debug)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssetSource {
    fn fetch(&self, request: &AssetRequest) -> EngraveResult<Vec<u8>> {
        let path = self.root.join(Path::new(request.path()));
        std::fs::read(&path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))
            .map_err(EngraveError::from)
    }
}

/// In-memory assets keyed by normalized path.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, bytes: impl Into<Vec<u8>>) -> EngraveResult<()> {
        self.files.insert(normalize_rel_path(path)?, bytes.into());
        Ok(())
    }

    pub fn with(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> EngraveResult<Self> {
        self.insert(path, bytes)?;
        Ok(self)
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch(&self, request: &AssetRequest) -> EngraveResult<Vec<u8>> {
        self.files
            .get(request.path())
            .cloned()
            .ok_or_else(|| EngraveError::asset(format!("'{}' not found", request.url())))
    }
}

/// Fetch and decode the logo.
#[tracing::instrument(skip(source))]
pub fn fetch_logo(source: &dyn AssetSource, path: &str) -> EngraveResult<LogoImage> {
    let request = AssetRequest::new(path)?;
    let bytes = source.fetch(&request)?;
    decode_logo(request.path(), &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rel_path_rules() {
        assert_eq!(normalize_rel_path("./assets//logo.webp").unwrap(), "assets/logo.webp");
        assert_eq!(
            normalize_rel_path("content\\tools\\ue.md").unwrap(),
            "content/tools/ue.md"
        );
        assert!(normalize_rel_path("/etc/passwd").is_err());
        assert!(normalize_rel_path("assets/../secret").is_err());
        assert!(normalize_rel_path("").is_err());
        assert!(normalize_rel_path("./").is_err());
    }

    #[test]
    fn url_carries_cache_buster() {
        let r = AssetRequest::cache_busted("content/tools/ue.md", 1700000000123).unwrap();
        assert_eq!(r.url(), "content/tools/ue.md?t=1700000000123");
        assert_eq!(r.path(), "content/tools/ue.md");
        assert_eq!(AssetRequest::new("a.png").unwrap().url(), "a.png");
    }

    #[test]
    fn dir_source_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("content/tools")).unwrap();
        std::fs::write(dir.path().join("content/tools/ue.md"), "hello").unwrap();

        let src = DirAssetSource::new(dir.path());
        let req = AssetRequest::cache_busted("content/tools/ue.md", 5).unwrap();
        assert_eq!(src.fetch(&req).unwrap(), b"hello");

        let missing = AssetRequest::new("content/tools/none.md").unwrap();
        let err = src.fetch(&missing).unwrap_err();
        assert!(err.to_string().contains("none.md"));
    }

    #[test]
    fn memory_source_and_logo_fetch() {
        let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2"></svg>"##;
        let src = MemoryAssetSource::new()
            .with("assets/logo.svg", svg.as_slice())
            .unwrap();
        let logo = fetch_logo(&src, "assets/logo.svg").unwrap();
        assert_eq!(logo.size(), (4.0, 2.0));
        assert!(fetch_logo(&src, "assets/logo.webp").is_err());
    }
}
