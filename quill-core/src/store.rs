use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Corrupt(PathBuf, serde_yaml::Error),
    Encoding(serde_yaml::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Corrupt(p, e) => write!(f, "Corrupt record {}: {}", p.display(), e),
            StoreError::Encoding(e) => write!(f, "YAML encoding error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

/// One published post. Posts are immutable once saved; there is no edit or
/// delete operation in this design.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Post {
    pub title: String,
    /// Pre-rendered body content, written into the template as-is.
    pub text: String,
    /// Relative output path under `news/`, unique across the site.
    pub link: String,
    /// RFC-1123-style publication timestamp.
    pub publication: String,
    pub categories: Vec<String>,
}

/// A standalone page. Besides its link, a page is free-form metadata that
/// gets merged into its render context (usually at least a `name`).
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Page {
    pub link: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Page {
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(|v| v.as_str())
    }
}

/// Filesystem-backed store of post and page records, one YAML document per
/// file. Listings re-read the directory on every call; nothing is cached.
pub struct ContentStore {
    posts_dir: PathBuf,
    pages_dir: PathBuf,
}

impl ContentStore {
    pub fn new<P: AsRef<Path>>(storage_dir: P) -> Self {
        Self {
            posts_dir: storage_dir.as_ref().join("posts"),
            pages_dir: storage_dir.as_ref().join("pages"),
        }
    }

    pub fn ensure_dirs(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.posts_dir)?;
        std::fs::create_dir_all(&self.pages_dir)?;
        Ok(())
    }

    /// All posts, newest first. Ordering is descending record identity
    /// (file name), which the date-prefixed post keys make follow creation
    /// order.
    pub fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let mut posts = Vec::new();
        for path in records_descending(&self.posts_dir)? {
            posts.push(read_record(&path)?);
        }
        Ok(posts)
    }

    pub fn list_pages(&self) -> Result<Vec<Page>, StoreError> {
        let mut pages = Vec::new();
        for path in records_descending(&self.pages_dir)? {
            pages.push(read_record(&path)?);
        }
        Ok(pages)
    }

    pub fn save_post(&self, post: &Post) -> Result<(), StoreError> {
        let path = self.posts_dir.join(record_key(&post.link));
        write_record(&path, post)
    }

    pub fn save_page(&self, page: &Page) -> Result<(), StoreError> {
        let path = self.pages_dir.join(record_key(&page.link));
        write_record(&path, page)
    }
}

/// Flat filename-safe key for a record: slashes collapsed to underscores.
fn record_key(link: &str) -> String {
    format!("{}.yml", link.replace('/', "_"))
}

fn records_descending(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();
    paths.reverse();
    Ok(paths)
}

fn read_record<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, StoreError> {
    let data = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&data).map_err(|e| StoreError::Corrupt(path.to_path_buf(), e))
}

fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<(), StoreError> {
    let data = serde_yaml::to_string(record).map_err(StoreError::Encoding)?;
    std::fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ContentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::new(dir.path());
        store.ensure_dirs().unwrap();
        (dir, store)
    }

    fn post(title: &str, link: &str) -> Post {
        Post {
            title: title.to_string(),
            text: String::new(),
            link: link.to_string(),
            publication: "Sat, 29 Aug 2026 12:00:00 +0000".to_string(),
            categories: vec!["general".to_string()],
        }
    }

    #[test]
    fn test_save_post_sanitizes_key() {
        let (dir, store) = store();
        store.save_post(&post("Hello", "2026/8/29/hello.html")).unwrap();
        assert!(
            dir.path()
                .join("posts/2026_8_29_hello.html.yml")
                .exists()
        );
    }

    #[test]
    fn test_posts_listed_newest_first() {
        let (_dir, store) = store();
        store.save_post(&post("Alpha", "2026/8/29/alpha.html")).unwrap();
        store.save_post(&post("Beta", "2026/8/29/beta.html")).unwrap();

        let posts = store.list_posts().unwrap();
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Beta", "Alpha"]);
    }

    #[test]
    fn test_listing_is_restartable() {
        let (_dir, store) = store();
        store.save_post(&post("Alpha", "2026/8/29/alpha.html")).unwrap();
        assert_eq!(store.list_posts().unwrap().len(), 1);

        store.save_post(&post("Beta", "2026/8/29/beta.html")).unwrap();
        // A fresh call sees the new record; nothing is cached.
        assert_eq!(store.list_posts().unwrap().len(), 2);
    }

    #[test]
    fn test_corrupt_record_names_the_file() {
        let (dir, store) = store();
        let bad = dir.path().join("posts/2026_8_29_bad.html.yml");
        std::fs::write(&bad, "title: [unclosed").unwrap();

        match store.list_posts().unwrap_err() {
            StoreError::Corrupt(path, _) => assert_eq!(path, bad),
            other => panic!("expected corrupt record error, got {:?}", other),
        }
    }

    #[test]
    fn test_page_extra_metadata_round_trips() {
        let (_dir, store) = store();
        let mut extra = BTreeMap::new();
        extra.insert(
            "name".to_string(),
            serde_yaml::Value::String("Home".to_string()),
        );
        store.save_page(&Page { link: "index".to_string(), extra }).unwrap();

        let pages = store.list_pages().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].link, "index");
        assert_eq!(pages[0].name(), Some("Home"));
    }
}
