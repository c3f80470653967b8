use std::path::Path;

use chrono::{Datelike, NaiveDate};

/// Collision retries before giving up on a title.
pub const MAX_LINK_ATTEMPTS: usize = 64;

#[derive(Debug)]
pub enum LinkError {
    Exhausted(String),
}

impl std::fmt::Display for LinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkError::Exhausted(title) => {
                write!(f, "No free link for \"{}\" after {} attempts", title, MAX_LINK_ATTEMPTS)
            }
        }
    }
}

impl std::error::Error for LinkError {}

/// Derive a unique relative output path for a new post.
///
/// The candidate is `{year}/{month}/{day}/{slug}.html` (month and day
/// unpadded) with the slug being the lowercased title, spaces turned into
/// underscores. Collisions are resolved against the generated news tree at
/// `news_dir` by appending underscores to the slug; each retry strictly
/// lengthens the candidate. The uniqueness guarantee therefore holds as of
/// the last build, see the notes in DESIGN.md.
pub fn allocate(news_dir: &Path, title: &str, date: NaiveDate) -> Result<String, LinkError> {
    let mut slug = title.to_lowercase().replace(' ', "_");
    for _ in 0..MAX_LINK_ATTEMPTS {
        let link = format!("{}/{}/{}/{}.html", date.year(), date.month(), date.day(), slug);
        if !news_dir.join(&link).exists() {
            return Ok(link);
        }
        slug.push('_');
    }
    Err(LinkError::Exhausted(title.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    #[test]
    fn test_link_shape_is_unpadded() {
        let dir = tempfile::tempdir().unwrap();
        let link = allocate(dir.path(), "First Post", date()).unwrap();
        assert_eq!(link, "2026/8/5/first_post.html");
    }

    #[test]
    fn test_collisions_grow_the_slug() {
        let dir = tempfile::tempdir().unwrap();
        for expected in [
            "2026/8/5/hello.html",
            "2026/8/5/hello_.html",
            "2026/8/5/hello__.html",
        ] {
            let link = allocate(dir.path(), "Hello", date()).unwrap();
            assert_eq!(link, expected);
            let path = dir.path().join(&link);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "").unwrap();
        }
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut slug = "hello".to_string();
        for _ in 0..MAX_LINK_ATTEMPTS {
            let path = dir.path().join(format!("2026/8/5/{}.html", slug));
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "").unwrap();
            slug.push('_');
        }
        assert!(matches!(
            allocate(dir.path(), "Hello", date()),
            Err(LinkError::Exhausted(_))
        ));
    }
}
