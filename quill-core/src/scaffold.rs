use std::path::Path;

/// Default build assets bundled into the binary. `init` writes these out so
/// a fresh working directory can build without any hand-made theme.
const TEMPLATES: &[(&str, &str)] = &[
    ("style.css.tera", include_str!("../templates/style.css.tera")),
    ("page.html.tera", include_str!("../templates/page.html.tera")),
    ("post.html.tera", include_str!("../templates/post.html.tera")),
    ("news.html.tera", include_str!("../templates/news.html.tera")),
    ("rss.xml.tera", include_str!("../templates/rss.xml.tera")),
    ("manifest.json.tera", include_str!("../templates/manifest.json.tera")),
    ("admin/index.html", include_str!("../templates/admin/index.html")),
];

/// Seed record for the landing page, placed into `storage/pages`.
pub const INDEX_PAGE: &str = "link: index\nname: Home\n";

/// Write any missing default asset into `assets_dir`. Files the user has
/// already customized are left alone.
pub fn write_defaults(assets_dir: &Path) -> std::io::Result<()> {
    for (name, content) in TEMPLATES {
        let path = assets_dir.join(name);
        if path.exists() {
            continue;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_written_once() {
        let dir = tempfile::tempdir().unwrap();
        write_defaults(dir.path()).unwrap();
        assert!(dir.path().join("post.html.tera").exists());
        assert!(dir.path().join("admin/index.html").exists());

        // A customized template survives a re-init.
        std::fs::write(dir.path().join("post.html.tera"), "custom").unwrap();
        write_defaults(dir.path()).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("post.html.tera")).unwrap(),
            "custom"
        );
    }
}
