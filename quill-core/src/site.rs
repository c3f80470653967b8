use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Local};
use tera::Context;

use crate::analytics::{AnalyticsError, AnalyticsStore};
use crate::config::{Config, ConfigError};
use crate::link::{self, LinkError};
use crate::scaffold;
use crate::store::{ContentStore, Page, Post, StoreError};
use crate::template::{TemplateError, TemplateRenderer};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
pub enum BuildError {
    Store(StoreError),
    Config(ConfigError),
    Analytics(AnalyticsError),
    Template(TemplateError),
    Link(LinkError),
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl From<StoreError> for BuildError {
    fn from(err: StoreError) -> Self {
        BuildError::Store(err)
    }
}

impl From<ConfigError> for BuildError {
    fn from(err: ConfigError) -> Self {
        BuildError::Config(err)
    }
}

impl From<AnalyticsError> for BuildError {
    fn from(err: AnalyticsError) -> Self {
        BuildError::Analytics(err)
    }
}

impl From<TemplateError> for BuildError {
    fn from(err: TemplateError) -> Self {
        BuildError::Template(err)
    }
}

impl From<LinkError> for BuildError {
    fn from(err: LinkError) -> Self {
        BuildError::Link(err)
    }
}

impl From<std::io::Error> for BuildError {
    fn from(err: std::io::Error) -> Self {
        BuildError::Io(err)
    }
}

impl From<serde_json::Error> for BuildError {
    fn from(err: serde_json::Error) -> Self {
        BuildError::Serialization(err)
    }
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Store(e) => write!(f, "Store error: {}", e),
            BuildError::Config(e) => write!(f, "Config error: {}", e),
            BuildError::Analytics(e) => write!(f, "Analytics error: {}", e),
            BuildError::Template(e) => write!(f, "Template error: {}", e),
            BuildError::Link(e) => write!(f, "Link error: {}", e),
            BuildError::Io(e) => write!(f, "IO error: {}", e),
            BuildError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for BuildError {}

/// The application value: storage handles, loaded configuration, and the
/// build routine over them. All paths hang off one working directory:
///
/// ```text
/// storage/quill.yml       merged configuration
/// storage/posts/*.yml     one record per post
/// storage/pages/*.yml     one record per page
/// storage/analytics.bin   operational metrics
/// assets/                 templates (*.tera) + static files
/// site/                   the generated tree, fully disposable
/// ```
pub struct Quill {
    root: PathBuf,
    storage_dir: PathBuf,
    config_path: PathBuf,
    assets_dir: PathBuf,
    site_dir: PathBuf,
    store: ContentStore,
    config: Config,
    analytics: AnalyticsStore,
}

impl Quill {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, BuildError> {
        let root = root.as_ref().to_path_buf();
        let storage_dir = root.join("storage");

        std::fs::create_dir_all(&storage_dir)?;
        let store = ContentStore::new(&storage_dir);
        store.ensure_dirs()?;

        let config_path = storage_dir.join("quill.yml");
        let config = Config::load(&config_path)?;
        let analytics = AnalyticsStore::load(storage_dir.join("analytics.bin"))?;

        Ok(Self {
            assets_dir: root.join("assets"),
            site_dir: root.join("site"),
            root,
            storage_dir,
            config_path,
            store,
            config,
            analytics,
        })
    }

    pub fn site_dir(&self) -> &Path {
        &self.site_dir
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Scaffold the working directory and produce the first build: default
    /// templates, persisted configuration, and a seeded landing page.
    pub fn init(&mut self) -> Result<(), BuildError> {
        if self.site_dir.exists() {
            std::fs::remove_dir_all(&self.site_dir)?;
        }
        std::fs::create_dir_all(&self.storage_dir)?;
        self.store.ensure_dirs()?;

        std::fs::create_dir_all(&self.assets_dir)?;
        scaffold::write_defaults(&self.assets_dir)?;

        self.config.save(&self.config_path)?;

        let seed = self.storage_dir.join("pages/index.yml");
        if !seed.exists() {
            std::fs::write(&seed, scaffold::INDEX_PAGE)?;
        }

        self.build()
    }

    /// Publish a post. The link is allocated against the generated tree,
    /// the record persisted, and the whole site rebuilt.
    pub fn post(
        &mut self,
        title: &str,
        text: &str,
        categories: Vec<String>,
    ) -> Result<(), BuildError> {
        let now = Local::now();
        let link = link::allocate(&self.site_dir.join("news"), title, now.date_naive())?;
        let post = Post {
            title: title.to_string(),
            text: text.to_string(),
            link,
            publication: publication_stamp(&now),
            categories,
        };
        self.store.save_post(&post)?;

        self.build()
    }

    pub fn edit_config(&mut self, field: &str, key: &str, value: &str) -> Result<(), BuildError> {
        self.config.edit(field, key, value)?;
        self.config.save(&self.config_path)?;

        self.build()
    }

    pub fn set_config(&mut self, config: Config) -> Result<(), BuildError> {
        self.config = config;
        self.config.save(&self.config_path)?;

        self.build()
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    pub fn get_analytics(&self) -> &BTreeMap<String, u64> {
        self.analytics.snapshot()
    }

    /// Drop every persisted directory: the generated tree, the stores, and
    /// the build assets. The in-memory configuration survives, so a
    /// following `init` starts from the same settings.
    pub fn clear(&mut self) -> Result<(), BuildError> {
        let staging = self.root.join("site.staging");
        for dir in [&self.site_dir, &staging, &self.storage_dir, &self.assets_dir] {
            if dir.exists() {
                std::fs::remove_dir_all(dir)?;
            }
        }
        Ok(())
    }

    /// Regenerate the whole output tree from the stores.
    ///
    /// Rendering happens in a staging directory which is swapped into place
    /// only once every target rendered, so a failed build never leaves a
    /// half-written tree at the served path. Wall-clock duration lands in
    /// the analytics store as `build_speed` nanoseconds.
    pub fn build(&mut self) -> Result<(), BuildError> {
        let start = Instant::now();

        let renderer = TemplateRenderer::new(&self.assets_dir)?;

        let staging = self.root.join("site.staging");
        if staging.exists() {
            std::fs::remove_dir_all(&staging)?;
        }
        let staging_assets = staging.join("assets");
        std::fs::create_dir_all(&staging_assets)?;

        // Static assets: top-level files that are not templates and not
        // hidden/underscore-reserved.
        for entry in std::fs::read_dir(&self.assets_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('_') || name.starts_with('.') || name.ends_with(".tera") {
                continue;
            }
            std::fs::copy(&path, staging_assets.join(&name))?;
        }

        // Stylesheet from the theme parameters.
        let mut style_ctx = Context::new();
        style_ctx.insert("site", &self.config.site);
        renderer.render_to_file("style.css.tera", &style_ctx, &staging_assets.join("style.css"))?;

        let last_build = publication_stamp(&Local::now());
        let mut posts: Vec<Post> = Vec::new();
        let mut pages: Vec<Page> = Vec::new();

        // Posts, newest first. Each render sees the posts accumulated so
        // far, matching the sidebar/feed context of the listings below.
        for post in self.store.list_posts()? {
            posts.push(post);
            let post = &posts[posts.len() - 1];

            let mut ctx = self.base_context(&posts, &pages, &last_build);
            ctx.insert(
                "page",
                &serde_json::json!({ "name": post.title, "base": "../../../../" }),
            );
            ctx.insert("post", post);
            renderer.render_to_file(
                "post.html.tera",
                &ctx,
                &staging.join("news").join(&post.link),
            )?;
        }

        // Pages render at the tree root; their record metadata is merged
        // straight into the `page` descriptor.
        for page in self.store.list_pages()? {
            pages.push(page);
            let page = &pages[pages.len() - 1];

            let mut descriptor = match serde_json::to_value(page)? {
                serde_json::Value::Object(map) => map,
                _ => serde_json::Map::new(),
            };
            descriptor.insert("base".to_string(), serde_json::Value::String(String::new()));

            let mut ctx = self.base_context(&posts, &pages, &last_build);
            ctx.insert("page", &descriptor);
            renderer.render_to_file(
                "page.html.tera",
                &ctx,
                &staging.join(format!("{}.html", page.link)),
            )?;
        }

        // News index over every post.
        let mut ctx = self.base_context(&posts, &pages, &last_build);
        ctx.insert("page", &serde_json::json!({ "name": "News", "base": "../" }));
        renderer.render_to_file("news.html.tera", &ctx, &staging.join("news/index.html"))?;

        // Feed and manifest at the tree root.
        let mut ctx = self.base_context(&posts, &pages, &last_build);
        ctx.insert("generator", &format!("Quill {}", VERSION));
        renderer.render_to_file("rss.xml.tera", &ctx, &staging.join("feed.xml"))?;

        let ctx = self.base_context(&posts, &pages, &last_build);
        renderer.render_to_file("manifest.json.tera", &ctx, &staging.join("manifest.json"))?;

        // Swap the finished tree into place.
        if self.site_dir.exists() {
            std::fs::remove_dir_all(&self.site_dir)?;
        }
        std::fs::rename(&staging, &self.site_dir)?;

        self.analytics
            .record("build_speed", start.elapsed().as_nanos() as u64)?;

        Ok(())
    }

    fn base_context(&self, posts: &[Post], pages: &[Page], last_build: &str) -> Context {
        let mut ctx = Context::new();
        ctx.insert("site", &self.config.site);
        ctx.insert("contact", &self.config.contact);
        ctx.insert("assets", &self.config.assets);
        ctx.insert("posts", posts);
        ctx.insert("pages", pages);
        ctx.insert("last_build", last_build);
        ctx
    }
}

/// RFC-1123-style timestamp with the local offset, the shape posts carry
/// in their `publication` field.
fn publication_stamp(time: &DateTime<Local>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S %z").to_string()
}
