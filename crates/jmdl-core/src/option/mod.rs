//! Download options: the merged configuration plus every path decision made
//! against it.
//!
//! Each decision first asks the option's registered [`OptionAdvice`] hooks,
//! then falls back to the dir rule and the download section.

mod error;
pub mod file;
mod sections;
mod tree;

pub use error::{OptionError, UnsupportedSchemaVersionError};
pub use file::{config_path, load_or_init, OptionFormat};
pub use sections::{
    ClientSection, DirRuleSection, DownloadSection, ImageSection, PostmanMeta, PostmanSection,
    ThreadingSection,
};
pub use tree::{check_version, default_headers, default_tree, merge, SUPPORTED_VERSION};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::advice::{AdviceRegistry, OptionAdvice, OptionId};
use crate::client::{ClientEnv, ClientImpl, JmClient};
use crate::dir_rule::{DirRule, RuleCache};
use crate::entity::{Image, Photo};
use crate::logging;

const SECTIONS: &[&str] = &["version", "debug", "dir_rule", "download", "client"];

/// Shared state for every option built from it: the compiled-rule cache, the
/// advice registry, and the workspace directory `${workspace}` expands to.
#[derive(Debug)]
pub struct OptionContext {
    rules: RuleCache,
    advice: AdviceRegistry,
    workspace: PathBuf,
}

impl OptionContext {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            rules: RuleCache::new(),
            advice: AdviceRegistry::new(),
            workspace: workspace.into(),
        }
    }

    /// Context whose workspace is the process's current directory.
    pub fn from_current_dir() -> Self {
        let workspace = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(workspace)
    }

    pub fn rules(&self) -> &RuleCache {
        &self.rules
    }

    pub fn advice(&self) -> &AdviceRegistry {
        &self.advice
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }
}

impl Default for OptionContext {
    fn default() -> Self {
        Self::from_current_dir()
    }
}

#[derive(Debug)]
pub struct JmOption {
    id: OptionId,
    ctx: Arc<OptionContext>,
    version: String,
    dir_rule: DirRule,
    download: DownloadSection,
    client: ClientSection,
    client_impl: ClientImpl,
    filepath: Option<PathBuf>,
    cache_client: bool,
    client_cache: OnceCell<Arc<JmClient>>,
}

impl JmOption {
    /// Builds an option from a user tree merged over [`default_tree`].
    pub fn construct(tree: &Value, ctx: &Arc<OptionContext>) -> Result<Self, OptionError> {
        Self::construct_with(tree, true, ctx)
    }

    /// Builds an option; with `cover_default` false the tree must be complete.
    pub fn construct_with(tree: &Value, cover_default: bool, ctx: &Arc<OptionContext>) -> Result<Self, OptionError> {
        let tree = if cover_default {
            merge(tree, &default_tree())
        } else {
            tree.clone()
        };
        let map = tree.as_object().ok_or(OptionError::NotAMap)?;

        if let Some(unknown) = map.keys().find(|k| !SECTIONS.contains(&k.as_str())) {
            return Err(OptionError::UnknownSection(unknown.clone()));
        }

        check_version(map.get("version"))?;

        let debug: bool = match map.get("debug") {
            None => true,
            Some(_) => section(map, "debug")?,
        };
        let dir_rule_section: DirRuleSection = section(map, "dir_rule")?;
        let download: DownloadSection = section(map, "download")?;
        let client: ClientSection = section(map, "client")?;
        let client_impl: ClientImpl = client.impl_key.parse()?;

        let dir_rule = DirRule::new(
            &dir_rule_section.rule,
            &dir_rule_section.base_dir,
            ctx.workspace(),
            ctx.rules(),
        )?;
        logging::set_debug_enabled(debug);

        let option = Self {
            id: OptionId::next(),
            ctx: Arc::clone(ctx),
            version: SUPPORTED_VERSION.to_string(),
            dir_rule,
            download,
            client,
            client_impl,
            filepath: None,
            cache_client: true,
            client_cache: OnceCell::new(),
        };
        logging::jm_debug(
            "option",
            format!("constructed option {:?} with rule {}", option.id, option.dir_rule.rule_dsl()),
        );
        Ok(option)
    }

    /// The option built from defaults alone.
    pub fn default_option(ctx: &Arc<OptionContext>) -> Result<Self, OptionError> {
        Self::construct(&json!({}), ctx)
    }

    pub fn from_file(path: &Path, ctx: &Arc<OptionContext>) -> anyhow::Result<Self> {
        let tree = file::unpack(path)?;
        let mut option = Self::construct(&tree, ctx)
            .with_context(|| format!("invalid option file {}", path.display()))?;
        option.filepath = Some(path.to_path_buf());
        Ok(option)
    }

    /// Saves the option to `path`, or to the file it was loaded from.
    pub fn to_file(&self, path: Option<&Path>) -> anyhow::Result<()> {
        let path = path
            .or(self.filepath.as_deref())
            .context("no file path given and the option was not loaded from a file")?;
        file::pack(&self.deconstruct(), path)
    }

    /// Tree form of this option; `debug` reflects the process-wide switch.
    pub fn deconstruct(&self) -> Value {
        json!({
            "version": self.version,
            "debug": logging::debug_enabled(),
            "dir_rule": {
                "rule": self.dir_rule.rule_dsl(),
                "base_dir": self.dir_rule.base_dir_dsl()
            },
            "download": self.download,
            "client": self.client
        })
    }

    pub fn id(&self) -> OptionId {
        self.id
    }

    pub fn context(&self) -> &Arc<OptionContext> {
        &self.ctx
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn filepath(&self) -> Option<&Path> {
        self.filepath.as_deref()
    }

    pub fn dir_rule(&self) -> &DirRule {
        &self.dir_rule
    }

    pub fn download(&self) -> &DownloadSection {
        &self.download
    }

    pub fn client(&self) -> &ClientSection {
        &self.client
    }

    pub fn client_impl(&self) -> ClientImpl {
        self.client_impl
    }

    pub fn download_cache(&self) -> bool {
        self.download.cache
    }

    pub fn download_image_decode(&self) -> bool {
        self.download.image.decode
    }

    /// Configured suffix, normalized to start with a dot.
    pub fn download_image_suffix(&self) -> Option<String> {
        let suffix = self.download.image.suffix.as_deref()?.trim();
        match suffix {
            "" => None,
            s if s.starts_with('.') => Some(s.to_string()),
            s => Some(format!(".{}", s)),
        }
    }

    pub fn download_threading_batch_count(&self) -> usize {
        self.download.threading.batch_count.max(1)
    }

    /// Appends override hooks for this option; earlier hooks take priority.
    pub fn register_advice<I>(&self, hooks: I)
    where
        I: IntoIterator<Item = Arc<dyn OptionAdvice>>,
    {
        self.ctx.advice().register(self.id, hooks);
    }

    /// Directory (with trailing separator) for the photo's images; created if missing.
    pub fn decide_image_save_dir(&self, photo: &Photo) -> Result<String, OptionError> {
        if let Some(dir) = self
            .ctx
            .advice()
            .first_opinion(self.id, |advice| advice.decide_image_save_dir(self, photo))
        {
            return Ok(dir);
        }

        let dir = self.dir_rule.decide_image_save_dir(photo.album(), photo)?;
        fs::create_dir_all(&dir).map_err(|source| OptionError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Saved suffix for an image: animated images keep theirs, others prefer
    /// the configured suffix.
    pub fn decide_image_suffix(&self, image: &Image) -> String {
        if let Some(suffix) = self
            .ctx
            .advice()
            .first_opinion(self.id, |advice| advice.decide_image_suffix(self, image))
        {
            return suffix;
        }

        if image.is_animated() {
            return image.suffix.clone();
        }
        self.download_image_suffix()
            .unwrap_or_else(|| image.suffix.clone())
    }

    /// Full path for the photo's image at `index` (0-based).
    pub fn decide_image_filepath(&self, photo: &Photo, index: usize) -> Result<String, OptionError> {
        if let Some(path) = self
            .ctx
            .advice()
            .first_opinion(self.id, |advice| advice.decide_image_filepath(self, photo, index))
        {
            return Ok(path);
        }

        let image = photo.image(index).ok_or_else(|| OptionError::ImageIndexOutOfRange {
            photo_id: photo.id.clone(),
            index,
        })?;
        let save_dir = self.decide_image_save_dir(photo)?;
        let suffix = self.decide_image_suffix(image);
        Ok(format!("{}{}{}", save_dir, image.name, suffix))
    }

    /// Controls whether [`JmOption::build_client`] reuses one client.
    pub fn set_client_caching(&mut self, enabled: bool) {
        self.cache_client = enabled;
    }

    /// The cached client (built on first call) or a fresh one when caching is off.
    pub fn build_client(&self, env: &ClientEnv) -> Result<Arc<JmClient>, OptionError> {
        if !self.cache_client {
            return self.new_client(env).map(Arc::new);
        }
        self.client_cache
            .get_or_try_init(|| self.new_client(env).map(Arc::new))
            .map(Arc::clone)
    }

    /// Builds a client from the `client` section.
    ///
    /// An empty domain list is filled by discovery, minus its reserved last entry.
    pub fn new_client(&self, env: &ClientEnv) -> Result<JmClient, OptionError> {
        let postman = env
            .postmans
            .create(&self.client.postman)
            .map_err(OptionError::Transport)?;

        let domains = if self.client.domain.is_empty() {
            let mut all = env
                .domains
                .all_known_domains(postman.as_ref())
                .map_err(OptionError::Transport)?;
            all.pop();
            all
        } else {
            self.client.domain.clone()
        };

        tracing::debug!(impl_key = %self.client_impl, domains = ?domains, "building client");
        Ok(JmClient::new(self.client_impl, postman, self.client.retry_times, domains))
    }
}

impl Drop for JmOption {
    fn drop(&mut self) {
        self.ctx.advice().unregister(self.id);
    }
}

fn section<T: DeserializeOwned>(map: &Map<String, Value>, name: &'static str) -> Result<T, OptionError> {
    let value = map.get(name).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|source| OptionError::InvalidSection { section: name, source })
}
