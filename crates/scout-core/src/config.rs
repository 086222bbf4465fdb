//! Layered configuration and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (double underscore separates nested keys, e.g. `APP_SEARCH__DEFAULT_TOP_K`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_in(Path::new("."))
    }

    /// Loads layered configuration from files located in `base_dir`.
    pub fn load_in(base_dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(base_dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        tracing::debug!(env = %env_name, base = %base_dir.display(), "configuration layers merged");
        Ok(Self { figment, base_dir: base_dir.to_path_buf() })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extracts and validates the typed settings tree.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Resolves a configured path against the directory the config was loaded from.
    pub fn resolve_path<S: AsRef<str>>(&self, p: S) -> PathBuf {
        resolve_with_base(&self.base_dir, p)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub corpus: CorpusSettings,
    pub lexical: LexicalSettings,
    pub vector: VectorSettings,
    pub embed: EmbedSettings,
    pub search: SearchSettings,
    pub ingest: IngestSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    pub csv_path: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self { csv_path: "data/founders.csv".to_string() }
    }
}

/// BM25 tuning constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalSettings {
    pub k1: f64,
    pub b: f64,
    /// Floor for negative IDFs, as a fraction of the mean IDF.
    pub epsilon: f64,
}

impl Default for LexicalSettings {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75, epsilon: 0.25 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorSettings {
    pub uri: String,
    pub table: String,
    pub dim: usize,
}

impl Default for VectorSettings {
    fn default() -> Self {
        Self { uri: "data/lancedb".to_string(), table: "founders".to_string(), dim: 1024 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbedProviderKind {
    /// BGE-M3 weights loaded from `embed.model_dir`.
    #[default]
    Local,
    /// Token-hash vectors, no model files needed.
    Hashed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedSettings {
    pub provider: EmbedProviderKind,
    pub model_dir: String,
    pub max_len: usize,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            provider: EmbedProviderKind::Local,
            model_dir: "~/.cache/scout/bge-m3".to_string(),
            max_len: 256,
        }
    }
}

/// What the orchestrator does when the semantic path fails or times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamPolicy {
    /// Answer from the lexical source alone and flag the response as degraded.
    #[default]
    Degrade,
    /// Surface the upstream error to the caller.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub default_top_k: usize,
    pub semantic_timeout_ms: u64,
    pub on_upstream_failure: UpstreamPolicy,
    /// Semantic hits below this cosine similarity are dropped before fusion.
    pub min_similarity: Option<f32>,
    pub semantic_weight: f64,
    pub lexical_weight: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_top_k: 5,
            semantic_timeout_ms: 30_000,
            on_upstream_failure: UpstreamPolicy::Degrade,
            min_similarity: None,
            semantic_weight: 1.0,
            lexical_weight: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub batch_size: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self { batch_size: 32 }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(Error::InvalidConfig(msg.to_string()));
        if self.search.default_top_k == 0 {
            return invalid("search.default_top_k must be at least 1");
        }
        if self.search.semantic_timeout_ms == 0 {
            return invalid("search.semantic_timeout_ms must be positive");
        }
        if !(self.search.semantic_weight > 0.0 && self.search.lexical_weight > 0.0) {
            return invalid("search weights must be positive");
        }
        if self.vector.dim == 0 {
            return invalid("vector.dim must be positive");
        }
        if self.vector.table.trim().is_empty() {
            return invalid("vector.table must not be empty");
        }
        if self.ingest.batch_size == 0 {
            return invalid("ingest.batch_size must be positive");
        }
        if self.lexical.k1 < 0.0 {
            return invalid("lexical.k1 must not be negative");
        }
        if !(0.0..=1.0).contains(&self.lexical.b) {
            return invalid("lexical.b must lie in [0, 1]");
        }
        if !(self.lexical.epsilon.is_finite() && self.lexical.epsilon >= 0.0) {
            return invalid("lexical.epsilon must be a finite, non-negative number");
        }
        if let Some(floor) = self.search.min_similarity {
            if !(floor.is_finite() && (-1.0..=1.0).contains(&floor)) {
                return invalid("search.min_similarity must lie in [-1, 1]");
            }
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
