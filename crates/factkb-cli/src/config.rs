//! Configuration Vault – reads/writes `~/.factkb/config.toml`.

use factkb_perception::table::DEFAULT_MAX_OBJECTS;
use factkb_runtime::KnowledgeBaseConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted configuration stored in `~/.factkb/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Static fact file, one `predicate(args)` per line.
    #[serde(default = "default_facts_path")]
    pub facts_path: PathBuf,

    /// Ontology TOML declaring symbols and commutative predicates.
    #[serde(default = "default_ontology_path")]
    pub ontology_path: PathBuf,

    /// Classifier score table (JSON).  Unset means no perceptual predicates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier_table_path: Option<PathBuf>,

    /// Number of addressable objects (`oidx_0` … `oidx_{max_objects-1}`).
    #[serde(default = "default_max_objects")]
    pub max_objects: usize,
}

fn default_facts_path() -> PathBuf {
    PathBuf::from("facts.txt")
}
fn default_ontology_path() -> PathBuf {
    PathBuf::from("ontology.toml")
}
fn default_max_objects() -> usize {
    DEFAULT_MAX_OBJECTS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            facts_path: default_facts_path(),
            ontology_path: default_ontology_path(),
            classifier_table_path: None,
            max_objects: default_max_objects(),
        }
    }
}

impl Config {
    /// The runtime view of this configuration.
    pub fn knowledge_base_config(&self) -> KnowledgeBaseConfig {
        KnowledgeBaseConfig {
            facts_path: self.facts_path.clone(),
            ontology_path: self.ontology_path.clone(),
            classifier_table_path: self.classifier_table_path.clone(),
            max_objects: self.max_objects,
        }
    }
}

/// Return the path to `~/.factkb/config.toml`, or `$FACTKB_CONFIG` when set.
pub fn config_path() -> PathBuf {
    if let Ok(p) = std::env::var("FACTKB_CONFIG") {
        return PathBuf::from(p);
    }
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".factkb").join("config.toml")
}

/// Load the config from disk and apply environment overrides.  Returns
/// `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    let mut cfg = load_from(&config_path())?;
    if let Some(cfg) = cfg.as_mut() {
        apply_env_overrides(cfg);
    }
    Ok(cfg)
}

/// The default config with environment overrides applied, for runs without
/// a usable config file.
pub fn default_with_env_overrides() -> Config {
    let mut cfg = Config::default();
    apply_env_overrides(&mut cfg);
    cfg
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    Ok(Some(cfg))
}

/// Apply `FACTKB_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `FACTKB_FACTS_PATH` | `facts_path` |
/// | `FACTKB_ONTOLOGY_PATH` | `ontology_path` |
/// | `FACTKB_CLASSIFIER_TABLE` | `classifier_table_path` |
/// | `FACTKB_MAX_OBJECTS` | `max_objects` (ignored unless a positive integer) |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("FACTKB_FACTS_PATH") {
        cfg.facts_path = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("FACTKB_ONTOLOGY_PATH") {
        cfg.ontology_path = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("FACTKB_CLASSIFIER_TABLE") {
        cfg.classifier_table_path = Some(PathBuf::from(v));
    }
    if let Ok(v) = std::env::var("FACTKB_MAX_OBJECTS")
        && let Ok(n) = v.parse::<usize>()
        && n > 0
    {
        cfg.max_objects = n;
    }
}

/// Save the config to disk, creating `~/.factkb/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.facts_path, PathBuf::from("facts.txt"));
        assert_eq!(loaded.ontology_path, PathBuf::from("ontology.toml"));
        assert_eq!(loaded.classifier_table_path, None);
        assert_eq!(loaded.max_objects, 32);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: Config = toml::from_str("facts_path = \"world.txt\"\n").unwrap();
        assert_eq!(cfg.facts_path, PathBuf::from("world.txt"));
        assert_eq!(cfg.max_objects, DEFAULT_MAX_OBJECTS);
    }

    #[test]
    fn classifier_table_roundtrips_when_set() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        let cfg = Config {
            classifier_table_path: Some(PathBuf::from("classifiers.json")),
            ..Config::default()
        };
        save_to(&cfg, &path).expect("save");
        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(
            loaded.classifier_table_path,
            Some(PathBuf::from("classifiers.json"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn config_dir_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        save_to(&Config::default(), &path).expect("save");

        let dir_meta = std::fs::metadata(path.parent().unwrap()).expect("dir metadata");
        assert_eq!(dir_meta.permissions().mode() & 0o777, 0o700);
    }

    #[test]
    fn config_path_points_to_factkb_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".factkb"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_objects = \"many\"\n").expect("write");
        let err = load_from(&path).unwrap_err();
        assert!(err.contains("Failed to parse config"));
    }

    #[test]
    fn knowledge_base_config_copies_fields() {
        let cfg = Config {
            max_objects: 5,
            ..Config::default()
        };
        let kb_cfg = cfg.knowledge_base_config();
        assert_eq!(kb_cfg.max_objects, 5);
        assert_eq!(kb_cfg.facts_path, cfg.facts_path);
    }

    #[test]
    fn apply_env_overrides_changes_paths() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe {
            std::env::set_var("FACTKB_FACTS_PATH", "/tmp/world.txt");
            std::env::set_var("FACTKB_CLASSIFIER_TABLE", "/tmp/c.json");
        }
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.facts_path, PathBuf::from("/tmp/world.txt"));
        assert_eq!(cfg.classifier_table_path, Some(PathBuf::from("/tmp/c.json")));
        unsafe {
            std::env::remove_var("FACTKB_FACTS_PATH");
            std::env::remove_var("FACTKB_CLASSIFIER_TABLE");
        }
    }

    #[test]
    fn default_config_still_takes_env_overrides() {
        // SAFETY: single-threaded test; no other test touches this env-var.
        unsafe { std::env::set_var("FACTKB_ONTOLOGY_PATH", "/tmp/blocks/ontology.toml") };
        let cfg = default_with_env_overrides();
        unsafe { std::env::remove_var("FACTKB_ONTOLOGY_PATH") };
        assert_eq!(cfg.ontology_path, PathBuf::from("/tmp/blocks/ontology.toml"));

        let cfg = default_with_env_overrides();
        assert_eq!(cfg.ontology_path, default_ontology_path());
    }

    #[test]
    fn apply_env_overrides_max_objects() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("FACTKB_MAX_OBJECTS", "64") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.max_objects, 64);

        unsafe { std::env::set_var("FACTKB_MAX_OBJECTS", "0") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.max_objects, DEFAULT_MAX_OBJECTS);

        unsafe { std::env::set_var("FACTKB_MAX_OBJECTS", "lots") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.max_objects, DEFAULT_MAX_OBJECTS);
        unsafe { std::env::remove_var("FACTKB_MAX_OBJECTS") };
    }
}
