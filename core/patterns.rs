use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

/// Built-in classification tables, embedded at compile time.
#[derive(Debug, Default, Deserialize)]
pub struct BuiltinTables {
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub dependency_markers: Vec<String>,
    #[serde(default)]
    pub binary_extensions: Vec<String>,
    #[serde(default)]
    pub source_extensions: Vec<String>,
    #[serde(default)]
    pub config_filenames: Vec<String>,
    #[serde(default)]
    pub build_filenames: Vec<String>,
    #[serde(default)]
    pub descriptions: HashMap<String, String>,
}

static BUILTIN_TABLES: Lazy<BuiltinTables> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/defaults.yaml"));
    serde_yml::from_str(yaml_content).expect("Failed to parse embedded data/defaults.yaml")
});

pub fn get_builtin_tables() -> &'static BuiltinTables {
    &BUILTIN_TABLES
}

impl BuiltinTables {
    pub fn is_binary_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.binary_extensions.iter().any(|e| *e == ext)
    }

    pub fn is_source_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.source_extensions.iter().any(|e| *e == ext)
    }

    pub fn is_known_filename(&self, name: &str) -> bool {
        self.config_filenames.iter().any(|f| f == name)
            || self.build_filenames.iter().any(|f| f == name)
    }

    pub fn description_for(&self, name: &str) -> Option<&str> {
        self.descriptions.get(name).map(String::as_str)
    }
}
