use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let config_path = default_config_path();
        let mut cfg = Self::from_file(&config_path);

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                cfg.inner.insert(k, v);
            }
        }

        cfg
    }

    /// Defaults overlaid by a `.dynsysrc` file, without looking at the environment.
    pub fn from_file(config_path: &Path) -> Self {
        let mut map = default_map();
        if config_path.exists() {
            if let Ok(file) = fs::File::open(config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }
        Self { inner: map, config_path: config_path.to_path_buf() }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(|v| v.parse::<u32>().ok())
    }

    pub fn output_dir(&self) -> String {
        self.get("DYNSYS_OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string())
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.get("DYNSYS_BIN_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BIN_DIR))
    }

    pub fn executable(&self) -> String {
        self.get("DYNSYS_EXECUTABLE").unwrap_or_else(|| DEFAULT_EXECUTABLE.to_string())
    }

    /// Plots go next to the results unless `DYNSYS_PLOT_DIR` says otherwise.
    pub fn plot_dir(&self) -> PathBuf {
        match self.get("DYNSYS_PLOT_DIR") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => Path::new(&self.output_dir()).join("plots"),
        }
    }

    pub fn plot_size(&self) -> (u32, u32) {
        (
            self.get_u32("DYNSYS_PLOT_WIDTH").unwrap_or(1200),
            self.get_u32("DYNSYS_PLOT_HEIGHT").unwrap_or(800),
        )
    }
}

pub const DEFAULT_OUTPUT_DIR: &str = "/tmp/demoDynamicalSystems";
pub const DEFAULT_BIN_DIR: &str = "../../bin/";
pub const DEFAULT_EXECUTABLE: &str = "demoDynamicalSystems";

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "DYNSYS_OUTPUT_DIR",
        "DYNSYS_BIN_DIR",
        "DYNSYS_EXECUTABLE",
        "DYNSYS_PLOT_DIR",
        "DYNSYS_PRINT_COMMAND",
        "DYNSYS_PLOT_WIDTH",
        "DYNSYS_PLOT_HEIGHT",
    ];

    KEYS.contains(&k)
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("dynsys_demo").join(".dynsysrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("DYNSYS_OUTPUT_DIR".into(), DEFAULT_OUTPUT_DIR.into());
    m.insert("DYNSYS_BIN_DIR".into(), DEFAULT_BIN_DIR.into());
    m.insert("DYNSYS_EXECUTABLE".into(), DEFAULT_EXECUTABLE.into());
    m.insert("DYNSYS_PRINT_COMMAND".into(), "true".into());
    m.insert("DYNSYS_PLOT_WIDTH".into(), "1200".into());
    m.insert("DYNSYS_PLOT_HEIGHT".into(), "800".into());
    m
}
