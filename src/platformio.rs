// src/platformio.rs
// Reads monitor_port / monitor_speed from a PlatformIO project file.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::drivers::PlotError;

pub const PROJECT_FILE: &str = "platformio.ini";

#[derive(Clone, Debug, Default, PartialEq)]
struct Section {
    name: String,
    values: Vec<(String, String)>,
}

impl Section {
    fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectConfig {
    path: PathBuf,
    sections: Vec<Section>,
}

impl ProjectConfig {
    /// Loads `platformio.ini` from `dir`; a project without one yields `None`.
    pub fn load(dir: &Path) -> Result<Option<Self>, PlotError> {
        let path = dir.join(PROJECT_FILE);
        match fs::read_to_string(&path) {
            Ok(text) => {
                log::info!("using PlatformIO project {}", path.display());
                Ok(Some(Self::parse(path, &text)))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PlotError::ConfigRead { path, source }),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Self {
        let mut sections: Vec<Section> = Vec::new();
        let mut last_key: Option<usize> = None;
        for raw in text.lines() {
            let continued = raw.starts_with(' ') || raw.starts_with('\t');
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                sections.push(Section {
                    name: name.trim().to_string(),
                    values: Vec::new(),
                });
                last_key = None;
                continue;
            }
            let Some(section) = sections.last_mut() else {
                continue;
            };
            // indented lines extend the previous value (multi-line options)
            if continued {
                if let Some(idx) = last_key {
                    let value = &mut section.values[idx].1;
                    if !value.is_empty() {
                        value.push('\n');
                    }
                    value.push_str(line);
                    continue;
                }
            }
            if let Some((key, value)) = line.split_once('=') {
                section
                    .values
                    .push((key.trim().to_string(), value.trim().to_string()));
                last_key = Some(section.values.len() - 1);
            }
        }
        Self {
            path: path.into(),
            sections,
        }
    }

    fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// First entry of `[platformio] default_envs`.
    pub fn default_env(&self) -> Option<&str> {
        self.section("platformio")?
            .get("default_envs")?
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(str::trim)
            .find(|env| !env.is_empty())
    }

    /// Looks `key` up in the default environment, then in the first
    /// `[env:*]` section that sets it, then in the shared `[env]` section.
    fn lookup(&self, key: &str) -> Option<&str> {
        let value = match self.default_env() {
            Some(env) => self
                .section(&format!("env:{env}"))
                .and_then(|s| s.get(key)),
            None => self
                .sections
                .iter()
                .filter(|s| s.name.starts_with("env:"))
                .find_map(|s| s.get(key)),
        };
        let value = value.or_else(|| self.section("env").and_then(|s| s.get(key)))?;
        if value.is_empty() {
            return None;
        }
        if value.contains("${") {
            log::warn!("ignoring interpolated {key} = {value:?} in {}", self.path.display());
            return None;
        }
        Some(value)
    }

    pub fn monitor_port(&self) -> Option<String> {
        self.lookup("monitor_port").map(str::to_string)
    }

    pub fn monitor_speed(&self) -> Result<Option<u32>, PlotError> {
        let Some(value) = self.lookup("monitor_speed") else {
            return Ok(None);
        };
        value
            .parse()
            .map(Some)
            .map_err(|_| PlotError::ProjectValue {
                path: self.path.clone(),
                key: "monitor_speed",
                value: value.to_string(),
            })
    }
}

fn strip_comment(line: &str) -> &str {
    let trimmed = line.trim_start();
    if trimmed.starts_with(';') || trimmed.starts_with('#') {
        return "";
    }
    match line.find(" ;") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = "\
; PlatformIO Project Configuration File
[platformio]
default_envs = nano

[env]
framework = arduino
monitor_speed = 57600

[env:uno]
platform = atmelavr
board = uno
monitor_port = /dev/ttyACM0
monitor_speed = 9600

[env:nano]
platform = atmelavr
board = nanoatmega328
monitor_port = /dev/ttyUSB1 ; the cheap clone
lib_deps =
    Wire
    SPI
";

    #[test]
    fn default_env_wins() {
        let project = ProjectConfig::parse(PROJECT_FILE, PROJECT);
        assert_eq!(project.default_env(), Some("nano"));
        assert_eq!(project.monitor_port().as_deref(), Some("/dev/ttyUSB1"));
        // nano has no speed of its own, so the shared [env] value applies
        assert_eq!(project.monitor_speed().unwrap(), Some(57600));
    }

    #[test]
    fn first_env_defining_key_without_default() {
        let text = PROJECT.replace("default_envs = nano", "");
        let project = ProjectConfig::parse(PROJECT_FILE, &text);
        assert_eq!(project.default_env(), None);
        assert_eq!(project.monitor_port().as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(project.monitor_speed().unwrap(), Some(9600));
    }

    #[test]
    fn multi_line_values_are_joined() {
        let project = ProjectConfig::parse(PROJECT_FILE, PROJECT);
        let nano = project.section("env:nano").unwrap();
        assert_eq!(nano.get("lib_deps"), Some("Wire\nSPI"));
    }

    #[test]
    fn missing_keys_are_none() {
        let project = ProjectConfig::parse(PROJECT_FILE, "[env:esp32]\nboard = esp32dev\n");
        assert_eq!(project.monitor_port(), None);
        assert_eq!(project.monitor_speed().unwrap(), None);
    }

    #[test]
    fn bad_speed_is_reported() {
        let project =
            ProjectConfig::parse(PROJECT_FILE, "[env:a]\nmonitor_speed = fast\n");
        assert!(matches!(
            project.monitor_speed(),
            Err(PlotError::ProjectValue { key: "monitor_speed", .. })
        ));
    }

    #[test]
    fn absent_project_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ProjectConfig::load(dir.path()).unwrap().is_none());
        fs::write(dir.path().join(PROJECT_FILE), "[env:a]\nmonitor_port = COM3\n").unwrap();
        let project = ProjectConfig::load(dir.path()).unwrap().unwrap();
        assert_eq!(project.monitor_port().as_deref(), Some("COM3"));
    }
}
