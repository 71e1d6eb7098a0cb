use crate::error::{Error, Result};
use crate::keybindings::{Keybindings, KeybindingsConfig};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub theme: CustomThemeConfig,

    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Smallest zoom reachable with `-`
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,

    /// Largest zoom reachable with `=`/`+`
    #[serde(default = "default_max_scale")]
    pub max_scale: f64,

    /// Fitting never zooms a small tree in past this
    #[serde(default = "default_max_fit_scale")]
    pub max_fit_scale: f64,

    /// Labels longer than this many columns are truncated
    #[serde(default = "default_max_label_width")]
    pub max_label_width: u16,

    /// Cells moved per pan key press
    #[serde(default = "default_pan_step")]
    pub pan_step: u16,

    #[serde(default = "default_show_status_bar")]
    pub show_status_bar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            min_scale: default_min_scale(),
            max_scale: default_max_scale(),
            max_fit_scale: default_max_fit_scale(),
            max_label_width: default_max_label_width(),
            pan_step: default_pan_step(),
            show_status_bar: default_show_status_bar(),
        }
    }
}

fn default_min_scale() -> f64 {
    0.1
}

fn default_max_scale() -> f64 {
    4.0
}

fn default_max_fit_scale() -> f64 {
    1.0
}

fn default_max_label_width() -> u16 {
    40
}

fn default_pan_step() -> u16 {
    4
}

fn default_show_status_bar() -> bool {
    true
}

/// Which files of a directory count as documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// List README files too (skipped by default)
    #[serde(default)]
    pub include_readme: bool,

    /// Extensions treated as markdown, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            include_readme: false,
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string()]
}

/// Custom theme color overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_1: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_2: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_3: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_4: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_5: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fold_marker: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_bg: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_fg: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_code_fg: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_fg: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_bar_fg: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_bar_bg: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_bar_fg: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_border: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_bg: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_fg: Option<ColorValue>,
}

/// Color value that can be specified in multiple formats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// Named color (e.g., "Red", "Cyan", "White")
    Named(String),
    /// RGB color { rgb = [r, g, b] }
    Rgb { rgb: [u8; 3] },
    /// Indexed color { indexed = 235 }
    Indexed { indexed: u8 },
}

impl ColorValue {
    /// Convert to ratatui Color
    pub fn to_color(&self) -> Option<Color> {
        match self {
            ColorValue::Named(name) => match name.to_lowercase().as_str() {
                "black" => Some(Color::Black),
                "red" => Some(Color::Red),
                "green" => Some(Color::Green),
                "yellow" => Some(Color::Yellow),
                "blue" => Some(Color::Blue),
                "magenta" => Some(Color::Magenta),
                "cyan" => Some(Color::Cyan),
                "gray" | "grey" => Some(Color::Gray),
                "darkgray" | "darkgrey" => Some(Color::DarkGray),
                "lightred" => Some(Color::LightRed),
                "lightgreen" => Some(Color::LightGreen),
                "lightyellow" => Some(Color::LightYellow),
                "lightblue" => Some(Color::LightBlue),
                "lightmagenta" => Some(Color::LightMagenta),
                "lightcyan" => Some(Color::LightCyan),
                "white" => Some(Color::White),
                "reset" => Some(Color::Reset),
                _ => None,
            },
            ColorValue::Rgb { rgb } => Some(Color::Rgb(rgb[0], rgb[1], rgb[2])),
            ColorValue::Indexed { indexed } => Some(Color::Indexed(*indexed)),
        }
    }
}

impl Config {
    /// Get the XDG-style config file path (~/.config/foldmap/config.toml)
    /// This is preferred on macOS for CLI tools and cross-platform dotfiles
    #[cfg(target_os = "macos")]
    fn xdg_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("foldmap").join("config.toml"))
    }

    /// Get the platform-specific config file path
    /// - macOS: ~/Library/Application Support/foldmap/config.toml
    /// - Linux: ~/.config/foldmap/config.toml
    /// - Windows: %APPDATA%/foldmap/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("foldmap").join("config.toml"))
    }

    /// Load the config from the default location, or defaults.
    ///
    /// A missing file is normal. A file that cannot be parsed is logged and
    /// ignored. On macOS, ~/.config/foldmap is checked first.
    pub fn load() -> Self {
        #[cfg(target_os = "macos")]
        {
            if let Some(xdg_path) = Self::xdg_config_path()
                && xdg_path.exists()
            {
                match Self::from_path(&xdg_path) {
                    Ok(config) => return config,
                    Err(e) => warn!(error = %e, "ignoring config file"),
                }
            }
        }

        match Self::config_path() {
            Some(path) if path.exists() => Self::from_path(&path).unwrap_or_else(|e| {
                warn!(error = %e, "ignoring config file");
                Self::default()
            }),
            _ => {
                debug!("no config file, using defaults");
                Self::default()
            }
        }
    }

    /// Load an explicitly named config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it is not valid TOML for this schema or holds out-of-range values.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Config = toml::from_str(&contents).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate().map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// `--config FILE` when given, otherwise the default location.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::load()),
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let ui = &self.ui;
        if !(ui.min_scale > 0.0 && ui.min_scale <= ui.max_scale) {
            return Err(format!(
                "ui.min_scale ({}) must be positive and at most ui.max_scale ({})",
                ui.min_scale, ui.max_scale
            ));
        }
        if ui.max_fit_scale < ui.min_scale {
            return Err(format!(
                "ui.max_fit_scale ({}) is below ui.min_scale ({})",
                ui.max_fit_scale, ui.min_scale
            ));
        }
        if ui.max_label_width < 4 {
            return Err("ui.max_label_width must be at least 4".to_string());
        }
        Ok(())
    }

    /// Get keybindings with user customizations applied
    pub fn keybindings(&self) -> Result<Keybindings> {
        self.keybindings.to_keybindings()
    }
}
