//! Runtime configuration read from TOML and the environment.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::common::error::{QRError, QRResult};
use crate::compose::LogoSize;
use crate::generator::GeneratorOptions;
use crate::render::RenderOptions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderSection,
    pub logo: LogoSection,
    pub logging: LoggingOptions,
    /// File the configuration was read from, `None` for defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Loads `explicit_path` when given, otherwise the first discovered file,
    /// otherwise defaults. Environment overrides apply last.
    ///
    /// Runs before logging is set up, so the chosen file is kept in
    /// [`Config::source`] for the caller to report.
    pub fn load(explicit_path: Option<&Path>) -> QRResult<Self> {
        let source = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover_file()?,
        };
        let mut config = match &source {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.source = source;

        config.logging.apply_env_overrides();
        Ok(config)
    }

    fn discover_file() -> QRResult<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| QRError::Config(format!("Failed to read cwd: {e}")))?;
        let local = cwd.join("qrlogo.toml");
        if local.exists() {
            return Ok(Some(local));
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config).join("qrlogo").join("config.toml");
            if path.exists() {
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    pub fn from_file(path: &Path) -> QRResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| QRError::Config(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_toml(&contents)
            .map_err(|e| QRError::Config(format!("Failed to parse TOML {}: {e}", path.display())))
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Resolves colours and logo sizing into options for [`crate::Generator`].
    pub fn generator_options(&self) -> QRResult<GeneratorOptions> {
        Ok(GeneratorOptions { render: self.render.to_options()?, logo_size: self.logo.size() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    pub module_size: u32,
    pub quiet_zone: u32,
    /// `#RRGGBB`
    pub dark: String,
    pub light: String,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            module_size: 10,
            quiet_zone: 2,
            dark: "#000000".to_string(),
            light: "#FFFFFF".to_string(),
        }
    }
}

impl RenderSection {
    pub fn to_options(&self) -> QRResult<RenderOptions> {
        Ok(RenderOptions {
            module_size: self.module_size,
            quiet_zone: self.quiet_zone,
            dark: parse_hex_color(&self.dark)?,
            light: parse_hex_color(&self.light)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoSection {
    /// Logo width in pixels.
    pub width: u32,
    /// Share of the symbol width, takes precedence over `width` when set.
    pub fraction: Option<f32>,
}

impl Default for LogoSection {
    fn default() -> Self {
        Self { width: 100, fraction: None }
    }
}

impl LogoSection {
    pub fn size(&self) -> LogoSize {
        match self.fraction {
            Some(f) => LogoSize::Fraction(f),
            None => LogoSize::Fixed(self.width),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Filter directive, overridable via `QRLOGO_LOG_LEVEL`
    pub level: String,
    /// ANSI colours on stderr, overridable via `QRLOGO_LOG_COLOR`
    pub color: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self { level: "info".to_string(), color: true }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("QRLOGO_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(color) = env::var("QRLOGO_LOG_COLOR") {
            match color.to_ascii_lowercase().as_str() {
                "0" | "false" | "off" => self.color = false,
                "1" | "true" | "on" => self.color = true,
                _ => {}
            }
        }
    }
}

/// Parses `#RRGGBB`, with or without the leading `#`.
pub fn parse_hex_color(value: &str) -> QRResult<Rgb<u8>> {
    let hex = value.trim().trim_start_matches('#');
    let invalid = || QRError::Config(format!("Invalid colour '{value}', expected #RRGGBB"));
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }

    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
    }
    Ok(Rgb(rgb))
}
