//! Configuration du convertisseur

use serde::{Deserialize, Serialize};
use anyhow::Result;
use std::fs;

use crate::decoder::Encoding;

/// Fichier lu par défaut au démarrage
pub const DEFAULT_CONFIG_PATH: &str = "busmonitor.toml";

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub window: WindowConfig,
    pub conversion: ConversionConfig,
    pub plot: PlotConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Encodage sélectionné au démarrage et après « Clear »
    pub default_encoding: Encoding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Fichier PNG produit par l'export
    pub output_path: String,
    pub width: u32,
    pub height: u32,
    pub grid: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Hexadecimal Converter".to_string(),
            width: 520.0,
            height: 720.0,
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            default_encoding: Encoding::SignedInt16,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output_path: "plot.png".to_string(),
            width: 800,
            height: 600,
            grid: true,
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            conversion: ConversionConfig::default(),
            plot: PlotConfig::default(),
        }
    }
}

impl ConverterConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ConverterConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Charge le fichier s'il existe et est valide, sinon la configuration par défaut
    pub fn load_or_default(path: &str) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Configuration {} ignorée: {}", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ConverterConfig = toml::from_str(
            "[conversion]\ndefault_encoding = \"float64\"\n\n[plot]\nwidth = 1024\n",
        )
        .unwrap();
        assert_eq!(config.conversion.default_encoding, Encoding::Float64);
        assert_eq!(config.plot.width, 1024);
        assert_eq!(config.plot.height, 600);
        assert_eq!(config.window.title, "Hexadecimal Converter");
    }

    #[test]
    fn test_unknown_encoding_is_rejected() {
        let parsed: Result<ConverterConfig, _> =
            toml::from_str("[conversion]\ndefault_encoding = \"int24\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = ConverterConfig::load_or_default("/nonexistent/busmonitor.toml");
        assert_eq!(config, ConverterConfig::default());
    }
}
