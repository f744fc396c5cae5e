use anyhow::Result;
use log::info;
use std::env;

use busmonitor::config::{ConverterConfig, DEFAULT_CONFIG_PATH};

/// Valeur du dernier `--config <fichier>` de la ligne de commande
fn config_path(args: &[String]) -> &str {
    args.get(1..)
        .unwrap_or_default()
        .windows(2)
        .filter(|pair| pair[0] == "--config")
        .map(|pair| pair[1].as_str())
        .last()
        .unwrap_or(DEFAULT_CONFIG_PATH)
}

fn main() -> Result<()> {
    // Initialiser le logging
    env_logger::init();
    info!("Démarrage de Busmonitor {}", busmonitor::VERSION);

    let args: Vec<String> = env::args().collect();
    let config = ConverterConfig::load_or_default(config_path(&args));
    busmonitor::gui::run(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_path() {
        assert_eq!(config_path(&args(&["busmonitor-gui"])), DEFAULT_CONFIG_PATH);
        assert_eq!(config_path(&args(&[])), DEFAULT_CONFIG_PATH);
        assert_eq!(config_path(&args(&["busmonitor-gui", "--config", "a.toml"])), "a.toml");
        // Option sans valeur : ignorée
        assert_eq!(config_path(&args(&["busmonitor-gui", "--config"])), DEFAULT_CONFIG_PATH);
        assert_eq!(
            config_path(&args(&["busmonitor-gui", "--config", "a.toml", "--config", "b.toml"])),
            "b.toml"
        );
    }
}
