//! Busmonitor en ligne de commande.
//!
//! Lit des valeurs hexadécimales (une par ligne) depuis un fichier ou l'entrée
//! standard, affiche les valeurs décodées et, si m et c sont fournis, exporte
//! le graphique de y = mx + c en PNG.

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use log::info;

use busmonitor::config::{ConverterConfig, DEFAULT_CONFIG_PATH};
use busmonitor::plot::PngRenderer;
use busmonitor::session::{Action, Outcome, Session};
use busmonitor::Encoding;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--encoding <name>] [--slope <m> --intercept <c>] [--plot <file.png>] [--json] [--config <file>] [<input>]\n\n\
         Reads one hexadecimal value per line from <input> (or stdin).\n\
         Encodings: i16, i32, twos16, twos32, f32, f64 (or the full form labels).\n\
         --slope and --intercept render y = mx + c to the PNG file (default from config)."
    );
}

#[derive(Debug, Default, Clone, PartialEq)]
struct CliOptions {
    encoding: Option<String>,
    slope: Option<String>,
    intercept: Option<String>,
    plot_path: Option<String>,
    json: bool,
    config_path: Option<String>,
    input: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();

    fn value(
        slot: &mut Option<String>,
        flag: &str,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<(), String> {
        if slot.is_some() {
            return Err(format!("{flag} given twice"));
        }
        *slot = Some(args.next().ok_or_else(|| format!("{flag} needs a value"))?);
        Ok(())
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--encoding" | "-e" => value(&mut options.encoding, &arg, &mut args)?,
            "--slope" | "-m" => value(&mut options.slope, &arg, &mut args)?,
            "--intercept" | "-c" => value(&mut options.intercept, &arg, &mut args)?,
            "--plot" => value(&mut options.plot_path, &arg, &mut args)?,
            "--config" => value(&mut options.config_path, &arg, &mut args)?,
            "--json" => {
                if options.json {
                    return Err("--json given twice".to_string());
                }
                options.json = true;
            }
            // Valeurs négatives de m ou c : consommées ci-dessus, jamais ici
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("unknown option {arg}"))
            }
            _ => {
                if options.input.is_some() {
                    return Err("only one input file is accepted".to_string());
                }
                options.input = Some(arg);
            }
        }
    }

    if options.slope.is_some() != options.intercept.is_some() {
        return Err("--slope and --intercept go together".to_string());
    }

    Ok(options)
}

fn read_input(input: Option<&str>) -> Result<String> {
    match input {
        Some(path) if path != "-" => {
            fs::read_to_string(path).with_context(|| format!("Impossible de lire {}", path))
        }
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Impossible de lire l'entrée standard")?;
            Ok(text)
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "busmonitor".to_owned());
    let options = match parse_options(args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}\n");
            print_usage(&program);
            std::process::exit(2);
        }
    };

    let config_path = options.config_path.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let config = ConverterConfig::load_or_default(config_path);

    let encoding = match options.encoding.as_deref() {
        Some(name) => match name.parse::<Encoding>() {
            Ok(encoding) => encoding,
            Err(e) => {
                eprintln!("{e}\n");
                print_usage(&program);
                std::process::exit(2);
            }
        },
        None => config.conversion.default_encoding,
    };

    let mut renderer = PngRenderer::from_config(&config.plot);
    if let Some(path) = &options.plot_path {
        renderer = renderer.with_path(path);
    }

    let mut session = Session::new(encoding);
    session.input = read_input(options.input.as_deref())?;
    session.dispatch(Action::Convert, &mut renderer);

    let Some(result) = session.result() else {
        eprintln!("{}", session.output);
        std::process::exit(1);
    };
    info!("{} valeur(s) décodée(s)", result.len());

    if options.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else if !session.output.is_empty() {
        println!("{}", session.output);
    }

    if let (Some(slope), Some(intercept)) = (options.slope, options.intercept) {
        session.slope = slope;
        session.intercept = intercept;
        match session.dispatch(Action::PlotGraph, &mut renderer) {
            Outcome::Plotted => eprintln!("Plot written to {}", renderer.path().display()),
            Outcome::Notify(message) => {
                eprintln!("Error: {message}");
                std::process::exit(1);
            }
            Outcome::Updated | Outcome::Exit => {}
        }
    }

    session.dispatch(Action::Close, &mut renderer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_full_command_line() {
        let options = parse_options(args(&[
            "--encoding", "f32", "-m", "-2", "-c", "3.5", "--plot", "out.png", "--json", "values.txt",
        ]))
        .unwrap();
        assert_eq!(options.encoding.as_deref(), Some("f32"));
        assert_eq!(options.slope.as_deref(), Some("-2"));
        assert_eq!(options.intercept.as_deref(), Some("3.5"));
        assert_eq!(options.plot_path.as_deref(), Some("out.png"));
        assert!(options.json);
        assert_eq!(options.input.as_deref(), Some("values.txt"));
    }

    #[test]
    fn test_parse_rejects_bad_combinations() {
        assert!(parse_options(args(&["--slope", "1"])).is_err());
        assert!(parse_options(args(&["--encoding"])).is_err());
        assert!(parse_options(args(&["--json", "--json"])).is_err());
        assert!(parse_options(args(&["a.txt", "b.txt"])).is_err());
        assert!(parse_options(args(&["--verbose"])).is_err());
        assert_eq!(parse_options(args(&["-"])).unwrap().input.as_deref(), Some("-"));
    }
}
