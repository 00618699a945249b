//! Celdilla CLI
//!
//! Usage:
//!   celdilla [OPTIONS] <FILES>...
//!
//! Options:
//!   -c, --cell <NAME>            Cell to show (default: first declared cell)
//!   -t, --type <NAME>            Cell type to show (default: first type of the cell)
//!   -r, --radius-scale <FACTOR>  Multiplier for atom radii [default: 1.0]
//!   -f, --format <FORMAT>        Output: svg, geometry or scene [default: svg]
//!   --theme <FILE>               Theme file for colors (TOML format)
//!   --class-prefix <PREFIX>      CSS class prefix for SVG elements [default: cd-]
//!   -l, --list                   List cells and their types
//!   --lint                       Check every definition for data problems
//!   -v, --verbose                More log output (repeat for trace)

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use celdilla::lint::LintWarning;
use celdilla::{
    lint, render_svg_with_theme, scene_for, DefinitionStore, DocumentError, Error, Selection,
    SvgConfig, Theme, ViewConfig,
};

#[derive(Parser)]
#[command(name = "celdilla")]
#[command(about = "Resolve and draw crystallographic unit cells")]
struct Cli {
    /// Data documents (.json or .toml); later files override earlier ones
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Cell to show
    #[arg(short, long)]
    cell: Option<String>,

    /// Cell type to show
    #[arg(short = 't', long = "type")]
    variant: Option<String>,

    /// Multiplier for atom radii
    #[arg(short, long, default_value_t = 1.0)]
    radius_scale: f64,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Svg)]
    format: OutputFormat,

    /// Theme file for colors (TOML format)
    #[arg(long)]
    theme: Option<PathBuf>,

    /// List cells and their types
    #[arg(short, long)]
    list: bool,

    /// Check every definition for data problems
    #[arg(long)]
    lint: bool,

    /// CSS class prefix for SVG elements (empty for none)
    #[arg(long, default_value = "cd-")]
    class_prefix: String,

    /// More log output (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Svg,
    Geometry,
    Scene,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, std::env::var_os("RUST_LOG").is_some());

    let store = match DefinitionStore::from_files(&cli.files) {
        Ok(store) => store,
        Err(e) => {
            report_document_error(&e);
            process::exit(1);
        }
    };

    if cli.list {
        print_listing(&store);
        return;
    }

    if cli.lint {
        let warnings = lint::check(&store);
        let mut stderr = io::stderr().lock();
        if write_lint_report(&warnings, &mut stderr).is_err() || !warnings.is_empty() {
            process::exit(1);
        }
        return;
    }

    if let Err(e) = run(&cli, &store) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8, rust_log_set: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = log_level(verbose, rust_log_set) {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();
}

/// Level forced by `-v`; `None` leaves an explicit `RUST_LOG` in charge
fn log_level(verbose: u8, rust_log_set: bool) -> Option<LevelFilter> {
    match verbose {
        0 if rust_log_set => None,
        0 => Some(LevelFilter::Warn),
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

fn svg_config(class_prefix: &str) -> SvgConfig {
    if class_prefix.is_empty() {
        SvgConfig::new().without_class_prefix()
    } else {
        SvgConfig::new().with_class_prefix(class_prefix)
    }
}

fn run(cli: &Cli, store: &DefinitionStore) -> Result<(), Error> {
    let selection = select(cli, store)?;
    log::info!("showing {}/{}", selection.cell, selection.variant);

    let theme = match &cli.theme {
        Some(path) => Theme::from_file(path)?,
        None => Theme::default(),
    };
    let config = ViewConfig::new()
        .with_radius_scale(cli.radius_scale)
        .with_svg(svg_config(&cli.class_prefix))
        .with_theme(theme);

    match cli.format {
        OutputFormat::Geometry => {
            let geometry = selection.resolve(store)?;
            println!("{}", to_json(&geometry));
        }
        OutputFormat::Scene => {
            let scene = scene_for(store, &selection.cell, &selection.variant, &config)?;
            println!("{}", to_json(&scene));
        }
        OutputFormat::Svg => {
            let scene = scene_for(store, &selection.cell, &selection.variant, &config)?;
            println!("{}", render_svg_with_theme(&scene, &config.svg, &config.theme));
        }
    }
    Ok(())
}

/// Apply the viewer's defaulting rules to the command-line selection
fn select(cli: &Cli, store: &DefinitionStore) -> Result<Selection, Error> {
    let mut selection = match &cli.cell {
        Some(cell) => Selection::first_of(store, cell)?,
        None => Selection::first(store).ok_or(Error::NoCells)?,
    };
    if let Some(variant) = &cli.variant {
        selection.select_variant(store, variant)?;
    }
    Ok(selection)
}

fn print_listing(store: &DefinitionStore) {
    for cell in store.cell_names() {
        let types = store.types_for(cell).unwrap_or_default();
        println!("{}: {}", cell, types.join(", "));
    }
}

/// Write every lint finding followed by a count; nothing for a clean store
fn write_lint_report(warnings: &[LintWarning], out: &mut impl Write) -> io::Result<()> {
    for warning in warnings {
        writeln!(out, "{}", warning)?;
    }
    if !warnings.is_empty() {
        writeln!(out, "{} lint warning(s)", warnings.len())?;
    }
    Ok(())
}

fn report_document_error(err: &DocumentError) {
    match err {
        DocumentError::Syntax { .. } => eprint!("{}", err.report()),
        _ => eprintln!("Error: {}", err),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_flag_sets_level() {
        assert_eq!(log_level(0, false), Some(LevelFilter::Warn));
        assert_eq!(log_level(1, true), Some(LevelFilter::Info));
        assert_eq!(log_level(5, false), Some(LevelFilter::Trace));
    }

    #[test]
    fn test_rust_log_kept_without_verbose_flag() {
        assert_eq!(log_level(0, true), None);
    }

    #[test]
    fn test_lint_report_lists_every_warning() {
        let store = DefinitionStore::from(
            celdilla::Document::from_json_str(
                r#"{
                    "cells": {"C": {"v": {"a": 1, "atoms": [{"element": "O", "x": 2, "y": 0, "z": 0}]}}},
                    "atomTypes": {"O": {"color": "red", "radius": 0.5}}
                }"#,
            )
            .expect("Should parse"),
        );
        let warnings = lint::check(&store);

        let mut out = Vec::new();
        write_lint_report(&warnings, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("[unresolved] C/v does not resolve"));
        assert!(text.contains("[coordinate] atom #1 (O) in C/v"));
        assert!(text.ends_with("2 lint warning(s)\n"));
    }

    #[test]
    fn test_clean_lint_report_is_empty() {
        let mut out = Vec::new();
        write_lint_report(&[], &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_class_prefix_option() {
        let cli = Cli::parse_from(["celdilla", "cells.json", "--class-prefix", "xtal-"]);
        assert_eq!(
            svg_config(&cli.class_prefix).class_prefix,
            Some("xtal-".to_string())
        );

        let cli = Cli::parse_from(["celdilla", "cells.json", "--class-prefix", ""]);
        assert_eq!(svg_config(&cli.class_prefix).class_prefix, None);

        let cli = Cli::parse_from(["celdilla", "cells.json"]);
        assert_eq!(
            svg_config(&cli.class_prefix).class_prefix,
            Some("cd-".to_string())
        );
    }
}
