#![deny(unsafe_code)]
//! CLI binary for drift.
//!
//! Subcommands:
//! - `list`: print engines, shapes, palettes and flow fields
//! - `render <engine>`: run an engine N frames, write PNG (and optionally a seed)
//! - `replay <seed.json>`: re-run a recorded seed and write its PNG
//! - `cloud <shape>`: dump a generated point cloud as JSON

mod error;

use clap::{Parser, Subcommand};
use drift_clouds::Shape;
use drift_core::field_source::list_fields;
use drift_core::{Palette, Seed, Xorshift64, NUM_PARTICLES};
use drift_engines::snapshot::write_png;
use drift_engines::EngineKind;
use error::CliError;
use log::info;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "drift", about = "Procedural particle and point-cloud engine")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an engine for N frames and write a PNG snapshot.
    Render {
        /// Engine name (flow, morph, attractor, globe).
        engine: String,

        /// Canvas width in pixels.
        #[arg(short = 'W', long, default_value_t = 512)]
        width: usize,

        /// Canvas height in pixels.
        #[arg(short = 'H', long, default_value_t = 512)]
        height: usize,

        /// Number of frames at 60 fps.
        #[arg(short, long, default_value_t = 300)]
        frames: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Palette preset for the flow field's particle colors.
        #[arg(short, long)]
        palette: Option<String>,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Engine parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Also write the run as a replayable seed file.
        #[arg(long)]
        save_seed: Option<PathBuf>,
    },
    /// Replay a seed file and write its PNG snapshot.
    Replay {
        /// Path of a seed JSON file.
        seed: PathBuf,

        /// Output file path.
        #[arg(short, long, default_value = "replay.png")]
        output: PathBuf,
    },
    /// Generate a point cloud and print it as JSON.
    Cloud {
        /// Shape name (cone, shell, crowd, cluster, attractor).
        shape: String,

        /// Number of points.
        #[arg(short, long, default_value_t = NUM_PARTICLES)]
        count: usize,

        /// PRNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List available engines, shapes, palettes and flow fields.
    List,
}

/// Parses `--params` and folds a palette preset into it as `colors`.
fn build_params(raw: &str, palette: Option<&str>) -> Result<Value, CliError> {
    let mut params: Value = serde_json::from_str(raw)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    if !params.is_object() {
        return Err(CliError::Input("--params must be a JSON object".into()));
    }
    if let Some(name) = palette {
        let palette = Palette::from_name(name).map_err(|e| CliError::Input(e.to_string()))?;
        let colors: Vec<String> = palette.colors().iter().map(|c| c.to_hex()).collect();
        params["colors"] = json!(colors);
    }
    Ok(params)
}

fn read_seed(path: &Path) -> Result<Seed, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid seed {}: {e}", path.display())))
}

/// Runs a seed to completion and writes its PNG.
fn render_seed(seed: &Seed, output: &Path) -> Result<(), CliError> {
    let mut engine = EngineKind::from_seed(seed)?;
    engine.run(seed.frames)?;
    let frame = engine.render(seed.width, seed.height)?;
    write_png(&frame, output)?;
    info!(
        "{} frames of '{}' written to {}",
        seed.frames,
        seed.engine,
        output.display()
    );
    Ok(())
}

fn cloud_json(shape: Shape, count: usize, seed: u64) -> Value {
    let cloud = shape.generate(count, &mut Xorshift64::new(seed));
    json!({
        "shape": shape.name(),
        "count": cloud.len(),
        "seed": seed,
        "positions": cloud.positions(),
        "colors": cloud.colors(),
    })
}

fn print_summary(json_mode: bool, info: &Value, line: String) -> Result<(), CliError> {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(info)?);
    } else {
        eprintln!("{line}");
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let engines = EngineKind::list_engines();
            let shapes = Shape::list_names();
            let palettes = Palette::list_names();
            let fields = list_fields();
            if cli.json {
                let info = json!({
                    "engines": engines,
                    "shapes": shapes,
                    "palettes": palettes,
                    "fields": fields,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Engines:");
                for name in engines {
                    println!("  {name}");
                }
                println!("Shapes:");
                println!("  {}", shapes.join(", "));
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
                println!("Flow fields:");
                println!("  {}", fields.join(", "));
            }
        }
        Command::Render {
            engine,
            width,
            height,
            frames,
            seed,
            palette,
            output,
            params,
            save_seed,
        } => {
            let params = build_params(&params, palette.as_deref())?;
            let record = Seed {
                params,
                frames,
                ..Seed::new(&engine, width, height, seed)
            };
            render_seed(&record, &output)?;
            if let Some(path) = &save_seed {
                fs::write(path, serde_json::to_string_pretty(&record)?)?;
            }
            let info = json!({
                "engine": engine,
                "width": width,
                "height": height,
                "frames": frames,
                "seed": seed,
                "output": output.display().to_string(),
                "seed_file": save_seed.as_ref().map(|p| p.display().to_string()),
            });
            print_summary(
                cli.json,
                &info,
                format!(
                    "rendered {engine} ({width}x{height}, {frames} frames, seed {seed}) -> {}",
                    output.display()
                ),
            )?;
        }
        Command::Replay { seed, output } => {
            let record = read_seed(&seed)?;
            render_seed(&record, &output)?;
            let info = json!({
                "seed_file": seed.display().to_string(),
                "engine": record.engine,
                "frames": record.frames,
                "output": output.display().to_string(),
            });
            print_summary(
                cli.json,
                &info,
                format!(
                    "replayed {} ({} frames) -> {}",
                    seed.display(),
                    record.frames,
                    output.display()
                ),
            )?;
        }
        Command::Cloud {
            shape,
            count,
            seed,
            output,
        } => {
            let shape = Shape::from_name(&shape)?;
            let cloud = cloud_json(shape, count, seed);
            let text = serde_json::to_string(&cloud)?;
            match &output {
                Some(path) => {
                    fs::write(path, text)?;
                    let info = json!({
                        "shape": shape.name(),
                        "count": count,
                        "output": path.display().to_string(),
                    });
                    print_summary(
                        cli.json,
                        &info,
                        format!("{count} {shape} points -> {}", path.display()),
                    )?;
                }
                None => println!("{text}"),
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_must_be_an_object() {
        assert!(matches!(build_params("[1, 2]", None), Err(CliError::Input(_))));
        assert!(matches!(build_params("{oops", None), Err(CliError::Input(_))));
    }

    #[test]
    fn palette_becomes_colors() {
        let params = build_params(r#"{"count": 5}"#, Some("ember")).unwrap();
        assert_eq!(params["count"], 5);
        let colors = params["colors"].as_array().unwrap();
        assert_eq!(colors.len(), Palette::ember().len());
        assert!(matches!(
            build_params("{}", Some("mauve")),
            Err(CliError::Input(_))
        ));
    }

    #[test]
    fn cloud_json_has_every_point() {
        let value = cloud_json(Shape::Cone, 100, 1);
        assert_eq!(value["count"], 100);
        assert_eq!(value["positions"].as_array().unwrap().len(), 300);
        assert!(value["colors"].is_null());
        let colored = cloud_json(Shape::Attractor, 10, 1);
        assert_eq!(colored["colors"].as_array().unwrap().len(), 30);
    }

    #[test]
    fn render_then_replay_gives_identical_png() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.png");
        let second = dir.path().join("b.png");
        let seed_path = dir.path().join("seed.json");

        let record = Seed {
            params: json!({"count": 150, "trail": 0.5}),
            frames: 20,
            ..Seed::new("flow", 40, 30, 9)
        };
        render_seed(&record, &first).unwrap();
        fs::write(&seed_path, serde_json::to_string(&record).unwrap()).unwrap();

        let replayed = read_seed(&seed_path).unwrap();
        assert_eq!(replayed, record);
        render_seed(&replayed, &second).unwrap();
        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn missing_seed_file_is_io_error() {
        let err = read_seed(Path::new("/nonexistent/seed.json")).unwrap_err();
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn malformed_seed_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(&path, r#"{"engine": "flow"}"#).unwrap();
        assert_eq!(read_seed(&path).unwrap_err().exit_code(), 12);
    }
}
