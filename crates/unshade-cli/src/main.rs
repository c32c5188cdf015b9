use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use unshade_core::apply::apply_correction;
use unshade_core::color::lightness_plane;
use unshade_core::diagnostics::correction_metrics;
use unshade_core::estimator::estimate;
use unshade_core::imageops::gaussian_blur;
use unshade_core::pattern::{pattern_strength, PATTERN_THRESHOLD};
use unshade_core::region::extract_region;
use unshade_core::{Mode, StrengthSettings};
use unshade_cli::{load_raster, parse_selection, parse_strength, save_raster};

#[derive(Parser)]
#[command(name = "unshade")]
#[command(version, about = "Fabric lighting-gradient removal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove the lighting gradient from an image
    Process {
        /// Input image file (JPEG or PNG)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file; format follows the extension
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,

        /// Selection rectangle, normalized "left,top,width,height"
        #[arg(long, value_name = "L,T,W,H", default_value = "0,0,1,1")]
        selection: String,

        /// Estimation mode: "uniform" or "advanced"
        #[arg(short, long, value_name = "MODE", default_value = "advanced")]
        mode: String,

        /// Correction strength (0-1)
        #[arg(long, value_name = "N", default_value = "0.5")]
        gradient_strength: String,

        /// Brightness preservation (0-1)
        #[arg(long, value_name = "N", default_value = "0.8")]
        brightness_preservation: String,

        /// Color preservation (0-1); values above 0.5 blend back toward
        /// the original
        #[arg(long, value_name = "N", default_value = "0.9")]
        color_preservation: String,
    },

    /// Analyze a selection without modifying the image
    Analyze {
        /// Input image file (JPEG or PNG)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Selection rectangle, normalized "left,top,width,height"
        #[arg(long, value_name = "L,T,W,H", default_value = "0,0,1,1")]
        selection: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Process {
            input,
            out,
            selection,
            mode,
            gradient_strength,
            brightness_preservation,
            color_preservation,
        } => cmd_process(
            input,
            out,
            &selection,
            &mode,
            &gradient_strength,
            &brightness_preservation,
            &color_preservation,
        ),
        Commands::Analyze { input, selection } => cmd_analyze(input, &selection),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_process(
    input: PathBuf,
    out: PathBuf,
    selection: &str,
    mode: &str,
    gradient_strength: &str,
    brightness_preservation: &str,
    color_preservation: &str,
) -> Result<(), String> {
    let selection = parse_selection(selection)?;
    let mode: Mode = mode.parse()?;
    let settings = StrengthSettings {
        gradient_strength: parse_strength(gradient_strength)?,
        brightness_preservation: parse_strength(brightness_preservation)?,
        color_preservation: parse_strength(color_preservation)?,
    };

    println!("Processing {} ({} mode)...", input.display(), mode.as_str());
    let image = load_raster(&input)?;
    let region = extract_region(&image, &selection);
    println!("Selection area: {}x{}", region.width, region.height);

    let map = estimate(&region, mode);
    let corrected = apply_correction(&image, &map, mode, &settings);

    let metrics = correction_metrics(&image, &corrected);
    println!(
        "Texture preservation: {:.3} (target: >0.8)",
        metrics.texture_ratio
    );
    println!(
        "Lighting uniformity improvement: {:.3}",
        metrics.uniformity_improvement
    );
    println!(
        "Brightness: {:.1} -> {:.1}",
        metrics.brightness_before, metrics.brightness_after
    );

    save_raster(&corrected, &out)?;
    println!("Wrote {}", out.display());
    Ok(())
}

fn cmd_analyze(input: PathBuf, selection: &str) -> Result<(), String> {
    let selection = parse_selection(selection)?;
    let image = load_raster(&input)?;
    let region = extract_region(&image, &selection);
    println!("Selection area: {}x{}", region.width, region.height);

    if region.width < 50 || region.height < 50 {
        println!("Region too small for pattern analysis (< 50x50); advanced mode would use the conservative correction");
        return Ok(());
    }

    let lightness = lightness_plane(&region);
    let lighting = gaussian_blur(&lightness, 31, 8.0);
    let residual = lightness.sub(&lighting);
    let strength = pattern_strength(&residual);

    println!("Pattern strength: {:.3}", strength);
    if strength > PATTERN_THRESHOLD {
        println!("Strongly patterned (advanced mode would use gentle correction)");
    } else {
        println!("Weakly patterned (advanced mode would use standard correction)");
    }
    Ok(())
}
