//! CLI for eye dataset preparation and eye feature extraction.
//!
//! Usage:
//!   eye-features prepare <source> <output>                      # Build train/val label set
//!   eye-features analyze <image> --detections boxes.json        # Human-readable output
//!   eye-features analyze <image> --detections boxes.json --json # JSON output
//!   eye-features analyze <image> -d boxes.json -o result.json   # Save to file

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use eye_features::{
    convert_dataset, AnalysisResult, DatasetConfig, EyeAnalyzer, StaticDetections,
};
use log::{debug, LevelFilter};

#[derive(Parser, Debug)]
#[command(name = "eye-features")]
#[command(author, version, about = "Eye detection labels and eye feature metrics", long_about = None)]
struct Args {
    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert 68-point landmark annotations into eye detection labels
    Prepare {
        /// Directory searched recursively for images and their .pts annotations
        source: PathBuf,

        /// Dataset output directory
        output: PathBuf,

        /// Fraction of images (in sorted path order) assigned to the train split
        #[arg(long, default_value = "0.8")]
        train_fraction: f64,

        /// Remove the output directory before writing (required if it is not empty)
        #[arg(long)]
        clean: bool,

        /// Print the run report as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Measure eye openness, brightness and symmetry from detector boxes
    Analyze {
        /// Input image file
        image: PathBuf,

        /// JSON file with detector output: [{"bbox": [x1, y1, x2, y2], "confidence": c}, ...]
        #[arg(short, long)]
        detections: PathBuf,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(args.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Prepare {
            source,
            output,
            train_fraction,
            clean,
            json,
        } => {
            let config = DatasetConfig {
                train_fraction,
                clean_output: clean,
                ..Default::default()
            };
            let report = convert_dataset(&source, &output, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Data preparation complete: {}", report);
            }
        }
        Command::Analyze {
            image,
            detections,
            json,
            output,
        } => {
            let detector = StaticDetections::load(&detections)?;
            debug!("loaded {} detections from {:?}", detector.len(), detections);

            let analyzer = EyeAnalyzer::new(detector);
            let result = analyzer.analyze_path(&image)?;

            let output_str = if json {
                serde_json::to_string_pretty(&result)?
            } else {
                format_human_readable(&image, &result)
            };

            if let Some(ref path) = output {
                std::fs::write(path, &output_str)?;
                debug!("output written to {:?}", path);
            } else {
                println!("{}", output_str);
            }
        }
    }

    Ok(())
}

fn format_human_readable(image: &Path, result: &AnalysisResult) -> String {
    let mut s = String::new();

    s.push_str(&format!("Image: {}\n", image.display()));
    s.push_str(&format!("Eyes detected: {}\n", result.eye_count));

    if result.features.is_empty() {
        s.push_str("\nNo eyes found.\n");
        return s;
    }

    for (i, feature) in result.features.iter().enumerate() {
        let b = &feature.bbox;
        s.push_str(&format!("\n--- Eye {} ---\n", i + 1));
        s.push_str(&format!(
            "Bounding box: ({:.1}, {:.1}) - ({:.1}, {:.1})\n",
            b.x_min, b.y_min, b.x_max, b.y_max
        ));
        s.push_str(&format!("Confidence: {:.2}\n", feature.confidence));
        s.push_str(&format!("Openness:   {:.3}\n", feature.openness));
        s.push_str(&format!("Brightness: {:.1}\n", feature.brightness));
    }

    if result.eye_count == 2 {
        s.push_str(&format!("\nSymmetry: {:.3}\n", result.symmetry_score));
    } else {
        s.push_str(&format!(
            "\nSymmetry: {:.3} (default, needs exactly 2 eyes)\n",
            result.symmetry_score
        ));
    }

    s
}
