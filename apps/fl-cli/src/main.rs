use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use fl_app::{AppError, AppResult, TraceRequest, project_service, query, trace_service};

#[derive(Parser)]
#[command(name = "fieldline")]
#[command(about = "Field line tracing through gridded COMSOL exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Describe the project's field export
    Inspect {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Trace field lines from the project's seeds
    Trace {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Trace only this seed
        #[arg(long)]
        seed: Option<String>,
        /// Override the project step length
        #[arg(long)]
        step: Option<f64>,
        /// Override the project step cap
        #[arg(long)]
        max_steps: Option<usize>,
        /// Print every point as it is traced
        #[arg(long)]
        print_points: bool,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// Interpolate the field at a point
    Sample {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Coordinates as x,y or x,y,z
        #[arg(long, allow_hyphen_values = true)]
        point: String,
    },
    /// List cached runs for a project
    Runs {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export one traced line from a run as CSV
    ExportLine {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Seed ID of the line
        seed_id: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Inspect { project_path } => cmd_inspect(&project_path),
        Commands::Trace {
            project_path,
            seed,
            step,
            max_steps,
            print_points,
            no_cache,
        } => {
            let request = TraceRequest {
                project_path: &project_path,
                seed_id: seed.as_deref(),
                use_cache: !no_cache,
                emit_points: print_points,
                step_length: step,
                max_steps,
            };
            cmd_trace(&request)
        }
        Commands::Sample {
            project_path,
            point,
        } => cmd_sample(&project_path, &point),
        Commands::Runs { project_path } => cmd_runs(&project_path),
        Commands::ShowRun {
            project_path,
            run_id,
        } => cmd_show_run(&project_path, &run_id),
        Commands::ExportLine {
            project_path,
            run_id,
            seed_id,
            output,
        } => cmd_export_line(&project_path, &run_id, &seed_id, output.as_deref()),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    println!("✓ Project is valid");
    println!("  Seeds: {}", project.seeds.len());
    Ok(())
}

fn cmd_inspect(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let summary = project_service::inspect_field(project_path, &project)?;

    println!("Field export: {}", summary.path.display());
    println!("  Dimension: {}", summary.dimension);
    println!("  Grid shape: {:?}", summary.shape);
    println!("  Extent: {:?}", summary.extent);
    if let Some(unit) = &summary.length_unit {
        println!("  Length unit: {}", unit);
    }
    println!("  Snapshots: {}", summary.snapshot_count);
    match summary.convention {
        Some(convention) => println!("  Components: {}", convention),
        None => println!("  Components: unavailable for the selected parameters"),
    }

    println!("\nVariables:");
    for variable in &summary.variables {
        println!("  {}", variable);
    }

    println!("\nColumns: {}", summary.columns.join(" | "));

    if !summary.sweep.is_empty() {
        println!("\nSweep parameters:");
        for (name, values) in &summary.sweep {
            println!("  {} = {:?}", name, values);
        }
    }
    Ok(())
}

fn cmd_trace(request: &TraceRequest) -> AppResult<()> {
    let response = trace_service::ensure_trace(request)?;

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Trace completed: {}", response.run_id);
    }
    println!("  Elapsed: {:.3} s", response.elapsed_s);

    for line in &response.manifest.lines {
        println!(
            "  {}: {} points, {} (length {:.6e})",
            line.seed_id, line.points, line.termination, line.arc_length
        );
    }
    Ok(())
}

fn cmd_sample(project_path: &Path, point: &str) -> AppResult<()> {
    let coords = query::parse_point(point)?;
    let project = project_service::load_project(project_path)?;
    let loaded = project_service::load_field(project_path, &project)?;
    let report = query::sample_point(&loaded.field, project.trace.edges.as_deref(), &coords)?;

    println!("Point: {:?}", report.point);
    println!("  Field: {:?}", report.value);
    println!("  Magnitude: {:.6e}", report.magnitude);
    println!("  Closest node: {:?}", report.closest_node);
    println!("  Inside box: {}", if report.inside { "yes" } else { "no" });
    Ok(())
}

fn cmd_runs(project_path: &Path) -> AppResult<()> {
    let runs = trace_service::list_runs(project_path)?;

    if runs.is_empty() {
        println!("No cached runs found");
    } else {
        println!("Cached runs:");
        for manifest in runs {
            println!(
                "  {} ({}, {} lines)",
                manifest.run_id,
                manifest.timestamp,
                manifest.lines.len()
            );
        }
    }
    Ok(())
}

fn cmd_show_run(project_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, _records) = trace_service::load_run(project_path, run_id)?;

    println!("\nRun Summary:");
    println!("  Project: {}", manifest.project_name);
    println!("  Timestamp: {}", manifest.timestamp);
    println!("  Field: {}", manifest.field_path);
    for (name, value) in &manifest.parameters {
        println!("  {} = {}", name, value);
    }
    println!("  Step length: {:e}", manifest.step_length);
    if let Some(max) = manifest.max_steps {
        println!("  Max steps: {}", max);
    }
    println!("  Total points: {}", manifest.total_points());

    println!("\nLines:");
    for line in &manifest.lines {
        println!(
            "  {}: {} points, {} (length {:.6e})",
            line.seed_id, line.points, line.termination, line.arc_length
        );
    }
    Ok(())
}

fn cmd_export_line(
    project_path: &Path,
    run_id: &str,
    seed_id: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    let (_manifest, records) = trace_service::load_run(project_path, run_id)?;
    let record = records
        .iter()
        .find(|r| r.seed_id == seed_id)
        .ok_or_else(|| AppError::SeedNotFound(seed_id.to_string()))?;

    let axes = ["x", "y", "z"];
    let dimension = record.points.first().map_or(0, Vec::len).min(axes.len());
    let mut csv = format!("index,{}\n", axes[..dimension].join(","));
    for (i, row) in record.points.iter().enumerate() {
        let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        csv.push_str(&format!("{},{}\n", i, values.join(",")));
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} points to {}",
            record.points.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }
    Ok(())
}
