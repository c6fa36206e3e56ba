use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use particle_box::physics::{sample_series, BoxParams, SampledSeries, DEFAULT_LENGTH, MIN_LEVEL};
use particle_box::{web, Config};

#[derive(Parser)]
#[command(name = "particle-box")]
#[command(author, version, about = "Wave pattern visualizer for a particle in a box")]
#[command(propagate_version = true)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true, env = "PARTICLE_BOX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the interactive page
    Serve {
        /// Host address to bind to
        #[arg(long, env = "PARTICLE_BOX_HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "PARTICLE_BOX_PORT")]
        port: Option<u16>,
    },

    /// Print the sampled wave and density series
    Sample {
        /// Quantum number n (1 to 10)
        #[arg(short = 'n', long, default_value_t = MIN_LEVEL)]
        level: u32,

        /// Box length L
        #[arg(short = 'L', long, default_value_t = DEFAULT_LENGTH)]
        length: f64,

        /// Apply the sqrt(2/L) factor
        #[arg(long)]
        normalize: bool,

        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Serve { host, port } => {
            web::run(config.with_server(host, port)).await?;
        }
        Commands::Sample {
            level,
            length,
            normalize,
            format,
        } => {
            let params = BoxParams::new(level, length, normalize)?;
            let series = sample_series(params);
            let mut out = std::io::stdout().lock();
            match format {
                Format::Csv => write_csv(&mut out, &series)?,
                Format::Json => {
                    serde_json::to_writer_pretty(&mut out, &series)?;
                    writeln!(out)?;
                }
            }
        }
    }

    Ok(())
}

fn write_csv(out: &mut impl Write, series: &SampledSeries) -> std::io::Result<()> {
    writeln!(out, "x,psi,density")?;
    for (x, psi, prob) in series.points() {
        writeln!(out, "{x:.6},{psi:.6},{prob:.6}")?;
    }
    Ok(())
}
