//! Route-table topology console.
//!
//! Takes a coordinator command response (hex payload plus command code, or a
//! raw response frame), and when it is a routing-table response draws the
//! mesh topology as a layered diagram.

use anyhow::{bail, Context, Result};
use clap::Parser;
use meshmap_render::{DiagramOutcome, OutputFormat, RouteDiagram, SvgFile};
use meshmap_wire::CommandResponse;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod logging;

use config::MeshMapConfig;
use logging::MeshMapLogFormatter;

/// Draw the routing topology reported by a mesh coordinator
#[derive(Parser, Debug)]
#[command(name = "meshmap", version, about = "Route-table topology console for metering meshes")]
struct Args {
    /// Response parameters as hex, e.g. 0201020304000000...
    #[arg(long, conflicts_with_all = ["payload_file", "frame"])]
    payload: Option<String>,

    /// File holding the response parameters as hex ("-" for stdin)
    #[arg(long, conflicts_with = "frame")]
    payload_file: Option<PathBuf>,

    /// Raw coordinator response frame as hex (header, code, parameters, checksum)
    #[arg(long)]
    frame: Option<String>,

    /// Command code the parameters answer (frames carry their own)
    #[arg(long, default_value = "A2", conflicts_with = "frame")]
    command_code: String,

    /// Output file (overrides the config file)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format: svg or json (overrides the config file)
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Configuration file path
    #[arg(long, default_value = "meshmap.yaml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::new("warn")
        .add_directive(format!("meshmap={}", args.log_level).parse()?)
        .add_directive(format!("meshmap_wire={}", args.log_level).parse()?)
        .add_directive(format!("meshmap_topology={}", args.log_level).parse()?)
        .add_directive(format!("meshmap_render={}", args.log_level).parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .event_format(MeshMapLogFormatter::new("meshmap".to_string()))
        .init();

    info!(component = "cli", "Starting meshmap v{}", env!("CARGO_PKG_VERSION"));

    let mut config = MeshMapConfig::load_from_file(&args.config)?;
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }

    let response = read_response(&args)?;
    info!(
        component = "cli",
        "Response {} ({}), {} parameter bytes",
        response.code,
        response.code.name(),
        response.parameters.len()
    );

    let mut diagram = RouteDiagram::new(config.geometry, config.theme.clone());
    let mut target = SvgFile::new(&config.output.path, config.output.format);

    let outcome = diagram
        .handle_response(&response, &mut target)
        .context("failed to draw routing table")?;

    match outcome {
        DiagramOutcome::Ignored(code) => {
            println!(
                "Response {} ({}) carries no routing table; nothing drawn",
                code,
                code.name()
            );
        }
        DiagramOutcome::Cleared => {
            println!("Routing table is empty; wrote placeholder to {}", target.path().display());
        }
        DiagramOutcome::Rendered {
            entries,
            levels,
            placed,
            unplaced,
        } => {
            println!("Decoded {} route entries", entries);
            for edge in diagram.graph().edges() {
                println!("  {} -> {}", edge.source, edge.target);
            }

            if let Some(layout) = diagram.layout() {
                for (number, nodes) in layout.levels().iter() {
                    let names: Vec<String> = nodes.iter().map(ToString::to_string).collect();
                    println!("Level {}: {}", number, names.join(", "));
                }
                if !layout.unplaced().is_empty() {
                    let names: Vec<String> =
                        layout.unplaced().iter().map(ToString::to_string).collect();
                    println!("Unreachable: {}", names.join(", "));
                }
            }

            println!(
                "Drew {} nodes on {} levels ({} unreachable) to {}",
                placed,
                levels,
                unplaced,
                target.path().display()
            );
        }
    }

    Ok(())
}

/// Build the command response from whichever input was given
fn read_response(args: &Args) -> Result<CommandResponse> {
    if let Some(frame) = &args.frame {
        let bytes = hex::decode(frame.trim()).context("response frame is not valid hex")?;
        return CommandResponse::from_frame(&bytes).context("malformed response frame");
    }

    let payload = match (&args.payload, &args.payload_file) {
        (Some(payload), _) => payload.clone(),
        (None, Some(path)) if path.as_os_str() == "-" => read_stdin()?,
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read payload file {:?}", path))?,
        (None, None) => bail!("one of --payload, --payload-file or --frame is required"),
    };

    CommandResponse::from_hex(&args.command_code, &payload).context("invalid command response")
}

fn read_stdin() -> Result<String> {
    let mut payload = String::new();
    std::io::stdin()
        .read_to_string(&mut payload)
        .context("failed to read payload from stdin")?;
    Ok(payload)
}
