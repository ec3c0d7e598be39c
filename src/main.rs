use std::io::Read;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dotgraph", about = "Load a DOT graph into an attributed graph model")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    file: Option<std::path::PathBuf>,

    /// What to print once the graph is built
    #[arg(long, short = 'f', value_enum, default_value_t = Format::Summary)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Element counts and layout size
    Summary,
    /// The graph written back as DOT
    Dot,
    /// Plain-text listing of vertices, subgraphs and edges
    Text,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let input = match cli.file {
        Some(path) => std::fs::read_to_string(&path).unwrap_or_else(|e| {
            eprintln!("ERROR: failed to read {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
                eprintln!("ERROR: failed to read stdin: {e}");
                std::process::exit(1);
            });
            buf
        }
    };

    match dotgraph::parse_dot_graph(&input) {
        Ok(graph) => match cli.format {
            Format::Summary => println!("{}", dotgraph::summarize(&graph)),
            Format::Dot => print!("{}", dotgraph::write_dot(&graph)),
            Format::Text => print!("{graph}"),
        },
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}
