//! idlgate CLI
//!
//! Compile IDL schemas, list their topics, and validate JSON payloads.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use idlgate::{Bridge, UnknownFieldPolicy};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "idlgate")]
#[command(about = "Compile IDL schemas and validate topic payloads", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an IDL file and emit the canonical schema document
    Compile {
        /// Input IDL file
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the topics a schema declares, in declaration order
    Topics {
        /// Input IDL file
        #[arg(short, long)]
        schema: PathBuf,
    },

    /// Validate a JSON payload against a topic
    Validate {
        /// Input IDL file
        #[arg(short, long)]
        schema: PathBuf,

        /// Topic (struct) name the payload claims to match
        #[arg(short, long)]
        topic: String,

        /// JSON payload file
        #[arg(short, long)]
        payload: PathBuf,

        /// Ignore payload keys the schema does not declare
        #[arg(long)]
        lenient: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Compile { input, output } => {
            let source = fs::read_to_string(&input)?;
            let bridge = Bridge::from_source(&source)?;
            let document = serde_json::to_string_pretty(&bridge.schema_document())?;
            match output {
                Some(path) => {
                    fs::write(&path, document)?;
                    println!("Compiled {} -> {}", input.display(), path.display());
                }
                None => println!("{}", document),
            }
            Ok(())
        }

        Commands::Topics { schema } => {
            let source = fs::read_to_string(&schema)?;
            let bridge = Bridge::from_source(&source)?;
            for topic in bridge.list_topics() {
                println!("{}", topic);
            }
            Ok(())
        }

        Commands::Validate {
            schema,
            topic,
            payload,
            lenient,
        } => {
            let source = fs::read_to_string(&schema)?;
            let policy = if lenient {
                UnknownFieldPolicy::Lenient
            } else {
                UnknownFieldPolicy::Strict
            };
            let bridge = Bridge::from_source_with_policy(&source, policy)?;
            let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&payload)?)?;

            match bridge.validate(&topic, &value) {
                Ok(validated) => {
                    println!("{}", serde_json::to_string_pretty(&validated.to_json())?);
                    Ok(())
                }
                Err(violations) => {
                    // Full report, machine-readable, one round trip.
                    eprintln!("{}", serde_json::to_string_pretty(&violations)?);
                    std::process::exit(1);
                }
            }
        }
    }
}
