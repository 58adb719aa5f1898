use clap::{Parser, Subcommand};
use std::path::PathBuf;

use folio::config::load_config;
use folio::site::Site;

#[derive(Parser)]
#[command(name = "folio-cli")]
#[command(about = "Offline inspection tools for a Folio site", long_about = None)]
struct Cli {
    /// Path to the site configuration file.
    #[arg(short, long, default_value = "folio.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and build the site
    Check,
    /// List registered routes in match order
    Routes,
    /// List content types
    Types,
    /// Show which route and controller a path resolves to
    Match { path: String },
    /// Flush one cache store, or every store with --all
    Flush {
        store: Option<String>,
        #[arg(long)]
        all: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let site = Site::build(config)?;

    match cli.command {
        Commands::Check => {
            println!(
                "ok: {} content types, {} routes",
                site.types().len(),
                site.routes().len()
            );
        }
        Commands::Routes => {
            for route in site.routes().iter() {
                println!("{:<40} {:<28} {}", route.uri(), route.name(), route.controller());
            }
        }
        Commands::Types => {
            for ty in site.types().sort_by_path() {
                let mut flags = Vec::new();
                if ty.has_routing() {
                    flags.push("routing");
                }
                if ty.is_taxonomy() {
                    flags.push("taxonomy");
                }
                if ty.has_feed() {
                    flags.push("feed");
                }
                if !ty.is_public() {
                    flags.push("private");
                }
                println!(
                    "{:<12} path={:<16} uri={:<16} {}",
                    ty.name(),
                    ty.path(),
                    ty.uri(),
                    flags.join(",")
                );
            }
        }
        Commands::Match { path } => match site.router().match_path(&path) {
            Some(found) => {
                println!("route:      {}", found.route.uri());
                println!("name:       {}", found.route.name());
                println!("controller: {}", found.route.controller());
                println!("tier:       {:?}", found.tier);
                for (key, value) in found.params.iter() {
                    println!("param:      {key} = {value}");
                }
            }
            None => {
                eprintln!("no route matches {path}");
                std::process::exit(1);
            }
        },
        Commands::Flush { store, all } => {
            if all {
                site.cache().purge()?;
                println!("flushed all stores");
            } else if let Some(store) = store {
                if site.cache().flush(&store)? {
                    println!("flushed {store}");
                } else {
                    eprintln!("no cache store named {store}");
                    std::process::exit(1);
                }
            } else {
                eprintln!("name a store or pass --all");
                std::process::exit(2);
            }
        }
    }

    Ok(())
}
