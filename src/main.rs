use brewdocs::render::Renderer;
use brewdocs::{config, generate, join, load, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "brewdocs")]
#[command(about = "Generate brewery and beer documents from the Open Beer Database")]
#[command(long_about = "\
Generate brewery and beer documents from the Open Beer Database

The source directory holds the five CSV exports (and optionally brewdocs.toml):

  beers.csv                 # id, brewery_id, name, cat_id, style_id, abv, ...
  breweries.csv             # id, name, address1, ..., descript (windows-1252)
  breweries_geocode.csv     # id, brewery_id, latitude, longitude, accuracy
  categories.csv            # id, cat_name, last_mod
  styles.csv                # id, cat_id, style_name, last_mod

Output:

  breweries/
  ├── acme-brewing/
  │   ├── _index.md         # Brewery document (written once, never overwritten)
  │   ├── pale-ale.md       # One document per beer
  │   └── pale-ale-2.md     # Second beer whose name slugifies the same way
  └── ...

Beers whose brewery_id matches no brewery are skipped. Set RUST_LOG=debug
to trace every document written.

Run 'brewdocs gen-config' to print a documented brewdocs.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding the CSV tables and brewdocs.toml
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Directory the breweries/ tree is created in
    #[arg(long, default_value = ".", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load, join and write the document tree
    Build {
        /// Remove the existing tree first so suffixes start from scratch
        #[arg(long)]
        clean: bool,
    },
    /// Load and join without writing; list beers with no brewery
    Check,
    /// Print a stock brewdocs.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Build { clean } => {
            let config = config::load_config(&cli.source)?;
            let renderer = Renderer::new(&cli.source, &config.templates)?;

            println!("==> Loading {}", cli.source.display());
            let dataset = load::load(&cli.source, &config.input)?;
            output::print_load_output(&dataset, &config.input);

            let root = cli.output.join(&config.output.section);
            if clean {
                generate::clean(&root)?;
            } else {
                let existing = generate::existing_documents(&root, &config.output.extension);
                if existing > 0 {
                    tracing::warn!(
                        existing,
                        root = %root.display(),
                        "output tree is not empty; new beer documents may get shifted -N suffixes (use --clean)"
                    );
                }
            }

            println!("==> Generating {}", root.display());
            let materializer = generate::Materializer::new(
                &root,
                &config.output.extension,
                &config.slug.lang,
                &renderer,
            );
            let report = generate::generate(&dataset, &materializer)?;
            output::print_build_output(&report, &root);
            println!("==> Build complete: {}", root.display());
        }
        Command::Check => {
            let config = config::load_config(&cli.source)?;
            println!("==> Checking {}", cli.source.display());
            let dataset = load::load(&cli.source, &config.input)?;
            output::print_load_output(&dataset, &config.input);
            output::print_check_output(&join::unmatched(&dataset));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
