use clap::Parser;
use env_logger::{Builder, Env};
use scenarioaday::{config, export, output, serve, site::Site};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scenarioaday")]
#[command(about = "Render a dated archive of scenarios as a static site or a live server")]
#[command(long_about = "\
Render a dated archive of scenarios as a static site or a live server

Each scenario is a markdown file with a metadata block, paired with a code
snippet of the same name:

  scenarioADay/
  └── 2024/                      # year
      └── 01/                    # month
          └── 15/                # day
              ├── retry.md       # metadata block + markdown description
              └── retry.star     # code snippet

Without --build the site is served live and re-read on every request.
With --build it is written once to --output, together with static/.

Run with --gen-config to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Build a static copy of the site instead of serving it
    #[arg(long)]
    build: bool,

    /// Output directory for --build
    #[arg(long, default_value = "_site")]
    output: PathBuf,

    /// Address to listen on when serving (`:PORT` binds all interfaces)
    #[arg(long, default_value = ":3000")]
    listen: String,

    /// Site config file (optional; defaults apply when missing)
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Content directory (overrides `content_root` from the config)
    #[arg(long)]
    content: Option<PathBuf>,

    /// Static assets directory (overrides `static_dir` from the config)
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Print a stock config.toml with all options documented and exit
    #[arg(long)]
    gen_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    Builder::from_env(Env::default().filter_or("RUST_LOG", "info")).init();

    let mut site_config = config::load_config(&cli.config)?;
    if let Some(content) = cli.content {
        site_config.content_root = content;
    }
    if let Some(static_dir) = cli.static_dir {
        site_config.static_dir = static_dir;
    }
    site_config.validate()?;

    let site = Site::from_config(&site_config)?;

    if cli.build {
        println!("==> Building {} → {}", site.content_root().display(), cli.output.display());
        let summary = export::export(&site, &cli.output)?;
        output::print_export_output(&summary, &cli.output);
    } else {
        serve::serve(site, &cli.listen)?;
    }

    Ok(())
}
