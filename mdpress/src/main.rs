use color_eyre::eyre::Result;
use log::LevelFilter;
use mdpress::{assemble, cli::Cli, config::Config};

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during configuration loading
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  // Create configuration from CLI and/or config file
  let config = Config::load(&cli)?;

  assemble::run(&config)
}
