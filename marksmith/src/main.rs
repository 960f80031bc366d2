use std::{
  fs,
  io::{self, Write},
  path::Path,
};

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use marksmith::{
  cli::{Cli, Commands, RenderFlags},
  config::Config,
};

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Commands::Init { output, force } => init_config(output, *force),
    Commands::Render {
      input,
      output,
      config_file,
      flags,
    } => render(input, output.as_deref(), config_file.as_deref(), flags),
  }
}

fn init_config(output: &Path, force: bool) -> Result<()> {
  // Check if file already exists and that we're not forcing overwrite
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  // Create parent directories if needed
  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(output).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })?;

  info!(
    "Configuration file created successfully. Edit it to customize rendering."
  );
  Ok(())
}

fn render(
  input: &Path,
  output: Option<&Path>,
  config_file: Option<&Path>,
  flags: &RenderFlags,
) -> Result<()> {
  let mut config = Config::load(config_file)?;
  config.merge_with_cli(flags);
  log::debug!("Effective configuration: {config:?}");

  let renderer = config.renderer();
  match output {
    Some(output) => {
      renderer
        .render_file_to_file(input, &config.extensions, &config.html, output)
        .wrap_err_with(|| {
          format!(
            "Failed to render {} to {}",
            input.display(),
            output.display()
          )
        })?;
      info!("Wrote {}", output.display());
    },
    None => {
      let html = renderer
        .render_file(input, &config.extensions, &config.html)
        .wrap_err_with(|| format!("Failed to render {}", input.display()))?;
      io::stdout()
        .lock()
        .write_all(html.as_bytes())
        .wrap_err("Failed to write HTML to stdout")?;
    },
  }

  Ok(())
}
