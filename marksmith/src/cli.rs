use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command line interface for marksmith
#[derive(Parser, Debug)]
#[command(author, version, about = "marksmith: Markdown to HTML")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,
}

/// All supported subcommands for the marksmith CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new marksmith configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "marksmith.toml")]
    output: PathBuf,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Render a Markdown file to HTML.
  Render {
    /// Markdown file to render.
    input: PathBuf,

    /// File to write the HTML to. Prints to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to a configuration file. Defaults to a discovered
    /// `marksmith.toml`, if any.
    #[arg(short = 'c', long = "config-file")]
    config_file: Option<PathBuf>,

    #[command(flatten)]
    flags: RenderFlags,
  },
}

/// Toggles that turn on rendering features on top of the configuration file.
#[derive(Args, Debug, Default, Clone)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Each flag maps to an independent toggle"
)]
pub struct RenderFlags {
  /// Prepend a table of contents.
  #[arg(long)]
  pub toc: bool,

  /// Convert quotes, dashes and ellipses to typographic entities.
  #[arg(long)]
  pub smartypants: bool,

  /// Pass `$$...$$` and `$...$` math through untouched.
  #[arg(long)]
  pub math: bool,

  /// Do not parse emphasis inside words.
  #[arg(long)]
  pub no_intra_emphasis: bool,

  /// Enable pipe tables.
  #[arg(long)]
  pub tables: bool,

  /// Enable fenced code blocks.
  #[arg(long)]
  pub fenced_code: bool,

  /// Turn bare URLs into links.
  #[arg(long)]
  pub autolink: bool,

  /// Enable `~~strikethrough~~`.
  #[arg(long)]
  pub strikethrough: bool,

  /// Enable `^superscript^`.
  #[arg(long)]
  pub superscript: bool,

  /// Allow block elements without surrounding blank lines.
  #[arg(long)]
  pub lax_spacing: bool,

  /// Require a space after `#` in headings.
  #[arg(long)]
  pub space_headers: bool,

  /// Emit XHTML-style void elements such as `<br />`.
  #[arg(long)]
  pub xhtml: bool,

  /// Turn every newline inside a paragraph into `<br>`.
  #[arg(long)]
  pub hard_wrap: bool,

  /// Only keep links with http, https, ftp, mailto or relative URLs.
  #[arg(long)]
  pub safelink: bool,

  /// Drop raw HTML from the input.
  #[arg(long)]
  pub skip_html: bool,

  /// Drop raw `<style>` tags from the input.
  #[arg(long)]
  pub skip_style: bool,

  /// Drop images.
  #[arg(long)]
  pub skip_images: bool,

  /// Replace links with their text.
  #[arg(long)]
  pub skip_links: bool,

  /// Escape raw HTML instead of passing it through.
  #[arg(long)]
  pub escape: bool,

  /// Fail when any render buffer would grow past this many bytes.
  #[arg(long, value_name = "BYTES")]
  pub buffer_limit: Option<usize>,
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
