//! Blockdown - a block-structured markdown editor for the terminal.
//!
//! # Usage
//!
//! ```bash
//! blockdown
//! blockdown 'https://blockdown.invalid/?q=H4sIAAAA...'
//! blockdown --print html > page.html
//! ```

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use blockdown::app::App;
use blockdown::config::{
    ConfigFlags, PrintFormat, Settings, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};
use blockdown::document::{DocumentController, DocumentOptions};
use blockdown::logging::{self, LogTarget};
use blockdown::persist::{Codec, GzipBase64Codec, LinkFileLocation, Location};
use blockdown::render::HtmlRenderer;

/// A block-structured markdown editor with shareable links
#[derive(Parser, Debug)]
#[command(name = "blockdown", version, about, long_about = None)]
struct Cli {
    /// Share link (or bare token) to open instead of the last saved document
    #[arg(value_name = "LINK")]
    link: Option<String>,

    /// Quiet period in milliseconds before an edit is saved
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Line length used to count wrapped rows in the block being edited
    #[arg(long, value_name = "COLUMNS")]
    line_length: Option<NonZeroUsize>,

    /// File holding the current share link
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Directory for Ctrl-s exports
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Base URL that share links are built on
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `blockdown=trace` (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Print the saved document and exit instead of editing
    #[arg(long, value_enum, value_name = "FORMAT")]
    print: Option<PrintFormat>,

    /// Save current command-line flags as defaults in the global config
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in the global config
    #[arg(long)]
    clear: bool,
}

impl Cli {
    fn config_flags(&self) -> ConfigFlags {
        ConfigFlags {
            debounce_ms: self.debounce_ms,
            line_length: self.line_length.map(NonZeroUsize::get),
            state_file: self.state_file.clone(),
            export_dir: self.export_dir.clone(),
            base_url: self.base_url.clone(),
            log_file: self.log_file.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

/// Decode the stored document into the requested output format.
fn document_output(settings: &Settings, link: Option<&str>, format: PrintFormat) -> Result<String> {
    let mut location = LinkFileLocation::new(&settings.state_file, settings.base_url.clone());
    if let Some(link) = link {
        location = location.with_initial_link(link);
    }
    let content = match location.load() {
        Some(token) => GzipBase64Codec::default()
            .decode(&token)
            .context("Saved document is unreadable")?,
        None => String::new(),
    };

    let output = match format {
        PrintFormat::Markdown => content,
        PrintFormat::Html => {
            let options = DocumentOptions {
                debounce_ms: settings.debounce_ms,
                line_length: settings.line_length,
            };
            DocumentController::from_content(&content, options)
                .blocks()
                .iter()
                .map(|block| block.render(&HtmlRenderer))
                .collect()
        }
    };
    Ok(output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.config_flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let settings = file_flags.union(&cli_flags).settings();

    logging::init(
        settings.log_level.as_deref(),
        &LogTarget::for_session(settings.log_file.clone(), cli.print.is_none()),
    )?;

    if let Some(format) = cli.print {
        print!("{}", document_output(&settings, cli.link.as_deref(), format)?);
        return Ok(());
    }

    let app = App::new(settings)
        .with_initial_link(cli.link)
        .with_config_paths(
            Some(global_path),
            local_path.exists().then_some(local_path),
        );

    if let Some(link) = app.run().context("Application error")? {
        println!("{link}");
    }
    Ok(())
}
