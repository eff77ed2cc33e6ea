//! Line-oriented slide deck editor.

mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{execute, Command, Flow};
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::PathBuf;
use zenslide_core::{Capability, Editor, Theme};
use zenslide_pdf::{load_fonts, PdfExporter};
use zenslide_pptx::PptxExporter;

/// Compose slide decks from templates, present them and export to PDF or PPTX.
#[derive(Parser, Debug)]
#[command(name = "zenslide")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Initial theme (slate, dark, cream, blue)
    #[arg(short, long, default_value = "slate")]
    theme: String,

    /// Directory exported files are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Read commands from a file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Extra font directory for PDF capture
    #[arg(long)]
    font_dir: Vec<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    Theme::lookup(&args.theme).map_err(|e| anyhow::anyhow!("{}", e))?;
    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory: {}", args.output_dir.display())
    })?;

    let mut editor = Editor::new().with_output_dir(&args.output_dir);
    editor.set_theme(&args.theme);
    load_libraries(&mut editor, &args.font_dir);

    let interactive = args.script.is_none() && io::stdin().is_terminal();
    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    if interactive {
        println!("ZenSlide. Type 'help' for commands.");
        prompt()?;
    }

    for (number, line) in input.lines().enumerate() {
        let line = line.context("Failed to read command")?;
        let flow = match Command::parse(&line) {
            Ok(Some(command)) => execute(&mut editor, command).unwrap_or_else(|e| {
                eprintln!("Error: {:#}", e);
                Flow::Continue
            }),
            Ok(None) => Flow::Continue,
            Err(e) => {
                if args.script.is_some() {
                    eprintln!("Line {}: {:#}", number + 1, e);
                } else {
                    eprintln!("{:#}", e);
                }
                Flow::Continue
            }
        };

        for message in editor.notifier_mut().take_unseen() {
            println!("» {}", message);
        }
        if flow == Flow::Quit {
            break;
        }
        if interactive {
            prompt()?;
        }
    }

    Ok(())
}

fn prompt() -> Result<()> {
    print!("zenslide> ");
    io::stdout().flush()?;
    Ok(())
}

/// Load export backends once. A failed load stays failed for the session.
fn load_libraries(editor: &mut Editor, font_dirs: &[PathBuf]) {
    editor
        .libraries_mut()
        .mark_ready(Capability::PresentationDocument);
    editor.register_exporter(Box::new(PptxExporter::new()));

    match load_fonts(font_dirs).and_then(PdfExporter::new) {
        Ok(exporter) => {
            editor.libraries_mut().mark_ready(Capability::Rasterizer);
            editor.libraries_mut().mark_ready(Capability::PagedDocument);
            editor.register_exporter(Box::new(exporter));
            log::debug!("PDF export ready");
        }
        Err(e) => {
            log::warn!("PDF export unavailable: {}", e);
            let reason = e.to_string();
            editor
                .libraries_mut()
                .mark_failed(Capability::Rasterizer, reason.clone());
            editor
                .libraries_mut()
                .mark_failed(Capability::PagedDocument, reason);
        }
    }
}
