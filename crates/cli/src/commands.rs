//! Editor shell commands.

use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use zenslide_core::html::{editor_page, presentation_page};
use zenslide_core::{
    list_all, render_at, Direction, Editor, ExportFormat, PresentationInput, RenderMode, Theme,
    Transition,
};
use zenslide_pptx::PptxParser;

/// A parsed shell command. Slide numbers are 1-based, as listed.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Templates,
    Themes,
    Add(String),
    Edit { field: String, value: String },
    Delete(Option<usize>),
    Move(Direction),
    Select(usize),
    Theme(String),
    List,
    Show(Option<usize>),
    Html(PathBuf),
    Present,
    Input(PresentationInput),
    Export(ExportFormat),
    Dump { view: bool },
    Inspect(PathBuf),
    Quit,
}

/// What the shell should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A double-quoted string with escapes, or a bare word.
static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""((?:[^"\\]|\\.)*)"|(\S+)"#).unwrap());

/// Expand `\n`, `\t`, `\"` and `\\` escapes.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Split a line into words; double quotes group, escapes expand.
pub fn tokenize(line: &str) -> Vec<String> {
    TOKEN_REGEX
        .captures_iter(line)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| unescape(m.as_str()))
        .collect()
}

/// The raw text after the first `skip` tokens of `line`, spacing kept.
fn raw_tail(line: &str, skip: usize) -> &str {
    let start = TOKEN_REGEX
        .find_iter(line)
        .nth(skip - 1)
        .map_or(line.len(), |m| m.end());
    line[start..].trim_start()
}

/// A field value: one fully quoted string, or the raw text as typed.
/// Escapes expand in both.
fn field_value(raw: &str) -> String {
    match TOKEN_REGEX.captures(raw) {
        Some(caps) if caps.get(0).is_some_and(|m| m.as_str() == raw) => match caps.get(1) {
            Some(quoted) => unescape(quoted.as_str()),
            None => unescape(raw),
        },
        _ => unescape(raw),
    }
}

fn slide_number(token: &str) -> Result<usize> {
    let n: usize = token
        .parse()
        .with_context(|| format!("'{}' is not a slide number", token))?;
    if n == 0 {
        bail!("Slide numbers start at 1");
    }
    Ok(n - 1)
}

fn export_format(token: &str) -> Result<ExportFormat> {
    ExportFormat::from_extension(token).ok_or_else(|| anyhow!("Unknown export format '{}'", token))
}

impl Command {
    /// Parse one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let tokens = tokenize(trimmed);
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(None);
        };
        let arg = |i: usize, what: &str| -> Result<&String> {
            rest.get(i)
                .ok_or_else(|| anyhow!("'{}' needs {}", name, what))
        };

        let command = match name.to_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "templates" => Self::Templates,
            "themes" => Self::Themes,
            "add" => Self::Add(arg(0, "a template id")?.clone()),
            "edit" | "set" => Self::Edit {
                field: arg(0, "a field key")?.clone(),
                value: field_value(raw_tail(trimmed, 2)),
            },
            "delete" | "rm" => Self::Delete(rest.first().map(|t| slide_number(t)).transpose()?),
            "up" => Self::Move(Direction::Up),
            "down" => Self::Move(Direction::Down),
            "select" | "go" => Self::Select(slide_number(arg(0, "a slide number")?)?),
            "theme" => Self::Theme(arg(0, "a theme id")?.clone()),
            "list" | "ls" => Self::List,
            "show" => Self::Show(rest.first().map(|t| slide_number(t)).transpose()?),
            "html" => Self::Html(PathBuf::from(arg(0, "an output path")?)),
            "present" => Self::Present,
            "next" => Self::Input(PresentationInput::Next),
            "click" => Self::Input(PresentationInput::Click),
            "prev" | "previous" => Self::Input(PresentationInput::Previous),
            "esc" | "escape" => Self::Input(PresentationInput::Escape),
            "close" => Self::Input(PresentationInput::Close),
            "key" => {
                let key = arg(0, "a key name")?;
                Self::Input(
                    PresentationInput::from_key(key)
                        .ok_or_else(|| anyhow!("Key '{}' does nothing here", key))?,
                )
            }
            "export" => Self::Export(export_format(arg(0, "pdf or pptx")?)?),
            "dump" => Self::Dump {
                view: rest.first().is_some_and(|t| t == "view"),
            },
            "inspect" => Self::Inspect(PathBuf::from(arg(0, "a file path")?)),
            "quit" | "exit" => Self::Quit,
            other => bail!("Unknown command '{}'. Try 'help'.", other),
        };
        Ok(Some(command))
    }
}

const HELP: &str = "\
templates                 list slide templates
themes                    list themes
add <TEMPLATE>            append a slide and select it
edit <field> <text...>    set a field of the active slide (\\n for new lines)
delete [n]                delete slide n (default: active)
up | down                 move the active slide
select <n>                make slide n active
theme <id>                switch theme
list                      list slides
show [n]                  show the fields of slide n (default: active)
html <path>               write an HTML preview of the current view
present                   start presenting at the active slide
next | click | prev       navigate while presenting
esc | close               stop presenting
key <name>                send a key (ArrowRight, ArrowLeft, Escape...)
export pdf|pptx           export the deck
dump [view]               print the deck (or the active slide view) as JSON
inspect <file>            read back an exported .pptx or .pdf
quit                      leave";

/// Run one command against the editor.
pub fn execute(editor: &mut Editor, command: Command) -> Result<Flow> {
    match command {
        Command::Help => println!("{}", HELP),
        Command::Templates => {
            for template in list_all() {
                println!(
                    "{:<11} {:<18} {}",
                    template.id,
                    template.display_name,
                    template.field_keys().join(", ")
                );
            }
        }
        Command::Themes => {
            let current = editor.store().theme().id;
            for theme in Theme::all() {
                let marker = if theme.id == current { '*' } else { ' ' };
                println!("{} {:<6} #{} on #{}", marker, theme.id, theme.text, theme.background);
            }
        }
        Command::Add(template) => {
            if editor.add_slide(&template).is_some() {
                print_list(editor);
            }
        }
        Command::Edit { field, value } => editor.edit_field(&field, &value),
        Command::Delete(index) => {
            let index = index.unwrap_or_else(|| editor.store().active_index());
            if editor.delete_slide(index) {
                print_list(editor);
            }
        }
        Command::Move(direction) => {
            if editor.move_active(direction) {
                print_list(editor);
            }
        }
        Command::Select(index) => editor.select(index),
        Command::Theme(id) => editor.set_theme(&id),
        Command::List => print_list(editor),
        Command::Show(index) => {
            let index = index.unwrap_or_else(|| editor.store().active_index());
            print_slide(editor, index)?;
        }
        Command::Html(path) => write_html(editor, &path)?,
        Command::Present => {
            editor.present();
            print_presentation(editor);
        }
        Command::Input(input) => {
            if !editor.presenter().is_active() {
                println!("Not presenting. Use 'present' first.");
                return Ok(Flow::Continue);
            }
            match editor.presentation_input(input) {
                Transition::At(_) => print_presentation(editor),
                Transition::Exited(cursor) => {
                    println!("Presentation closed at slide {}.", cursor + 1)
                }
                Transition::Ignored => {}
            }
        }
        Command::Export(format) => {
            // Failures were already surfaced as notifications.
            if let Ok(path) = editor.export(format) {
                println!("Wrote {}", path.display());
            }
        }
        Command::Dump { view } => dump(editor, view)?,
        Command::Inspect(path) => inspect(&path)?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn print_list(editor: &Editor) {
    let store = editor.store();
    for (i, slide) in store.slides().iter().enumerate() {
        let marker = if i == store.active_index() { '>' } else { ' ' };
        let first = slide
            .values_in_order()
            .into_iter()
            .find_map(|(_, value)| value)
            .unwrap_or("");
        let first = first.lines().next().unwrap_or("");
        println!("{} {:>2}. {:<11} {}", marker, i + 1, slide.template, first);
    }
}

fn print_slide(editor: &Editor, index: usize) -> Result<()> {
    let view = render_at(editor.store(), index, RenderMode::Editable)
        .ok_or_else(|| anyhow!("No slide {}", index + 1))?;
    println!("{} {} ({})", view.page.label, view.template, view.template.template().display_name);
    for field in &view.fields {
        if field.text.is_empty() {
            println!("  {:<8} ({})", field.key, field.shown());
        } else {
            println!("  {:<8} {}", field.key, field.text.replace('\n', "\n           "));
        }
    }
    Ok(())
}

fn print_presentation(editor: &Editor) {
    let store = editor.store();
    let Some(cursor) = editor.presenter().cursor() else {
        return;
    };
    let Some(view) = render_at(store, cursor, RenderMode::ReadOnly) else {
        return;
    };
    println!("[{}]", editor.presenter().progress(store.len()));
    for field in &view.fields {
        for line in field.shown().lines() {
            println!("    {}", line);
        }
    }
}

fn write_html(editor: &Editor, path: &Path) -> Result<()> {
    let page = if editor.presenter().is_active() {
        presentation_page(editor.store(), editor.presenter())
    } else {
        editor_page(editor.store(), editor.notifier().visible())
    };
    std::fs::write(path, page).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn dump(editor: &Editor, view: bool) -> Result<()> {
    let store = editor.store();
    let json = if view {
        let view = render_at(store, store.active_index(), RenderMode::Editable)
            .ok_or_else(|| anyhow!("Deck has no active slide"))?;
        serde_json::to_string_pretty(&view)?
    } else {
        serde_json::to_string_pretty(&serde_json::json!({
            "theme": store.theme(),
            "active": store.active_index(),
            "slides": store.slides(),
        }))?
    };
    println!("{}", json);
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ExportFormat::from_extension)
        .ok_or_else(|| anyhow!("Cannot tell the format of {}", path.display()))?;

    match extension {
        ExportFormat::Pptx => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            let slides = PptxParser::new()
                .parse(BufReader::new(file))
                .map_err(|e| anyhow!("{}", e))?;
            println!("{} slides", slides.len());
            for slide in &slides {
                println!(
                    "{:>3}. [{}] {}",
                    slide.number,
                    slide.background.as_deref().unwrap_or("-"),
                    slide.texts().join(" | ").replace('\n', " / ")
                );
            }
        }
        ExportFormat::Pdf => {
            let bytes =
                std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
            println!("{} pages", zenslide_pdf::count_pages(&bytes));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_quotes_and_escapes() {
        assert_eq!(
            tokenize(r#"edit body "uno\ndos" tres"#),
            vec!["edit", "body", "uno\ndos", "tres"]
        );
        assert_eq!(tokenize(r#"edit quote "dijo \"hola\"""#), vec!["edit", "quote", "dijo \"hola\""]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("add BULLETS").unwrap(), Some(Command::Add("BULLETS".into())));
        assert_eq!(
            Command::parse("edit title Hola mundo").unwrap(),
            Some(Command::Edit {
                field: "title".into(),
                value: "Hola mundo".into()
            })
        );
        assert_eq!(Command::parse("select 2").unwrap(), Some(Command::Select(1)));
        assert_eq!(Command::parse("delete").unwrap(), Some(Command::Delete(None)));
        assert_eq!(
            Command::parse("export PPTX").unwrap(),
            Some(Command::Export(ExportFormat::Pptx))
        );
        assert_eq!(
            Command::parse("key ArrowRight").unwrap(),
            Some(Command::Input(PresentationInput::Next))
        );
        assert_eq!(Command::parse("# comment").unwrap(), None);
    }

    #[test]
    fn test_edit_keeps_text_as_typed() {
        let value = |line: &str| match Command::parse(line).unwrap() {
            Some(Command::Edit { value, .. }) => value,
            other => panic!("not an edit: {:?}", other),
        };
        assert_eq!(value(r#"edit quote He said "hi""#), r#"He said "hi""#);
        assert_eq!(value("edit body uno   dos"), "uno   dos");
        assert_eq!(value(r"edit body uno\ndos"), "uno\ndos");
        assert_eq!(value(r#"edit title "Hola  mundo""#), "Hola  mundo");
        assert_eq!(value("edit subtitle"), "");
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("select 0").is_err());
        assert!(Command::parse("add").is_err());
        assert!(Command::parse("export docx").is_err());
        assert!(Command::parse("fly").is_err());
    }

    #[test]
    fn test_export_reports_every_status() {
        let dir = std::env::temp_dir().join(format!("zenslide-cli-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut editor = Editor::new().with_output_dir(&dir);
        editor
            .libraries_mut()
            .mark_ready(zenslide_core::Capability::PresentationDocument);
        editor.register_exporter(Box::new(zenslide_pptx::PptxExporter::new()));

        let command = Command::parse("export pptx").unwrap().unwrap();
        execute(&mut editor, command).unwrap();

        assert_eq!(
            editor.notifier_mut().take_unseen(),
            vec!["Generating PowerPoint...", "PPTX exported successfully."]
        );
        assert!(dir.join("ZenSlide-Presentation.pptx").exists());
    }

    #[test]
    fn test_session_script() {
        let mut editor = Editor::new();
        for line in [
            "add BULLETS",
            "edit title Agenda",
            "present",
            "next",
            "esc",
            "delete",
            "delete",
        ] {
            let command = Command::parse(line).unwrap().unwrap();
            assert_eq!(execute(&mut editor, command).unwrap(), Flow::Continue);
        }
        assert_eq!(editor.store().len(), 1);
        assert_eq!(editor.notifier().visible(), Some("Minimum one slide."));
        assert_eq!(
            execute(&mut editor, Command::Quit).unwrap(),
            Flow::Quit
        );
    }
}
