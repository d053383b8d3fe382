//! Command-line front end for Oliva notebooks.
//!
//! # Responsibility
//! - Create, inspect and edit notebook files from a shell.
//! - Map core errors onto stable exit codes.
//!
//! # Invariants
//! - A failed edit never rewrites the notebook file.
//! - Exit code 0 on success, 1 on operation failure, 2 on usage error.

use std::collections::BTreeMap;
use std::error::Error;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use oliva_core::{
    init_logging_from_env, EditResult, FileNotebookStore, LayoutChange, Notebook,
    NotebookOptions, NotebookStore, Orientation, PaperSize, SectionKind,
};

/// Characters of a cell's first source line shown by `show`.
const SOURCE_PREVIEW_CHARS: usize = 60;

const VALUE_FLAGS: [&str; 7] = [
    "--title",
    "--author",
    "--paper",
    "--layout",
    "--to-index",
    "--to-section",
    "--to-page",
];

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Help,
    New {
        path: PathBuf,
        title: Option<String>,
        author: String,
        paper: PaperSize,
        orientation: Orientation,
        layout: Option<LayoutChange>,
    },
    Show {
        path: PathBuf,
    },
    AddPage {
        path: PathBuf,
    },
    AddCell {
        path: PathBuf,
        page: usize,
        kind: SectionKind,
    },
    DeleteCell {
        path: PathBuf,
        page: usize,
        kind: SectionKind,
        index: usize,
    },
    MoveCell {
        path: PathBuf,
        page: usize,
        kind: SectionKind,
        index: usize,
        target: MoveTarget,
    },
    Resize {
        path: PathBuf,
        geometry: Geometry,
        orientation: Option<Orientation>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveTarget {
    Index(usize),
    Section(SectionKind),
    Page(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Geometry {
    Preset(PaperSize),
    Custom { width: f64, height: f64 },
}

/// Positionals, valued flags and orientation switches, before the command
/// decides what they mean.
#[derive(Debug, Default)]
struct RawArgs {
    positionals: Vec<String>,
    values: BTreeMap<String, String>,
    orientation: Option<Orientation>,
    show_help: bool,
}

impl RawArgs {
    fn take(&mut self, flag: &str) -> Option<String> {
        self.values.remove(flag)
    }

    fn finish(&self, command: &str) -> Result<(), String> {
        match self.values.keys().next() {
            Some(flag) => Err(format!("`{flag}` is not accepted by `{command}`")),
            None => Ok(()),
        }
    }
}

fn main() {
    if let Err(message) = init_logging_from_env() {
        eprintln!("warning: logging disabled: {message}");
    }

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let exit_code = run(std::env::args_os(), &mut stdout, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run<I, W, E>(args: I, out: &mut W, err: &mut E) -> i32
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let command = match parse_args(args) {
        Ok(command) => command,
        Err(message) => {
            let _ = writeln!(err, "error: {message}");
            let _ = write_usage(err);
            return 2;
        }
    };

    if command == Command::Help {
        return match write_usage(out) {
            Ok(()) => 0,
            Err(_) => 1,
        };
    }

    let name = command_name(&command);
    match execute(command, out) {
        Ok(()) => {
            info!("event=cli_command module=cli status=ok command={name}");
            0
        }
        Err(error) => {
            warn!("event=cli_command module=cli status=error command={name} error={error}");
            let _ = writeln!(err, "error: {error}");
            1
        }
    }
}

fn parse_args<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = OsString>,
{
    let mut iter = args.into_iter();
    let _argv0 = iter.next();

    let mut raw = RawArgs::default();
    while let Some(argument) = iter.next() {
        let arg = argument.to_string_lossy().into_owned();
        match arg.as_str() {
            "-h" | "--help" => raw.show_help = true,
            "--landscape" => raw.orientation = Some(Orientation::Landscape),
            "--portrait" => raw.orientation = Some(Orientation::Portrait),
            flag if VALUE_FLAGS.contains(&flag) => {
                let Some(value) = iter.next() else {
                    return Err(format!("missing value for `{flag}`"));
                };
                if raw
                    .values
                    .insert(arg.clone(), value.to_string_lossy().into_owned())
                    .is_some()
                {
                    return Err(format!("`{arg}` given more than once"));
                }
            }
            flag if flag.starts_with("--") => {
                return Err(format!("unknown option `{flag}`"));
            }
            _ => raw.positionals.push(arg),
        }
    }

    if raw.show_help {
        return Ok(Command::Help);
    }
    if raw.positionals.is_empty() {
        return Err(String::from("missing command"));
    }
    let command = raw.positionals.remove(0);
    let command = parse_command(&command, &mut raw)?;
    raw.finish(command_name(&command))?;
    Ok(command)
}

fn parse_command(name: &str, raw: &mut RawArgs) -> Result<Command, String> {
    let positionals = std::mem::take(&mut raw.positionals);
    let positionals: Vec<&str> = positionals.iter().map(String::as_str).collect();

    let command = match (name, positionals.as_slice()) {
        ("new", [path]) => {
            let paper = match raw.take("--paper") {
                Some(name) => PaperSize::from_name(&name).map_err(|err| err.to_string())?,
                None => PaperSize::A4,
            };
            let layout = raw
                .take("--layout")
                .map(|value| parse_layout(&value))
                .transpose()?;
            Command::New {
                path: PathBuf::from(path),
                title: raw.take("--title"),
                author: raw.take("--author").unwrap_or_default(),
                paper,
                orientation: raw.orientation.take().unwrap_or_default(),
                layout,
            }
        }
        ("show", [path]) => Command::Show {
            path: PathBuf::from(path),
        },
        ("add-page", [path]) => Command::AddPage {
            path: PathBuf::from(path),
        },
        ("add-cell", [path, page, kind]) => Command::AddCell {
            path: PathBuf::from(path),
            page: parse_index(page, "page")?,
            kind: parse_kind(kind)?,
        },
        ("delete-cell", [path, page, kind, index]) => Command::DeleteCell {
            path: PathBuf::from(path),
            page: parse_index(page, "page")?,
            kind: parse_kind(kind)?,
            index: parse_index(index, "cell index")?,
        },
        ("move-cell", [path, page, kind, index]) => Command::MoveCell {
            path: PathBuf::from(path),
            page: parse_index(page, "page")?,
            kind: parse_kind(kind)?,
            index: parse_index(index, "cell index")?,
            target: parse_move_target(raw)?,
        },
        ("resize", rest) => {
            let path = rest
                .first()
                .ok_or_else(|| String::from("`resize` needs a notebook file"))?;
            let geometry = match (&rest[1..], raw.take("--paper")) {
                ([], Some(name)) => {
                    Geometry::Preset(PaperSize::from_name(&name).map_err(|err| err.to_string())?)
                }
                ([width, height], None) => Geometry::Custom {
                    width: parse_millimetres(width, "width")?,
                    height: parse_millimetres(height, "height")?,
                },
                _ => {
                    return Err(String::from(
                        "`resize` takes either WIDTH HEIGHT or `--paper NAME`",
                    ))
                }
            };
            Command::Resize {
                path: PathBuf::from(path),
                geometry,
                orientation: raw.orientation.take(),
            }
        }
        ("new" | "show" | "add-page" | "add-cell" | "delete-cell" | "move-cell", _) => {
            return Err(format!("wrong number of arguments for `{name}`"));
        }
        (other, _) => return Err(format!("unknown command `{other}`")),
    };

    if raw.orientation.is_some() {
        return Err(format!("orientation is not accepted by `{name}`"));
    }
    Ok(command)
}

fn parse_move_target(raw: &mut RawArgs) -> Result<MoveTarget, String> {
    let index = raw.take("--to-index");
    let section = raw.take("--to-section");
    let page = raw.take("--to-page");
    match (index, section, page) {
        (Some(index), None, None) => Ok(MoveTarget::Index(parse_index(&index, "target index")?)),
        (None, Some(kind), None) => Ok(MoveTarget::Section(parse_kind(&kind)?)),
        (None, None, Some(page)) => Ok(MoveTarget::Page(parse_index(&page, "target page")?)),
        _ => Err(String::from(
            "`move-cell` needs exactly one of `--to-index`, `--to-section`, `--to-page`",
        )),
    }
}

fn parse_index(value: &str, what: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| format!("invalid {what} `{value}`"))
}

fn parse_kind(value: &str) -> Result<SectionKind, String> {
    value.parse::<SectionKind>().map_err(|err| err.to_string())
}

fn parse_millimetres(value: &str, what: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .map_err(|_| format!("invalid {what} `{value}`"))
}

/// Parses `COLUMNS,ROWS,CUE_COLUMNS,SUMMARY_ROWS`.
fn parse_layout(value: &str) -> Result<LayoutChange, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("invalid layout `{value}`"))?;
    match parts.as_slice() {
        [page_columns, page_rows, cue_columns, summary_rows] => Ok(LayoutChange {
            page_columns: *page_columns,
            page_rows: *page_rows,
            cue_columns: *cue_columns,
            summary_rows: *summary_rows,
        }),
        _ => Err(format!(
            "invalid layout `{value}`; expected COLUMNS,ROWS,CUE_COLUMNS,SUMMARY_ROWS"
        )),
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Help => "help",
        Command::New { .. } => "new",
        Command::Show { .. } => "show",
        Command::AddPage { .. } => "add-page",
        Command::AddCell { .. } => "add-cell",
        Command::DeleteCell { .. } => "delete-cell",
        Command::MoveCell { .. } => "move-cell",
        Command::Resize { .. } => "resize",
    }
}

fn execute<W>(command: Command, out: &mut W) -> Result<(), Box<dyn Error>>
where
    W: Write,
{
    match command {
        Command::Help => write_usage(out)?,
        Command::New {
            path,
            title,
            author,
            paper,
            orientation,
            layout,
        } => {
            if path.exists() {
                return Err(format!("`{}` already exists", path.display()).into());
            }
            let mut options = NotebookOptions::default().with_paper(paper, orientation);
            if let Some(title) = title {
                options = options.with_title(title);
            }
            if let Some(layout) = layout {
                options = options.with_layout(
                    layout.page_columns,
                    layout.page_rows,
                    layout.cue_columns,
                    layout.summary_rows,
                );
            }
            let notebook = Notebook::new(author, options)?;
            FileNotebookStore::new(&path).save(&notebook)?;
            writeln!(
                out,
                "created {} ({})",
                path.display(),
                notebook.metadata.id
            )?;
        }
        Command::Show { path } => {
            let notebook = FileNotebookStore::new(&path).load()?;
            write_notebook(&notebook, out)?;
        }
        Command::AddPage { path } => {
            let (index, id) = edit(&path, |nb| {
                let index = nb.add_page();
                Ok((index, nb.page(index)?.id.clone()))
            })?;
            writeln!(out, "added page {index} ({id})")?;
        }
        Command::AddCell { path, page, kind } => {
            let id = edit(&path, |nb| nb.add_cell_to_page(page, kind))?;
            writeln!(out, "added cell {id}")?;
        }
        Command::DeleteCell {
            path,
            page,
            kind,
            index,
        } => {
            let cell = edit(&path, |nb| nb.delete_cell(page, kind, index))?;
            writeln!(out, "deleted cell {}", cell.id)?;
        }
        Command::MoveCell {
            path,
            page,
            kind,
            index,
            target,
        } => {
            edit(&path, |nb| match target {
                MoveTarget::Index(new_index) => {
                    nb.move_cell_in_section(page, kind, index, new_index)
                }
                MoveTarget::Section(to) => nb.move_cell_to_another_section(page, kind, to, index),
                MoveTarget::Page(to_page) => {
                    nb.move_cell_to_another_page(page, to_page, kind, index)
                }
            })?;
            writeln!(out, "moved cell")?;
        }
        Command::Resize {
            path,
            geometry,
            orientation,
        } => {
            let reports = edit(&path, |nb| match geometry {
                Geometry::Custom { width, height } => {
                    nb.change_dimensions(width, height, None, orientation)
                }
                Geometry::Preset(size) => {
                    let orientation = orientation.unwrap_or(nb.metadata.paper.orientation);
                    let dimensions = size.dimensions(orientation);
                    nb.change_dimensions(
                        dimensions.width,
                        dimensions.height,
                        Some(dimensions.name.as_str()),
                        Some(orientation),
                    )
                }
            })?;
            for report in reports.iter().filter(|report| !report.is_noop()) {
                writeln!(
                    out,
                    "reflowed {}: carried={} pages_created={}",
                    report.kind, report.cells_carried, report.pages_created
                )?;
            }
            writeln!(out, "resized {}", path.display())?;
        }
    }
    Ok(())
}

/// Loads the notebook at `path`, applies `apply`, and saves only on success.
fn edit<T>(
    path: &Path,
    apply: impl FnOnce(&mut Notebook) -> EditResult<T>,
) -> Result<T, Box<dyn Error>> {
    let store = FileNotebookStore::new(path);
    let mut notebook = store.load()?;
    let value = apply(&mut notebook)?;
    store.save(&notebook)?;
    Ok(value)
}

fn write_notebook<W>(notebook: &Notebook, out: &mut W) -> io::Result<()>
where
    W: Write,
{
    let metadata = &notebook.metadata;
    let paper = &metadata.paper;
    let layout = &metadata.page_layout;
    writeln!(out, "{} ({})", metadata.title, metadata.id)?;
    writeln!(
        out,
        "paper: {} {}x{}mm {}",
        paper.dimensions.name,
        paper.dimensions.width,
        paper.dimensions.height,
        paper.orientation.as_str()
    )?;
    writeln!(
        out,
        "layout: {} columns x {} rows, cue {} column(s), summary {} row(s)",
        layout.columns, layout.rows, layout.cue_section.columns, layout.summary_section.rows
    )?;

    for (page_index, page) in notebook.pages().iter().enumerate() {
        writeln!(out, "page {page_index} [{}]", page.id)?;
        for kind in SectionKind::ALL {
            let section = page.section(kind);
            writeln!(
                out,
                "  {kind} ({} cells, {}/{}mm)",
                section.len(),
                section.total_size(),
                notebook.capacity_mm(kind)
            )?;
            for (cell_index, cell) in section.cells().iter().enumerate() {
                writeln!(
                    out,
                    "    {cell_index} {} {}mm {}",
                    cell.id,
                    cell.size,
                    first_line(&cell.source, SOURCE_PREVIEW_CHARS)
                )?;
            }
        }
    }

    for (page_index, kind) in notebook.overfull_sections() {
        writeln!(
            out,
            "warning: page {page_index} {kind} section exceeds its capacity"
        )?;
    }
    Ok(())
}

/// First non-blank line of `source`, cut to `max_chars` characters.
fn first_line(source: &str, max_chars: usize) -> String {
    let Some(line) = source.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return "(empty)".to_string();
    };
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

fn write_usage<W>(out: &mut W) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        out,
        "Usage: oliva <COMMAND> <FILE> [ARGS]\n\
         \n\
         Commands:\n\
         \n\
         new FILE [--title T] [--author A] [--paper NAME] [--landscape] [--layout C,R,CUE,SUM]\n\
         show FILE\n\
         add-page FILE\n\
         add-cell FILE PAGE SECTION\n\
         delete-cell FILE PAGE SECTION INDEX\n\
         move-cell FILE PAGE SECTION INDEX (--to-index N | --to-section S | --to-page P)\n\
         resize FILE (WIDTH HEIGHT | --paper NAME) [--landscape | --portrait]\n\
         \n\
         SECTION is one of content, cue, summary. Sizes are in millimetres.\n\
         Logging is enabled by setting OLIVA_LOG_DIR (and optionally OLIVA_LOG_LEVEL).\n",
    )
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::path::Path;

    use oliva_core::{FileNotebookStore, NotebookStore, Orientation, PaperSize, SectionKind};
    use tempfile::TempDir;

    use super::{first_line, parse_args, run, Command, Geometry, MoveTarget};

    fn parse_from(args: &[&str]) -> Result<Command, String> {
        let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
        parse_args(os_args)
    }

    fn run_with(args: &[&str]) -> (i32, String, String) {
        let os_args: Vec<OsString> = std::iter::once("oliva")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(os_args, &mut out, &mut err);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn path_str(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    #[test]
    fn parse_new_with_options() {
        let command = parse_from(&[
            "oliva",
            "new",
            "bio.json",
            "--title",
            "Biology",
            "--paper",
            "a5",
            "--landscape",
            "--layout",
            "4,5,1,2",
        ])
        .unwrap();

        match command {
            Command::New {
                title,
                paper,
                orientation,
                layout,
                ..
            } => {
                assert_eq!(title.as_deref(), Some("Biology"));
                assert_eq!(paper, PaperSize::A5);
                assert_eq!(orientation, Orientation::Landscape);
                assert_eq!(layout.unwrap().summary_rows, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_move_cell_requires_exactly_one_target() {
        let command =
            parse_from(&["oliva", "move-cell", "nb.json", "0", "cue", "1", "--to-page", "2"])
                .unwrap();
        match command {
            Command::MoveCell { kind, target, .. } => {
                assert_eq!(kind, SectionKind::Cue);
                assert_eq!(target, MoveTarget::Page(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(parse_from(&["oliva", "move-cell", "nb.json", "0", "cue", "1"]).is_err());
        assert!(parse_from(&[
            "oliva",
            "move-cell",
            "nb.json",
            "0",
            "cue",
            "1",
            "--to-page",
            "2",
            "--to-index",
            "0"
        ])
        .is_err());
    }

    #[test]
    fn parse_resize_accepts_preset_or_dimensions() {
        match parse_from(&["oliva", "resize", "nb.json", "--paper", "letter"]).unwrap() {
            Command::Resize { geometry, .. } => {
                assert_eq!(geometry, Geometry::Preset(PaperSize::Letter))
            }
            other => panic!("unexpected command: {other:?}"),
        }
        match parse_from(&["oliva", "resize", "nb.json", "210", "100"]).unwrap() {
            Command::Resize { geometry, .. } => assert_eq!(
                geometry,
                Geometry::Custom {
                    width: 210.0,
                    height: 100.0
                }
            ),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(parse_from(&["oliva", "resize", "nb.json", "210"]).is_err());
    }

    #[test]
    fn parse_rejects_unknown_input() {
        assert!(parse_from(&["oliva"]).is_err());
        assert!(parse_from(&["oliva", "frobnicate", "nb.json"]).is_err());
        assert!(parse_from(&["oliva", "show", "nb.json", "--verbose"]).is_err());
        assert!(parse_from(&["oliva", "show", "nb.json", "--title", "x"]).is_err());
        assert!(parse_from(&["oliva", "add-cell", "nb.json", "0", "margin"]).is_err());
        assert!(parse_from(&["oliva", "add-page", "nb.json", "--landscape"]).is_err());
    }

    #[test]
    fn usage_error_exits_with_two() {
        let (code, out, err) = run_with(&["add-cell", "nb.json"]);
        assert_eq!(code, 2);
        assert!(out.is_empty());
        assert!(err.contains("wrong number of arguments"));
        assert!(err.contains("Usage: oliva"));
    }

    #[test]
    fn new_then_show_prints_the_blank_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bio.json");

        let (code, out, _) = run_with(&["new", path_str(&path), "--title", "Biology"]);
        assert_eq!(code, 0);
        assert!(out.starts_with("created "));

        let (code, out, _) = run_with(&["show", path_str(&path)]);
        assert_eq!(code, 0);
        assert!(out.starts_with("Biology ("));
        assert!(out.contains("paper: A4 210x297mm portrait"));
        assert!(out.contains("page 0 [page-0]"));
        assert!(out.contains("  summary (1 cells, 10/74.25mm)"));
        assert!(!out.contains("warning"));
    }

    #[test]
    fn first_line_skips_blank_lines_and_truncates() {
        assert_eq!(first_line("", 10), "(empty)");
        assert_eq!(first_line("  \n\t\n", 10), "(empty)");
        assert_eq!(first_line("\n  # Osmosis  \nwater moves", 10), "# Osmosis");
        assert_eq!(first_line("élan vital forever", 9), "élan vita...");
    }

    #[test]
    fn show_prints_the_raw_first_line_of_each_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bio.json");
        run_with(&["new", path_str(&path)]);
        let store = FileNotebookStore::new(&path);
        let mut nb = store.load().unwrap();
        nb.set_cell_source(0, SectionKind::Cue, 0, "What is **osmosis**?\nSee ch. 3")
            .unwrap();
        store.save(&nb).unwrap();

        let (code, out, _) = run_with(&["show", path_str(&path)]);
        assert_eq!(code, 0);
        assert!(out.contains("    0 cue-cell-0 10mm What is **osmosis**?\n"));
        assert!(out.contains("    0 content-cell-0 10mm (empty)\n"));
    }

    #[test]
    fn new_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bio.json");
        assert_eq!(run_with(&["new", path_str(&path)]).0, 0);

        let (code, _, err) = run_with(&["new", path_str(&path)]);
        assert_eq!(code, 1);
        assert!(err.contains("already exists"));
    }

    #[test]
    fn rejected_edit_exits_with_one_and_keeps_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nb.json");
        run_with(&["new", path_str(&path)]);
        for _ in 0..6 {
            assert_eq!(run_with(&["add-cell", path_str(&path), "0", "summary"]).0, 0);
        }
        let before = std::fs::read_to_string(&path).unwrap();

        let (code, _, err) = run_with(&["add-cell", path_str(&path), "0", "summary"]);
        assert_eq!(code, 1);
        assert!(err.contains("exceeding its capacity"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn move_and_delete_cells_through_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nb.json");
        run_with(&["new", path_str(&path)]);
        run_with(&["add-page", path_str(&path)]);

        let (code, out, _) = run_with(&[
            "move-cell",
            path_str(&path),
            "0",
            "content",
            "0",
            "--to-section",
            "cue",
        ]);
        assert_eq!(code, 0, "{out}");
        let (code, out, _) = run_with(&["delete-cell", path_str(&path), "1", "summary", "0"]);
        assert_eq!(code, 0);
        assert_eq!(out.trim(), "deleted cell summary-cell-0");

        let nb = FileNotebookStore::new(&path).load().unwrap();
        assert!(nb.page(0).unwrap().content.is_empty());
        assert_eq!(nb.page(0).unwrap().cue.len(), 2);
        assert!(nb.page(1).unwrap().summary.is_empty());
    }

    #[test]
    fn resize_reflows_overflow_onto_a_new_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nb.json");
        run_with(&["new", path_str(&path)]);
        for _ in 0..10 {
            run_with(&["add-cell", path_str(&path), "0", "content"]);
        }

        let (code, out, _) = run_with(&["resize", path_str(&path), "210", "100"]);
        assert_eq!(code, 0);
        assert!(out.contains("reflowed content: carried=4 pages_created=1"));

        let nb = FileNotebookStore::new(&path).load().unwrap();
        assert_eq!(nb.page_count(), 2);
        assert_eq!(nb.page(0).unwrap().content.len(), 7);
        assert_eq!(nb.page(1).unwrap().content.len(), 4);
        assert!(nb.overfull_sections().is_empty());
    }

    #[test]
    fn resize_to_preset_keeps_current_orientation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nb.json");
        run_with(&["new", path_str(&path), "--landscape"]);

        let (code, _, _) = run_with(&["resize", path_str(&path), "--paper", "A5"]);
        assert_eq!(code, 0);

        let nb = FileNotebookStore::new(&path).load().unwrap();
        let paper = &nb.metadata.paper;
        assert_eq!(paper.dimensions.name, "A5");
        assert_eq!(paper.dimensions.width, 210.0);
        assert_eq!(paper.dimensions.height, 148.0);
        assert_eq!(paper.orientation, Orientation::Landscape);
    }
}
