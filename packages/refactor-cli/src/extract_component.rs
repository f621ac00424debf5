//! Extract Component
//!
//! Action layer of the extract-component refactoring: reads the template and
//! its symbols, asks for the component name, plans the extraction and writes
//! the generated files.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{debug, info};

use angular_refactor::{extract_selection, ExtractConfig, ExtractError, ExtractionPlan, SymbolTable};

/// Part of the template to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRange {
    /// Byte offsets, end exclusive
    Offsets { start: usize, end: usize },
    /// 1-based line numbers, both inclusive
    Lines { first: usize, last: usize },
}

impl SelectionRange {
    /// Byte offsets of the range inside `source`
    pub fn to_offsets(self, source: &str) -> Result<(usize, usize)> {
        match self {
            SelectionRange::Offsets { start, end } => Ok((start, end)),
            SelectionRange::Lines { first, last } => {
                if first == 0 || last < first {
                    bail!("invalid line range {}:{}", first, last);
                }
                let mut line_starts = vec![0];
                line_starts.extend(source.match_indices('\n').map(|(index, _)| index + 1));
                let line_count = line_starts.len();
                if last > line_count {
                    bail!("line {} is past the end of the template ({} lines)", last, line_count);
                }
                let start = line_starts[first - 1];
                let end = line_starts
                    .get(last)
                    .map(|&next| next - 1)
                    .unwrap_or(source.len());
                Ok((start, end))
            }
        }
    }
}

/// Options for one extraction.
#[derive(Debug, Clone)]
pub struct ExtractComponentOptions {
    /// Template to extract from.
    pub template: PathBuf,
    pub selection: SelectionRange,
    /// Component name; prompted for when absent.
    pub name: Option<String>,
    /// Symbol table JSON file.
    pub symbols: Option<PathBuf>,
    /// TypeScript component the template belongs to.
    pub component: Option<PathBuf>,
    /// `ExtractConfig` JSON file.
    pub config: Option<PathBuf>,
    /// Plan only, write nothing.
    pub dry_run: bool,
    /// Overwrite existing generated files.
    pub force: bool,
}

impl ExtractComponentOptions {
    pub fn new(template: impl Into<PathBuf>, selection: SelectionRange) -> Self {
        ExtractComponentOptions {
            template: template.into(),
            selection,
            name: None,
            symbols: None,
            component: None,
            config: None,
            dry_run: false,
            force: false,
        }
    }
}

/// What an extraction run did
#[derive(Debug, Clone)]
pub enum ExtractOutcome {
    /// The name prompt was answered with nothing; no file was touched
    Cancelled,
    /// Dry run
    Planned(ExtractionPlan),
    Written {
        plan: ExtractionPlan,
        class_file: PathBuf,
        template_file: PathBuf,
    },
}

/// Run the refactoring. `input`/`output` serve the name prompt.
pub fn perform_extraction(
    options: &ExtractComponentOptions,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<ExtractOutcome> {
    let config = match &options.config {
        Some(path) => ExtractConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ExtractConfig::default(),
    };

    let template_path = &options.template;
    let source = fs::read_to_string(template_path)
        .with_context(|| format!("Failed to read template: {}", template_path.display()))?;
    let symbols = load_symbols(options, &config)?;
    let (start, end) = options.selection.to_offsets(&source)?;

    if !options.dry_run && is_read_only(template_path)? {
        return Err(ExtractError::ReadOnly {
            path: template_path.clone(),
        }
        .into());
    }

    let name = match &options.name {
        Some(name) => name.clone(),
        None => match prompt_component_name(input, output)? {
            Some(name) => name,
            None => {
                info!("extraction cancelled");
                return Ok(ExtractOutcome::Cancelled);
            }
        },
    };

    let url = template_path.to_string_lossy();
    let plan = extract_selection(&source, &url, start, end, &name, &symbols, &config)?;
    if options.dry_run {
        return Ok(ExtractOutcome::Planned(plan));
    }

    let directory = template_path.parent().unwrap_or_else(|| Path::new(""));
    let class_file = directory.join(&plan.class_file_name);
    let template_file = directory.join(&plan.template_file_name);
    if !options.force {
        for path in [&class_file, &template_file] {
            if path.exists() {
                return Err(ExtractError::AlreadyExists { path: path.clone() }.into());
            }
        }
    }

    // Generated files before the source template
    fs::write(&class_file, &plan.class_text)
        .with_context(|| format!("Failed to write {}", class_file.display()))?;
    fs::write(&template_file, &plan.template_text)
        .with_context(|| format!("Failed to write {}", template_file.display()))?;
    fs::write(template_path, plan.apply(&source))
        .with_context(|| format!("Failed to update {}", template_path.display()))?;
    info!(
        class_file = %class_file.display(),
        template_file = %template_file.display(),
        "component extracted"
    );

    Ok(ExtractOutcome::Written {
        plan,
        class_file,
        template_file,
    })
}

/// Symbols from `--symbols`, completed by the component class. Without
/// `--component`, the class next to the template is used when there is one.
fn load_symbols(options: &ExtractComponentOptions, config: &ExtractConfig) -> Result<SymbolTable> {
    let mut symbols = match &options.symbols {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read symbols: {}", path.display()))?;
            SymbolTable::from_json(&json)
                .with_context(|| format!("Invalid symbol table: {}", path.display()))?
        }
        None => SymbolTable::default(),
    };

    let component = options
        .component
        .clone()
        .or_else(|| sibling_component(&options.template, config));
    if let Some(path) = component {
        let source = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read component: {}", path.display()))?;
        let scanned = SymbolTable::from_component_source(&source);
        debug!(component = %path.display(), fields = scanned.fields.len(), "component symbols");
        for (name, ty) in scanned.fields {
            symbols.fields.entry(name).or_insert(ty);
        }
        symbols.methods.extend(scanned.methods);
    }
    Ok(symbols)
}

/// `foo.component.ts` for `foo.component.html`, if it exists
fn sibling_component(template: &Path, config: &ExtractConfig) -> Option<PathBuf> {
    let file_name = template.file_name()?.to_str()?;
    let stem = file_name.strip_suffix(&config.template_file_suffix)?;
    let candidate = template.with_file_name(format!("{}{}", stem, config.class_file_suffix));
    candidate.is_file().then_some(candidate)
}

fn is_read_only(path: &Path) -> Result<bool> {
    let metadata =
        fs::metadata(path).with_context(|| format!("Failed to stat {}", path.display()))?;
    Ok(metadata.permissions().readonly())
}

/// Ask for the component name; `None` when the answer is empty
fn prompt_component_name(input: &mut dyn BufRead, output: &mut dyn Write) -> Result<Option<String>> {
    write!(output, "Component name: ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

pub fn command() -> Command {
    Command::new("ng-extract-component")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract a fragment of an Angular template into a new component")
        .arg(
            Arg::new("template")
                .value_name("TEMPLATE")
                .required(true)
                .help("Component template to refactor"),
        )
        .arg(
            Arg::new("start")
                .long("start")
                .value_name("OFFSET")
                .value_parser(clap::value_parser!(usize))
                .requires("end")
                .help("Byte offset where the selection starts"),
        )
        .arg(
            Arg::new("end")
                .long("end")
                .value_name("OFFSET")
                .value_parser(clap::value_parser!(usize))
                .requires("start")
                .help("Byte offset where the selection ends (exclusive)"),
        )
        .arg(
            Arg::new("line-range")
                .long("line-range")
                .value_name("FIRST:LAST")
                .conflicts_with_all(["start", "end"])
                .help("Select whole lines, 1-based and inclusive"),
        )
        .arg(
            Arg::new("name")
                .short('n')
                .long("name")
                .value_name("NAME")
                .help("Name of the new component, e.g. NameLabel"),
        )
        .arg(
            Arg::new("symbols")
                .long("symbols")
                .value_name("PATH")
                .help("Symbol table of the host component (JSON)"),
        )
        .arg(
            Arg::new("component")
                .long("component")
                .value_name("PATH")
                .help("TypeScript file of the host component"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Extraction settings (JSON)"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Print the extraction plan as JSON without writing files"),
        )
        .arg(
            Arg::new("force")
                .short('f')
                .long("force")
                .action(ArgAction::SetTrue)
                .help("Overwrite existing generated files"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log debug output to stderr"),
        )
}

pub fn options_from_matches(matches: &ArgMatches) -> Result<ExtractComponentOptions> {
    let path = |id: &str| matches.get_one::<String>(id).map(PathBuf::from);

    let selection = match (
        matches.get_one::<usize>("start"),
        matches.get_one::<usize>("end"),
        matches.get_one::<String>("line-range"),
    ) {
        (Some(&start), Some(&end), _) => SelectionRange::Offsets { start, end },
        (_, _, Some(range)) => parse_line_range(range)?,
        _ => bail!("a selection is required: --start/--end or --line-range"),
    };

    let template = path("template").context("missing template path")?;
    let mut options = ExtractComponentOptions::new(template, selection);
    options.name = matches.get_one::<String>("name").cloned();
    options.symbols = path("symbols");
    options.component = path("component");
    options.config = path("config");
    options.dry_run = matches.get_flag("dry-run");
    options.force = matches.get_flag("force");
    Ok(options)
}

fn parse_line_range(range: &str) -> Result<SelectionRange> {
    let (first, last) = match range.split_once(':') {
        Some((first, last)) => (first, last),
        None => (range, range),
    };
    let line = |text: &str| {
        text.trim()
            .parse::<usize>()
            .with_context(|| format!("invalid line number '{}' in --line-range", text))
    };
    Ok(SelectionRange::Lines {
        first: line(first)?,
        last: line(last)?,
    })
}

/// Main entry point for ng-extract-component.
pub fn main_extract_component(matches: &ArgMatches) -> i32 {
    crate::logging::init(matches.get_flag("verbose"));

    let result = options_from_matches(matches).and_then(|options| {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut prompt = std::io::stderr();
        perform_extraction(&options, &mut input, &mut prompt)
    });

    match result {
        Ok(ExtractOutcome::Cancelled) => 0,
        Ok(ExtractOutcome::Planned(plan)) => match serde_json::to_string_pretty(&plan) {
            Ok(json) => {
                println!("{}", json);
                0
            }
            Err(error) => {
                eprintln!("Error: {}", error);
                1
            }
        },
        Ok(ExtractOutcome::Written {
            class_file,
            template_file,
            ..
        }) => {
            println!("Created {}", class_file.display());
            println!("Created {}", template_file.display());
            0
        }
        Err(error) => {
            match error.downcast_ref::<ExtractError>() {
                Some(read_only @ ExtractError::ReadOnly { .. }) => eprintln!("Warning: {}", read_only),
                Some(extract_error) => eprintln!("Error: {}", extract_error),
                None => eprintln!("Error: {:#}", error),
            }
            1
        }
    }
}
