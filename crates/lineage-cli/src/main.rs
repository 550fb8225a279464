use lineage_core::{
    BuildTreeOptions, Direction, ExportFormat, ExportOptions, LayoutType, LineStyle, TreeData,
    TreeLayoutConfig, TreeStyleConfig,
};
use lineage_layout::{Diagnostic, LayoutEngine, NodeFlags, TreeLayout, export_geometry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Layout(lineage_core::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    Diagnostics(usize),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Yaml(err) => write!(f, "YAML error: {err}"),
            CliError::Diagnostics(n) => write!(f, "{n} diagnostic(s) reported"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<lineage_core::Error> for CliError {
    fn from(value: lineage_core::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Validate,
    Export,
    Search,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    strict: bool,
    config: Option<String>,
    root: Option<String>,
    layout_type: Option<LayoutType>,
    direction: Option<Direction>,
    line_style: Option<LineStyle>,
    max_generations: Option<u32>,
    center_on: Option<String>,
    show_siblings: bool,
    no_ancestors: bool,
    no_descendants: bool,
    no_siblings: bool,
    collapse: BTreeSet<String>,
    highlight: BTreeSet<String>,
    format: Option<ExportFormat>,
    scale: Option<f64>,
    padding: Option<f64>,
    background: Option<String>,
    query: Option<String>,
}

/// Settings file accepted by `--config`; every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConfigFile {
    layout: TreeLayoutConfig,
    style: TreeStyleConfig,
    build: BuildTreeOptions,
    export: ExportOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateOut<'a> {
    root_id: &'a str,
    persons: usize,
    relationships: usize,
    visible_nodes: usize,
    connections: usize,
    diagnostics: &'a [Diagnostic],
}

fn usage() -> &'static str {
    "lineage-cli\n\
\n\
USAGE:\n\
  lineage-cli [layout] [OPTIONS] [<path>|-]\n\
  lineage-cli validate [--strict] [OPTIONS] [<path>|-]\n\
  lineage-cli export [--format png|jpg|svg|pdf] [--scale <n>] [--padding <n>] [--background <css-color>] [OPTIONS] [<path>|-]\n\
  lineage-cli search --query <text> [OPTIONS] [<path>|-]\n\
\n\
OPTIONS:\n\
  --pretty                   pretty-print JSON output\n\
  --config <path>            .json/.yaml/.yml file with layout, style, build and export sections\n\
  --root <id>                root person (defaults to rootPersonId, then the first person)\n\
  --layout <type>            descendants|ancestors|hourglass|full\n\
  --direction <dir>          ltr|rtl\n\
  --line-style <style>       straight|curved|stepped\n\
  --max-generations <n>      cap on |level|\n\
  --center <id>              translate the layout so this person sits at x = 0\n\
  --show-siblings            emit sibling connectors\n\
  --no-ancestors | --no-descendants | --no-siblings\n\
  --collapse <id>            collapse a node (repeatable)\n\
  --highlight <id>           highlight a node (repeatable)\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin as JSON.\n\
  - Files ending in .yaml/.yml are read as YAML.\n\
  - validate --strict exits with status 3 when any diagnostic is reported.\n\
  - Logging goes to stderr; filter with LINEAGE_LOG or RUST_LOG (default: warn).\n\
"
}

fn value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parsed<T: std::str::FromStr>(raw: &str) -> Result<T, CliError> {
    raw.parse::<T>().map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "validate" => args.command = Command::Validate,
            "export" => args.command = Command::Export,
            "search" => args.command = Command::Search,
            "--pretty" => args.pretty = true,
            "--strict" => args.strict = true,
            "--show-siblings" => args.show_siblings = true,
            "--no-ancestors" => args.no_ancestors = true,
            "--no-descendants" => args.no_descendants = true,
            "--no-siblings" => args.no_siblings = true,
            "--config" => args.config = Some(value(&mut it)?.clone()),
            "--root" => args.root = Some(value(&mut it)?.clone()),
            "--center" => args.center_on = Some(value(&mut it)?.clone()),
            "--query" => args.query = Some(value(&mut it)?.clone()),
            "--layout" => args.layout_type = Some(parsed(value(&mut it)?)?),
            "--direction" => args.direction = Some(parsed(value(&mut it)?)?),
            "--line-style" => args.line_style = Some(parsed(value(&mut it)?)?),
            "--format" => args.format = Some(parsed(value(&mut it)?)?),
            "--max-generations" => {
                let n: u32 = parsed(value(&mut it)?)?;
                if n == 0 {
                    return Err(CliError::Usage(usage()));
                }
                args.max_generations = Some(n);
            }
            "--scale" => {
                let scale: f64 = parsed(value(&mut it)?)?;
                if !(scale.is_finite() && scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.scale = Some(scale);
            }
            "--padding" => args.padding = Some(parsed(value(&mut it)?)?),
            "--background" => {
                let bg = value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--collapse" => {
                args.collapse.insert(value(&mut it)?.clone());
            }
            "--highlight" => {
                args.highlight.insert(value(&mut it)?.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if matches!(args.command, Command::Search) && args.query.is_none() {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn is_yaml(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

fn read_input(input: Option<&str>) -> Result<TreeData, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(serde_json::from_str(&buf)?)
        }
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            if is_yaml(path) {
                Ok(serde_yaml::from_str(&text)?)
            } else {
                Ok(serde_json::from_str(&text)?)
            }
        }
    }
}

fn read_config(path: Option<&str>) -> Result<ConfigFile, CliError> {
    let Some(path) = path else {
        return Ok(ConfigFile::default());
    };
    let text = std::fs::read_to_string(path)?;
    if is_yaml(path) {
        Ok(serde_yaml::from_str(&text)?)
    } else {
        Ok(serde_json::from_str(&text)?)
    }
}

/// Command-line flags take precedence over the settings file.
fn apply_flags(args: &Args, file: &mut ConfigFile) {
    let layout = &mut file.layout;
    if let Some(t) = args.layout_type {
        layout.layout_type = t;
    }
    if let Some(d) = args.direction {
        layout.direction = d;
    }
    if let Some(id) = &args.center_on {
        layout.center_on_person = Some(id.clone());
    }
    if args.show_siblings {
        layout.show_siblings = true;
    }
    if let Some(s) = args.line_style {
        file.style.line_style = s;
    }

    let build = &mut file.build;
    if args.root.is_some() {
        build.root_person_id = args.root.clone();
    }
    if args.max_generations.is_some() {
        build.max_generations = args.max_generations;
    }
    build.include_ancestors &= !args.no_ancestors;
    build.include_descendants &= !args.no_descendants;
    build.include_siblings &= !args.no_siblings;

    let export = &mut file.export;
    if let Some(f) = args.format {
        export.format = f;
    }
    if let Some(s) = args.scale {
        export.scale = s;
    }
    if let Some(p) = args.padding {
        export.padding = p;
    }
    if let Some(bg) = &args.background {
        export.background_color = bg.clone();
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    use std::io::Write;
    writeln!(out)?;
    Ok(())
}

fn init_tracing() {
    let filter = std::env::var("LINEAGE_LOG")
        .ok()
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build(args: &Args, file: &ConfigFile, data: &TreeData) -> Result<TreeLayout, CliError> {
    let engine = LayoutEngine::new(file.layout.clone(), file.style.clone())?;
    let flags = NodeFlags {
        collapsed: args.collapse.clone(),
        highlighted: args.highlight.clone(),
    };
    Ok(engine.build_with(data, None, &file.build, &flags)?)
}

fn run(args: Args) -> Result<(), CliError> {
    let mut file = read_config(args.config.as_deref())?;
    apply_flags(&args, &mut file);
    let data = read_input(args.input.as_deref())?;
    tracing::debug!(
        persons = data.persons.len(),
        relationships = data.relationships.len(),
        "input loaded"
    );

    let layout = build(&args, &file, &data)?;

    match args.command {
        Command::Layout => write_json(&layout, args.pretty),
        Command::Validate => {
            let out = ValidateOut {
                root_id: &layout.root_id,
                persons: data.persons.len(),
                relationships: data.relationships.len(),
                visible_nodes: layout.visible_nodes().count(),
                connections: layout.connections.len(),
                diagnostics: &layout.diagnostics,
            };
            write_json(&out, args.pretty)?;
            if args.strict && !layout.diagnostics.is_empty() {
                return Err(CliError::Diagnostics(layout.diagnostics.len()));
            }
            Ok(())
        }
        Command::Export => {
            let geometry = export_geometry(&layout, &file.style, &file.export)?;
            write_json(&geometry, args.pretty)
        }
        Command::Search => {
            let query = args.query.as_deref().unwrap_or_default();
            let hits = layout.search_index().search(query);
            write_json(&hits, args.pretty)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_tracing();

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::Diagnostics(_)) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        std::iter::once("lineage-cli")
            .chain(parts.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn flags_are_collected() {
        let args = parse_args(&argv(&[
            "export",
            "--layout",
            "hourglass",
            "--collapse",
            "a",
            "--collapse",
            "b",
            "--format",
            "jpg",
            "tree.json",
        ]))
        .unwrap();
        assert!(matches!(args.command, Command::Export));
        assert_eq!(args.layout_type, Some(LayoutType::Hourglass));
        assert_eq!(args.collapse.len(), 2);
        assert_eq!(args.format, Some(ExportFormat::Jpeg));
        assert_eq!(args.input.as_deref(), Some("tree.json"));
    }

    #[test]
    fn bad_values_are_usage_errors() {
        for bad in [
            &["--layout", "sideways"][..],
            &["--max-generations", "0"],
            &["--scale", "-1"],
            &["--root"],
            &["a.json", "b.json"],
            &["search"],
            &["--frobnicate"],
        ] {
            assert!(
                matches!(parse_args(&argv(bad)), Err(CliError::Usage(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn flags_override_the_settings_file() {
        let mut file: ConfigFile = serde_yaml::from_str(
            "layout:\n  layoutType: ancestors\n  nodeWidth: 90\nbuild:\n  includeSiblings: true\n",
        )
        .unwrap();
        let args = parse_args(&argv(&["--layout", "full", "--no-siblings", "--root", "x"])).unwrap();
        apply_flags(&args, &mut file);
        assert_eq!(file.layout.layout_type, LayoutType::Full);
        assert_eq!(file.layout.node_width, 90.0);
        assert!(!file.build.include_siblings);
        assert!(file.build.include_ancestors);
        assert_eq!(file.build.root_person_id.as_deref(), Some("x"));
    }

    #[test]
    fn yaml_is_picked_by_extension() {
        assert!(is_yaml("tree.yaml"));
        assert!(is_yaml("dir/tree.YML"));
        assert!(!is_yaml("tree.json"));
        assert!(!is_yaml("-"));
    }
}
