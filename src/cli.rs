//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::anchors::AnchorInjector;
use crate::core::config::AnchorConfig;
use crate::core::paths::{make_relative, normalize_path, resolve};
use crate::core::render::{OutputFormat, RenderConfig};
use crate::core::slug::{slugify, SlugMode};
use crate::flows::build::{run_build, BuildOptions, WriteMode};
use crate::flows::pipeline::Pipeline;

/// autoanchor - inject slug anchors into titled Markdown list items.
#[derive(Parser, Debug)]
#[command(name = "autoanchor")]
#[command(
    author,
    version,
    about,
    long_about = r##"autoanchor rewrites Markdown list items whose text carries a title
(**bold**, *italic* or a [link label]) so each one gets a stable id and a
jump link:

    - **Hello World:** some text
    - {:hello-world .anchor-list} <a href="#hello-world" class="anchor-list-link">●</a> **Hello World:** some text

The build command prints a ResultSet in the selected format (default: jsonl).

Output formats:
- jsonl: one JSON object per line (best for piping into tools)
- json: a single JSON array
- md: human-friendly Markdown
- raw: rewritten excerpts only (unstable; intended for debugging)

Examples:
    autoanchor transform notes.md
    cat notes.md | autoanchor transform
    autoanchor render _posts/2024-01-01-release.md
    autoanchor build --dry-run --format md
    autoanchor slug "Crème Brûlée"
"##
)]
pub struct Cli {
    /// Root directory for all operations.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory for all operations (defaults to the current directory).\n\n\
All paths emitted in results are relative to this root, and positional paths/\n\
scopes are interpreted relative to it."
    )]
    pub root: PathBuf,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw\n\n\
Only the build command emits a ResultSet; transform, render and slug print text."
    )]
    pub format: String,

    /// Quiet mode (errors only on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Only log errors to stderr. Results are still printed to stdout."
    )]
    pub quiet: bool,

    /// Verbose mode (debug logging).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log debug diagnostics to stderr. RUST_LOG, when set, takes precedence."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
Has no effect on md/raw formats."
    )]
    pub pretty: bool,

    /// Slug mode used for anchor ids.
    #[arg(
        long,
        global = true,
        env = "AUTOANCHOR_SLUG_MODE",
        default_value = "latin",
        value_name = "MODE",
        long_help = "Slug mode used to turn titles into anchor ids.\n\n\
Supported values:\n\
- latin (default): transliterate accented letters to ASCII\n\
- default: keep letters and digits in any script\n\
- pretty: also keep ._~!$&'()+,;=@\n\
- ascii: keep ASCII letters and digits only\n\
- raw: replace whitespace only\n\
- none: lowercase only"
    )]
    pub slug_mode: String,

    /// Build environment name ("email" disables the pre-render hook).
    #[arg(
        long,
        global = true,
        env = "JEKYLL_ENV",
        value_name = "ENV",
        long_help = "Name of the build environment.\n\n\
When it is \"email\", documents are left without anchors. The auto_anchor\n\
block tag is unaffected."
    )]
    pub build_env: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inject anchors into a file or stdin and print the result.
    #[command(
        long_about = "Run the bare anchor transform over FILE (or stdin when FILE is omitted or\n\
is \"-\") and print the rewritten text to stdout.\n\n\
No front matter handling and no opt-out checks are applied.\n\n\
Examples:\n\
  autoanchor transform notes.md\n\
  printf -- '- **Title** text\\n' | autoanchor transform -\n"
    )]
    Transform {
        /// Input file (relative to ROOT unless absolute), or "-" for stdin.
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Run the full per-file pipeline on one file and print the result.
    #[command(
        long_about = "Process FILE the way a site build does: split front matter, run the\n\
pre-render hook (documents only), expand auto_anchor blocks, and print the\n\
reassembled file to stdout. The file itself is not modified.\n\n\
Example:\n\
  autoanchor render docs/guide.md\n"
    )]
    Render {
        /// File path (relative to ROOT unless absolute).
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Process every source file under ROOT.
    #[command(
        long_about = "Walk ROOT (or --scope), skipping hidden and gitignored paths, and run the\n\
pipeline on every file with a handled extension. Emits one ResultItem per file.\n\n\
Files are rewritten in place unless --dry-run or --out-dir is given.\n\n\
Examples:\n\
  autoanchor build --dry-run\n\
  autoanchor build --scope _posts --format md\n\
  autoanchor build --out-dir _site_src\n"
    )]
    Build {
        /// Limit the build to a subdirectory under ROOT.
        #[arg(long, value_name = "PATH")]
        scope: Option<PathBuf>,

        /// Report without writing any file.
        #[arg(long, conflicts_with = "out_dir")]
        dry_run: bool,

        /// Write processed files under this directory instead of in place.
        #[arg(
            long,
            value_name = "DIR",
            long_help = "Write every processed file under DIR, keeping its path relative to ROOT.\n\n\
Sources are left untouched. DIR is relative to ROOT unless absolute, and is\n\
never walked as a source."
        )]
        out_dir: Option<PathBuf>,

        /// File extensions to process (comma-separated).
        #[arg(
            long = "ext",
            value_name = "EXTS",
            value_delimiter = ',',
            long_help = "File extensions to process, without the dot.\n\n\
Defaults to md,markdown,html."
        )]
        extensions: Vec<String>,
    },

    /// Print the slug of TEXT.
    #[command(
        long_about = "Print the anchor id TEXT would get under the selected --slug-mode.\n\n\
Example:\n\
  autoanchor slug \"Hello World:\"\n"
    )]
    Slug {
        #[arg(value_name = "TEXT")]
        text: String,
    },
}

/// Initialize the logger on stderr
///
/// `--verbose` enables debug output and `--quiet` limits it to errors;
/// `RUST_LOG` overrides both.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Error
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Read a file, or stdin for `None` / `-`
fn read_input(root: &Path, input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => {
            let path = resolve(root, path);
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read file: {}", path.display()))
        }
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn run_render(root: &Path, path: &Path, config: &AnchorConfig) -> Result<()> {
    let full = resolve(root, path);
    let source = fs::read_to_string(&full)
        .with_context(|| format!("Failed to read file: {}", full.display()))?;
    let relative = make_relative(&full, root).unwrap_or_else(|| normalize_path(path));

    let processed = Pipeline::new(config)
        .process(&source, Some(&relative))
        .with_context(|| format!("Failed to render {}", relative))?;

    log::info!("{}: {} anchor(s) injected", relative, processed.anchors.len());
    print!("{}", processed.output);
    Ok(())
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    // Parse output format
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let slug_mode: SlugMode = cli.slug_mode.parse()?;
    let config = AnchorConfig::default()
        .with_slug_mode(slug_mode)
        .with_build_env(cli.build_env.as_deref());
    if config.email_mode {
        log::debug!("Email build: pre-render hook disabled");
    }

    // Get absolute root path
    let root = cli.root.canonicalize().unwrap_or(cli.root);

    match cli.command {
        Commands::Transform { input } => {
            let content = read_input(&root, input.as_deref())?;
            print!("{}", AnchorInjector::new(slug_mode).transform(&content));
            Ok(())
        }

        Commands::Render { path } => run_render(&root, &path, &config),

        Commands::Build {
            scope,
            dry_run,
            out_dir,
            extensions,
        } => {
            let config = if extensions.is_empty() {
                config
            } else {
                config.with_extensions(extensions)
            };
            let write_mode = match (dry_run, out_dir) {
                (true, _) => WriteMode::DryRun,
                (false, Some(dir)) => WriteMode::OutDir(resolve(&root, &dir)),
                (false, None) => WriteMode::InPlace,
            };
            let options = BuildOptions { scope, write_mode };
            run_build(&root, &config, &options, render_config)
        }

        Commands::Slug { text } => {
            let slug = slugify(&text, slug_mode);
            if slug.is_empty() {
                log::warn!("'{}' produces an empty slug", text);
            }
            println!("{}", slug);
            Ok(())
        }
    }
}
