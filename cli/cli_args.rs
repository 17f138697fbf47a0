use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Pack a directory tree into a single AI-ready context document.",
    long_about = "codepack walks a project directory, filters out dependency and binary \nnoise, prioritizes the files that matter, and serializes the result into \none of nine output formats suitable for AI consumption.",
    after_help = "EXAMPLES:\n  codepack ./my-project\n  codepack ./my-project -f json -o ./out/context\n  codepack . --all-formats --dry-run\n  codepack . --smart -e '*.snap' -e 'fixtures/'"
)]
pub struct Cli {
    /// Directory to pack (default: current dir).
    #[arg(value_name = "SOURCE", default_value = ".")]
    pub source: PathBuf,

    #[arg(
        short,
        long,
        help = "Base path for output files; the format extension is appended.",
        value_name = "PATH",
        default_value = "codepack-output",
        help_heading = "Output"
    )]
    pub output: PathBuf,

    #[arg(
        short = 'f',
        long,
        help = "Output format: markdown, smart, mdyaml, json, yaml, toml, jsonld, msgpack, dsl.",
        value_name = "FORMAT",
        default_value = "markdown",
        help_heading = "Output"
    )]
    pub format: String,

    #[arg(
        long,
        help = "Generate every format in one run (failures are reported per format).",
        help_heading = "Output"
    )]
    pub all_formats: bool,

    #[arg(
        long,
        help = "Report document sizes without writing anything.",
        help_heading = "Output"
    )]
    pub dry_run: bool,

    #[arg(
        short,
        long = "exclude",
        help = "Additional exclude pattern (repeatable), applied on top of built-ins.",
        value_name = "PATTERN",
        action = clap::ArgAction::Append,
        help_heading = "Filtering"
    )]
    pub exclude: Vec<String>,

    #[arg(
        long,
        help = "Per-file size ceiling in KB; larger files are reported as skipped.",
        value_name = "KB",
        default_value_t = codepack_core::DEFAULT_MAX_FILE_SIZE_KB,
        help_heading = "Filtering"
    )]
    pub max_file_size: u64,

    #[arg(
        long,
        help = "Do not honor the project's .gitignore (the .git directory is always excluded).",
        help_heading = "Filtering"
    )]
    pub no_gitignore: bool,

    #[arg(
        long,
        help = "Strip comments and collapse blank runs in file content.",
        conflicts_with = "smart",
        help_heading = "Content"
    )]
    pub compact: bool,

    #[arg(
        long,
        help = "Aggressive whitespace optimization for script and stylesheet files (implies --compact).",
        help_heading = "Content"
    )]
    pub smart: bool,

    #[arg(
        long,
        help = "Print a shell completion script to stdout and exit.",
        value_name = "SHELL",
        value_parser = ["bash", "zsh", "fish"]
    )]
    pub completions: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        help = "Silence informational messages and warnings.",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}
