use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};

use mdclip::{
    BlockRange, Clipboard, Config, ContentTree, CopyError, StdoutClipboard, Target,
    clipboard_from_config, copy_target, outline, parse_with_config, selection_text,
};

#[derive(Parser)]
#[command(name = "mdclip")]
#[command(about = "Copy rendered Markdown as layout-preserving plain text")]
struct Cli {
    /// Config file (defaults to $MDCLIP_CONFIG, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the document, or selected blocks, to the clipboard
    Copy {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Print the text instead of copying it
        #[arg(long)]
        print: bool,
    },
    /// Print the plain-text rendering
    Text {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// List top-level blocks with the indices used by --blocks
    Outline {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input Markdown file, or - for stdin
    input: PathBuf,

    /// Read a JSON content tree instead of Markdown
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SelectionArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Top-level blocks to select: N, N..M or N.. (repeatable)
    #[arg(short, long = "blocks", value_name = "RANGE")]
    blocks: Vec<BlockRange>,
}

impl SelectionArgs {
    fn target(&self) -> Target {
        if self.blocks.is_empty() {
            Target::Document
        } else {
            Target::Blocks(self.blocks.clone())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::resolve(cli.config.as_deref()).context("Error loading config")?;

    match cli.command {
        Commands::Copy { selection, print } => {
            let tree = load_tree(&selection.input, &config)?;
            let mut clipboard: Box<dyn Clipboard> = if print {
                Box::new(StdoutClipboard::stdout())
            } else {
                clipboard_from_config(&config.clipboard)?
            };
            copy(&tree, &selection.target(), clipboard.as_mut(), print)
        }
        Commands::Text { selection } => {
            let tree = load_tree(&selection.input, &config)?;
            let (text, _) = selection_text(&tree, &selection.target());
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Outline { input } => {
            let tree = load_tree(&input, &config)?;
            for entry in outline(&tree) {
                println!("{:>4}  {:<16} {}", entry.index, entry.kind.name(), entry.preview);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn copy(
    tree: &ContentTree,
    target: &Target,
    clipboard: &mut dyn Clipboard,
    print: bool,
) -> Result<ExitCode> {
    match copy_target(tree, target, clipboard) {
        Ok(outcome) if !outcome.written => {
            eprintln!("Nothing selected; clipboard unchanged");
            Ok(ExitCode::SUCCESS)
        }
        Ok(outcome) => {
            if !print {
                eprintln!("Copied {} characters", outcome.text.chars().count());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ CopyError::Clipboard { .. }) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            eprintln!("Printing the text instead:");
            io::stdout().write_all(e.text().as_bytes())?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn load_tree(input: &InputArgs, config: &Config) -> Result<ContentTree> {
    let content = read_input(&input.input)?;
    if input.json {
        ContentTree::from_json(&content)
            .with_context(|| format!("Error reading tree from {}", input.input.display()))
    } else {
        Ok(parse_with_config(&content, config))
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Error reading stdin")?;
        return Ok(content);
    }
    fs::read_to_string(path).with_context(|| format!("Error reading {}", path.display()))
}
