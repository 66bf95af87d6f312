use std::io::{self, IsTerminal, Read};

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use katakana_translator_rust::clipboard::{Clipboard, Osc52Clipboard, SystemClipboard};
use katakana_translator_rust::pipeline::{ConsoleSurface, CopyOutcome, Pipeline};
use katakana_translator_rust::{AppConverter, Config};

#[derive(Parser, Debug)]
#[command(
    name = "katakana-translator-rust",
    version,
    about = "Translate text to Japanese and render it in katakana"
)]
struct Cli {
    /// Translation API key (overrides settings and GOOGLE_TRANSLATE_API_KEY)
    #[arg(short = 'k', long = "key")]
    key: Option<String>,

    /// Source language for translation. Use "auto" to detect.
    #[arg(short = 'L', long = "source-lang")]
    source_lang: Option<String>,

    /// Skip translation and transliterate the input as-is
    #[arg(long = "no-translate")]
    no_translate: bool,

    /// Morphological analyzer endpoint (kuromoji-compatible JSON)
    #[arg(long = "analyzer-url")]
    analyzer_url: Option<String>,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Copy the result to the clipboard
    #[arg(short = 'c', long = "copy")]
    copy: bool,

    /// Interactive mode: every line is an input event
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Serve the HTTP API on ADDR (defaults to [server] addr)
    #[arg(long = "server", num_args = 0..=1, default_missing_value = "")]
    server: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            key: self.key.clone(),
            source_lang: self.source_lang.clone(),
            no_translate: self.no_translate,
            analyzer_url: self.analyzer_url.clone(),
            settings_path: self.read_settings.clone(),
            copy: self.copy,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    katakana_translator_rust::logging::init(cli.verbose)?;
    let config = cli.config();

    if let Some(addr) = cli.server.as_deref() {
        let settings = katakana_translator_rust::load_settings(&config)?;
        let addr = if addr.trim().is_empty() {
            settings.server_addr.clone()
        } else {
            addr.to_string()
        };
        let converter = katakana_translator_rust::build_converter(&config, &settings);
        return katakana_translator_rust::server::run_server(converter, addr).await;
    }

    if cli.interactive {
        return run_interactive(config).await;
    }

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let output = katakana_translator_rust::run(config, Some(input)).await?;
    println!("{}", output);
    Ok(())
}

async fn run_interactive(config: Config) -> Result<()> {
    let settings = katakana_translator_rust::load_settings(&config)?;
    let converter: AppConverter = katakana_translator_rust::build_converter(&config, &settings);
    let pipeline = Pipeline::new(converter, ConsoleSurface, settings.typing_delay);
    pipeline.initialize().await;

    println!("Interactive mode. Use /quit or /exit to finish.");
    println!("Type /help to see available commands.");

    let clipboard: Box<dyn Clipboard> = if io::stderr().is_terminal() {
        Box::new(Osc52Clipboard::stderr())
    } else {
        Box::new(SystemClipboard::new())
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.starts_with('/') {
            if handle_interactive_command(input, &pipeline, clipboard.as_ref()).await {
                break;
            }
            continue;
        }
        pipeline.on_input(input);
    }
    pipeline.flush().await;

    if config.copy {
        pipeline.copy_output(clipboard.as_ref());
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum InteractiveCommand<'a> {
    Quit,
    Help,
    Convert(Option<&'a str>),
    Copy,
    Status,
    Unknown(&'a str),
}

fn parse_interactive_command(input: &str) -> InteractiveCommand<'_> {
    let trimmed = input.trim();
    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|arg| !arg.is_empty())),
        None => (trimmed, None),
    };
    match (name, arg) {
        ("/quit" | "/exit", None) => InteractiveCommand::Quit,
        ("/help", None) => InteractiveCommand::Help,
        ("/convert", arg) => InteractiveCommand::Convert(arg),
        ("/copy", None) => InteractiveCommand::Copy,
        ("/status", None) => InteractiveCommand::Status,
        _ => InteractiveCommand::Unknown(trimmed),
    }
}

async fn handle_interactive_command(
    input: &str,
    pipeline: &Pipeline<
        katakana_translator_rust::GoogleTranslate,
        katakana_translator_rust::KuromojiHttp,
        ConsoleSurface,
    >,
    clipboard: &dyn Clipboard,
) -> bool {
    match parse_interactive_command(input) {
        InteractiveCommand::Quit => return true,
        InteractiveCommand::Help => print_interactive_help(),
        InteractiveCommand::Convert(text) => {
            let text = match text {
                Some(text) => text.to_string(),
                None => pipeline.session().last_input(),
            };
            pipeline.convert_now(&text).await;
        }
        InteractiveCommand::Copy => {
            if pipeline.copy_output(clipboard) == CopyOutcome::Copied {
                println!("copied: {}", pipeline.session().output());
            }
        }
        InteractiveCommand::Status => {
            let converter = pipeline.converter();
            println!("analyzer: {:?}", converter.analyzer().state());
            println!("translation: {}", converter.has_translator());
            println!("processing: {}", pipeline.session().is_processing());
            println!("output: {}", pipeline.session().output());
        }
        InteractiveCommand::Unknown(command) => eprintln!("unknown command: {}", command),
    }
    false
}

fn print_interactive_help() {
    println!("Commands:");
    println!("  /quit, /exit        Exit interactive mode");
    println!("  /convert [text]     Convert now, skipping the typing delay");
    println!("  /copy               Copy the current output to the clipboard");
    println!("  /status             Show analyzer, translation and output state");
    println!("  /help               Show this help");
}
