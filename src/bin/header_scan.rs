//! Command-line driver: reads a source file, scans it, and prints the resulting JSON
//! document to standard output (or writes it to `--output`).
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use header_scan::config::MacroConfig;
use header_scan::position::Position;
use header_scan::parser;

/// Scan a C++-like header for annotated declarations and emit them as JSON.
#[derive(ClapParser)]
#[command(name = "header-scan")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source file to scan
    input: PathBuf,

    /// Where to write the JSON document (defaults to standard output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Identifier recognized as the class/struct annotation macro
    #[arg(short = 'c', long = "class", default_value = "CLASS")]
    class_macro: String,

    /// Identifier recognized as the enum annotation macro
    #[arg(short = 'e', long = "enum", default_value = "ENUM")]
    enum_macro: String,

    /// Identifier recognized as the property annotation macro
    #[arg(short = 'p', long = "property", default_value = "PROPERTY")]
    property_macro: String,

    /// Identifier recognized as a function/method annotation macro (repeatable)
    #[arg(short = 'f', long = "function", default_value = "FUNCTION")]
    function_macros: Vec<String>,

    /// Additional identifier recognized as a custom, meta-only annotation macro (repeatable)
    #[arg(short = 'm', long = "macro")]
    custom_macros: Vec<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.input) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: could not read {}: {}", cli.input.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let config = MacroConfig {
        class_macro: cli.class_macro,
        enum_macro: cli.enum_macro,
        property_macro: cli.property_macro,
        function_macros: cli.function_macros,
        custom_macros: cli.custom_macros,
    };

    let document = match parser::scan(&source, &config) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("error: {}", err);
            let position = Position::new(&source);
            if let Some(line) = position.line_text(err.line) {
                eprintln!("  {} | {}", err.line, line);
            }
            return ExitCode::FAILURE;
        }
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    };
    let rendered = match rendered {
        Ok(rendered) => rendered,
        Err(err) => {
            eprintln!("error: failed to render JSON: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match cli.output {
        Some(path) => {
            if let Err(err) = fs::write(&path, rendered) {
                eprintln!("error: could not write {}: {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        }
        None => println!("{}", rendered),
    }

    ExitCode::SUCCESS
}
