//! javac-doctor CLI - Error decoder and feedback generator for javac diagnostics

use clap::{Parser, Subcommand};
use javac_doctor::{DiagnosticInput, Explainer, Locale};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "javac-doctor")]
#[command(about = "Error decoder and feedback generator for javac diagnostics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Explain a failed compile of a submission
    Explain {
        /// Path to the raw javac output ('-' for stdin)
        diagnostic: PathBuf,
        /// Path to the submitted source code
        #[arg(long)]
        source: Option<PathBuf>,
        /// Path to the test code
        #[arg(long)]
        test: Option<PathBuf>,
        /// Path to auxiliary declarations
        #[arg(long)]
        extra: Option<PathBuf>,
        /// Feedback locale (es, en)
        #[arg(long, default_value = "es")]
        locale: Locale,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the rule registry in precedence order
    Rules {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List supported locales
    Locales,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Explain {
            diagnostic,
            source,
            test,
            extra,
            locale,
            json,
        } => {
            let diagnostic = read_input(&diagnostic);
            let input = DiagnosticInput::new(
                read_optional(source.as_deref()),
                read_optional(test.as_deref()),
                read_optional(extra.as_deref()),
                diagnostic,
            );

            let explainer = Explainer::new();
            let explanations = explainer.evaluate(&input);
            let message = explainer.explain(&input, locale);

            if json {
                // Explanations whose rendering was dropped (missing template
                // or missing field) are invisible in the message; list them.
                let dropped: Vec<&str> = explanations
                    .iter()
                    .filter(|e| explainer.catalog().render_one(e, locale).is_none())
                    .map(|e| e.rule_id)
                    .collect();
                let output = serde_json::json!({
                    "locale": locale.code(),
                    "explanations": explanations,
                    "dropped": dropped,
                    "message": message,
                });
                println!("{}", serde_json::to_string_pretty(&output).unwrap());
            } else {
                match message {
                    Some(message) => println!("{}", message),
                    None => println!("No explanation applies."),
                }
            }
        }

        Commands::Rules { json } => {
            let explainer = Explainer::new();

            if json {
                let list: Vec<_> = explainer
                    .rules()
                    .iter()
                    .map(|rule| {
                        serde_json::json!({
                            "id": rule.id,
                            "family": rule.family,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&list).unwrap());
            } else {
                println!("Rules in precedence order:");
                println!();
                for rule in explainer.rules().iter() {
                    println!("  {:<32} [{}]", rule.id, rule.family);
                }
            }
        }

        Commands::Locales => {
            for locale in Locale::all() {
                println!("  {}  {}", locale.code(), locale.name());
            }
        }
    }
}

fn read_input(path: &Path) -> String {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
            eprintln!("Failed to read stdin: {}", e);
            std::process::exit(1);
        }
        buffer
    } else {
        match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Failed to read file {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }
}

fn read_optional(path: Option<&Path>) -> String {
    match path {
        Some(path) => read_input(path),
        None => String::new(),
    }
}
