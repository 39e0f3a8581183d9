use clap::{Parser as ClapParser, Subcommand};
use ruleval::cli::{self, CheckOptions, CheckResult, CliError};
use ruleval::{Lexer, Limits, Parser};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "ruleval")]
#[command(about = "ruleval - evaluate boolean/arithmetic rule expressions against JSON variables")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and evaluate a rule
    Eval {
        /// The rule to evaluate
        rule: String,

        /// JSON object holding the variables (reads from stdin if piped)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,

        /// Maximum nesting depth of the rule
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Print the token stream of a rule
    Tokens {
        rule: String,
    },

    /// Print the syntax tree of a rule
    Ast {
        rule: String,

        /// Maximum nesting depth of the rule
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Show documentation, optionally for one category
    Docs {
        /// Category name (omit to list categories)
        category: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            rule,
            input,
            pretty,
            syntax_only,
            max_depth,
        } => run_eval(rule, input, pretty, syntax_only, max_depth),
        Commands::Tokens { rule } => {
            for line in cli::describe_tokens(&rule) {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Ast { rule, max_depth } => run_ast(&rule, max_depth),
        Commands::Docs { category: None } => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Docs {
            category: Some(category),
        } => cli::get_doc_category(&category).map(|content| print!("{}", content)),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_eval(
    rule: String,
    input: Option<String>,
    pretty: bool,
    syntax_only: bool,
    max_depth: Option<usize>,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer).filter(|b| !b.trim().is_empty())
        }
        None => None,
    };

    let options = CheckOptions {
        rule,
        input,
        syntax_only,
        max_depth,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn run_ast(rule: &str, max_depth: Option<usize>) -> Result<(), CliError> {
    let limits = max_depth
        .map(|depth| Limits::default().with_max_depth(depth))
        .unwrap_or_default();
    let expr = Parser::with_limits(Lexer::new(rule), limits).parse()?;
    println!("{:#?}", expr);
    Ok(())
}
