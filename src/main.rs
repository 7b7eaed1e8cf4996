// pas2cpp: Pascal-subset to C++ translator

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as CliParser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use pas2cpp::CompileError;
use pas2cpp::codegen;
use pas2cpp::parser::lexer::{Lexer, format_token_dump};
use pas2cpp::parser::parse::Parser;
use pas2cpp::ui::App;

/// Translate a Pascal program into C++.
#[derive(CliParser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Pascal source file
    input: PathBuf,

    /// Print the token stream instead of translating
    #[arg(long)]
    tokens: bool,

    /// With --tokens, include comments, newlines and tabs
    #[arg(long, requires = "tokens")]
    raw: bool,

    /// Write the generated C++ here instead of standard output
    #[arg(short, long, conflicts_with = "view")]
    output: Option<PathBuf>,

    /// Inspect the translation in the terminal viewer
    #[arg(long, conflicts_with = "tokens")]
    view: bool,

    /// Suppress progress messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", cli.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if cli.view {
        return match view(source) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    if cli.tokens {
        return match dump_tokens(&source, cli.raw) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report(&e),
        };
    }

    let code = match translate(&cli, &source) {
        Ok(code) => code,
        Err(e) => return report(&e),
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &code) {
                eprintln!("Error: cannot write '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            if !cli.quiet {
                eprintln!("Wrote {}", path.display());
            }
        }
        None => print!("{}", code),
    }
    ExitCode::SUCCESS
}

fn dump_tokens(source: &str, raw: bool) -> Result<(), CompileError> {
    let lexer = if raw {
        Lexer::new(source).with_trivia()
    } else {
        Lexer::new(source)
    };
    let tokens = lexer.tokenize()?;
    print!("{}", format_token_dump(&tokens));
    Ok(())
}

fn translate(cli: &Cli, source: &str) -> Result<String, CompileError> {
    if !cli.quiet {
        eprintln!("Parsing {}...", cli.input.display());
    }
    let program = Parser::new(source)?.parse_program()?;
    if !cli.quiet {
        eprintln!(
            "Parsed successfully. {} top-level statements.",
            program.statements().len()
        );
    }

    let code = codegen::generate(&program.root)?;
    if !cli.quiet {
        eprintln!("Generated {} lines of C++.", code.lines().count());
    }
    Ok(code)
}

/// Open the viewer; the exit code reflects the translation result.
fn view(source: String) -> io::Result<ExitCode> {
    let mut app = App::new(source);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;

    Ok(match &app.output {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => report(e),
    })
}

fn report(error: &CompileError) -> ExitCode {
    eprintln!("{}", error);
    if error.is_internal() {
        eprintln!("This is a translator bug, not a problem with the input.");
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}
