//! Shelf CLI
//!
//! Command-line front end for the shelf library catalog.
//!
//! # Commands
//!
//! - `menu` - Interactive menu (the default when no command is given)
//! - `list` - List every book
//! - `add` - Add a book
//! - `delete` - Delete a book that is on the shelf
//! - `borrow` - Lend a book to a student
//! - `return` - Take back the book a student holds
//! - `search` - Search titles by keyword
//! - `verify` - Check the catalog file for damage

mod commands;

use clap::{Parser, Subcommand};
use commands::{CommandResult, OutputFormat};
use shelf_codec::{BookId, Category};
use shelf_core::{Catalog, NewBook};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Library book catalog.
#[derive(Parser)]
#[command(name = "shelf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the catalog file
    #[arg(global = true, short, long, default_value = "books.txt")]
    path: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Start empty instead of with the sample books when the file is missing
    #[arg(global = true, long)]
    no_seed: bool,

    /// Output format for listings
    #[arg(global = true, short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive menu
    Menu,

    /// List every book
    List,

    /// Add a book
    Add {
        /// Id of the new book
        id: BookId,

        /// Title
        title: String,

        /// Author
        #[arg(short, long, default_value = "")]
        author: String,

        /// Subject category (Forensic, Law, Programming, Maths, Engineering, Nursing, Commerce)
        #[arg(short, long)]
        category: Category,

        /// Programming language, for Programming books
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Delete a book that is on the shelf
    Delete {
        /// Id of the book
        id: BookId,
    },

    /// Lend a book to a student
    Borrow {
        /// Admission number (GUYYYYNNNNN)
        admission: String,

        /// Id of the book
        id: BookId,

        /// The student's field of study
        field: String,
    },

    /// Take back the book a student holds
    Return {
        /// Admission number (GUYYYYNNNNN)
        admission: String,
    },

    /// Search titles by keyword, ignoring case
    Search {
        /// Keyword to look for
        keyword: String,
    },

    /// Check the catalog file for damage
    Verify,

    /// Show version information
    Version,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

impl Commands {
    /// Whether the command may change the catalog. Only these save on the way out.
    fn mutates(&self) -> bool {
        matches!(
            self,
            Commands::Menu
                | Commands::Add { .. }
                | Commands::Delete { .. }
                | Commands::Borrow { .. }
                | Commands::Return { .. }
        )
    }
}

/// Runs `command` against an open catalog.
///
/// Read-only commands drop the catalog without saving, so lines skipped on
/// load stay in the file.
fn execute<R: BufRead, W: Write>(
    command: Commands,
    mut catalog: Catalog,
    format: OutputFormat,
    input: R,
    out: &mut W,
) -> CommandResult {
    let mutates = command.mutates();

    match command {
        Commands::Menu => commands::menu::Menu::new(&mut catalog, input, &mut *out).run()?,
        Commands::List => commands::books::list(&catalog, format, out)?,
        Commands::Add {
            id,
            title,
            author,
            category,
            language,
        } => {
            let mut book = NewBook::new(id, title, author, category);
            if let Some(language) = language {
                book = book.with_language(language);
            }
            commands::books::add(&mut catalog, book, out)?;
        }
        Commands::Delete { id } => commands::books::delete(&mut catalog, id, out)?,
        Commands::Borrow {
            admission,
            id,
            field,
        } => commands::loans::borrow(&mut catalog, &admission, id, &field, out)?,
        Commands::Return { admission } => {
            commands::loans::return_book(&mut catalog, &admission, out)?;
        }
        Commands::Search { keyword } => {
            commands::books::search(&catalog, &keyword, format, out)?;
        }
        Commands::Verify => commands::verify::run(&catalog, format, out)?,
        // Printed before the catalog is opened
        Commands::Version => {}
    }

    if mutates {
        catalog.close()?;
    }
    Ok(())
}

fn main() -> CommandResult {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Menu);
    if let Commands::Version = command {
        println!("Shelf CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("Shelf Core v{}", shelf_core::VERSION);
        return Ok(());
    }

    let catalog = commands::open_catalog(&cli.path, cli.no_seed)?;
    execute(
        command,
        catalog,
        cli.format,
        io::stdin().lock(),
        &mut io::stdout().lock(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    const DAMAGED: &str = "1,Let Us C,Kanetkar,true,C,\n2,Half,Line\n";

    fn run_on_file(command: Commands, document: &str) -> (CommandResult, String) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.txt");
        fs::write(&path, document).unwrap();

        let catalog = commands::open_catalog(&path, false).unwrap();
        let mut out = Vec::new();
        let result = execute(
            command,
            catalog,
            OutputFormat::Text,
            Cursor::new(Vec::new()),
            &mut out,
        );
        (result, fs::read_to_string(&path).unwrap())
    }

    #[test]
    fn read_only_commands_leave_file_untouched() {
        let (result, after) = run_on_file(Commands::List, DAMAGED);
        assert!(result.is_ok());
        assert_eq!(after, DAMAGED);

        let (result, after) = run_on_file(
            Commands::Search {
                keyword: "let".into(),
            },
            DAMAGED,
        );
        assert!(result.is_ok());
        assert_eq!(after, DAMAGED);

        // Fails because of the skipped line, but still writes nothing
        let (result, after) = run_on_file(Commands::Verify, DAMAGED);
        assert!(result.is_err());
        assert_eq!(after, DAMAGED);
    }

    #[test]
    fn mutating_command_rewrites_file() {
        let (result, after) = run_on_file(
            Commands::Borrow {
                admission: "GU202300123".into(),
                id: 1,
                field: "C".into(),
            },
            DAMAGED,
        );
        assert!(result.is_ok());
        assert_eq!(after, "1,Let Us C,Kanetkar,false,C,GU202300123\n");
    }

    #[test]
    fn failed_mutation_leaves_file_untouched() {
        let (result, after) = run_on_file(Commands::Delete { id: 42 }, DAMAGED);
        assert!(result.is_err());
        assert_eq!(after, DAMAGED);
    }

    #[test]
    fn only_changing_commands_mutate() {
        assert!(Commands::Menu.mutates());
        assert!(Commands::Delete { id: 1 }.mutates());
        assert!(!Commands::List.mutates());
        assert!(!Commands::Verify.mutates());
        assert!(!Commands::Version.mutates());
    }
}
