//! Interactive menu.
//!
//! Reads one answer per line from any [`BufRead`] and writes prompts and
//! results to any [`Write`], so the whole session can be driven from a test.
//! Failed operations are reported and the menu carries on; the catalog is
//! saved once more when the user exits or input runs out.

use shelf_codec::{BookId, Category};
use shelf_core::{
    AdmissionNumber, Catalog, CatalogError, NewBook, ADMISSION_EXAMPLE, ADMISSION_FORMAT,
};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// An interactive menu session over a catalog.
pub struct Menu<'a, R, W> {
    catalog: &'a mut Catalog,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    /// Creates a session reading from `input` and writing to `output`.
    pub fn new(catalog: &'a mut Catalog, input: R, output: W) -> Self {
        Self {
            catalog,
            input,
            output,
        }
    }

    /// Runs the menu until the user exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Enter choice: ")? else {
                break;
            };
            debug!(choice = %choice, "menu choice");

            match choice.as_str() {
                "1" => self.view_books()?,
                "2" => self.add_book()?,
                "3" => self.delete_book()?,
                "4" => self.borrow_book()?,
                "5" => self.return_book()?,
                "6" => self.search_books()?,
                "7" => break,
                _ => writeln!(self.output, "Invalid choice. Try again.")?,
            }
        }
        self.finish()
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "=== Library Menu ===")?;
        writeln!(self.output, "1. View All Books")?;
        writeln!(self.output, "2. Add Book")?;
        writeln!(self.output, "3. Delete Book")?;
        writeln!(self.output, "4. Borrow Book")?;
        writeln!(self.output, "5. Return Book")?;
        writeln!(self.output, "6. Search Book by Title")?;
        writeln!(self.output, "7. Exit")
    }

    /// Writes `text`, then reads one trimmed line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompts for a book id. `None` if input ended or the answer was not a number.
    fn prompt_id(&mut self, text: &str) -> io::Result<Option<BookId>> {
        let Some(answer) = self.prompt(text)? else {
            return Ok(None);
        };
        match answer.parse() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(self.output, "Invalid input. ID must be a number.")?;
                Ok(None)
            }
        }
    }

    fn prompt_admission(&mut self) -> io::Result<Option<String>> {
        let Some(admission) =
            self.prompt(&format!("Enter your admission number (Format: {ADMISSION_FORMAT}): "))?
        else {
            return Ok(None);
        };
        if !AdmissionNumber::is_valid(&admission) {
            writeln!(
                self.output,
                "Invalid admission number format. Example: {ADMISSION_EXAMPLE}"
            )?;
            return Ok(None);
        }
        Ok(Some(admission))
    }

    fn report(&mut self, error: &CatalogError) -> io::Result<()> {
        match error {
            CatalogError::Storage(e) => writeln!(self.output, "Error saving file: {e}"),
            other => writeln!(self.output, "{}", capitalize(&other.to_string())),
        }
    }

    fn view_books(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "--- Library Books ---")?;
        if self.catalog.is_empty() {
            return writeln!(self.output, "No books available.");
        }
        for entry in self.catalog.entries() {
            writeln!(self.output, "{entry}")?;
        }
        Ok(())
    }

    fn add_book(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_id("Enter new book ID (number): ")? else {
            return Ok(());
        };
        if self.catalog.find_by_id(id).is_some() {
            return writeln!(
                self.output,
                "Book ID already exists. Please choose a different ID."
            );
        }

        let Some(title) = self.prompt("Enter book title: ")? else {
            return Ok(());
        };
        let Some(author) = self.prompt("Enter author name: ")? else {
            return Ok(());
        };

        writeln!(self.output, "Select field/category of the book:")?;
        for (number, category) in Category::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {category}", number + 1)?;
        }
        let Some(choice) = self.prompt(&format!("Enter choice (1-{}): ", Category::ALL.len()))?
        else {
            return Ok(());
        };
        let Some(category) = Category::from_menu_choice(&choice) else {
            return writeln!(self.output, "Invalid field choice.");
        };

        let mut book = NewBook::new(id, title, author, category);
        if category == Category::Programming {
            let Some(language) = self.prompt("Enter programming language: ")? else {
                return Ok(());
            };
            book = book.with_language(language);
        }

        match self.catalog.add(book) {
            Ok(_) => writeln!(self.output, "Book added successfully."),
            Err(e) => self.report(&e),
        }
    }

    fn delete_book(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_id("Enter book ID to delete: ")? else {
            return Ok(());
        };
        match self.catalog.delete(id) {
            Ok(_) => writeln!(self.output, "Book deleted successfully."),
            Err(e) => self.report(&e),
        }
    }

    fn borrow_book(&mut self) -> io::Result<()> {
        let Some(admission) = self.prompt_admission()? else {
            return Ok(());
        };
        if self.catalog.loan_of(&admission).is_some() {
            return writeln!(
                self.output,
                "You have already borrowed a book. Return it before borrowing another."
            );
        }

        let Some(id) = self.prompt_id("Enter book ID to borrow: ")? else {
            return Ok(());
        };
        match self.catalog.find_by_id(id) {
            None => return writeln!(self.output, "No book found with that ID."),
            Some(entry) if !entry.is_available() => {
                return writeln!(
                    self.output,
                    "Sorry, the book is currently borrowed by someone else."
                );
            }
            Some(_) => {}
        }

        let fields: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        let Some(field) =
            self.prompt(&format!("Enter your field of study ({}): ", fields.join(", ")))?
        else {
            return Ok(());
        };

        match self.catalog.borrow(&admission, id, &field) {
            Ok(entry) => writeln!(
                self.output,
                "Book borrowed successfully: {}",
                entry.title()
            ),
            Err(CatalogError::FieldMismatch { .. }) => writeln!(
                self.output,
                "You can only borrow books from your field of study."
            ),
            Err(e) => self.report(&e),
        }
    }

    fn return_book(&mut self) -> io::Result<()> {
        let Some(admission) = self.prompt_admission()? else {
            return Ok(());
        };
        match self.catalog.return_book(&admission) {
            Ok(entry) => writeln!(
                self.output,
                "You have successfully returned: {}",
                entry.title()
            ),
            Err(CatalogError::NoActiveLoan { .. }) => {
                writeln!(self.output, "You have not borrowed any book.")
            }
            Err(CatalogError::InconsistentState { .. }) => writeln!(
                self.output,
                "Borrowed book record not found. Removing your borrow record."
            ),
            Err(e) => self.report(&e),
        }
    }

    fn search_books(&mut self) -> io::Result<()> {
        let Some(keyword) = self.prompt("Enter book title or keyword to search: ")? else {
            return Ok(());
        };

        let mut found = false;
        for entry in self.catalog.search_by_title(&keyword) {
            writeln!(self.output, "{entry}")?;
            found = true;
        }
        if !found {
            writeln!(
                self.output,
                "No books found with the title containing: {keyword}"
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        match self.catalog.save() {
            Ok(()) => writeln!(self.output, "Exiting. Thank you!"),
            Err(e) => self.report(&e),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
