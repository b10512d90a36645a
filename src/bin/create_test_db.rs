use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;

use expense_tracker::{
    Amount, ExpenseStore, Label, NewExpense, SQLiteExpenseStore, initialize_db, parse_date,
};

/// A utility for creating a test database for the expense tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const SAMPLE_EXPENSES: [(&str, &str, f64, &str); 6] = [
    ("Notebook", "School", 12.0, "2025-08-12"),
    ("Dinner", "Food", 3.0, "2025-08-16"),
    ("Bus fare", "Transport", 2.5, "2025-08-18"),
    ("Groceries", "Food", 48.2, "2025-08-20"),
    ("Textbook", "School", 65.0, "2025-08-25"),
    ("Movie ticket", "Entertainment", 14.0, "2025-09-02"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample expenses...");

    let store = SQLiteExpenseStore::new(Arc::new(Mutex::new(conn)));

    for (item, category, amount, date) in SAMPLE_EXPENSES {
        store.create(NewExpense {
            item: Label::new("item", item)?,
            category: Label::new("category", category)?,
            amount: Amount::new(amount)?,
            date: parse_date(date)?,
        })?;
    }

    println!("Success!");

    Ok(())
}
