use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::datetime;

use fintrack::{Transaction, TransactionKind, initialize_db};

/// A utility for creating a fintrack database populated with sample data.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Inserting sample transactions...");

    let sample_transactions = [
        Transaction::build(TransactionKind::Income, 5000.0, "Salary")
            .date(datetime!(2025-03-07 0:00 UTC))
            .description("Monthly salary credited"),
        Transaction::build(TransactionKind::Expense, 1500.0, "Rent")
            .date(datetime!(2025-03-01 0:00 UTC))
            .description("Monthly house rent payment"),
        Transaction::build(TransactionKind::Income, 200.0, "Freelance")
            .date(datetime!(2025-03-05 0:00 UTC))
            .description("Freelance project payment"),
        Transaction::build(TransactionKind::Expense, 100.0, "Groceries")
            .date(datetime!(2025-03-06 0:00 UTC))
            .description("Weekly grocery shopping"),
        Transaction::build(TransactionKind::Income, 300.0, "Gift")
            .date(datetime!(2025-03-04 0:00 UTC))
            .description("Birthday gift from a friend"),
    ];

    for builder in sample_transactions {
        conn.execute(
            "INSERT INTO \"transaction\" (kind, amount, category, date, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                builder.kind,
                builder.amount,
                &builder.category,
                builder.date.expect("sample dates are always set"),
                &builder.description,
            ),
        )?;
    }

    println!("Success!");

    Ok(())
}
