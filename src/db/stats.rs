use crate::db::store::{Backend, Store};
use crate::errors::AppResult;
use ansi_term::Colour::{Cyan, Fixed, Green, Yellow};
use chrono::NaiveDate;
use std::fs;

/// Print size, row counts and response date range of the active store.
pub fn print_db_info(store: &dyn Store) -> AppResult<()> {
    let counts = store.counts()?;
    let location = store.location();

    println!();
    println!("{} {}", Cyan.paint("• Backend:"), store.backend());
    println!("{} {}", Cyan.paint("• Location:"), Yellow.paint(&location));

    if store.backend() == Backend::Sqlite {
        let file_size = fs::metadata(&location).map(|m| m.len()).unwrap_or(0);
        let file_mb = (file_size as f64) / (1024.0 * 1024.0);
        println!("{} {:.2} MB", Cyan.paint("• Size:"), file_mb);
    }

    println!("{} {}", Cyan.paint("• Students:"), Green.paint(counts.alunos.to_string()));
    println!("{} {}", Cyan.paint("• Responses:"), Green.paint(counts.respostas.to_string()));
    println!("{} {}", Cyan.paint("• Log entries:"), counts.log);

    let dash = Fixed(8).paint("--").to_string();
    println!("{}", Cyan.paint("• Date range:"));
    println!("    from: {}", counts.first_date.as_deref().unwrap_or(&dash));
    println!("    to:   {}", counts.last_date.as_deref().unwrap_or(&dash));

    let first = counts.first_date.as_deref().and_then(parse_day);
    let last = counts.last_date.as_deref().and_then(parse_day);
    if let (Some(f), Some(l)) = (first, last) {
        let days = (l - f).num_days().max(1);
        let avg = counts.respostas as f64 / days as f64;
        println!("{} {:.2}", Cyan.paint("• Average responses/day:"), avg);
    }

    println!();
    Ok(())
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok()
}
