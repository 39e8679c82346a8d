//! Coloured one-line messages for CLI commands.
//! The HTTP server logs through `tracing` instead.

use ansi_term::Colour::{Blue, Green, Red, Yellow};
use std::fmt;

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {msg}", Blue.bold().paint("ℹ️"));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {msg}", Green.bold().paint("✅"));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{} {msg}", Yellow.bold().paint("⚠️"));
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {msg}", Red.bold().paint("❌"));
}

/// Section title, e.g. above a table of counts.
pub fn header<T: fmt::Display>(msg: T) {
    println!("{}", Blue.bold().paint(format!("== {msg} ==")));
}
