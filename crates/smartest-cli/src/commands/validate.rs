//! The `smartest validate` command.

use std::path::PathBuf;

use anyhow::Result;

use smartest_core::sheet::{load_sheet_pair, validate_sheets};

pub fn execute(questions_path: PathBuf, key_path: PathBuf) -> Result<()> {
    let (questions, key) = load_sheet_pair(&questions_path, Some(&key_path))?;

    println!(
        "Question sheet: {} ({} questions, {} answers in key)",
        questions_path.display(),
        questions.len(),
        key.len()
    );

    let warnings = validate_sheets(&questions, &key);
    for w in &warnings {
        let prefix = w
            .question
            .map(|n| format!("  [Q{n}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Sheets valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
