//! The `modmark validate` command.

use std::path::PathBuf;

use anyhow::Result;

use modmark_core::validate::validate_matrix;

use super::{print_problems, read_matrix};

pub fn execute(file: PathBuf) -> Result<()> {
    let matrix = read_matrix(&file)?;
    let title = if matrix.title.trim().is_empty() {
        "(untitled)"
    } else {
        matrix.title.as_str()
    };
    println!(
        "Rubric: {} ({} criteria, {} levels)",
        title,
        matrix.row_count(),
        matrix.column_count()
    );

    let problems = validate_matrix(&matrix);
    print_problems(&problems);

    let errors = problems.iter().filter(|p| p.is_error()).count();
    let warnings = problems.len() - errors;
    if errors > 0 {
        anyhow::bail!("{errors} error(s), {warnings} warning(s) found");
    }

    if warnings == 0 {
        println!("Rubric valid.");
    } else {
        println!("Rubric valid with {warnings} warning(s).");
    }
    Ok(())
}
