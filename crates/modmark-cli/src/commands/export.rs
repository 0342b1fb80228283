//! The `modmark export` command.

use std::path::PathBuf;

use anyhow::Result;

use super::read_matrix;

pub fn execute(file: PathBuf, out: PathBuf) -> Result<()> {
    let matrix = read_matrix(&file)?;
    modmark_core::import::write_csv(&matrix, &out)?;
    println!(
        "Exported {} criteria to {}",
        matrix.row_count(),
        out.display()
    );
    Ok(())
}
