//! The `modmark import` command.

use std::path::PathBuf;

use anyhow::Result;

use modmark_core::session::EditorSession;

use super::{connect, matrix_table, read_matrix, save_matrix, submit};

pub async fn execute(
    file: PathBuf,
    out: Option<PathBuf>,
    create: bool,
    section: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let matrix = read_matrix(&file)?;

    println!(
        "Imported {} criteria x {} levels from {}",
        matrix.row_count(),
        matrix.column_count(),
        file.display()
    );
    println!("{}", matrix_table(&matrix));

    if let Some(out) = &out {
        save_matrix(&matrix, out)?;
        println!("Matrix written to {}", out.display());
    }

    if create {
        let store = connect(config_path.as_deref())?;
        let mut session = match section {
            Some(id) => EditorSession::for_section(id),
            None => EditorSession::new(),
        };
        session.import(matrix)?;
        let doc = submit(&mut session, &store).await?;
        println!("Created rubric {} ({})", doc.title, doc.id);
    }

    Ok(())
}
