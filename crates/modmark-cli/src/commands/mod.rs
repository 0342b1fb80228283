pub mod export;
pub mod feedback;
pub mod import;
pub mod init;
pub mod rubric;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use modmark_client::config::load_config_from;
use modmark_client::HttpRubricStore;
use modmark_core::payload::RubricDocument;
use modmark_core::session::{EditorSession, SubmitError};
use modmark_core::traits::RubricStore;
use modmark_core::validate::FieldError;
use modmark_core::RubricMatrix;

/// Load a matrix from a saved JSON file or import it from a spreadsheet.
pub fn read_matrix(path: &Path) -> Result<RubricMatrix> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid rubric matrix in {}", path.display()))
    } else {
        modmark_core::import::import_file(path)
            .with_context(|| format!("failed to import {}", path.display()))
    }
}

pub fn save_matrix(matrix: &RubricMatrix, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(matrix).context("failed to serialize matrix")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

pub fn connect(config_path: Option<&Path>) -> Result<HttpRubricStore> {
    let config = load_config_from(config_path)?;
    tracing::debug!(?config, "connecting to rubric backend");
    Ok(HttpRubricStore::from_config(&config)?)
}

/// Render the matrix as a criterion-by-level table.
pub fn matrix_table(matrix: &RubricMatrix) -> Table {
    let mut table = Table::new();
    let mut header = vec!["Criterion".to_string(), "Weight".to_string()];
    header.extend(matrix.columns().iter().map(|c| format!("Level {}", c.level)));
    table.set_header(header);

    for row in matrix.rows() {
        let mut cells = vec![
            Cell::new(&row.criteria_name),
            Cell::new(row.weight.as_str()),
        ];
        cells.extend(
            row.cells()
                .iter()
                .map(|cell| Cell::new(format!("{} ({})", cell.description, cell.score))),
        );
        table.add_row(cells);
    }
    table
}

pub fn print_problems(problems: &[FieldError]) {
    for problem in problems {
        println!("  {problem}");
    }
}

/// Submit the session, printing field problems if validation blocks it.
pub async fn submit(session: &mut EditorSession, store: &dyn RubricStore) -> Result<RubricDocument> {
    match session.submit(store).await {
        Ok(doc) => Ok(doc),
        Err(SubmitError::Invalid(problems)) => {
            print_problems(&problems);
            anyhow::bail!(
                "rubric has {} invalid field(s)",
                problems.iter().filter(|p| p.is_error()).count()
            )
        }
        Err(e) => Err(e.into()),
    }
}
