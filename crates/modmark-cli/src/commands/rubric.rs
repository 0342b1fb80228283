//! The `modmark list|show|create|update|delete` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use modmark_core::payload::from_response;
use modmark_core::session::EditorSession;
use modmark_core::traits::RubricStore;

use super::{connect, matrix_table, read_matrix, submit};

pub async fn list(section: String, config_path: Option<PathBuf>) -> Result<()> {
    let store = connect(config_path.as_deref())?;
    let rubrics = store.list_for_section(&section).await?;

    if rubrics.is_empty() {
        println!("No rubrics for section {section}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Title", "Criteria", "Score"]);
    for rubric in &rubrics {
        table.add_row(vec![
            Cell::new(&rubric.id),
            Cell::new(&rubric.title),
            Cell::new(rubric.criteria.len()),
            Cell::new(rubric.score),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn show(id: String, format: String, config_path: Option<PathBuf>) -> Result<()> {
    let store = connect(config_path.as_deref())?;
    let doc = store.get(&id).await?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&doc)?),
        "text" => {
            let matrix = from_response(&doc)
                .with_context(|| format!("rubric {id} cannot be shown as a matrix"))?;
            println!("{} (total {})", doc.title, doc.score);
            if !doc.description.is_empty() {
                println!("{}", doc.description);
            }
            println!("{}", matrix_table(&matrix));
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }
    Ok(())
}

pub async fn create(
    file: PathBuf,
    section: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let matrix = read_matrix(&file)?;
    let store = connect(config_path.as_deref())?;

    let mut session = match section {
        Some(id) => EditorSession::for_section(id),
        None => EditorSession::new(),
    };
    session.import(matrix)?;
    let doc = submit(&mut session, &store).await?;
    println!("Created rubric {} ({})", doc.title, doc.id);
    Ok(())
}

pub async fn update(id: String, file: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let matrix = read_matrix(&file)?;
    let store = connect(config_path.as_deref())?;

    // Load first so a missing rubric fails before anything is sent.
    let current = store.get(&id).await?;
    let mut session = EditorSession::load(&current)
        .with_context(|| format!("stored rubric {id} is malformed"))?;
    session.import(matrix)?;
    let doc = submit(&mut session, &store).await?;
    println!("Updated rubric {} ({})", doc.title, doc.id);
    Ok(())
}

pub async fn delete(id: String, config_path: Option<PathBuf>) -> Result<()> {
    let store = connect(config_path.as_deref())?;
    store.delete(&id).await?;
    println!("Deleted rubric {id}");
    Ok(())
}
