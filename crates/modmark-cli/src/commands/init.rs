//! The `modmark init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("modmark.toml").exists() {
        println!("modmark.toml already exists, skipping.");
    } else {
        std::fs::write("modmark.toml", SAMPLE_CONFIG)?;
        println!("Created modmark.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit modmark.toml with your backend URL");
    println!("  2. Export MODMARK_TOKEN with your login token");
    println!("  3. Run: modmark import --file rubric.xlsx --out rubric.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# modmark configuration

base_url = "http://localhost:5000"
token = "${MODMARK_TOKEN}"
timeout_secs = 30
"#;
