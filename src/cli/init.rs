use anyhow::Result;
use std::path::Path;

pub fn run(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    std::fs::create_dir_all(path.join("data"))?;
    std::fs::create_dir_all(path.join("data/media"))?;

    let config_path = path.join("taxa.toml");
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    let config = r#"[site]
url = "http://127.0.0.1:3000"

[server]
host = "127.0.0.1"
port = 3000

[database]
path = "./data/taxa.db"
pool_size = 10

[media]
upload_dir = "./data/media"
"#;

    std::fs::write(&config_path, config)?;

    println!("Created {}", config_path.display());
    println!("Next: `taxa migrate` then `taxa serve`");

    Ok(())
}
