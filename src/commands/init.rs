use crate::io;
use anyhow::Result;
use std::path::PathBuf;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(".bioscore.toml");

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    let default_config = r#"# Bioscore Configuration

[scoring]
# NLR threshold policy: "clinical-v1" (strict) or "clinical-v2" (permissive)
nlr_policy = "clinical-v1"

# Custom reference dataset; the builtin tables apply when unset
# [tables]
# path = "ranges.toml"

[quota]
# Submissions allowed per non-administrator account
default_limit = 25

[output]
default_format = "terminal"
"#;

    io::write_file(&config_path, default_config)?;
    println!("Created .bioscore.toml configuration file");

    Ok(())
}
