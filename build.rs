use std::fs;

const BACKENDS: &[&str] = &["auto", "command", "osc52", "stdout"];

fn main() {
    // The default config is embedded with include_str!, so a bad file would
    // only surface at runtime as silently ignored settings.
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    for section in ["markdown", "clipboard"] {
        if !table.get(section).is_some_and(toml::Value::is_table) {
            panic!("default_config.toml is missing the [{}] table", section);
        }
    }

    let backend = table
        .get("clipboard")
        .and_then(|c| c.get("backend"))
        .and_then(toml::Value::as_str);
    if let Some(backend) = backend {
        if !BACKENDS.contains(&backend) {
            panic!(
                "default_config.toml: unknown clipboard backend {:?}, expected one of {:?}",
                backend, BACKENDS
            );
        }
    }
}
