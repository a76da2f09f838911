use anyhow::{Context, Result};
use timbre_core::model::FeatureScaling;
use timbre_core::MAX_POPULARITY_CAP;
use timbre_ingest::{config, Config};
use toml_edit::{value, Array, DocumentMut};

const VALID_KEYS: &str = "catalog_path, popularity_cap, page_size, genres, feature_scaling";

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  catalog_path: {}", config.catalog_path.display());
    println!("  popularity_cap: {}", config.popularity_cap);
    println!("  page_size: {}", config.page_size);
    println!("  genres: {}", config.genres.join(", "));
    println!("  feature_scaling: {}", config.feature_scaling);
    println!("  logging: {:?}", config.logging);

    println!("\nPriority: CLI args > ENV vars (TIMBRE_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value.
pub fn get_config(key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let config = Config::load()?;

        match key.as_str() {
            "catalog_path" => println!("{}", config.catalog_path.display()),
            "popularity_cap" => println!("{}", config.popularity_cap),
            "page_size" => println!("{}", config.page_size),
            "genres" => println!("{}", config.genres.join(", ")),
            "feature_scaling" => println!("{}", config.feature_scaling),
            _ => {
                anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS);
            }
        }
    } else {
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'timbre config init' to create it.");
        }
    }

    Ok(())
}

/// Set a config value, keeping the rest of the file (comments included) intact.
pub fn set_config(key: String, value: String) -> Result<()> {
    let config_path = config::config_file_path();

    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = apply_setting(&contents, &key, &value)?;

    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, value);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Return `contents` with `key` set to `raw`, parsed according to the key's type.
fn apply_setting(contents: &str, key: &str, raw: &str) -> Result<String> {
    let mut doc: DocumentMut = contents.parse().context("Config file is not valid TOML")?;

    match key {
        "catalog_path" => {
            doc[key] = value(raw);
        }
        "popularity_cap" | "page_size" => {
            let n: i64 = raw
                .parse()
                .with_context(|| format!("{} must be a whole number, got {:?}", key, raw))?;
            if n < 1 {
                anyhow::bail!("{} must be at least 1", key);
            }
            let over_cap = usize::try_from(n).map_or(true, |cap| cap > MAX_POPULARITY_CAP);
            if key == "popularity_cap" && over_cap {
                anyhow::bail!("popularity_cap must be at most {}", MAX_POPULARITY_CAP);
            }
            doc[key] = value(n);
        }
        "feature_scaling" => {
            let scaling: FeatureScaling = raw.parse()?;
            doc[key] = value(scaling.to_string());
        }
        "genres" => {
            let mut genres = Array::new();
            for genre in raw.split(',').map(str::trim).filter(|g| !g.is_empty()) {
                genres.push(genre);
            }
            if genres.is_empty() {
                anyhow::bail!("genres must name at least one genre");
            }
            doc[key] = value(genres);
        }
        _ => {
            anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS);
        }
    }

    Ok(doc.to_string())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    let config_path = config::config_file_path();
    println!("{}", config_path.display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure timbre.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
