use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_search::config::load_config;
///
/// let config = load_config(Path::new("sumi-search.toml")).unwrap();
/// println!("Workers: {}", config.crawler.workers);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so runs can be correlated with the configuration they used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Reads seed URLs from a text file, one per line
///
/// Blank lines and lines starting with `#` are skipped. An empty result is an
/// error: a crawl needs at least one seed.
pub fn read_seeds_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let seeds: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if seeds.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Seeds file '{}' contains no URLs",
            path.display()
        )));
    }

    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
seeds = ["https://example.com/"]

[crawler]
max-pages = 25
same-domain-only = false
workers = 4

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"

[index]
database-path = "./test.db"

[search]
max-limit = 20
"#;

        let file = create_temp_file(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_pages, 25);
        assert!(!config.crawler.same_domain_only);
        assert_eq!(config.crawler.workers, 4);
        assert_eq!(config.crawler.http_timeout_secs, 15);
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
        assert_eq!(config.index.database_path, "./test.db");
        assert_eq!(config.index.excerpt_max_chars, 400);
        assert_eq!(config.search.default_limit, 10);
        assert_eq!(config.search.max_limit, 20);
        assert_eq!(config.seeds.len(), 1);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let file = create_temp_file("[crawler]\nmax-pages = 3\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_pages, 3);
        assert!(config.crawler.same_domain_only);
        assert_eq!(config.crawler.workers, 8);
        assert_eq!(config.crawler.max_content_bytes(), 5 * 1024 * 1024);
        assert!(config.seeds.is_empty());
        assert!(config.normalizer.stopwords_path.is_none());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_file("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_file("[crawler]\nmax-pages = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_file("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_file("content 1");
        let file2 = create_temp_file("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_read_seeds_file_skips_comments_and_blanks() {
        let file = create_temp_file(
            "# seeds\nhttps://example.com/\n\n   https://example.org/docs  \n# done\n",
        );
        let seeds = read_seeds_file(file.path()).unwrap();
        assert_eq!(
            seeds,
            vec![
                "https://example.com/".to_string(),
                "https://example.org/docs".to_string()
            ]
        );
    }

    #[test]
    fn test_read_seeds_file_rejects_empty() {
        let file = create_temp_file("# nothing here\n\n");
        let result = read_seeds_file(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
