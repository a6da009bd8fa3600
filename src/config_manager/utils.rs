use std::fs;
use std::path::Path;
use anyhow::Result;
use regex::Regex;
use tracing::debug;

/// Read a configuration file with environment variable substitution: ${VAR_NAME}
pub fn read_config_text(config_path: &str) -> Result<String> {
    if !Path::new(config_path).exists() {
        anyhow::bail!("Configuration file not found: {}", config_path);
    }

    let content = load_text_file_with_guess_encoding(config_path)?;
    if content.trim().is_empty() {
        anyhow::bail!("Configuration file is empty: {}", config_path);
    }

    substitute_env_vars(&content)
}

/// Unset variables are left untouched so the parse error points at them.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| {
            debug!("Environment variable {} not set, leaving placeholder", var_name);
            caps[0].to_string()
        })
    });
    Ok(replaced.into_owned())
}

/// Load text file, stripping a UTF-8 BOM and falling back to lossy decoding
pub fn load_text_file_with_guess_encoding(file_path: &str) -> Result<String> {
    let mut buffer = fs::read(file_path)?;
    if buffer.starts_with(&[0xEF, 0xBB, 0xBF]) {
        buffer.drain(0..3);
    }

    match String::from_utf8(buffer) {
        Ok(content) => Ok(content),
        Err(err) => {
            let (cow, _, had_errors) = encoding_rs::UTF_8.decode(err.as_bytes());
            if had_errors {
                debug!("Configuration file {} is not valid UTF-8, decoded lossily", file_path);
            }
            Ok(cow.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_variables_and_keeps_unknown_ones() {
        std::env::set_var("VT_TEST_TRANSLATE_KEY", "secret");
        let out = substitute_env_vars("api_key: ${VT_TEST_TRANSLATE_KEY}\nother: ${VT_TEST_UNSET_VAR}")
            .unwrap();
        assert_eq!(out, "api_key: secret\nother: ${VT_TEST_UNSET_VAR}");
    }

    #[test]
    fn strips_utf8_bom() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("conf.yaml");
        fs::write(&path, b"\xEF\xBB\xBFsystem_config:\n  port: 1\n").unwrap();
        let text = load_text_file_with_guess_encoding(path.to_str().unwrap()).unwrap();
        assert!(text.starts_with("system_config"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_config_text("/nonexistent/conf.yaml").is_err());
    }
}
