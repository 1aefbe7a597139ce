use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// Secret key under which the Gemini API key is stored
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Key used to store the default model in the secret store
const DEFAULT_MODEL_KEY: &str = "default_model";

/// Storage for the API key and other settings
///
/// Provides functionality to store, retrieve, and manage secrets
/// in a JSON file located in the user's home directory.
#[derive(Debug, Serialize, Deserialize)]
pub struct SecretStore {
    /// Map of secret keys to their values
    secrets: HashMap<String, String>,
    /// Path to the secrets file
    file_path: PathBuf,
}

impl SecretStore {
    /// Creates a new SecretStore instance
    ///
    /// Initializes the store with the default path (~/.mealplan/secrets.json)
    /// and loads any existing secrets from the file.
    pub fn new() -> io::Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Could not find home directory"))?;
        let file_path = home_dir.join(".mealplan").join("secrets.json");
        Self::at_path(file_path)
    }

    /// Creates a SecretStore backed by an explicit file path.
    pub fn at_path(file_path: PathBuf) -> io::Result<Self> {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut store = SecretStore {
            secrets: HashMap::new(),
            file_path,
        };

        store.load()?;
        Ok(store)
    }

    /// Loads secrets from the file system
    fn load(&mut self) -> io::Result<()> {
        match File::open(&self.file_path) {
            Ok(mut file) => {
                let mut contents = String::new();
                file.read_to_string(&mut contents)?;
                self.secrets = serde_json::from_str(&contents).unwrap_or_default();
                Ok(())
            }
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Saves the current secrets to the file system
    fn save(&self) -> io::Result<()> {
        let contents = serde_json::to_string_pretty(&self.secrets)?;
        let mut file = File::create(&self.file_path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    /// Sets a secret value for the given key
    pub fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.secrets.insert(key.to_string(), value.to_string());
        self.save()
    }

    /// Retrieves a secret value for the given key
    pub fn get(&self, key: &str) -> Option<&String> {
        self.secrets.get(key)
    }

    /// Deletes a secret with the given key
    pub fn delete(&mut self, key: &str) -> io::Result<()> {
        self.secrets.remove(key);
        self.save()
    }

    /// Sets the default model used when none is passed on the command line
    pub fn set_default_model(&mut self, model: &str) -> io::Result<()> {
        self.secrets
            .insert(DEFAULT_MODEL_KEY.to_string(), model.to_string());
        self.save()
    }

    /// Retrieves the default model if one is set
    pub fn get_default_model(&self) -> Option<&String> {
        self.secrets.get(DEFAULT_MODEL_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_secrets_through_the_file() {
        let dir = std::env::temp_dir().join(format!("mealplan-secrets-{}", std::process::id()));
        let path = dir.join("secrets.json");

        let mut store = SecretStore::at_path(path.clone()).unwrap();
        store.set(GEMINI_API_KEY, "abc123").unwrap();
        store.set_default_model("gemini-2.5-flash").unwrap();

        let reloaded = SecretStore::at_path(path).unwrap();
        assert_eq!(reloaded.get(GEMINI_API_KEY).map(String::as_str), Some("abc123"));
        assert_eq!(
            reloaded.get_default_model().map(String::as_str),
            Some("gemini-2.5-flash")
        );

        fs::remove_dir_all(dir).unwrap();
    }
}
