//! File-backed high score, shaped like a browser key-value store: a flat JSON
//! object of string keys to string values.
use rizz_game::HIGH_SCORE_KEY;
use rizz_game::store::{HighScoreStore, StoreError, parse_stored_score};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct JsonFileHighScoreStore {
    path: PathBuf,
}

impl JsonFileHighScoreStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            _ => Err(StoreError::Corrupt {
                key: HIGH_SCORE_KEY.to_string(),
                value: raw,
            }),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl HighScoreStore for JsonFileHighScoreStore {
    fn load(&self) -> Result<Option<i64>, StoreError> {
        let entries = self.read_entries()?;
        match entries.get(HIGH_SCORE_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => parse_stored_score(raw).map(Some),
            Some(Value::Number(number)) => number.as_i64().map(Some).ok_or_else(|| {
                StoreError::Corrupt {
                    key: HIGH_SCORE_KEY.to_string(),
                    value: number.to_string(),
                }
            }),
            Some(other) => Err(StoreError::Corrupt {
                key: HIGH_SCORE_KEY.to_string(),
                value: other.to_string(),
            }),
        }
    }

    fn save(&mut self, score: i64) -> Result<(), StoreError> {
        let mut entries = self.read_entries()?;
        entries.insert(HIGH_SCORE_KEY.to_string(), Value::String(score.to_string()));
        self.write_entries(&entries)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let mut entries = self.read_entries()?;
        if entries.remove(HIGH_SCORE_KEY).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "rizz-store-{label}-{}-{}.json",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn missing_file_means_no_score() {
        let store = JsonFileHighScoreStore::new(temp_path("missing"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_load_clear_cycle() {
        let path = temp_path("cycle");
        let mut store = JsonFileHighScoreStore::new(&path);
        store.save(321).unwrap();
        assert_eq!(store.load().unwrap(), Some(321));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"rizzHighScore\": \"321\""));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn keeps_unrelated_keys() {
        let path = temp_path("shared");
        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();
        let mut store = JsonFileHighScoreStore::new(&path);
        store.save(5).unwrap();
        let entries: Map<String, Value> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(entries["theme"], "dark");
    }

    #[test]
    fn garbage_is_reported_as_corrupt() {
        let path = temp_path("garbage");
        fs::write(&path, r#"{"rizzHighScore":"lots"}"#).unwrap();
        let store = JsonFileHighScoreStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    }
}
