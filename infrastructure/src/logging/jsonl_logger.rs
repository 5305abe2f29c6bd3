//! Debate log: one JSON line per conversation event.
//!
//! The file is opened in append mode, so one log can hold many debates.
//! Every line carries the debate's session id and a per-debate sequence
//! number; the first line written by a logger is a `log_opened` header.

use debate_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use debate_domain::SessionId;
use serde_json::{Map, Value, json};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Appends conversation events for one debate to a JSONL file
pub struct JsonlConversationLogger {
    file: Mutex<LogFile>,
    session_id: String,
    path: PathBuf,
}

struct LogFile {
    file: File,
    seq: u64,
}

impl JsonlConversationLogger {
    /// Open `path` for appending and write the debate header
    pub fn open(path: impl AsRef<Path>, session_id: SessionId) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        let logger = Self {
            file: Mutex::new(LogFile { file, seq: 0 }),
            session_id: session_id.to_string(),
            path: path.to_path_buf(),
        };
        logger.write(
            "log_opened",
            json!({ "version": env!("CARGO_PKG_VERSION") }),
        )?;
        Ok(logger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, event_type: &str, payload: Value) -> io::Result<()> {
        let mut log = self
            .file
            .lock()
            .map_err(|_| io::Error::other("conversation log lock poisoned"))?;
        log.seq += 1;

        let mut record = Map::new();
        record.insert("type".into(), event_type.into());
        record.insert("session_id".into(), self.session_id.clone().into());
        record.insert("seq".into(), log.seq.into());
        record.insert(
            "timestamp".into(),
            chrono::Utc::now()
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
                .into(),
        );
        match payload {
            Value::Object(fields) => {
                for (key, value) in fields {
                    record.entry(key).or_insert(value);
                }
            }
            Value::Null => {}
            other => {
                record.insert("data".into(), other);
            }
        }

        let mut line = serde_json::to_vec(&record).map_err(io::Error::other)?;
        line.push(b'\n');
        // One write per line keeps lines whole when several debates share a file
        log.file.write_all(&line)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        if let Err(e) = self.write(event.event_type, event.payload) {
            warn!(
                "Could not write {} to {}: {}",
                event.event_type,
                self.path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_records_carry_session_and_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debates.jsonl");
        let session_id = SessionId::new();
        let logger = JsonlConversationLogger::open(&path, session_id).unwrap();

        logger.log(ConversationEvent::new(
            "user_turn",
            json!({ "round": 1, "turn_id": 2, "text": "Regulation stifles innovation" }),
        ));
        logger.log(ConversationEvent::new("time_expired", json!(3)));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["type"], "log_opened");
        assert_eq!(lines[1]["type"], "user_turn");
        assert_eq!(lines[1]["text"], "Regulation stifles innovation");
        assert_eq!(lines[2]["data"], 3);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line["session_id"], session_id.to_string());
            assert_eq!(line["seq"], i as u64 + 1);
            assert!(line["timestamp"].as_str().unwrap().ends_with('Z'));
        }
    }

    #[test]
    fn test_payload_cannot_override_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debates.jsonl");
        let logger = JsonlConversationLogger::open(&path, SessionId::new()).unwrap();

        logger.log(ConversationEvent::new(
            "agent_turn",
            json!({ "type": "forged", "seq": 99, "text": "R1" }),
        ));

        let lines = read_lines(&path);
        assert_eq!(lines[1]["type"], "agent_turn");
        assert_eq!(lines[1]["seq"], 2);
        assert_eq!(lines[1]["text"], "R1");
    }

    #[test]
    fn test_second_debate_appends_instead_of_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debates.jsonl");
        let first = SessionId::new();
        let second = SessionId::new();

        let logger = JsonlConversationLogger::open(&path, first).unwrap();
        logger.log(ConversationEvent::new("session_ended", json!({})));
        drop(logger);
        let logger = JsonlConversationLogger::open(&path, second).unwrap();
        logger.log(ConversationEvent::new("session_started", json!({})));

        let sessions: Vec<String> = read_lines(&path)
            .iter()
            .map(|line| line["session_id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            sessions,
            vec![
                first.to_string(),
                first.to_string(),
                second.to_string(),
                second.to_string()
            ]
        );
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        File::create(&blocker).unwrap();
        assert!(JsonlConversationLogger::open(blocker.join("log.jsonl"), SessionId::new()).is_err());
    }
}
