//! # Durable Order Log File
//!
//! The whole log lives in one pretty-printed JSON array. Every flush rewrites the array to a
//! sibling temp file, syncs it and renames it over the real file, so a reader opening the
//! path sees either the previous array or the new one, never a half-written record.

use crate::model::Order;
use crate::order_log::OrderLogError;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct OrderLogFile {
    path: PathBuf,
}

impl OrderLogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<file name>.tmp` next to the log, never the log itself.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Reads every order in the file. A missing or blank file is an empty log.
    pub async fn load(&self) -> Result<Vec<Order>, OrderLogError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No order log yet");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(OrderLogError::Persistence {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| OrderLogError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Replaces the file contents with `orders`.
    pub async fn flush(&self, orders: &[Order]) -> Result<(), OrderLogError> {
        let content = serde_json::to_vec_pretty(orders).map_err(OrderLogError::Encode)?;
        let temp_path = self.temp_path();

        let persistence = |source| OrderLogError::Persistence {
            path: self.path.clone(),
            source,
        };

        let mut temp = tokio::fs::File::create(&temp_path)
            .await
            .map_err(persistence)?;
        temp.write_all(&content).await.map_err(persistence)?;
        temp.sync_all().await.map_err(persistence)?;
        drop(temp);

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(persistence)?;

        debug!(path = %self.path.display(), orders = orders.len(), bytes = content.len(), "Flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CartLine, KitchenInfo, OrderDraft, OrderNumber, OrderType};
    use tempfile::tempdir;

    fn order(number: u64) -> Order {
        Order::new(
            OrderNumber(number),
            OrderDraft {
                created_at: chrono::Local::now().naive_local(),
                order_type: OrderType::DineIn,
                lines: vec![CartLine {
                    name: "리조또".into(),
                    unit_price: 16000,
                    quantity: 1,
                    display_glyph: "🍚".into(),
                }],
                kitchen_info: KitchenInfo::default(),
                payment_method: None,
            },
        )
    }

    #[tokio::test]
    async fn test_missing_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let file = OrderLogFile::new(dir.path().join("orders.json"));

        assert!(file.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_flush_then_load() {
        let dir = tempdir().unwrap();
        let file = OrderLogFile::new(dir.path().join("orders.json"));

        let orders = vec![order(1), order(2)];
        file.flush(&orders).await.unwrap();
        let loaded = file.load().await.unwrap();

        assert_eq!(loaded, orders);
        assert!(!dir.path().join("orders.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_garbage_is_reported_as_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("orders.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = OrderLogFile::new(path).load().await.unwrap_err();
        assert!(matches!(err, OrderLogError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_log_named_tmp_keeps_a_separate_temp_file() {
        let dir = tempdir().unwrap();
        let file = OrderLogFile::new(dir.path().join("orders.tmp"));
        assert_eq!(file.temp_path(), dir.path().join("orders.tmp.tmp"));

        file.flush(&[order(1)]).await.unwrap();
        file.flush(&[order(1), order(2)]).await.unwrap();

        assert_eq!(file.load().await.unwrap().len(), 2);
        assert!(!file.temp_path().exists());
    }

    #[tokio::test]
    async fn test_total_that_disagrees_with_items_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("orders.json");
        std::fs::write(
            &path,
            r#"[{"order_number": 1, "timestamp": "2026-10-19T12:00:00", "order_type": "매장",
                "items": [{"name": "콜라", "price": 3000, "quantity": 1}], "total": 1}]"#,
        )
        .unwrap();

        let err = OrderLogFile::new(path).load().await.unwrap_err();
        assert!(matches!(err, OrderLogError::Corrupt { .. }));
        assert!(err.to_string().contains("add up to 3000"), "{err}");
    }

    #[tokio::test]
    async fn test_flush_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let file = OrderLogFile::new(dir.path().join("missing").join("orders.json"));

        let err = file.flush(&[order(1)]).await.unwrap_err();
        assert!(matches!(err, OrderLogError::Persistence { .. }));
    }
}
