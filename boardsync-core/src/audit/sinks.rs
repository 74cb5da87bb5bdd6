use std::sync::Mutex;

use super::publisher::LogObserver;
use super::record::{LogRecord, LogType};
use crate::error::SinkError;

/// Forwards records to `tracing`: errors at ERROR, the rest at DEBUG.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogObserver for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    fn update(&self, record: &LogRecord) -> Result<(), SinkError> {
        let line = record.to_line()?;
        match record.kind {
            LogType::Error => tracing::error!(target: "boardsync::audit", "{line}"),
            LogType::Info => tracing::debug!(target: "boardsync::audit", "{line}"),
        }
        Ok(())
    }
}

/// Keeps every record in memory. Handy for tests and for inspecting what
/// the handlers emitted.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl LogObserver for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn update(&self, record: &LogRecord) -> Result<(), SinkError> {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
        Ok(())
    }
}

#[cfg(feature = "rt")]
pub use file::FileSink;

#[cfg(feature = "rt")]
mod file {
    use std::path::{Path, PathBuf};

    use tokio::fs::{File, OpenOptions};
    use tokio::io::AsyncWriteExt;
    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;

    use super::*;

    /// Append-only NDJSON log file.
    ///
    /// `update` only queues the line; a background task does the write, so a
    /// slow or failing disk never holds up the caller. Write failures are
    /// reported through `tracing` by the writer task.
    #[derive(Debug, Clone)]
    pub struct FileSink {
        path: PathBuf,
        tx: mpsc::UnboundedSender<String>,
    }

    impl FileSink {
        /// Start the writer task. Must be called inside a tokio runtime.
        /// The task ends once every `FileSink` clone has been dropped and the
        /// queue is drained.
        pub fn spawn(path: impl Into<PathBuf>) -> (Self, JoinHandle<()>) {
            let path = path.into();
            let (tx, rx) = mpsc::unbounded_channel();
            let handle = tokio::spawn(write_loop(path.clone(), rx));
            (Self { path, tx }, handle)
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl LogObserver for FileSink {
        fn name(&self) -> &'static str {
            "file"
        }

        fn update(&self, record: &LogRecord) -> Result<(), SinkError> {
            let line = record.to_line()?;
            self.tx
                .send(line)
                .map_err(|_| SinkError::Closed { sink: "file" })
        }
    }

    async fn write_loop(path: PathBuf, mut rx: mpsc::UnboundedReceiver<String>) {
        let mut writer = LineWriter::new(path);
        while let Some(line) = rx.recv().await {
            if let Err(e) = writer.write(&line).await {
                tracing::error!(path = %writer.path.display(), error = %e, "ERROR logging to file");
            }
        }
    }

    /// Keeps the log file open between records. After a failed open or
    /// write the handle is dropped and the next record reopens the file.
    struct LineWriter {
        path: PathBuf,
        file: Option<File>,
    }

    impl LineWriter {
        fn new(path: PathBuf) -> Self {
            Self { path, file: None }
        }

        async fn write(&mut self, line: &str) -> std::io::Result<()> {
            let mut file = match self.file.take() {
                Some(file) => file,
                None => {
                    OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(&self.path)
                        .await?
                }
            };

            append_line(&mut file, line).await?;
            self.file = Some(file);
            Ok(())
        }
    }

    async fn append_line(file: &mut File, line: &str) -> std::io::Result<()> {
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_collects() {
        let sink = MemorySink::new();
        sink.update(&LogRecord::info("one")).unwrap();
        sink.update(&LogRecord::error("two")).unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert!(records[1].is_error());

        sink.clear();
        assert!(sink.records().is_empty());
    }

    #[test]
    fn console_sink_accepts_both_levels() {
        let sink = ConsoleSink::new();
        assert!(sink.update(&LogRecord::info("fine")).is_ok());
        assert!(sink.update(&LogRecord::error("bad")).is_ok());
    }

    #[cfg(feature = "rt")]
    #[tokio::test]
    async fn file_sink_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.log");

        let (sink, handle) = FileSink::spawn(&path);
        sink.update(&LogRecord::info("first")).unwrap();
        sink.update(&LogRecord::error("second")).unwrap();
        drop(sink);
        handle.await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let records: Vec<LogRecord> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "first");
        assert_eq!(records[1].kind, LogType::Error);
    }

    #[cfg(feature = "rt")]
    #[tokio::test]
    async fn file_sink_write_failure_stays_inside_writer() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending
        let (sink, handle) = FileSink::spawn(dir.path());

        assert!(sink.update(&LogRecord::info("lost")).is_ok());
        drop(sink);
        handle.await.unwrap();
    }
}
