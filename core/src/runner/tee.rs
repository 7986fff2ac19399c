use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{Mutex, MutexGuard};

use crate::config::AnsiMode;
use crate::error::TeeError;
use crate::util::strip_ansi;

/// A byte destination shared between tasks. One call writes and flushes the
/// whole buffer before any other writer gets a turn.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn write_all(&self, buf: &[u8]) -> std::io::Result<()>;
}

/// Serializes writes to a single underlying writer.
pub struct SharedSink<W> {
    inner: Mutex<W>,
}

impl<W> SharedSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, W> {
        self.inner.lock().await
    }
}

#[async_trait]
impl<W> Sink for SharedSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write_all(&self, buf: &[u8]) -> std::io::Result<()> {
        let mut w = self.inner.lock().await;
        w.write_all(buf).await?;
        w.flush().await
    }
}

/// Drops ANSI escape sequences before handing bytes to the wrapped sink.
pub struct StripAnsi {
    inner: Arc<dyn Sink>,
}

impl StripAnsi {
    pub fn new(inner: Arc<dyn Sink>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Sink for StripAnsi {
    async fn write_all(&self, buf: &[u8]) -> std::io::Result<()> {
        let clean = strip_ansi(buf);
        self.inner.write_all(&clean).await
    }
}

/// The log file as the tee sees it. Only child output and supervisor
/// messages pass through here; the header and typed input go to `log` directly.
pub fn tee_log_branch(log: Arc<dyn Sink>, ansi: AnsiMode) -> Arc<dyn Sink> {
    match ansi {
        AnsiMode::Preserve => log,
        AnsiMode::Strip => Arc::new(StripAnsi::new(log)),
    }
}

/// Fans every write out to all sinks, in order.
///
/// The first failing sink ends the call; sinks after it do not see the buffer.
pub struct TeeWriter {
    sinks: Vec<Arc<dyn Sink>>,
}

impl TeeWriter {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Result<Self, TeeError> {
        if sinks.len() < 2 {
            return Err(TeeError::TooFewSinks(sinks.len()));
        }
        Ok(Self { sinks })
    }

    pub async fn write(&self, buf: &[u8]) -> Result<(), TeeError> {
        for (index, sink) in self.sinks.iter().enumerate() {
            sink.write_all(buf)
                .await
                .map_err(|source| TeeError::Write { index, source })?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and fails every one of them.
    #[derive(Default)]
    pub(crate) struct BrokenSink {
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl Sink for BrokenSink {
        async fn write_all(&self, _buf: &[u8]) -> std::io::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "sink closed",
            ))
        }
    }

    #[test]
    fn rejects_fewer_than_two_sinks() {
        let one: Arc<dyn Sink> = Arc::new(SharedSink::new(Vec::<u8>::new()));
        assert!(matches!(
            TeeWriter::new(vec![one]),
            Err(TeeError::TooFewSinks(1))
        ));
        assert!(matches!(
            TeeWriter::new(Vec::new()),
            Err(TeeError::TooFewSinks(0))
        ));
    }

    #[tokio::test]
    async fn duplicates_every_write() {
        let a = Arc::new(SharedSink::new(Vec::<u8>::new()));
        let b = Arc::new(SharedSink::new(Vec::<u8>::new()));
        let c = Arc::new(SharedSink::new(Vec::<u8>::new()));
        let tee = TeeWriter::new(vec![
            a.clone() as Arc<dyn Sink>,
            b.clone() as Arc<dyn Sink>,
            c.clone() as Arc<dyn Sink>,
        ])
        .unwrap();

        tee.write(b"hello ").await.unwrap();
        tee.write(b"world\n").await.unwrap();

        for sink in [&a, &b, &c] {
            assert_eq!(sink.lock().await.as_slice(), b"hello world\n");
        }
    }

    #[tokio::test]
    async fn stops_at_first_failing_sink() {
        let first = Arc::new(SharedSink::new(Vec::<u8>::new()));
        let broken = Arc::new(BrokenSink::default());
        let last = Arc::new(SharedSink::new(Vec::<u8>::new()));
        let tee = TeeWriter::new(vec![
            first.clone() as Arc<dyn Sink>,
            broken.clone() as Arc<dyn Sink>,
            last.clone() as Arc<dyn Sink>,
        ])
        .unwrap();

        let err = tee.write(b"data").await.unwrap_err();

        assert!(matches!(err, TeeError::Write { index: 1, .. }));
        assert_eq!(first.lock().await.as_slice(), b"data");
        assert_eq!(broken.calls.load(Ordering::SeqCst), 1);
        assert!(last.lock().await.is_empty());
    }

    #[tokio::test]
    async fn strip_mode_only_cleans_the_tee_branch() {
        let term = Arc::new(SharedSink::new(Vec::<u8>::new()));
        let file = Arc::new(SharedSink::new(Vec::<u8>::new()));
        let branch = tee_log_branch(file.clone() as Arc<dyn Sink>, AnsiMode::Strip);
        let tee = TeeWriter::new(vec![term.clone() as Arc<dyn Sink>, branch]).unwrap();

        tee.write(b"\x1b[32mok\x1b[0m\n").await.unwrap();
        // Direct writes to the file sink are left alone.
        file.write_all(b"\x1b[1mtyped\x1b[0m\n").await.unwrap();

        assert_eq!(term.lock().await.as_slice(), b"\x1b[32mok\x1b[0m\n");
        assert_eq!(
            file.lock().await.as_slice(),
            b"ok\n\x1b[1mtyped\x1b[0m\n"
        );
    }

    #[tokio::test]
    async fn preserve_mode_passes_the_log_through() {
        let file = Arc::new(SharedSink::new(Vec::<u8>::new()));
        let branch = tee_log_branch(file.clone() as Arc<dyn Sink>, AnsiMode::Preserve);

        branch.write_all(b"\x1b[32mok\x1b[0m\n").await.unwrap();

        assert_eq!(file.lock().await.as_slice(), b"\x1b[32mok\x1b[0m\n");
    }
}
