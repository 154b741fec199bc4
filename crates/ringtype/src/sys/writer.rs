use crate::corpus::{CorpusError, CorpusSink, CorpusStore};
use async_channel::{Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    AppendRaw(String),
    PersistSentence(Vec<String>),
}

/// Hands corpus writes to a background task so the input loop never waits on disk.
#[derive(Debug, Clone)]
pub struct CorpusWriter {
    tx: Sender<WriteOp>,
}

impl CorpusWriter {
    pub fn channel() -> (Self, Receiver<WriteOp>) {
        let (tx, rx) = async_channel::unbounded();
        (Self { tx }, rx)
    }

    fn submit(&self, op: WriteOp) -> Result<(), CorpusError> {
        self.tx.try_send(op).map_err(|_| CorpusError::WriterClosed)
    }
}

impl CorpusSink for CorpusWriter {
    fn append_raw(&mut self, text: &str) -> Result<(), CorpusError> {
        self.submit(WriteOp::AppendRaw(text.to_string()))
    }

    fn persist_sentence(&mut self, sentence: &[String]) -> Result<(), CorpusError> {
        self.submit(WriteOp::PersistSentence(sentence.to_vec()))
    }
}

/// Applies queued writes in order until every [`CorpusWriter`] is dropped.
pub async fn run_writer(mut store: CorpusStore, rx: Receiver<WriteOp>) {
    while let Ok(op) = rx.recv().await {
        let result = match &op {
            WriteOp::AppendRaw(text) => store.append_raw(text),
            WriteOp::PersistSentence(sentence) => store.persist_sentence(sentence),
        };
        if let Err(e) = result {
            log::error!("Failed to write corpus ({:?}): {}", op, e);
        }
    }
    log::debug!("Corpus writer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_are_applied_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CorpusStore::new(dir.path());
        store.load().unwrap();

        let (mut writer, rx) = CorpusWriter::channel();
        writer.append_raw("ok ").unwrap();
        writer.append_raw("thanks").unwrap();
        writer
            .persist_sentence(&["ok".to_string(), "thanks".to_string()])
            .unwrap();
        drop(writer);

        run_writer(store, rx).await;

        let corpus = CorpusStore::new(dir.path()).load().unwrap();
        assert_eq!(corpus.raw_text, "ok thanks");
        assert_eq!(
            corpus.sentences.last().unwrap(),
            &vec!["ok".to_string(), "thanks".to_string()]
        );
    }

    #[test]
    fn test_closed_writer_reports_error() {
        let (mut writer, rx) = CorpusWriter::channel();
        drop(rx);
        assert!(matches!(
            writer.append_raw("x"),
            Err(CorpusError::WriterClosed)
        ));
    }
}
