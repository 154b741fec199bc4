use crate::corpus::CorpusStore;
use crate::events::AppEvent;
use crate::sys::writer::{self, WriteOp};
use async_channel::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use tokio::runtime::Runtime;

/// Starts the config watcher, the ctrl-c listener and, when given, the corpus
/// writer on a background tokio runtime. The returned thread finishes once
/// the writer has drained its queue; without a writer it runs until exit.
pub fn start_background_services(
    tx: Sender<AppEvent>,
    writer: Option<(CorpusStore, Receiver<WriteOp>)>,
) -> std::io::Result<JoinHandle<()>> {
    let rt = Runtime::new()?;

    Ok(thread::spawn(move || {
        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        log::error!("Failed to listen for ctrl-c: {}", e);
                        return;
                    }
                    let _ = tx.send(AppEvent::Quit).await;
                });
            }

            match writer {
                Some((store, rx)) => writer::run_writer(store, rx).await,
                None => std::future::pending::<()>().await,
            }
        });
    }))
}
