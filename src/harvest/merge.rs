// Fan-in Merger - Interleave independent result channels into one

use tokio::sync::mpsc;
use tracing::debug;

/// Forward every item of every input into a single channel, in arrival order
///
/// Each input is drained by its own task holding a clone of the output
/// sender. The output closes once the last of those senders is dropped, i.e.
/// only after every input has been fully drained. The input set is fixed for
/// the lifetime of the merge.
pub fn merge<T>(inputs: Vec<mpsc::Receiver<T>>) -> mpsc::Receiver<T>
where
    T: Send + 'static,
{
    // Capacity 1: forwarders wait for the reader instead of buffering
    let (tx, rx) = mpsc::channel(1);

    debug!("Merging {} result streams", inputs.len());

    for mut input in inputs {
        let tx = tx.clone();
        tokio::spawn(async move {
            while let Some(item) = input.recv().await {
                if tx.send(item).await.is_err() {
                    // Reader is gone; nothing left to deliver to
                    break;
                }
            }
        });
    }

    // Only the forwarders' senders may keep the output open
    drop(tx);

    rx
}
