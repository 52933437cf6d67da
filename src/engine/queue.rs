use super::task::Task;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::mpsc::Receiver;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::channel;

/// Bounded multi-producer/multi-consumer FIFO of pending work. Enqueue
/// blocks while the buffer is full; dequeue blocks while it is empty.
/// Shutdown delivers one stop sentinel per worker so every blocked
/// consumer wakes, drains its sentinel, and reads the close as a normal
/// exit. FIFO holds per producer; consumers share a single receiver.
#[derive(Debug, Clone)]
pub struct Queue {
    tx: Sender<Signal>,
    rx: Arc<Mutex<Receiver<Signal>>>,
}

#[derive(Debug)]
enum Signal {
    Work(Task),
    Stop,
}

impl Queue {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = channel(capacity.max(1));
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// blocks while the queue is full
    pub async fn enqueue(&self, task: Task) -> anyhow::Result<()> {
        self.tx
            .send(Signal::Work(task))
            .await
            .map_err(|_| anyhow::anyhow!("queue closed"))
    }

    /// next task in FIFO order; None is the shutdown sentinel
    pub async fn dequeue(&self) -> Option<Task> {
        match self.rx.lock().await.recv().await {
            Some(Signal::Work(task)) => Some(task),
            Some(Signal::Stop) => None,
            None => None,
        }
    }

    /// wake every worker with a stop sentinel
    pub async fn shutdown(&self, workers: usize) {
        for _ in 0..workers {
            let _ = self.tx.send(Signal::Stop).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn dequeue_preserves_enqueue_order() {
        let queue = Queue::new(8);
        queue.enqueue(Task::InitialGeneration).await.unwrap();
        queue.enqueue(Task::GenerateHypotheses { count: 5 }).await.unwrap();
        queue.enqueue(Task::CalculateProximity).await.unwrap();
        assert!(queue.dequeue().await == Some(Task::InitialGeneration));
        assert!(queue.dequeue().await == Some(Task::GenerateHypotheses { count: 5 }));
        assert!(queue.dequeue().await == Some(Task::CalculateProximity));
    }

    #[tokio::test]
    async fn enqueue_blocks_when_full() {
        let queue = Queue::new(1);
        queue.enqueue(Task::InitialGeneration).await.unwrap();
        let blocked = tokio::time::timeout(
            Duration::from_millis(20),
            queue.enqueue(Task::CalculateProximity),
        )
        .await;
        assert!(blocked.is_err());
        assert!(queue.dequeue().await == Some(Task::InitialGeneration));
        assert!(queue.enqueue(Task::CalculateProximity).await.is_ok());
    }

    #[tokio::test]
    async fn dequeue_blocks_when_empty() {
        let queue = Queue::new(1);
        let starved = tokio::time::timeout(Duration::from_millis(20), queue.dequeue()).await;
        assert!(starved.is_err());
    }

    #[tokio::test]
    async fn shutdown_wakes_every_waiter() {
        let queue = Queue::new(4);
        let waiters = (0..3)
            .map(|_| {
                let queue = queue.clone();
                tokio::spawn(async move { queue.dequeue().await })
            })
            .collect::<Vec<_>>();
        queue.shutdown(3).await;
        for waiter in waiters {
            assert!(waiter.await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn pending_work_drains_before_sentinels() {
        let queue = Queue::new(4);
        queue.enqueue(Task::InitialGeneration).await.unwrap();
        queue.shutdown(1).await;
        assert!(queue.dequeue().await == Some(Task::InitialGeneration));
        assert!(queue.dequeue().await.is_none());
    }
}
