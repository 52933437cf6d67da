use super::queue::Queue;
use super::worker::Worker;
use crate::agents::Registry;
use crate::blackboard::Blackboard;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Pool of concurrent task workers over one shared queue. Agent calls
/// are I/O bound, so the pool scales with expected call latency rather
/// than core count; the worker count is plain configuration.
pub struct Pool {
    handles: Vec<JoinHandle<(usize, usize)>>,
}

impl Pool {
    pub fn spawn(
        workers: usize,
        board: &Arc<Blackboard>,
        queue: &Queue,
        registry: &Arc<Registry>,
    ) -> Self {
        Self {
            handles: (0..workers)
                .map(|id| Worker::new(id, board.clone(), queue.clone(), registry.clone()))
                .map(|worker| tokio::spawn(worker.run()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// wait for every worker to drain its sentinel and exit
    pub async fn join(self) -> (usize, usize) {
        let counts = futures::future::join_all(self.handles).await;
        let (done, failed) = counts
            .into_iter()
            .filter_map(|joined| joined.inspect_err(|e| log::error!("worker panicked: {}", e)).ok())
            .fold((0, 0), |(d, f), (done, failed)| (d + done, f + failed));
        log::info!("pool drained: {} tasks done, {} failed", done, failed);
        (done, failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Agent;
    use crate::agents::Capability;
    use crate::agents::Effect;
    use crate::agents::Outcome;
    use crate::engine::Task;

    /// agent that appends a hypothesis derived from the task payload
    struct Echo;

    #[async_trait::async_trait]
    impl Agent for Echo {
        async fn execute(&self, task: &Task, _: &Blackboard) -> anyhow::Result<Outcome> {
            use crate::Arbitrary;
            use crate::blackboard::Hypothesis;
            let Task::ReviewHypothesis { hypothesis } = task else {
                return Err(anyhow::anyhow!("unexpected task"));
            };
            let mut echoed = Hypothesis::random();
            echoed.id = hypothesis.clone();
            Ok(Outcome::default().with(Effect::Hypothesis(echoed)))
        }
    }

    #[tokio::test]
    async fn workers_drain_the_queue_concurrently() {
        let board = Arc::new(Blackboard::default());
        board.resume();
        let queue = Queue::new(64);
        let registry = Arc::new(Registry::default().register(Capability::Reflection, Arc::new(Echo)));
        let pool = Pool::spawn(4, &board, &queue, &registry);
        assert!(pool.len() == 4);
        for i in 0..16 {
            queue
                .enqueue(Task::ReviewHypothesis { hypothesis: format!("h-{:03}", i) })
                .await
                .unwrap();
        }
        queue.shutdown(4).await;
        let (done, failed) = pool.join().await;
        assert!(done == 16);
        assert!(failed == 0);
        assert!(board.hypotheses().await.len() == 16);
    }
}
