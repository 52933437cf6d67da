use super::queue::Queue;
use crate::agents::Registry;
use crate::blackboard::Blackboard;
use std::sync::Arc;

/// Pulls tasks off the shared queue and dispatches them to registered
/// agents. Agent failures are logged and swallowed; nothing a task does
/// may kill the worker. Exits when it drains a stop sentinel, or
/// discards work silently once the board has been halted.
pub struct Worker {
    id: usize,
    board: Arc<Blackboard>,
    queue: Queue,
    registry: Arc<Registry>,
    done: usize,
    failed: usize,
}

impl Worker {
    pub fn new(id: usize, board: Arc<Blackboard>, queue: Queue, registry: Arc<Registry>) -> Self {
        Self {
            id,
            board,
            queue,
            registry,
            done: 0,
            failed: 0,
        }
    }

    /// (completed, failed) task counts at exit
    pub async fn run(mut self) -> (usize, usize) {
        while let Some(task) = self.queue.dequeue().await {
            match self.board.running() {
                true => self.step(task).await,
                false => continue,
            }
        }
        log::debug!("worker {} exiting: {} done, {} failed", self.id, self.done, self.failed);
        (self.done, self.failed)
    }

    async fn step(&mut self, task: super::task::Task) {
        let Some(agent) = self.registry.get(task.capability()) else {
            log::error!("worker {}: no agent for {}", self.id, task.capability());
            self.failed += 1;
            return;
        };
        match agent.execute(&task, &self.board).await {
            Ok(outcome) => {
                outcome.settle(&self.board).await;
                self.done += 1;
            }
            Err(e) => {
                log::warn!("worker {}: {} failed: {}", self.id, task, e);
                self.failed += 1;
            }
        }
    }
}
