//! Single-writer mutation queue
//!
//! Health callbacks, network callbacks and user input arrive on different
//! tasks. They never touch the state directly: each sends a [`Mutation`]
//! and one task that owns the [`MoodMonitorContext`] applies them strictly
//! in arrival order. State is written through once per drained batch.
//!
//! Only local mutations go through here. Fetching from a health source or
//! the remote endpoint happens on the caller's side; the queue receives the
//! results.

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::domain::{HealthBatch, MoodSubmission, RemoteMood};
use crate::services::{AchievementEvent, BatchResult, HealthApplyResult};
use crate::{MoodLogReport, MoodMonitorContext};

/// Pending requests before senders start waiting
const QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub enum Mutation {
    /// Samples delivered by the health source
    HealthSamples(HealthBatch),
    /// Moods returned by the remote endpoint
    RemoteMoods {
        batch: Vec<RemoteMood>,
        now: NaiveDateTime,
    },
    /// A mood entered by the user
    MoodSubmitted {
        submission: MoodSubmission,
        now: NaiveDateTime,
    },
    /// Achievement pass without new data
    Evaluate { now: NaiveDateTime },
}

#[derive(Debug, Clone)]
pub enum MutationOutcome {
    Health(HealthApplyResult),
    Remote(BatchResult),
    Mood(MoodLogReport),
    Achievements(Vec<AchievementEvent>),
}

struct Request {
    mutation: Mutation,
    reply: Option<oneshot::Sender<MutationOutcome>>,
}

fn apply(context: &mut MoodMonitorContext, mutation: Mutation) -> MutationOutcome {
    match mutation {
        Mutation::HealthSamples(batch) => MutationOutcome::Health(context.apply_health_batch(&batch)),
        Mutation::RemoteMoods { batch, now } => {
            MutationOutcome::Remote(context.apply_remote_moods(&batch, now))
        }
        Mutation::MoodSubmitted { submission, now } => {
            MutationOutcome::Mood(context.record_mood(&submission, now))
        }
        Mutation::Evaluate { now } => {
            // evaluate() persists on its own; the batch write repeats it
            MutationOutcome::Achievements(context.evaluate(now))
        }
    }
}

pub struct MutationQueue;

impl MutationQueue {
    /// Move the context onto its own task.
    ///
    /// The task ends once every [`QueueHandle`] is dropped and hands the
    /// context back through the join handle.
    pub fn spawn(mut context: MoodMonitorContext) -> (QueueHandle, JoinHandle<MoodMonitorContext>) {
        let (tx, mut rx) = mpsc::channel::<Request>(QUEUE_CAPACITY);

        let task = tokio::spawn(async move {
            while let Some(first) = rx.recv().await {
                let mut replies = Vec::new();
                let mut next = Some(first);

                while let Some(request) = next.take() {
                    let outcome = apply(&mut context, request.mutation);
                    if let Some(reply) = request.reply {
                        replies.push((reply, outcome));
                    }
                    next = rx.try_recv().ok();
                }

                context.suspend();

                for (reply, outcome) in replies {
                    // The sender may have stopped waiting
                    let _ = reply.send(outcome);
                }
            }
            context
        });

        (QueueHandle { tx }, task)
    }
}

/// Cloneable sender side of the queue
#[derive(Clone)]
pub struct QueueHandle {
    tx: mpsc::Sender<Request>,
}

impl QueueHandle {
    /// Queue a mutation and wait until it is applied and persisted
    pub async fn submit(&self, mutation: Mutation) -> Result<MutationOutcome> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Request {
                mutation,
                reply: Some(reply),
            })
            .await
            .map_err(|_| anyhow!("Mutation queue is closed"))?;
        response
            .await
            .map_err(|_| anyhow!("Mutation queue dropped the request"))
    }

    /// Queue a mutation without waiting for it
    pub async fn send(&self, mutation: Mutation) -> Result<()> {
        self.tx
            .send(Request {
                mutation,
                reply: None,
            })
            .await
            .map_err(|_| anyhow!("Mutation queue is closed"))
    }

    pub async fn log_mood(
        &self,
        submission: MoodSubmission,
        now: NaiveDateTime,
    ) -> Result<MoodLogReport> {
        match self.submit(Mutation::MoodSubmitted { submission, now }).await? {
            MutationOutcome::Mood(report) => Ok(report),
            other => Err(anyhow!("Unexpected queue outcome: {:?}", other)),
        }
    }

    pub async fn apply_health(&self, batch: HealthBatch) -> Result<HealthApplyResult> {
        match self.submit(Mutation::HealthSamples(batch)).await? {
            MutationOutcome::Health(result) => Ok(result),
            other => Err(anyhow!("Unexpected queue outcome: {:?}", other)),
        }
    }

    pub async fn apply_remote(&self, batch: Vec<RemoteMood>, now: NaiveDateTime) -> Result<BatchResult> {
        match self.submit(Mutation::RemoteMoods { batch, now }).await? {
            MutationOutcome::Remote(result) => Ok(result),
            other => Err(anyhow!("Unexpected queue outcome: {:?}", other)),
        }
    }
}
