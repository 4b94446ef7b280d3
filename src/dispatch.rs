//! Executes console commands against a job queue.
use tracing::{debug, info};

use crate::parser::ParsingError;
use crate::queue::JobQueue;
use crate::sequence::IdSequence;
use crate::types::job::{JobError, PrintJob};
use crate::types::protocol::{JobStats, QueueCommand, QueueResponse};

/// One console session: a queue plus the sequence its jobs draw IDs from.
#[derive(Debug)]
pub struct Session<'a> {
    queue: JobQueue,
    ids: &'a IdSequence,
}

impl<'a> Session<'a> {
    pub fn new(queue: JobQueue, ids: &'a IdSequence) -> Self {
        Self { queue, ids }
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    /// Parses and executes a single line of input. Lines that don't parse
    /// leave the queue untouched and hand back the parsing error to be
    /// written out instead.
    pub fn handle_line(
        &mut self,
        line: &[u8],
    ) -> Result<QueueResponse, ParsingError> {
        let cmd: QueueCommand = line.try_into()?;

        Ok(self.handle(cmd))
    }

    pub fn handle(&mut self, cmd: QueueCommand) -> QueueResponse {
        use QueueCommand::*;

        match cmd {
            Add {
                customer_id,
                quantity,
                volume,
                plastic,
                description,
            } => self.admit(|ids| {
                PrintJob::new_in(
                    ids,
                    customer_id,
                    quantity,
                    volume,
                    description,
                    &plastic,
                )
            }),
            AddProcessed {
                customer_id,
                quantity,
                volume,
                plastic,
                treatments,
                description,
            } => self.admit(|ids| {
                PrintJob::processed_in(
                    ids,
                    customer_id,
                    quantity,
                    volume,
                    description,
                    &plastic,
                    &treatments,
                )
            }),
            Remove => match self.queue.dequeue_front() {
                Some(job) => QueueResponse::Dequeued { job: Box::new(job) },
                None => QueueResponse::QueueEmpty,
            },
            Peek => match self.queue.front() {
                Some(job) => QueueResponse::Found {
                    job: Box::new(job.clone()),
                },
                None => QueueResponse::QueueEmpty,
            },
            Find { id } => match self.queue.find(id) {
                Some(job) => QueueResponse::Found {
                    job: Box::new(job.clone()),
                },
                None => QueueResponse::NotFound,
            },
            Count => QueueResponse::Count {
                count: self.queue.count(),
            },
            List => QueueResponse::OkListJobs {
                jobs: self.queue.iter().map(JobStats::from).collect(),
            },
            Stats => QueueResponse::OkStats {
                data: self.queue.stats(),
            },
            Quit => QueueResponse::Bye,
        }
    }

    // Fullness is checked before the job is built so that a turned-away
    // request doesn't use up an ID.
    fn admit<F>(&mut self, build: F) -> QueueResponse
    where
        F: FnOnce(&IdSequence) -> Result<PrintJob, JobError>,
    {
        if self.queue.is_full() {
            return QueueResponse::QueueFull;
        }

        let job = match build(self.ids) {
            Ok(job) => job,
            Err(error) => {
                debug!(%error, "rejected job");
                return error.into();
            },
        };

        match self.queue.enqueue(job) {
            Ok(id) => {
                info!(id, count = self.queue.count(), "accepted job");
                QueueResponse::Queued { id }
            },
            Err(_) => QueueResponse::QueueFull,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::serialisable::ReplySerialisable;

    fn run(session: &mut Session, line: &str) -> String {
        let reply = match session.handle_line(line.as_bytes()) {
            Ok(resp) => resp.serialise_reply(),
            Err(error) => error.serialise_reply(),
        };
        String::from_utf8(reply).unwrap()
    }

    #[test]
    fn test_session_flow() {
        let ids = IdSequence::default();
        let mut s = Session::new(JobQueue::new(2), &ids);

        assert_eq!(run(&mut s, "count"), "COUNT 0\n");
        assert_eq!(run(&mut s, "remove"), "QUEUE_EMPTY\n");
        assert_eq!(run(&mut s, "peek"), "QUEUE_EMPTY\n");

        assert_eq!(run(&mut s, "add C1 10 20.0 PLA widget"), "QUEUED 100\n");
        assert_eq!(
            run(&mut s, "add-processed C2 600 1000 ABS polishing gear"),
            "QUEUED 101\n"
        );
        assert_eq!(run(&mut s, "add C3 1 1 PLA extra"), "QUEUE_FULL\n");
        assert_eq!(run(&mut s, "count"), "COUNT 2\n");

        let found = run(&mut s, "find 101");
        assert!(found.starts_with("FOUND 101\nDetails for Print Job ID: 101\n"));
        assert!(found.contains("(1)Polishing"));
        assert_eq!(run(&mut s, "find 102"), "NOT_FOUND\n");

        assert!(run(&mut s, "peek").starts_with("FOUND 100\n"));
        assert!(run(&mut s, "remove").starts_with("DEQUEUED 100\n"));
        assert!(run(&mut s, "peek").starts_with("FOUND 101\n"));
        assert_eq!(run(&mut s, "find 100"), "NOT_FOUND\n");

        // The rejected add above didn't consume an ID.
        assert_eq!(run(&mut s, "add C3 1 1 PLA extra"), "QUEUED 102\n");

        assert_eq!(run(&mut s, "quit"), "BYE\n");
    }

    #[test]
    fn test_validation_replies() {
        let ids = IdSequence::default();
        let mut s = Session::new(JobQueue::new(4), &ids);

        assert_eq!(run(&mut s, "add C1 1 1 PETG x"), "UNKNOWN_MATERIAL\n");
        assert_eq!(run(&mut s, "add C1 1 1 Acrylic x"), "UNKNOWN_MATERIAL\n");
        assert_eq!(
            run(&mut s, "add-processed C1 1 1 PLA sanding x"),
            "UNKNOWN_TREATMENT\n"
        );
        assert_eq!(run(&mut s, "add C1 0 1 PLA x"), "INVALID_QUANTITY\n");
        assert_eq!(run(&mut s, "add C1 1 -1 PLA x"), "INVALID_VOLUME\n");
        assert_eq!(run(&mut s, "add C1 1 inf PLA x"), "INVALID_VOLUME\n");
        assert_eq!(run(&mut s, "add C1 1 1 PLA"), "BAD_FORMAT\n");
        assert_eq!(run(&mut s, "add C1 1 1 PLA  padded"), "BAD_FORMAT\n");
        assert_eq!(run(&mut s, "launch"), "UNKNOWN_COMMAND\n");
        assert_eq!(
            s.handle_line(b"launch").unwrap_err(),
            ParsingError::UnknownCommand
        );
        assert_eq!(
            s.handle_line(b"count 1").unwrap_err(),
            ParsingError::BadFormat
        );

        assert_eq!(ids.peek(), 100);
        assert!(s.queue().is_empty());

        assert_eq!(
            run(&mut s, "add-processed C1 1 1 Acrylic - lens"),
            "QUEUED 100\n"
        );
    }

    #[test]
    fn test_list_and_stats() {
        let ids = IdSequence::default();
        let mut s = Session::new(JobQueue::new(3), &ids);

        assert_eq!(run(&mut s, "list"), "OK 3\n[]\n");

        run(&mut s, "add C1 10 20.0 PLA widget");
        run(&mut s, "add-processed C2 2 10 Nylon uv-curing,uv-coating bracket");

        let list = run(&mut s, "list");
        assert!(list.starts_with("OK "));
        assert!(list.contains("- id: 100"));
        assert!(list.contains("- id: 101"));
        assert!(list.contains("- UV Protective Coating"));
        assert!(list.find("id: 100") < list.find("id: 101"));

        let stats = run(&mut s, "stats");
        assert!(stats.contains("capacity: 3"));
        assert!(stats.contains("current-jobs: 2"));
        assert!(stats.contains("free-slots: 1"));
        assert!(stats.contains("total-enqueued: 2"));
        assert!(stats.contains("- job 100"));
        assert!(stats.contains("- empty"));
    }
}
