use serde::Serialize;

use super::job::{JobError, PrintJob};
use super::material::{Plastic, Treatment};
use super::serialisable::ReplySerialisable;
use super::states::SlotState;

/// A command typed at the console, one per line.
#[derive(Clone, Debug, PartialEq)]
pub enum QueueCommand {
    /// Queues a job without post-processing. The description is the rest of
    /// the line and may contain spaces.
    ///
    /// On the wire: `add <customer> <quantity> <volume> <plastic> <description>`
    Add {
        customer_id: String,
        quantity: u32,
        volume: f64,
        plastic: String,
        description: String,
    },
    /// Queues a processed job. Treatments are given as a comma-separated list
    /// of slugs, or `-` for none.
    ///
    /// On the wire: `add-processed <customer> <quantity> <volume> <plastic>
    /// <treatments> <description>`
    AddProcessed {
        customer_id: String,
        quantity: u32,
        volume: f64,
        plastic: String,
        treatments: Vec<String>,
        description: String,
    },
    /// Removes the job at the front of the queue. Returns `DEQUEUED` with the
    /// removed job's details or `QUEUE_EMPTY`.
    ///
    /// On the wire: `remove`
    Remove,
    /// Shows the job at the front of the queue without removing it.
    ///
    /// On the wire: `peek`
    Peek,
    /// Shows the job with the given ID. Returns `FOUND` or `NOT_FOUND`.
    ///
    /// On the wire: `find <id>`
    Find { id: u64 },
    /// On the wire: `count`
    Count,
    /// Returns every queued job, front first, as a YAML list.
    ///
    /// On the wire: `list`
    List,
    /// Returns occupancy and lifetime counters for the queue as YAML.
    ///
    /// On the wire: `stats`
    Stats,
    /// Ends the session.
    ///
    /// On the wire: `quit`
    Quit,
}

/// All possible replies to a `QueueCommand`. Lines that fail to parse are
/// answered by `ParsingError` instead.
#[derive(Debug)]
pub enum QueueResponse {
    /// Indicates a bug. Can be sent in response to any command.
    ///
    /// On the wire: `INTERNAL_ERROR`.
    InternalError,
    /// In response to an `add` or `add-processed`, the plastic isn't one we
    /// print with (or, for `add`, is only offered with post-processing).
    ///
    /// On the wire: `UNKNOWN_MATERIAL`.
    UnknownMaterial,
    /// In response to an `add-processed`, a treatment wasn't recognised.
    ///
    /// On the wire: `UNKNOWN_TREATMENT`.
    UnknownTreatment,
    /// On the wire: `INVALID_QUANTITY`.
    InvalidQuantity,
    /// On the wire: `INVALID_VOLUME`.
    InvalidVolume,
    /// In response to an `add` or `add-processed`, every slot is occupied.
    /// The job was not created and no ID was used.
    ///
    /// On the wire: `QUEUE_FULL`.
    QueueFull,
    /// In response to an `add` or `add-processed`, the job was queued.
    ///
    /// On the wire: `QUEUED <id>`.
    Queued { id: u64 },
    /// In response to a `remove`, the job that was taken off the front.
    ///
    /// On the wire: `DEQUEUED <id>` plus the job's detail sheet.
    Dequeued { job: Box<PrintJob> },
    /// In response to a `find` or `peek`.
    ///
    /// On the wire: `FOUND <id>` plus the job's detail sheet.
    Found { job: Box<PrintJob> },
    /// On the wire: `NOT_FOUND`.
    NotFound,
    /// In response to a `remove` or `peek` on an empty queue.
    ///
    /// On the wire: `QUEUE_EMPTY`.
    QueueEmpty,
    /// On the wire: `COUNT <count>`.
    Count { count: usize },
    /// In response to a `list`.
    ///
    /// On the wire: `OK <n_bytes>` plus data in YAML *list* format.
    OkListJobs { jobs: Vec<JobStats> },
    /// In response to a `stats`.
    ///
    /// On the wire: `OK <n_bytes>` plus data in YAML dictionary format.
    OkStats { data: QueueStats },
    /// In response to a `quit`.
    ///
    /// On the wire: `BYE`.
    Bye,
}

impl From<JobError> for QueueResponse {
    fn from(error: JobError) -> Self {
        match error {
            JobError::UnknownMaterial(_) => Self::UnknownMaterial,
            JobError::UnknownTreatment(_) => Self::UnknownTreatment,
            JobError::InvalidQuantity => Self::InvalidQuantity,
            JobError::InvalidVolume(_) => Self::InvalidVolume,
        }
    }
}

/// Renders `data` as an `OK <n_bytes>` reply.
fn ok_yaml<T: Serialize>(data: &T) -> Vec<u8> {
    match serde_yaml::to_string(data) {
        Ok(data) => format!("OK {}\n{data}", data.len()).into(),
        Err(_) => QueueResponse::InternalError.serialise_reply(),
    }
}

impl ReplySerialisable for QueueResponse {
    fn serialise_reply(&self) -> Vec<u8> {
        use QueueResponse::*;

        match self {
            InternalError => b"INTERNAL_ERROR\n".to_vec(),
            UnknownMaterial => b"UNKNOWN_MATERIAL\n".to_vec(),
            UnknownTreatment => b"UNKNOWN_TREATMENT\n".to_vec(),
            InvalidQuantity => b"INVALID_QUANTITY\n".to_vec(),
            InvalidVolume => b"INVALID_VOLUME\n".to_vec(),
            QueueFull => b"QUEUE_FULL\n".to_vec(),
            Queued { id } => format!("QUEUED {id}\n").into(),
            Dequeued { job } => format!("DEQUEUED {}\n{job}\n", job.id()).into(),
            Found { job } => format!("FOUND {}\n{job}\n", job.id()).into(),
            NotFound => b"NOT_FOUND\n".to_vec(),
            QueueEmpty => b"QUEUE_EMPTY\n".to_vec(),
            Count { count } => format!("COUNT {count}\n").into(),
            OkListJobs { jobs } => ok_yaml(jobs),
            OkStats { data } => ok_yaml(data),
            Bye => b"BYE\n".to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct JobStats {
    /// job ID
    pub id: u64,
    pub customer_id: String,
    pub description: String,
    /// number of items to print
    pub quantity: u32,
    /// volume of one item in cubic millimetres
    pub volume: f64,
    pub plastic: Plastic,
    /// treatments in selection order, absent for raw jobs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_processing: Option<Vec<Treatment>>,
    pub gross_price: f64,
    pub total_price: f64,
}

impl From<&PrintJob> for JobStats {
    fn from(job: &PrintJob) -> Self {
        Self {
            id: job.id(),
            customer_id: job.customer_id().to_owned(),
            description: job.description().to_owned(),
            quantity: job.quantity(),
            volume: job.volume(),
            plastic: job.plastic(),
            post_processing: job
                .is_processed()
                .then(|| job.treatments().to_vec()),
            gross_price: job.gross_price(),
            total_price: job.total_price(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct QueueStats {
    /// number of slots, fixed when the queue was created
    pub capacity: usize,
    /// number of occupied slots
    pub current_jobs: usize,
    /// number of empty slots
    pub free_slots: usize,
    pub full: bool,
    pub empty: bool,
    /// cumulative count of jobs admitted
    pub total_enqueued: u64,
    /// cumulative count of jobs removed from the front
    pub total_dequeued: u64,
    /// cumulative count of jobs turned away because the queue was full
    pub total_rejected: u64,
    /// occupancy of each slot, front first
    pub slots: Vec<SlotState>,
}
