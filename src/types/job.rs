use std::fmt;

use itertools::Itertools;
use thiserror::Error;

use super::material::{Plastic, Treatment};
use crate::pricing;
use crate::sequence::IdSequence;

/// Reasons a job can't be constructed.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum JobError {
    #[error("unknown material: {0:?}")]
    UnknownMaterial(String),
    #[error("unknown post-processing treatment: {0:?}")]
    UnknownTreatment(String),
    #[error("print quantity must be at least 1")]
    InvalidQuantity,
    #[error("volume must be a positive number of cubic millimetres, got {0}")]
    InvalidVolume(f64),
}

/// Whether a job is printed as-is or finished with post-processing.
#[derive(Clone, Debug, PartialEq)]
pub enum Finish {
    Raw,
    /// Treatments in the order they were selected. Repeats are charged again.
    Processed { treatments: Vec<Treatment> },
}

/// One print request. Immutable once created; prices are recomputed on
/// every call.
#[derive(Clone, Debug, PartialEq)]
pub struct PrintJob {
    id: u64,
    customer_id: String,
    description: String,
    quantity: u32,
    volume: f64,
    plastic: Plastic,
    finish: Finish,
}

impl PrintJob {
    /// Creates a job without post-processing, drawing its identifier from the
    /// process-wide sequence.
    pub fn new(
        customer_id: impl Into<String>,
        quantity: u32,
        volume: f64,
        description: impl Into<String>,
        plastic: &str,
    ) -> Result<Self, JobError> {
        Self::new_in(
            IdSequence::global(),
            customer_id,
            quantity,
            volume,
            description,
            plastic,
        )
    }

    /// As `new`, but with an explicit identifier sequence.
    pub fn new_in(
        ids: &IdSequence,
        customer_id: impl Into<String>,
        quantity: u32,
        volume: f64,
        description: impl Into<String>,
        plastic: &str,
    ) -> Result<Self, JobError> {
        let plastic: Plastic = plastic.parse()?;
        if !plastic.offered_raw() {
            return Err(JobError::UnknownMaterial(plastic.name().to_owned()));
        }

        Self::build(
            ids,
            customer_id.into(),
            quantity,
            volume,
            description.into(),
            plastic,
            Finish::Raw,
        )
    }

    /// Creates a processed job, drawing its identifier from the process-wide
    /// sequence.
    pub fn processed<S: AsRef<str>>(
        customer_id: impl Into<String>,
        quantity: u32,
        volume: f64,
        description: impl Into<String>,
        plastic: &str,
        treatments: &[S],
    ) -> Result<Self, JobError> {
        Self::processed_in(
            IdSequence::global(),
            customer_id,
            quantity,
            volume,
            description,
            plastic,
            treatments,
        )
    }

    /// As `processed`, but with an explicit identifier sequence.
    pub fn processed_in<S: AsRef<str>>(
        ids: &IdSequence,
        customer_id: impl Into<String>,
        quantity: u32,
        volume: f64,
        description: impl Into<String>,
        plastic: &str,
        treatments: &[S],
    ) -> Result<Self, JobError> {
        let plastic: Plastic = plastic.parse()?;
        let treatments = treatments
            .iter()
            .map(|t| t.as_ref().parse())
            .collect::<Result<Vec<Treatment>, _>>()?;

        Self::build(
            ids,
            customer_id.into(),
            quantity,
            volume,
            description.into(),
            plastic,
            Finish::Processed { treatments },
        )
    }

    // The identifier is only allocated once validation has passed, so a
    // rejected request doesn't leave a gap in the sequence.
    fn build(
        ids: &IdSequence,
        customer_id: String,
        quantity: u32,
        volume: f64,
        description: String,
        plastic: Plastic,
        finish: Finish,
    ) -> Result<Self, JobError> {
        if quantity == 0 {
            return Err(JobError::InvalidQuantity);
        }
        if !volume.is_finite() || volume <= 0.0 {
            return Err(JobError::InvalidVolume(volume));
        }

        Ok(Self {
            id: ids.next_id(),
            customer_id,
            description,
            quantity,
            volume,
            plastic,
            finish,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Volume of a single item, in cubic millimetres.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn plastic(&self) -> Plastic {
        self.plastic
    }

    pub fn finish(&self) -> &Finish {
        &self.finish
    }

    pub fn is_processed(&self) -> bool {
        matches!(self.finish, Finish::Processed { .. })
    }

    /// Selected treatments; empty for raw jobs.
    pub fn treatments(&self) -> &[Treatment] {
        match &self.finish {
            Finish::Raw => &[],
            Finish::Processed { treatments } => treatments,
        }
    }

    /// Price before the base price floor and any discount.
    pub fn gross_price(&self) -> f64 {
        pricing::gross_price(self)
    }

    /// Final billable amount.
    pub fn total_price(&self) -> f64 {
        pricing::total_price(self)
    }

    /// Renders treatments with a 1-based marker in selection order, e.g.
    /// `(1)UV Curing (2)Polishing`.
    pub fn treatment_list(&self) -> String {
        self.treatments()
            .iter()
            .enumerate()
            .map(|(i, t)| format!("({}){t}", i + 1))
            .join(" ")
    }
}

/// The detail sheet shown to operators.
impl fmt::Display for PrintJob {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Details for Print Job ID: {}", self.id)?;
        writeln!(f, "================================")?;
        writeln!(f, "{:<25}{}", "CustomerID: ", self.customer_id)?;
        writeln!(f, "{:<25}{}", "Print Quantity: ", self.quantity)?;
        writeln!(f, "{:<25}{:.2}", "Volume(mm3): ", self.volume)?;
        writeln!(f, "{:<25}{}", "Description: ", self.description)?;
        writeln!(f, "{:<25}{}", "Type of Plastic: ", self.plastic)?;
        if self.is_processed() {
            writeln!(f, "{:<25}{}", "Post-Processing: ", self.treatment_list())?;
        }
        writeln!(f, "{:<25}{:.2}", "Gross Price($): ", self.gross_price())?;
        writeln!(f, "{:<25}{:.2}", "Total Price($): ", self.total_price())?;
        write!(f, "=================================")
    }
}
