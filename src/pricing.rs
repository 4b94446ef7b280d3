//! Tiered pricing for print jobs.
//!
//! Raw jobs pay for material only, with a minimum charge of `BASE_PRICE`.
//! Processed jobs also pay per-item post-processing and receive
//! `BULK_DISCOUNT` on orders of more than `BULK_THRESHOLD` items, still subject
//! to the minimum charge.
use crate::types::job::{Finish, PrintJob};

/// No job bills below this amount.
pub const BASE_PRICE: f64 = 60.50;
/// Fraction taken off large processed orders.
pub const BULK_DISCOUNT: f64 = 0.10;
/// Processed orders of strictly more items than this are discounted.
pub const BULK_THRESHOLD: u32 = 500;

/// Sum of post-processing charges for one item of `job`.
fn post_processing_cost(job: &PrintJob) -> f64 {
    job.treatments()
        .iter()
        .map(|t| t.cost_per_item(job.volume()))
        .sum()
}

pub(crate) fn gross_price(job: &PrintJob) -> f64 {
    let material = job.plastic().rate() * job.volume();
    let quantity = f64::from(job.quantity());

    match job.finish() {
        Finish::Raw => material * quantity,
        Finish::Processed { .. } => {
            (material + post_processing_cost(job)) * quantity
        },
    }
}

pub(crate) fn total_price(job: &PrintJob) -> f64 {
    let gross = gross_price(job);

    if gross < BASE_PRICE {
        return BASE_PRICE;
    }

    match job.finish() {
        Finish::Processed { .. } if job.quantity() > BULK_THRESHOLD => {
            let discounted = gross - gross * BULK_DISCOUNT;
            discounted.max(BASE_PRICE)
        },
        _ => gross,
    }
}
