use serde::Serialize;

/// Occupancy of one queue slot. A slot only ever goes from `Empty` to
/// `Occupied` on admission and back to `Empty` when its job leaves the queue.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotState {
    Empty,
    Occupied { id: u64 },
}

// This impl is used to allow QueueStats to be serialised to YAML.
impl Serialize for SlotState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use SlotState::*;

        match self {
            Empty => serializer.serialize_str("empty"),
            Occupied { id } => serializer.serialize_str(&format!("job {id}")),
        }
    }
}
