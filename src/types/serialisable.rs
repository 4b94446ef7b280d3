/// Types implementing ReplySerialisable can be written back to the console
/// as a reply to a command.
pub trait ReplySerialisable {
    /// Converts the value in question to a console reply, including its
    /// trailing newline.
    fn serialise_reply(&self) -> Vec<u8>;
}
