/// Renders arbitrary input bytes printable for logging.
pub(crate) fn bytes_to_human_str(input: &[u8]) -> String {
    input.escape_ascii().to_string()
}
