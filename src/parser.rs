//! implements a parser for the print queue console protocol.
use std::fmt;

use crate::types::protocol::QueueCommand;
use crate::types::serialisable::ReplySerialisable;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParsingError {
    BadFormat,
    UnknownCommand,
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::BadFormat => "bad format",
            Self::UnknownCommand => "unknown command",
        })
    }
}

impl ReplySerialisable for ParsingError {
    fn serialise_reply(&self) -> Vec<u8> {
        match self {
            ParsingError::BadFormat => b"BAD_FORMAT\n".to_vec(),
            ParsingError::UnknownCommand => b"UNKNOWN_COMMAND\n".to_vec(),
        }
    }
}

/// Provides a custom, minimal parser of byte slices.
struct ParseState<'a> {
    from: &'a [u8],
}

impl ParseState<'_> {
    /// Asserts there's no more input to take, returning `result` if so, and a
    /// `BadFormat` error otherwise.
    fn expect_done_and<R>(&self, result: R) -> Result<R, ParsingError> {
        if self.from.is_empty() {
            Ok(result)
        } else {
            Err(ParsingError::BadFormat)
        }
    }

    /// Consumes from the input, expecting a token of non-zero length.
    fn expect_next_token(&mut self) -> Result<&[u8], ParsingError> {
        let token = self.next_token().ok_or(ParsingError::BadFormat)?;

        if token.is_empty() {
            Err(ParsingError::BadFormat)
        } else {
            Ok(token)
        }
    }

    /// Consumes from the input, expecting a space then a UTF-8 token.
    fn expect_next_str(&mut self) -> Result<&str, ParsingError> {
        self.expect_space()?;

        let token = self.expect_next_token()?;
        std::str::from_utf8(token).map_err(|_| ParsingError::BadFormat)
    }

    /// Consumes from the input, expecting a space then a u32.
    fn expect_next_u32(&mut self) -> Result<u32, ParsingError> {
        let r = self.expect_next_u64()?;
        u32::try_from(r).map_err(|_| ParsingError::BadFormat)
    }

    /// Consumes from the input, expecting a space then a u64.
    fn expect_next_u64(&mut self) -> Result<u64, ParsingError> {
        self.expect_space()?;

        let token = self.expect_next_token()?;

        let mut r = 0u64;
        for v in token {
            match v {
                b'0'..=b'9' => {
                    r = r
                        .checked_mul(10)
                        .ok_or(ParsingError::BadFormat)?
                        .checked_add((*v - b'0') as u64)
                        .ok_or(ParsingError::BadFormat)?
                },
                _ => return Err(ParsingError::BadFormat),
            };
        }

        Ok(r)
    }

    /// Consumes from the input, expecting a space then a decimal number.
    /// Whether the number is in range is left to the caller.
    fn expect_next_f64(&mut self) -> Result<f64, ParsingError> {
        self.expect_next_str()?
            .parse()
            .map_err(|_| ParsingError::BadFormat)
    }

    /// Consumes from the input, expecting a space then either `-` or a
    /// comma-separated list of non-empty items.
    fn expect_next_list(&mut self) -> Result<Vec<String>, ParsingError> {
        let token = self.expect_next_str()?;

        if token == "-" {
            return Ok(Vec::new());
        }

        token
            .split(',')
            .map(|item| {
                if item.is_empty() {
                    Err(ParsingError::BadFormat)
                } else {
                    Ok(item.to_owned())
                }
            })
            .collect()
    }

    /// Consumes the rest of the input after a single space. It must be UTF-8
    /// text that doesn't start with whitespace; inner spaces are kept and
    /// trailing whitespace is dropped.
    fn expect_rest(&mut self) -> Result<String, ParsingError> {
        self.expect_space()?;

        let rest = std::str::from_utf8(self.from)
            .map_err(|_| ParsingError::BadFormat)?;
        if rest.starts_with(char::is_whitespace) {
            return Err(ParsingError::BadFormat);
        }
        let rest = rest.trim_end();
        if rest.is_empty() {
            return Err(ParsingError::BadFormat);
        }
        self.from = &[];

        Ok(rest.to_owned())
    }

    /// Consumes a space.
    fn expect_space(&mut self) -> Result<(), ParsingError> {
        match self.from.first() {
            Some(b' ') => {
                self.from = &self.from[1..];
                Ok(())
            },
            _ => Err(ParsingError::BadFormat),
        }
    }

    /// Consumes from this ParseState until reaching a space byte or the end of
    /// the input. It returns None at the end of the input. On consecutive space
    /// bytes, it returns a zero-length slice.
    fn next_token(&mut self) -> Option<&[u8]> {
        if self.from.is_empty() {
            return None;
        }

        let idx = self
            .from
            .iter()
            .position(|c| *c == b' ')
            .unwrap_or(self.from.len());

        let token = &self.from[..idx];
        self.from = &self.from[idx..];

        Some(token)
    }
}

impl<'a> From<&'a [u8]> for ParseState<'a> {
    fn from(from: &'a [u8]) -> Self {
        ParseState { from }
    }
}

// Parsing is implemented to fulfil the TryFrom trait.
impl TryFrom<&[u8]> for QueueCommand {
    type Error = ParsingError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        use QueueCommand::*;

        let mut ps: ParseState = value.into();

        let cmd = match ps.expect_next_token()? {
            // <cmd>
            b"count" => Count,
            b"list" => List,
            b"peek" => Peek,
            b"quit" => Quit,
            b"remove" => Remove,
            b"stats" => Stats,

            // <cmd> <id>
            b"find" => Find {
                id: ps.expect_next_u64()?,
            },

            // <cmd> <customer> <quantity> <volume> <plastic> <description>
            b"add" => Add {
                customer_id: ps.expect_next_str()?.to_owned(),
                quantity: ps.expect_next_u32()?,
                volume: ps.expect_next_f64()?,
                plastic: ps.expect_next_str()?.to_owned(),
                description: ps.expect_rest()?,
            },

            // <cmd> <customer> <quantity> <volume> <plastic> <treatments>
            //   <description>
            b"add-processed" => AddProcessed {
                customer_id: ps.expect_next_str()?.to_owned(),
                quantity: ps.expect_next_u32()?,
                volume: ps.expect_next_f64()?,
                plastic: ps.expect_next_str()?.to_owned(),
                treatments: ps.expect_next_list()?,
                description: ps.expect_rest()?,
            },

            _ => return Err(ParsingError::UnknownCommand),
        };

        ps.expect_done_and(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        use ParsingError::*;
        use QueueCommand::*;

        const U32_MAX_PLUS_1: u128 = 1 << 32;
        const U64_MAX_PLUS_1: u128 = 1 << 64;

        // Asserts the line parses into the given command successfully.
        #[track_caller]
        fn ok(line: &[u8], res: QueueCommand) {
            assert_eq!(line.try_into(), Ok(res));
        }

        // Asserts the line fails to parse with a BadFormat error.
        #[track_caller]
        fn bf(line: &[u8]) {
            assert_eq!(TryInto::<QueueCommand>::try_into(line), Err(BadFormat));
        }

        // Asserts the line fails to parse with an UnknownCommand error.
        #[track_caller]
        fn uc(line: &[u8]) {
            assert_eq!(
                TryInto::<QueueCommand>::try_into(line),
                Err(UnknownCommand)
            );
        }

        // Check silly non-commands
        bf(b"");
        bf(b" ");
        uc(b"syntax-error");
        uc(b"ADD C1 1 1 PLA x");

        ok(b"count", Count);
        ok(b"list", List);
        ok(b"peek", Peek);
        ok(b"quit", Quit);
        ok(b"remove", Remove);
        ok(b"stats", Stats);
        bf(b"remove ");
        bf(b"count 1");

        ok(b"find 987", Find { id: 987 });
        bf(b"find");
        bf(b"find -1");
        bf(b"find 12x");
        bf(format!("find {U64_MAX_PLUS_1}").as_bytes());

        // Check add, with the description taking the rest of the line.
        ok(
            b"add C1 10 20.0 PLA widget",
            Add {
                customer_id: "C1".into(),
                quantity: 10,
                volume: 20.0,
                plastic: "PLA".into(),
                description: "widget".into(),
            },
        );
        ok(
            b"add cust_42 3 12.5 nylon spare gear,  left side",
            Add {
                customer_id: "cust_42".into(),
                quantity: 3,
                volume: 12.5,
                plastic: "nylon".into(),
                description: "spare gear,  left side".into(),
            },
        );
        // Plastic and range checks happen when the job is built.
        ok(
            b"add C1 0 -4 PETG x",
            Add {
                customer_id: "C1".into(),
                quantity: 0,
                volume: -4.0,
                plastic: "PETG".into(),
                description: "x".into(),
            },
        );
        bf(b"add C1 10 20.0 PLA");
        bf(b"add C1 10 20.0 PLA ");
        bf(b"add C1 10 20.0 PLA    ");
        bf(b"add C1 ten 20.0 PLA widget");
        bf(b"add C1 10 twenty PLA widget");
        bf(b"add C1  10 20.0 PLA widget");
        bf(format!("add C1 {U32_MAX_PLUS_1} 20.0 PLA widget").as_bytes());

        // Customer IDs are any single token of UTF-8 text.
        ok(
            "add -Zoë#7 1 1 PLA x".as_bytes(),
            Add {
                customer_id: "-Zoë#7".into(),
                quantity: 1,
                volume: 1.0,
                plastic: "PLA".into(),
                description: "x".into(),
            },
        );
        bf(b"add \xffC1 1 1 PLA x");

        // Exactly one space separates the description; trailing whitespace is
        // dropped.
        bf(b"add C1 1 1 PLA  widget");
        bf(b"add C1 1 1 PLA \twidget");
        ok(
            b"add C1 1 1 PLA widget  \t",
            Add {
                customer_id: "C1".into(),
                quantity: 1,
                volume: 1.0,
                plastic: "PLA".into(),
                description: "widget".into(),
            },
        );

        ok(
            b"add-processed C2 600 1000 ABS polishing gear",
            AddProcessed {
                customer_id: "C2".into(),
                quantity: 600,
                volume: 1000.0,
                plastic: "ABS".into(),
                treatments: vec!["polishing".into()],
                description: "gear".into(),
            },
        );
        ok(
            b"add-processed C2 1 5.5 Acrylic uv-curing,polishing,uv-curing lens cap",
            AddProcessed {
                customer_id: "C2".into(),
                quantity: 1,
                volume: 5.5,
                plastic: "Acrylic".into(),
                treatments: vec![
                    "uv-curing".into(),
                    "polishing".into(),
                    "uv-curing".into(),
                ],
                description: "lens cap".into(),
            },
        );
        ok(
            b"add-processed C2 1 5.5 PLA - bare",
            AddProcessed {
                customer_id: "C2".into(),
                quantity: 1,
                volume: 5.5,
                plastic: "PLA".into(),
                treatments: vec![],
                description: "bare".into(),
            },
        );
        bf(b"add-processed C2 1 5.5 PLA uv-curing,,polishing x");
        bf(b"add-processed C2 1 5.5 PLA polishing,");
        bf(b"add-processed C2 1 5.5 PLA polishing");
    }

    #[test]
    fn test_error_replies() {
        assert_eq!(ParsingError::BadFormat.serialise_reply(), b"BAD_FORMAT\n");
        assert_eq!(
            ParsingError::UnknownCommand.serialise_reply(),
            b"UNKNOWN_COMMAND\n"
        );
        assert_eq!(ParsingError::BadFormat.to_string(), "bad format");
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        assert_eq!(
            QueueCommand::try_from(&b"add C1 1 1 PLA \xff\xfe"[..]),
            Err(ParsingError::BadFormat)
        );
        assert_eq!(
            QueueCommand::try_from(&b"add C1 1 1 \xffLA x"[..]),
            Err(ParsingError::BadFormat)
        );
    }
}
