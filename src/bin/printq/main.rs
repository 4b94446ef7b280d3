mod args;
mod util;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use print_queue::dispatch::Session;
use print_queue::line_reader::LineReader;
use print_queue::types::protocol::QueueResponse;
use print_queue::types::serialisable::ReplySerialisable;
use print_queue::{IdSequence, JobQueue};
use tokio::io::{self, AsyncWriteExt};
use tokio::{select, signal};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn, Level};

use crate::args::Args;
use crate::util::bytes_to_human_str;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logging goes to stderr; stdout carries replies only.
    if args.debug {
        tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .init();
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(error) = signal::ctrl_c().await {
                warn!(%error, "something strange with ctrl-c handling!");
            };
            cancel.cancel();
        });
    }

    if let Err(error) = begin(args, cancel).await {
        error!(%error, "encountered runtime error");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn begin(args: Args, cancel: CancellationToken) -> Result<()> {
    let queue = JobQueue::new(usize::from(args.capacity));
    let mut session = Session::new(queue, IdSequence::global());
    info!(capacity = args.capacity, "print queue ready");

    let mut r: LineReader<_> = io::stdin().into();
    let mut w = io::stdout();

    // Keep taking lines and parsing and processing them.
    loop {
        let line = select!(
            x = r.read_line() => match x.context("reading stdin")? {
                Some(x) => x,
                None => break,
            },
            _ = cancel.cancelled() => break,
        );

        trace!(line = bytes_to_human_str(&line), "processing command");

        let resp = session.handle_line(&line);
        let reply = match &resp {
            Ok(resp) => resp.serialise_reply(),
            Err(error) => {
                debug!(%error, "rejected command");
                error.serialise_reply()
            },
        };

        select! {
            x = w.write_all(&reply) => x.context("writing reply")?,
            _ = cancel.cancelled() => break,
        };
        select! {
            x = w.flush() => x.context("flushing stdout")?,
            _ = cancel.cancelled() => break,
        };

        if matches!(resp, Ok(QueueResponse::Bye)) {
            break;
        }
    }

    let stats = session.queue().stats();
    info!(
        remaining = stats.current_jobs,
        enqueued = stats.total_enqueued,
        dequeued = stats.total_dequeued,
        rejected = stats.total_rejected,
        "session closed"
    );

    Ok(())
}
