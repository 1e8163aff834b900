//! # RpmDocs Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Runs two external programs as a shell pipeline (`producer | consumer`) and
//! reports the outcome of both. Standard input of the producer is closed and
//! the output/diagnostic streams of both programs are discarded; only the exit
//! statuses are inspected.
//!
//! The consumer is awaited first. The parent keeps no copy of the pipe's read
//! end once the consumer is spawned, so if the consumer exits early the
//! producer receives a broken pipe and terminates on its own, and the second
//! wait cannot hang on a full pipe buffer.
//!
use crate::core::error::DecodeError;
use std::process::{Child, Command, Stdio};
use tracing::debug;

fn program_name(command: &Command) -> String {
    command.get_program().to_string_lossy().into_owned()
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Runs `producer | consumer` and waits for both to finish.
///
/// # Errors
///
/// - `DecodeError::Spawn` if either program cannot be started.
/// - `DecodeError::Wait` if waiting on either child fails.
/// - `DecodeError::Exit` if either program exits unsuccessfully; the producer's
///   failure is reported first since the consumer's is usually a consequence.
pub fn run_piped(mut producer: Command, mut consumer: Command) -> Result<(), DecodeError> {
    let producer_name = program_name(&producer);
    let consumer_name = program_name(&consumer);
    debug!("Running {:?} | {:?}", producer, consumer);

    let mut upstream = producer
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| DecodeError::Spawn {
            program: producer_name.clone(),
            source,
        })?;

    let Some(stream) = upstream.stdout.take() else {
        reap(&mut upstream);
        return Err(DecodeError::Spawn {
            program: producer_name,
            source: std::io::Error::other("stdout was not captured"),
        });
    };

    let mut downstream = match consumer
        .stdin(Stdio::from(stream))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(source) => {
            reap(&mut upstream);
            return Err(DecodeError::Spawn {
                program: consumer_name,
                source,
            });
        }
    };
    // The command still owns the pipe's read end until dropped.
    drop(consumer);

    let consumer_status = match downstream.wait() {
        Ok(status) => status,
        Err(source) => {
            reap(&mut upstream);
            return Err(DecodeError::Wait {
                program: consumer_name,
                source,
            });
        }
    };
    let producer_status = upstream.wait().map_err(|source| DecodeError::Wait {
        program: producer_name.clone(),
        source,
    })?;
    debug!(
        "Pipeline finished: {} -> {}, {} -> {}",
        producer_name, producer_status, consumer_name, consumer_status
    );

    if !producer_status.success() {
        return Err(DecodeError::Exit {
            program: producer_name,
            status: producer_status,
        });
    }
    if !consumer_status.success() {
        return Err(DecodeError::Exit {
            program: consumer_name,
            status: consumer_status,
        });
    }
    Ok(())
}
