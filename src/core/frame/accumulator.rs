//! Frame accumulator
//!
//! Drives the bounded read loop that assembles one reading from the
//! device's interleaved telegram lines.

use super::{parse_channel_payload, Channel, ReadOutcome, ReadStatus, Reading, DEFAULT_LINE_BOUND};
use crate::core::link::{LinkError, SensorLink};
use tracing::{debug, trace};

/// Attempt to assemble one complete reading within `bound` classified lines.
///
/// Per iteration: read one line (blocking, per-line timeout). Timeouts and
/// blank lines are skipped without consuming the bound. Any other line
/// consumes one unit: unrecognized prefixes are ignored, recognized ones
/// route the rest-of-line to the parser and overwrite that channel's slot
/// (absent on parse failure). Returns as soon as all three slots are
/// populated, without reading further.
///
/// The bound exhausting first yields [`ReadStatus::Incomplete`] with
/// whatever slots were filled. A real I/O failure aborts the attempt and
/// discards all progress. A link that stays silent for too many consecutive
/// reads also yields `Incomplete`, so one call never hangs on a dead device
/// even though timeouts do not count against the line bound.
pub fn read_frame(link: &mut dyn SensorLink, bound: usize) -> Result<ReadOutcome, LinkError> {
    let idle_cap = bound.max(DEFAULT_LINE_BOUND);
    let mut reading = Reading::default();
    let mut lines_used = 0;
    let mut idle_reads = 0;

    while lines_used < bound {
        let Some(raw) = link.read_line()? else {
            idle_reads += 1;
            if idle_reads >= idle_cap {
                debug!(idle_reads, "link silent, giving up on this attempt");
                break;
            }
            continue;
        };
        idle_reads = 0;

        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        lines_used += 1;

        let Some((channel, payload)) = Channel::classify(line) else {
            trace!(line, "unrecognized line");
            continue;
        };

        let values = parse_channel_payload(payload);
        if values.is_none() {
            debug!(%channel, payload, "malformed channel payload");
        }
        reading.set(channel, values);

        if reading.is_complete() {
            trace!(lines_used, "frame complete");
            return Ok(ReadOutcome {
                reading,
                status: ReadStatus::Complete,
            });
        }
    }

    debug!(lines_used, missing = ?reading.missing(), "frame incomplete");
    Ok(ReadOutcome {
        reading,
        status: ReadStatus::Incomplete,
    })
}
