use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::convert::convert_value;
use crate::errors::ConvertError;
use crate::features::Feature;
use crate::types::SplitName;
use crate::value::Value;

/// Bound on each worker's input and output queue.
const WORKER_QUEUE_DEPTH: usize = 8;

/// Single-pass stream of foreign records for one split.
pub type RecordStream = Box<dyn Iterator<Item = Value> + Send>;

/// Single-pass stream of `(index, converted value)` pairs for one split.
///
/// Indices start at 0 and increment by 1 per emitted record in original
/// stream order. A conversion failure surfaces as one `Err` item, after
/// which the stream is exhausted: a single unconvertible record aborts the
/// whole split.
pub type ExampleStream = Box<dyn Iterator<Item = Result<(u64, Value), ConvertError>> + Send>;

/// Convert one split's record stream against the translated schema.
///
/// With `workers = None` conversion runs inline on the consuming thread.
/// With `workers = Some(n)` records are distributed over `n` worker threads
/// scoped to this stream; emitted order still equals input order because
/// records are dispatched and collected in strict round-robin position
/// order, never by worker completion order.
pub fn generate_examples(
    features: Arc<Feature>,
    records: RecordStream,
    workers: Option<usize>,
) -> ExampleStream {
    match workers {
        None | Some(0) | Some(1) => Box::new(records.enumerate().map(move |(position, record)| {
            convert_value(record, &features).map(|converted| (position as u64, converted))
        })),
        Some(count) => Box::new(OrderedPool::spawn(features, records, count)),
    }
}

/// Fixed-size conversion pool that preserves input order.
///
/// The feeder thread tags record `i` with its position and deals it to
/// worker `i % n`; each worker converts its records in arrival order and
/// keeps the tag attached; the collector polls worker output queues in the
/// same round-robin order, so tagged position `k` always surfaces before
/// `k + 1`. All channels are bounded, so a slow consumer backpressures the
/// feeder instead of buffering the split.
struct OrderedPool {
    outputs: Vec<mpsc::Receiver<(u64, Result<Value, ConvertError>)>>,
    turn: usize,
    finished: bool,
    feeder: Option<thread::JoinHandle<()>>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl OrderedPool {
    fn spawn(features: Arc<Feature>, records: RecordStream, worker_count: usize) -> OrderedPool {
        let worker_count = worker_count.max(1);
        debug!(worker_count, "starting ordered conversion pool");

        let mut input_senders = Vec::with_capacity(worker_count);
        let mut workers = Vec::with_capacity(worker_count);
        let mut outputs = Vec::with_capacity(worker_count);

        for _ in 0..worker_count {
            let (input_sender, input_receiver) =
                mpsc::sync_channel::<(u64, Value)>(WORKER_QUEUE_DEPTH);
            let (output_sender, output_receiver) = mpsc::sync_channel(WORKER_QUEUE_DEPTH);
            let features = Arc::clone(&features);
            workers.push(thread::spawn(move || {
                for (position, record) in input_receiver {
                    let converted = convert_value(record, &features);
                    if output_sender.send((position, converted)).is_err() {
                        // Collector hung up; the split was abandoned.
                        return;
                    }
                }
            }));
            input_senders.push(input_sender);
            outputs.push(output_receiver);
        }

        let feeder = thread::spawn(move || {
            let mut records = records;
            for (position, record) in records.by_ref().enumerate() {
                let slot = position % worker_count;
                if input_senders[slot].send((position as u64, record)).is_err() {
                    return;
                }
            }
        });

        OrderedPool {
            outputs,
            turn: 0,
            finished: false,
            feeder: Some(feeder),
            workers,
        }
    }
}

impl Iterator for OrderedPool {
    type Item = Result<(u64, Value), ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.outputs[self.turn].recv() {
            Ok((position, Ok(converted))) => {
                self.turn = (self.turn + 1) % self.outputs.len();
                Some(Ok((position, converted)))
            }
            Ok((_, Err(err))) => {
                // Fatal for the whole split; fuse the stream.
                self.finished = true;
                Some(Err(err))
            }
            Err(mpsc::RecvError) => {
                // Round-robin dispatch means the first disconnected worker
                // in turn order marks the end of the input stream.
                self.finished = true;
                None
            }
        }
    }
}

impl Drop for OrderedPool {
    fn drop(&mut self) {
        // Closing the receivers unblocks workers, which in turn unblocks
        // the feeder; joining afterwards cannot deadlock.
        self.outputs.clear();
        if let Some(feeder) = self.feeder.take() {
            let _ = feeder.join();
        }
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

/// Drop splits whose streams produce zero records, warning once per drop.
///
/// Draws exactly one item from each split's stream to probe for emptiness,
/// then splices it back onto the front, leaving surviving streams intact
/// and lazy. A conversion error observed during the probe propagates: that
/// split failed, it is not empty.
pub fn remove_empty_splits(
    splits: IndexMap<SplitName, ExampleStream>,
) -> Result<IndexMap<SplitName, ExampleStream>, ConvertError> {
    let mut non_empty: IndexMap<SplitName, ExampleStream> = IndexMap::with_capacity(splits.len());
    for (split, mut examples) in splits {
        match examples.next() {
            Some(first) => {
                let first = first?;
                non_empty.insert(
                    split,
                    Box::new(std::iter::once(Ok(first)).chain(examples)) as ExampleStream,
                );
            }
            None => {
                warn!("{split} split doesn't have any examples");
            }
        }
    }
    Ok(non_empty)
}
