//! Paired streaming interfaces over the codecs.
//!
//! Every codec stage exposes a write-sink and a read-source sharing one
//! core. The writer buffers input; closing it is the signal to run the
//! pipeline. The result reaches the reader through a bounded in-process
//! pipe: the transform runs on its own thread and waits whenever the pipe
//! is full, so the reader drains output incrementally instead of receiving
//! it in one piece. Writes after the reader is gone fail with
//! `BrokenPipe`; reads after the writer vanishes without closing fail with
//! `Truncated`.

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::{Arc, Condvar, Mutex};

use crate::compress::deflate::Deflater;
use crate::compress::gzip::gzip_compress_with;
use crate::decode::gunzip::gzip_decompress;
use crate::decode::inflate::inflate;
use crate::error::{Error, Result};
use crate::standalone;

/// The codec stages selectable at the streaming interface and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Frequency-header Huffman byte codec.
    Huffman,
    /// Marker-based LZSS text codec.
    Lzss,
    /// Raw DEFLATE, one dynamic-Huffman block.
    Flate,
    /// gzip-framed DEFLATE.
    Gzip,
}

impl Algorithm {
    /// All supported algorithms, in CLI listing order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Huffman,
        Algorithm::Lzss,
        Algorithm::Flate,
        Algorithm::Gzip,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Huffman => "huffman",
            Algorithm::Lzss => "lzss",
            Algorithm::Flate => "flate",
            Algorithm::Gzip => "gzip",
        }
    }

    /// Run the encoder for this stage in one shot.
    pub fn encode(self, data: &[u8], deflater: &Deflater) -> Result<Vec<u8>> {
        match self {
            Algorithm::Huffman => standalone::huffman::encode(data),
            Algorithm::Lzss => standalone::lzss::encode(data),
            Algorithm::Flate => deflater.encode(data),
            Algorithm::Gzip => gzip_compress_with(data, deflater),
        }
    }

    /// Run the decoder for this stage in one shot.
    pub fn decode(self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Algorithm::Huffman => standalone::huffman::decode(data),
            Algorithm::Lzss => standalone::lzss::decode(data),
            Algorithm::Flate => inflate(data),
            Algorithm::Gzip => gzip_decompress(data),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "huffman" => Ok(Algorithm::Huffman),
            "lzss" => Ok(Algorithm::Lzss),
            "flate" => Ok(Algorithm::Flate),
            "gzip" => Ok(Algorithm::Gzip),
            other => Err(Error::InvalidStream(format!(
                "unknown algorithm {other:?}"
            ))),
        }
    }
}

/// Which way the shared core transforms bytes on close.
#[derive(Debug, Clone, Copy)]
enum Job {
    Encode(Algorithm, Deflater),
    Decode(Algorithm),
}

impl Job {
    fn run(self, input: &[u8]) -> Result<Vec<u8>> {
        match self {
            Job::Encode(algorithm, deflater) => algorithm.encode(input, &deflater),
            Job::Decode(algorithm) => algorithm.decode(input),
        }
    }
}

/// Bytes the pipe buffers before the producing side has to wait for the
/// reader to drain.
const PIPE_CAPACITY: usize = 32 * 1024;

#[derive(Default)]
struct State {
    input: Vec<u8>,
    buffer: VecDeque<u8>,
    closed: bool,
    finished: bool,
    outcome: Option<std::result::Result<(), Error>>,
    failed: Option<Error>,
    writer_alive: bool,
    reader_alive: bool,
}

struct Core {
    state: Mutex<State>,
    ready: Condvar,
}

/// Push the transformed bytes into the bounded pipe, waiting whenever it
/// is full. Gives up silently if the reader goes away.
fn feed(core: &Core, output: Vec<u8>) {
    let mut offset = 0usize;
    let mut state = core.state.lock().expect("stream core poisoned");
    while offset < output.len() && state.reader_alive {
        let space = PIPE_CAPACITY - state.buffer.len();
        if space == 0 {
            state = core.ready.wait(state).expect("stream core poisoned");
            continue;
        }
        let take = space.min(output.len() - offset);
        state.buffer.extend(&output[offset..offset + take]);
        offset += take;
        core.ready.notify_all();
    }
    state.finished = true;
    core.ready.notify_all();
}

/// Write-sink half of a codec stream pair.
pub struct StreamWriter {
    core: Arc<Core>,
    job: Job,
}

/// Read-source half of a codec stream pair.
pub struct StreamReader {
    core: Arc<Core>,
}

/// Build an encoder pair for `algorithm` with default DEFLATE settings.
pub fn encoder(algorithm: Algorithm) -> (StreamWriter, StreamReader) {
    pair(Job::Encode(algorithm, Deflater::new()))
}

/// Build an encoder pair with an explicit DEFLATE configuration. The
/// configuration only matters for the flate and gzip stages.
pub fn encoder_with(algorithm: Algorithm, deflater: Deflater) -> (StreamWriter, StreamReader) {
    pair(Job::Encode(algorithm, deflater))
}

/// Build a decoder pair for `algorithm`.
pub fn decoder(algorithm: Algorithm) -> (StreamWriter, StreamReader) {
    pair(Job::Decode(algorithm))
}

fn pair(job: Job) -> (StreamWriter, StreamReader) {
    let core = Arc::new(Core {
        state: Mutex::new(State {
            writer_alive: true,
            reader_alive: true,
            ..State::default()
        }),
        ready: Condvar::new(),
    });
    (
        StreamWriter {
            core: Arc::clone(&core),
            job,
        },
        StreamReader { core },
    )
}

impl StreamWriter {
    /// Buffer more input bytes.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        let mut state = self.core.state.lock().expect("stream core poisoned");
        if !state.reader_alive {
            return Err(Error::BrokenPipe);
        }
        if state.closed {
            return Err(Error::InvalidStream("write after close".into()));
        }
        state.input.extend_from_slice(data);
        Ok(data.len())
    }

    /// Signal end of input and run the pipeline.
    ///
    /// Blocks until the transformation has completed; any pipeline error is
    /// returned here and replayed to the reader. The result drains to the
    /// reader through the bounded pipe, so a large output keeps flowing in
    /// the background after `close` returns.
    pub fn close(&mut self) -> Result<()> {
        let input = {
            let mut state = self.core.state.lock().expect("stream core poisoned");
            if state.closed {
                return Ok(());
            }
            if !state.reader_alive {
                return Err(Error::BrokenPipe);
            }
            state.closed = true;
            std::mem::take(&mut state.input)
        };

        // The transform runs on its own thread: it keeps feeding the pipe
        // after close returns, and a blocked reader never stalls it.
        let core = Arc::clone(&self.core);
        let job = self.job;
        std::thread::spawn(move || match job.run(&input) {
            Ok(output) => {
                {
                    let mut state = core.state.lock().expect("stream core poisoned");
                    state.outcome = Some(Ok(()));
                    core.ready.notify_all();
                }
                feed(&core, output);
            }
            Err(err) => {
                let mut state = core.state.lock().expect("stream core poisoned");
                state.failed = Some(err.clone());
                state.outcome = Some(Err(err));
                state.finished = true;
                core.ready.notify_all();
            }
        });

        let mut state = self.core.state.lock().expect("stream core poisoned");
        loop {
            if let Some(outcome) = &state.outcome {
                return outcome.clone();
            }
            state = self
                .core
                .ready
                .wait(state)
                .expect("stream core poisoned");
        }
    }
}

impl Drop for StreamWriter {
    fn drop(&mut self) {
        if let Ok(mut state) = self.core.state.lock() {
            state.writer_alive = false;
        }
        self.core.ready.notify_all();
    }
}

impl io::Write for StreamWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        StreamWriter::write(self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl StreamReader {
    /// Read transformed bytes as the pipe fills, blocking while it is
    /// empty and the pipeline is still running.
    ///
    /// Returns `Ok(0)` once the output is drained. Fails with `Truncated`
    /// if the writer disappeared without closing, or replays the pipeline
    /// error if the transformation failed.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut state = self.core.state.lock().expect("stream core poisoned");
        loop {
            if let Some(err) = &state.failed {
                return Err(err.clone());
            }
            if !state.buffer.is_empty() {
                let count = buf.len().min(state.buffer.len());
                for (slot, byte) in buf.iter_mut().zip(state.buffer.drain(..count)) {
                    *slot = byte;
                }
                // Room just opened up for the feeding side.
                self.core.ready.notify_all();
                return Ok(count);
            }
            if state.finished {
                return Ok(0);
            }
            if !state.writer_alive && !state.closed {
                return Err(Error::Truncated);
            }
            state = self
                .core
                .ready
                .wait(state)
                .expect("stream core poisoned");
        }
    }

    /// Drain the whole output into a vector.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let count = self.read(&mut buf)?;
            if count == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&buf[..count]);
        }
    }
}

impl Drop for StreamReader {
    fn drop(&mut self) {
        if let Ok(mut state) = self.core.state.lock() {
            state.reader_alive = false;
        }
        self.core.ready.notify_all();
    }
}

impl io::Read for StreamReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        StreamReader::read(self, buf).map_err(Into::into)
    }
}
