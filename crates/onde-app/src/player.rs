//! Live stream playback
//!
//! The HTTP body is spooled to a growing buffer on a background thread while
//! rodio decodes from a blocking reader over it. Decoding needs `Seek`, which
//! a network stream cannot offer directly; the spool retains what has been
//! downloaded so the decoder can look back. The buffer grows for the lifetime
//! of a listening session.

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use rodio::{Decoder, OutputStream, Sink};

/// Playback lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Connecting,
    Playing,
    Paused,
}

impl PlaybackState {
    /// Label shown on the radio screen.
    pub fn label(self) -> &'static str {
        match self {
            PlaybackState::Stopped => "arrêté",
            PlaybackState::Connecting => "connexion…",
            PlaybackState::Playing => "en direct",
            PlaybackState::Paused => "en pause",
        }
    }
}

/// The audio side of the radio screen: connect once, then toggle between
/// playing and paused. The UI only ever reads [`state`].
///
/// [`state`]: Player::state
pub struct Player {
    stream_url: String,
    state: Arc<Mutex<PlaybackState>>,
    sink: Option<Arc<Sink>>,
    // Keeps the audio device open; dropping it silences the sink.
    _output: Option<OutputStream>,
}

impl Player {
    pub fn new(stream_url: impl Into<String>) -> Self {
        Self {
            stream_url: stream_url.into(),
            state: Arc::new(Mutex::new(PlaybackState::Stopped)),
            sink: None,
            _output: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.lock()
    }

    /// Play/pause button behavior: connect on first use, then flip between
    /// paused and playing. Ignored while a connection attempt is underway.
    pub fn toggle(&mut self) -> anyhow::Result<()> {
        match self.state() {
            PlaybackState::Stopped => self.start(),
            PlaybackState::Connecting => Ok(()),
            PlaybackState::Playing => {
                if let Some(sink) = &self.sink {
                    sink.pause();
                }
                *self.state.lock() = PlaybackState::Paused;
                Ok(())
            }
            PlaybackState::Paused => {
                if let Some(sink) = &self.sink {
                    sink.play();
                }
                *self.state.lock() = PlaybackState::Playing;
                Ok(())
            }
        }
    }

    fn start(&mut self) -> anyhow::Result<()> {
        let (output, handle) = OutputStream::try_default()?;
        let sink = Arc::new(Sink::try_new(&handle)?);
        *self.state.lock() = PlaybackState::Connecting;
        tracing::info!(url = %self.stream_url, "connecting to stream");

        let url = self.stream_url.clone();
        let state = Arc::clone(&self.state);
        let decode_sink = Arc::clone(&sink);
        // Connecting and reading the stream header both block; keep them off
        // the UI thread.
        std::thread::spawn(move || {
            let reader = match open_spooled(&url) {
                Ok(reader) => reader,
                Err(e) => {
                    tracing::warn!(%e, "stream connection failed");
                    *state.lock() = PlaybackState::Stopped;
                    return;
                }
            };
            match Decoder::new(reader) {
                Ok(source) => {
                    decode_sink.append(source);
                    *state.lock() = PlaybackState::Playing;
                }
                Err(e) => {
                    tracing::warn!(%e, "stream decode failed");
                    *state.lock() = PlaybackState::Stopped;
                }
            }
        });

        self.sink = Some(sink);
        self._output = Some(output);
        Ok(())
    }
}

/// Connect to the stream and spawn the downloader thread feeding the spool.
fn open_spooled(url: &str) -> anyhow::Result<SpoolReader> {
    let mut response = reqwest::blocking::get(url)?.error_for_status()?;
    let spool = Arc::new(Spool::default());
    let writer = Arc::clone(&spool);
    std::thread::spawn(move || {
        let mut chunk = [0u8; 8192];
        loop {
            match response.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => writer.push(&chunk[..n]),
                Err(e) => {
                    tracing::debug!(%e, "stream download ended");
                    break;
                }
            }
        }
        writer.finish();
    });
    Ok(SpoolReader { spool, pos: 0 })
}

/// Shared download buffer: bytes appended by the downloader, read (and
/// re-read) by the decoder.
#[derive(Default)]
struct Spool {
    inner: Mutex<SpoolInner>,
    available: Condvar,
}

#[derive(Default)]
struct SpoolInner {
    data: Vec<u8>,
    eof: bool,
}

impl Spool {
    fn push(&self, bytes: &[u8]) {
        let mut inner = self.inner.lock();
        inner.data.extend_from_slice(bytes);
        self.available.notify_all();
    }

    fn finish(&self) {
        let mut inner = self.inner.lock();
        inner.eof = true;
        self.available.notify_all();
    }
}

/// Blocking reader over the spool. Reads past the downloaded end wait for
/// more data; seeks within the buffer are free.
struct SpoolReader {
    spool: Arc<Spool>,
    pos: usize,
}

impl Read for SpoolReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut inner = self.spool.inner.lock();
        loop {
            if self.pos < inner.data.len() {
                let n = buf.len().min(inner.data.len() - self.pos);
                buf[..n].copy_from_slice(&inner.data[self.pos..self.pos + n]);
                self.pos += n;
                return Ok(n);
            }
            if inner.eof {
                return Ok(0);
            }
            self.spool.available.wait(&mut inner);
        }
    }
}

impl Seek for SpoolReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let mut inner = self.spool.inner.lock();
        let target = match pos {
            SeekFrom::Start(n) => n as i64,
            SeekFrom::Current(delta) => self.pos as i64 + delta,
            SeekFrom::End(delta) => {
                // Only meaningful once the full length is known; a live
                // stream never seeks from the end.
                while !inner.eof {
                    self.spool.available.wait(&mut inner);
                }
                inner.data.len() as i64 + delta
            }
        };
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start",
            ));
        }
        self.pos = target as usize;
        Ok(self.pos as u64)
    }
}
