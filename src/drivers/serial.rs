use std::io::{self, BufRead, BufReader, Read};
use log::info;
use serialport::{DataBits, Parity, SerialPort, StopBits};
use crate::config::SerialConfig;
use crate::drivers::error::AcquisitionError;
use crate::drivers::frame::FRAME_LEN;
/// Longest line we are willing to buffer before handing it back as misframed.
const MAX_LINE_LEN: u64 = 64;
/// Reads `\r\n`-terminated frames, the way the bridge firmware emits them.
///
/// A `\n` inside the first [`FRAME_LEN`] bytes that is not preceded by `\r` is
/// a payload byte, so reading carries on past it. Anything else is handed back
/// at the terminator, and a misframed line only costs the bytes up to the next
/// `\r\n`.
pub struct LineFrameSource<R: BufRead> {
    reader: R,
}
impl<R: BufRead> LineFrameSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}
fn ends_inside_payload(line: &[u8]) -> bool {
    line.len() < FRAME_LEN && line.last() == Some(&b'\n') && !line.ends_with(b"\r\n")
}
impl<R: BufRead> super::FrameSource for LineFrameSource<R> {
    fn read_frame(&mut self) -> Result<Vec<u8>, AcquisitionError> {
        let mut line = Vec::with_capacity(FRAME_LEN);
        loop {
            let budget = MAX_LINE_LEN - line.len() as u64;
            match (&mut self.reader).take(budget).read_until(b'\n', &mut line) {
                Ok(0) => return Ok(line),
                Ok(_) if ends_inside_payload(&line) => continue,
                Ok(_) => return Ok(line),
                // whatever arrived before the timeout is handed back as is
                Err(e) if e.kind() == io::ErrorKind::TimedOut => return Ok(line),
                Err(e) => return Err(AcquisitionError::Transport(e)),
            }
        }
    }
}
pub type SerialFrameSource = LineFrameSource<BufReader<Box<dyn SerialPort>>>;
/// Opens the port 8N1 with the configured baud rate and read timeout.
pub fn open_serial(config: &SerialConfig) -> Result<SerialFrameSource, AcquisitionError> {
    let port = serialport::new(config.port_name.as_str(), config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(config.read_timeout())
        .open()
        .map_err(|source| AcquisitionError::Open {
            port: config.port_name.clone(),
            source,
        })?;
    info!(
        "opened {} at {} baud (timeout {:?})",
        config.port_name,
        config.baud_rate,
        config.read_timeout()
    );
    Ok(LineFrameSource::new(BufReader::new(port)))
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{frame, AcquisitionLoop, FrameSource, SharedWindow, StepOutcome};
    use crate::types::{RawSample, Sample};
    use std::collections::VecDeque;
    use std::io::Cursor;
    fn crlf_sample(t: u32, i: i16, a: i16) -> RawSample {
        let mut sample = RawSample::new(t, i, a);
        sample.reserved = *b"\r\n";
        sample
    }
    /// Reader that plays back scripted chunks and errors.
    struct Scripted {
        steps: VecDeque<io::Result<Vec<u8>>>,
    }
    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.steps.pop_front() {
                None => Ok(0),
                Some(Err(e)) => Err(e),
                Some(Ok(chunk)) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    if n < chunk.len() {
                        self.steps.push_front(Ok(chunk[n..].to_vec()));
                    }
                    Ok(n)
                }
            }
        }
    }
    fn scripted(steps: Vec<io::Result<Vec<u8>>>) -> LineFrameSource<BufReader<Scripted>> {
        LineFrameSource::new(BufReader::new(Scripted {
            steps: steps.into(),
        }))
    }
    #[test]
    fn splits_on_crlf_keeping_terminator() {
        let bytes = [
            0u8, 0, 0, 100, 0, 20, 0xFF, 0xF6, b'\r', b'\n', 0, 0, 0, 101, 0, 11, 0, 1, b'\r',
            b'\n',
        ];
        let mut source = LineFrameSource::new(Cursor::new(bytes.to_vec()));
        assert_eq!(source.read_frame().unwrap(), bytes[..10].to_vec());
        assert_eq!(source.read_frame().unwrap(), bytes[10..].to_vec());
        // EOF reads as an empty frame
        assert!(source.read_frame().unwrap().is_empty());
    }
    #[test]
    fn newline_bytes_inside_the_payload_are_kept() {
        // instant amplitude 10 and timestamp byte 2 are both 0x0A
        let first = frame::encode(&crlf_sample(100, 10, -10));
        let second = frame::encode(&crlf_sample(0x0000_0A00, 266, -246));
        let mut bytes = first.to_vec();
        bytes.extend_from_slice(&second);
        let mut source = LineFrameSource::new(Cursor::new(bytes));
        assert_eq!(source.read_frame().unwrap(), first.to_vec());
        assert_eq!(source.read_frame().unwrap(), second.to_vec());
    }
    #[test]
    fn short_crlf_line_resyncs_on_its_terminator() {
        let good = frame::encode(&crlf_sample(7, 1, 2));
        let mut bytes = vec![1u8, 2, 3, b'\r', b'\n'];
        bytes.extend_from_slice(&good);
        let mut source = LineFrameSource::new(Cursor::new(bytes));
        assert_eq!(source.read_frame().unwrap(), vec![1, 2, 3, b'\r', b'\n']);
        assert_eq!(source.read_frame().unwrap(), good.to_vec());
    }
    #[test]
    fn misframed_line_then_payload_newline_reaches_the_window() {
        let mut bytes = vec![1u8, 2, 3, 4, 5, 6, 7, b'\r', b'\n'];
        bytes.extend_from_slice(&frame::encode(&crlf_sample(100, 10, -10)));
        let window = SharedWindow::with_capacity(512).unwrap();
        let source = LineFrameSource::new(Cursor::new(bytes));
        let mut acq = AcquisitionLoop::new(source, window.clone(), io::sink());
        assert_eq!(acq.step().unwrap(), StepOutcome::Discarded);
        assert!(window.is_empty());
        assert_eq!(
            acq.step().unwrap(),
            StepOutcome::Appended(Sample::new(0, 10, -10))
        );
        assert_eq!(window.snapshot(), vec![Sample::new(0, 10, -10)]);
    }
    #[test]
    fn timeout_returns_partial_data() {
        let mut source = scripted(vec![
            Ok(vec![1, 2, 3]),
            Err(io::Error::new(io::ErrorKind::TimedOut, "timed out")),
            Err(io::Error::new(io::ErrorKind::TimedOut, "timed out")),
            Ok(vec![4, b'\n']),
        ]);
        assert_eq!(source.read_frame().unwrap(), vec![1, 2, 3]);
        assert!(source.read_frame().unwrap().is_empty());
        assert_eq!(source.read_frame().unwrap(), vec![4, b'\n']);
    }
    #[test]
    fn interrupted_reads_are_retried() {
        let mut source = scripted(vec![
            Err(io::Error::new(io::ErrorKind::Interrupted, "signal")),
            Ok(vec![9, b'\n']),
        ]);
        assert_eq!(source.read_frame().unwrap(), vec![9, b'\n']);
    }
    #[test]
    fn other_io_errors_are_fatal() {
        let mut source = scripted(vec![Err(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "device unplugged",
        ))]);
        assert!(matches!(
            source.read_frame(),
            Err(AcquisitionError::Transport(e)) if e.kind() == io::ErrorKind::BrokenPipe
        ));
    }
    #[test]
    fn runaway_lines_are_cut() {
        let mut source = LineFrameSource::new(Cursor::new(vec![7u8; 100]));
        assert_eq!(source.read_frame().unwrap().len(), MAX_LINE_LEN as usize);
        assert_eq!(source.read_frame().unwrap().len(), 100 - MAX_LINE_LEN as usize);
    }
}
