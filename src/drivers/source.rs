#[cfg(test)]
use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Read};
use std::net::{Ipv4Addr, TcpListener, TcpStream};
use std::time::Duration;
use serialport::SerialPort;
use crate::drivers::PlotError;
/// Upper bound on a single blocking serial read.
pub const SERIAL_READ_TIMEOUT: Duration = Duration::from_secs(10);
/// Size of one TCP receive; each chunk is handed on as one record.
pub const TCP_CHUNK_SIZE: usize = 1024;
/// Trait representing something that can yield raw record lines on demand.
pub trait LineSource {
    /// Blocks until a line (or a timed-out partial line) is available.
    fn read_line(&mut self) -> Result<String, PlotError>;
    /// Address shown as the window title.
    fn address(&self) -> String;
    /// Human readable banner printed once the source is open.
    fn describe(&self) -> String;
}
impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn read_line(&mut self) -> Result<String, PlotError> {
        (**self).read_line()
    }
    fn address(&self) -> String {
        (**self).address()
    }
    fn describe(&self) -> String {
        (**self).describe()
    }
}
/// Serial device read line by line.
pub struct SerialSource {
    port_name: String,
    baud: u32,
    reader: BufReader<Box<dyn SerialPort>>,
}
impl SerialSource {
    pub fn open(port_name: &str, baud: u32) -> Result<Self, PlotError> {
        let port = serialport::new(port_name, baud)
            .timeout(SERIAL_READ_TIMEOUT)
            .open()
            .map_err(|source| PlotError::SerialOpen {
                port: port_name.to_string(),
                source,
            })?;
        log::info!("opened serial port {port_name} at {baud} baud");
        Ok(Self {
            port_name: port_name.to_string(),
            baud,
            reader: BufReader::new(port),
        })
    }
}
impl LineSource for SerialSource {
    fn read_line(&mut self) -> Result<String, PlotError> {
        read_line_until_timeout(&mut self.reader)
    }
    fn address(&self) -> String {
        self.port_name.clone()
    }
    fn describe(&self) -> String {
        format!(
            "Serial port listening:\n\tport: {}, baud: {}",
            self.port_name, self.baud
        )
    }
}
/// Reads up to and including the next newline. A read timeout is not an error:
/// whatever arrived before it is returned as a short line.
pub fn read_line_until_timeout<R: BufRead>(reader: &mut R) -> Result<String, PlotError> {
    let mut buf = Vec::new();
    match reader.read_until(b'\n', &mut buf) {
        Ok(0) => return Err(PlotError::Disconnected),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::TimedOut => {
            log::debug!("serial read timed out after {} bytes", buf.len());
        }
        Err(err) => return Err(err.into()),
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
/// Single accepted TCP client. Further connections are never accepted.
pub struct TcpSource {
    port: u16,
    stream: TcpStream,
}
impl TcpSource {
    /// Binds `localhost:<port>` and blocks until the first client connects.
    pub fn open(port: u16) -> Result<Self, PlotError> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, port))
            .map_err(|source| PlotError::TcpBind { port, source })?;
        log::info!("waiting for a client on tcp://localhost:{port}");
        Self::accept_from(&listener)
    }
    pub fn accept_from(listener: &TcpListener) -> Result<Self, PlotError> {
        let port = listener.local_addr()?.port();
        let (stream, peer) = listener.accept()?;
        log::info!("accepted client {peer} on port {port}");
        Ok(Self { port, stream })
    }
}
impl LineSource for TcpSource {
    fn read_line(&mut self) -> Result<String, PlotError> {
        read_chunk(&mut self.stream)
    }
    fn address(&self) -> String {
        format!("tcp://localhost:{}", self.port)
    }
    fn describe(&self) -> String {
        format!("TCP socket listening:\n\taddress: {}", self.address())
    }
}
/// One receive of at most [`TCP_CHUNK_SIZE`] bytes. End of stream means the peer left.
pub fn read_chunk<R: Read>(reader: &mut R) -> Result<String, PlotError> {
    let mut buf = [0u8; TCP_CHUNK_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Err(PlotError::Disconnected),
            Ok(n) => return Ok(String::from_utf8_lossy(&buf[..n]).into_owned()),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
}
/// In-memory source for tests.
#[cfg(test)]
pub struct ManualSource {
    queue: VecDeque<String>,
}
#[cfg(test)]
impl ManualSource {
    pub fn new<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            queue: lines.into_iter().map(Into::into).collect(),
        }
    }
}
#[cfg(test)]
impl LineSource for ManualSource {
    fn read_line(&mut self) -> Result<String, PlotError> {
        self.queue.pop_front().ok_or(PlotError::Disconnected)
    }
    fn address(&self) -> String {
        "manual".to_string()
    }
    fn describe(&self) -> String {
        format!("Manual source with {} queued lines", self.queue.len())
    }
}
