use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::model::Datapoint;
use crate::Error;

pub const DEFAULT_PORT: u16 = 2003;

/// Address of a carbon plaintext listener.
#[derive(Debug, Clone)]
pub struct Graphite {
    pub host: String,
    pub port: u16,
}

impl Graphite {
    pub fn new(host: String) -> Graphite {
        Graphite {
            host,
            port: DEFAULT_PORT,
        }
    }

    pub async fn connect(&self) -> Result<Connection, Error> {
        TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map(|stream| Connection { stream })
            .map_err(|e| Error::SinkError(e.to_string()))
    }
}

#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
}

impl Connection {
    /// Ship one batch, one `<name> <value> <unix-timestamp>` line per point.
    pub async fn send(&mut self, points: &[Datapoint]) -> Result<(), Error> {
        let mut payload = String::new();
        for point in points {
            payload.push_str(&format!(
                "{} {} {}\n",
                point.name, point.value, point.timestamp
            ));
        }

        self.stream
            .write_all(payload.as_bytes())
            .await
            .map_err(|e| Error::SinkError(e.to_string()))?;
        self.stream
            .flush()
            .await
            .map_err(|e| Error::SinkError(e.to_string()))
    }
}
