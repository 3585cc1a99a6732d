use clap::Parser;

/// Minimal Telnet server demo exercising `parley`'s negotiation and
/// kludge-mode line editor end-to-end.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Address to bind to. Overridden by `addr` if given.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind to. Overridden by `addr` if given.
    #[arg(long, default_value_t = 4000)]
    pub port: u16,

    /// `host:port` shorthand, e.g. `0.0.0.0:4000`. Takes priority over
    /// `--host`/`--port` when present.
    #[arg(value_name = "HOST:PORT")]
    pub addr: Option<String>,
}

impl Args {
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        match &self.addr {
            Some(addr) => addr.parse(),
            None => format!("{}:{}", self.host, self.port).parse(),
        }
    }
}
