use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use protocol::config::TimeConfig;
use std::net::{IpAddr, SocketAddr};
use tokio::net::UdpSocket;
use tokio::time::{timeout, Duration};

const NTP_PACKET_LEN: usize = 48;
const NTP_DEFAULT_PORT: u16 = 123;
/// Seconds between 1900-01-01 (NTP era 0) and 1970-01-01.
const NTP_UNIX_OFFSET_SECS: i64 = 2_208_988_800;
const MODE_CLIENT: u8 = 3;
const MODE_SERVER: u8 = 4;

#[async_trait]
pub(crate) trait TimeSource: Send + Sync {
    async fn now_utc(&self) -> anyhow::Result<DateTime<Utc>>;

    fn describe(&self) -> String;
}

pub(crate) struct LocalClock;

#[async_trait]
impl TimeSource for LocalClock {
    async fn now_utc(&self) -> anyhow::Result<DateTime<Utc>> {
        Ok(Utc::now())
    }

    fn describe(&self) -> String {
        "local clock".to_string()
    }
}

/// Single-request SNTP client.
pub(crate) struct SntpClient {
    server: String,
    version: u8,
    timeout: Duration,
}

impl SntpClient {
    pub(crate) fn new(server: impl Into<String>, version: u8, timeout: Duration) -> Self {
        Self {
            server: server.into(),
            version,
            timeout,
        }
    }

    async fn query(&self) -> anyhow::Result<DateTime<Utc>> {
        let addr = resolve_server(&self.server).await?;
        let bind_addr: SocketAddr = if addr.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .context("failed to bind udp socket")?;
        socket
            .connect(addr)
            .await
            .with_context(|| format!("failed to connect {addr}"))?;

        let request = build_request(self.version, Utc::now());
        socket
            .send(&request)
            .await
            .with_context(|| format!("failed to send sntp request to {addr}"))?;

        let mut reply = [0u8; 128];
        let len = socket
            .recv(&mut reply)
            .await
            .with_context(|| format!("failed to read sntp reply from {addr}"))?;
        let mut sent_transmit = [0u8; 8];
        sent_transmit.copy_from_slice(&request[40..48]);
        parse_reply(&reply[..len], &sent_transmit)
    }
}

#[async_trait]
impl TimeSource for SntpClient {
    async fn now_utc(&self) -> anyhow::Result<DateTime<Utc>> {
        timeout(self.timeout, self.query())
            .await
            .with_context(|| {
                format!(
                    "sntp query to {} timed out after {}ms",
                    self.server,
                    self.timeout.as_millis()
                )
            })?
    }

    fn describe(&self) -> String {
        format!("sntp v{} {}", self.version, self.server)
    }
}

pub(crate) fn time_source_from_config(config: &TimeConfig) -> Box<dyn TimeSource> {
    match config.server.as_deref() {
        Some(server) => Box::new(SntpClient::new(
            server.trim(),
            config.version(),
            Duration::from_millis(config.timeout_ms()),
        )),
        None => Box::new(LocalClock),
    }
}

/// Current UTC time from `source`, or the local clock if the source fails.
pub(crate) async fn resolve_utc_now(source: &dyn TimeSource) -> DateTime<Utc> {
    match source.now_utc().await {
        Ok(now) => {
            tracing::debug!(source = %source.describe(), now = %now, "resolved utc time");
            now
        }
        Err(err) => {
            let now = Utc::now();
            tracing::warn!(
                source = %source.describe(),
                error = %format!("{err:#}"),
                fallback = %now,
                "time source unavailable, using local clock"
            );
            now
        }
    }
}

async fn resolve_server(server: &str) -> anyhow::Result<SocketAddr> {
    let target = with_default_port(server);
    let mut addrs = tokio::net::lookup_host(&target)
        .await
        .with_context(|| format!("failed to resolve {target}"))?;
    addrs
        .next()
        .with_context(|| format!("no addresses for {target}"))
}

fn with_default_port(server: &str) -> String {
    if server.parse::<SocketAddr>().is_ok() {
        return server.to_string();
    }
    if let Ok(ip) = server.parse::<IpAddr>() {
        return SocketAddr::new(ip, NTP_DEFAULT_PORT).to_string();
    }
    if server.contains(':') {
        server.to_string()
    } else {
        format!("{server}:{NTP_DEFAULT_PORT}")
    }
}

fn build_request(version: u8, now: DateTime<Utc>) -> [u8; NTP_PACKET_LEN] {
    let mut packet = [0u8; NTP_PACKET_LEN];
    packet[0] = ((version & 0x07) << 3) | MODE_CLIENT;
    packet[40..48].copy_from_slice(&to_ntp_timestamp(now));
    packet
}

fn parse_reply(reply: &[u8], sent_transmit: &[u8; 8]) -> anyhow::Result<DateTime<Utc>> {
    if reply.len() < NTP_PACKET_LEN {
        anyhow::bail!("sntp reply too short: {} bytes", reply.len());
    }
    let mode = reply[0] & 0x07;
    if mode != MODE_SERVER {
        anyhow::bail!("sntp reply has mode {mode}, expected {MODE_SERVER}");
    }
    if reply[1] == 0 {
        let code = String::from_utf8_lossy(&reply[12..16]).to_string();
        anyhow::bail!("sntp server sent kiss-o'-death {code:?}");
    }
    if &reply[24..32] != sent_transmit {
        anyhow::bail!("sntp reply does not answer our request");
    }
    let seconds = u32::from_be_bytes([reply[40], reply[41], reply[42], reply[43]]);
    let fraction = u32::from_be_bytes([reply[44], reply[45], reply[46], reply[47]]);
    if seconds == 0 && fraction == 0 {
        anyhow::bail!("sntp reply has no transmit timestamp");
    }
    from_ntp_timestamp(seconds, fraction).context("sntp transmit timestamp out of range")
}

fn from_ntp_timestamp(seconds: u32, fraction: u32) -> Option<DateTime<Utc>> {
    // Era 1 (2036 onward) wraps the seconds field; its values have the high bit clear.
    let seconds = if seconds & 0x8000_0000 == 0 {
        i64::from(seconds) + (1i64 << 32)
    } else {
        i64::from(seconds)
    };
    let nanos = ((u64::from(fraction) * 1_000_000_000) >> 32) as u32;
    DateTime::from_timestamp(seconds - NTP_UNIX_OFFSET_SECS, nanos)
}

fn to_ntp_timestamp(time: DateTime<Utc>) -> [u8; 8] {
    let seconds = (time.timestamp() + NTP_UNIX_OFFSET_SECS) as u32;
    let fraction = ((u64::from(time.timestamp_subsec_nanos()) << 32) / 1_000_000_000) as u32;
    let mut out = [0u8; 8];
    out[..4].copy_from_slice(&seconds.to_be_bytes());
    out[4..].copy_from_slice(&fraction.to_be_bytes());
    out
}
