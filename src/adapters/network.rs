//! Wi-Fi station link + HTTP POST adapter.
//!
//! Implements [`NetworkPort`]: "send JSON, get status code".  Association
//! is attempted a bounded number of times at boot; after that the
//! controller only asks [`is_connected`](NetworkPort::is_connected) and
//! skips the network report while the link is down.  Reconnection is left
//! to the ESP-IDF Wi-Fi driver.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::wifi::BlockingWifi` for the
//!   link and `esp_idf_svc::http::client::EspHttpConnection` per POST.
//! - **all other targets**: an in-memory simulation for host-side tests.

use log::{info, warn};

use crate::app::ports::{NetworkPort, PostReply};
use crate::config::SystemConfig;
use crate::error::{CommsError, Error};

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    http::{
        client::{Configuration as HttpConfiguration, EspHttpConnection},
        Method,
    },
    nvs::EspDefaultNvsPartition,
    sys::EspError,
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};

/// Bytes of the server reply kept for command parsing.
#[cfg(target_os = "espidf")]
const REPLY_CAP: usize = 256;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), Error> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(Error::Config("SSID must be 1-32 printable ASCII bytes"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), Error> {
    if !password.is_empty() && !(8..=64).contains(&password.len()) {
        return Err(Error::Config("WPA2 password must be 8-64 bytes, or empty"));
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiNetwork {
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    endpoint: heapless::String<96>,
    #[cfg(not(target_os = "espidf"))]
    sim: SimLink,
}

/// Host-side stand-in for the radio and the server.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone)]
pub struct SimLink {
    /// Connect attempts that fail before one succeeds.
    pub failures_before_connect: u32,
    pub connected: bool,
    pub reply: PostReply,
    pub posted: Vec<String>,
}

#[cfg(not(target_os = "espidf"))]
impl Default for SimLink {
    fn default() -> Self {
        Self {
            failures_before_connect: 0,
            connected: false,
            reply: PostReply {
                code: 200,
                body: Some(r#"{"status":"ok"}"#.into()),
            },
            posted: Vec::new(),
        }
    }
}

impl WifiNetwork {
    /// Bring up the station interface (not yet associated).
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
        config: &SystemConfig,
    ) -> anyhow::Result<Self> {
        validate_ssid(&config.wifi_ssid)?;
        validate_password(&config.wifi_password)?;

        let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), nvs)?, sysloop)?;
        let auth_method = if config.wifi_password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: config
                .wifi_ssid
                .as_str()
                .try_into()
                .map_err(|_| Error::Config("SSID too long"))?,
            password: config
                .wifi_password
                .as_str()
                .try_into()
                .map_err(|_| Error::Config("password too long"))?,
            auth_method,
            ..Default::default()
        }))?;
        wifi.start()?;
        info!("WiFi: station started (SSID='{}')", config.wifi_ssid);

        Ok(Self {
            wifi,
            endpoint: config.endpoint_url.clone(),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(config: &SystemConfig) -> Result<Self, Error> {
        validate_ssid(&config.wifi_ssid)?;
        validate_password(&config.wifi_password)?;
        Ok(Self {
            endpoint: config.endpoint_url.clone(),
            sim: SimLink::default(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Try to associate up to `attempts` times, calling `pause_ms(1000)`
    /// between failures.  Blocking; boot only.
    pub fn connect_at_boot(
        &mut self,
        attempts: u32,
        mut pause_ms: impl FnMut(u32),
    ) -> Result<(), CommsError> {
        for attempt in 1..=attempts {
            match self.platform_connect() {
                Ok(()) => {
                    info!("WiFi: connected on attempt {}/{}", attempt, attempts);
                    return Ok(());
                }
                Err(e) => {
                    warn!("WiFi: attempt {}/{} failed ({})", attempt, attempts, e);
                    if attempt < attempts {
                        pause_ms(1_000);
                    }
                }
            }
        }
        warn!("WiFi: continuing offline");
        Err(CommsError::ConnectFailed)
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), CommsError> {
        self.wifi.connect().map_err(|_| CommsError::ConnectFailed)?;
        self.wifi.wait_netif_up().map_err(|_| CommsError::ConnectFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), CommsError> {
        if self.sim.failures_before_connect > 0 {
            self.sim.failures_before_connect -= 1;
            return Err(CommsError::ConnectFailed);
        }
        self.sim.connected = true;
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn try_post(&mut self, body: &str, timeout_ms: u32) -> Result<PostReply, EspError> {
        let mut conn = EspHttpConnection::new(&HttpConfiguration {
            timeout: Some(core::time::Duration::from_millis(u64::from(timeout_ms))),
            ..Default::default()
        })?;

        let len = body.len().to_string();
        let headers = [("Content-Type", "application/json"), ("Content-Length", len.as_str())];
        conn.initiate_request(Method::Post, &self.endpoint, &headers)?;

        let bytes = body.as_bytes();
        let mut written = 0;
        while written < bytes.len() {
            written += conn.write(&bytes[written..])?;
        }

        conn.initiate_response()?;
        let status = conn.status();

        let mut buf = [0u8; REPLY_CAP];
        let n = conn.read(&mut buf)?;
        let body = core::str::from_utf8(&buf[..n]).ok().map(str::to_owned);

        Ok(PostReply {
            code: i32::from(status),
            body,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim(&mut self) -> &mut SimLink {
        &mut self.sim
    }
}

// ───────────────────────────────────────────────────────────────
// NetworkPort
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl NetworkPort for WifiNetwork {
    fn is_connected(&mut self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    fn post_json(&mut self, body: &str, timeout_ms: u32) -> PostReply {
        match self.try_post(body, timeout_ms) {
            Ok(reply) => reply,
            Err(e) => {
                warn!("HTTP: POST {} failed: {}", self.endpoint, e);
                PostReply::failed(-e.code().abs())
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl NetworkPort for WifiNetwork {
    fn is_connected(&mut self) -> bool {
        self.sim.connected
    }

    fn post_json(&mut self, body: &str, _timeout_ms: u32) -> PostReply {
        if !self.sim.connected {
            return PostReply::failed(-1);
        }
        self.sim.posted.push(body.to_owned());
        self.sim.reply.clone()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
