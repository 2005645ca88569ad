//!
//! Process configuration for the peer and the role gateways
//!
//! Every value is taken from the command line first, then from the
//! environment, then (gateways only) from a TOML file, then from a default.
//!

use ruc::*;
use serde::Deserialize;
use std::{fmt, fs, path::Path, str::FromStr};

pub const DEFAULT_PEER_HOST: &str = "0.0.0.0";
pub const DEFAULT_PEER_PORT: u16 = 8669;
pub const DEFAULT_PEER_ENDPOINT: &str = "http://localhost:8669";
pub const DEFAULT_CHANNEL: &str = "mychannel";
pub const DEFAULT_CHAINCODE: &str = "toma-trace";

/// The supply-chain stage a gateway serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Wholesaler,
    Retailer,
}

impl Default for Role {
    fn default() -> Self {
        Role::Farmer
    }
}

impl Role {
    pub fn default_port(self) -> u16 {
        match self {
            Role::Farmer => 3000,
            Role::Wholesaler => 3001,
            Role::Retailer => 3002,
        }
    }

    pub fn default_msp_id(self) -> &'static str {
        match self {
            Role::Farmer => "Org1MSP",
            Role::Wholesaler => "Org2MSP",
            Role::Retailer => "Org3MSP",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Wholesaler => "wholesaler",
            Role::Retailer => "retailer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Box<dyn RucError>;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "farmer" | "org1" => Ok(Role::Farmer),
            "wholesaler" | "org2" => Ok(Role::Wholesaler),
            "retailer" | "org3" => Ok(Role::Retailer),
            _ => Err(eg!(format!("unknown role: {}", s))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeerConfig {
    pub host: String,
    pub port: u16,
    /// Sled directory; the world state lives in memory when unset.
    pub ledger_dir: Option<String>,
    /// Seed the sample assets at start-up.
    pub init_ledger: bool,
}

impl Default for PeerConfig {
    fn default() -> Self {
        PeerConfig {
            host: DEFAULT_PEER_HOST.to_owned(),
            port: DEFAULT_PEER_PORT,
            ledger_dir: None,
            init_ledger: false,
        }
    }
}

/// Where a gateway sends its invocations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    /// A `traced` peer reached over HTTP.
    Remote(String),
    /// A host embedded in the gateway process, in memory.
    Memory,
    /// A host embedded in the gateway process, on disk.
    Sled(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    pub role: Role,
    pub host: String,
    pub port: u16,
    pub msp_id: String,
    pub cert_path: Option<String>,
    pub channel: String,
    pub chaincode: String,
    pub backend: Backend,
}

impl GatewayConfig {
    pub fn for_role(role: Role) -> Self {
        GatewayConfig {
            role,
            host: DEFAULT_PEER_HOST.to_owned(),
            port: role.default_port(),
            msp_id: role.default_msp_id().to_owned(),
            cert_path: None,
            channel: DEFAULT_CHANNEL.to_owned(),
            chaincode: DEFAULT_CHAINCODE.to_owned(),
            backend: Backend::Remote(DEFAULT_PEER_ENDPOINT.to_owned()),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig::for_role(Role::default())
    }
}

/// One source of gateway settings; unset keys fall through to the next source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GatewayLayer {
    pub role: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    pub peer_endpoint: Option<String>,
    pub msp_id: Option<String>,
    pub cert_path: Option<String>,
    pub channel: Option<String>,
    pub chaincode: Option<String>,
    pub ledger_dir: Option<String>,
    pub local: Option<bool>,
}

impl GatewayLayer {
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).c(d!())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).c(d!())?;
        Self::from_toml(&contents).c(d!(format!("{}", path.display())))
    }

    /// Reads the `GATEWAY_*` style variables through `var`.
    pub fn from_env_with(var: impl Fn(&str) -> Option<String>) -> Self {
        GatewayLayer {
            role: var("GATEWAY_ROLE"),
            host: var("GATEWAY_HOST"),
            port: var("GATEWAY_PORT"),
            peer_endpoint: var("PEER_ENDPOINT"),
            msp_id: var("MSP_ID"),
            cert_path: var("CERT_PATH"),
            channel: var("CHANNEL_NAME"),
            chaincode: var("CHAINCODE_NAME"),
            ledger_dir: var("GATEWAY_LEDGER_DIR"),
            local: var("GATEWAY_LOCAL").map(|v| flag(&v)),
        }
    }
}

fn first<T: Clone>(
    layers: &[&GatewayLayer],
    pick: impl Fn(&GatewayLayer) -> &Option<T>,
) -> Option<T> {
    layers.iter().find_map(|l| pick(l).clone())
}

/// Merges `layers`, highest precedence first, over the role defaults.
pub fn resolve(layers: &[&GatewayLayer]) -> Result<GatewayConfig> {
    let role = match first(layers, |l| &l.role) {
        Some(r) => r.parse::<Role>().c(d!())?,
        None => Role::default(),
    };
    let mut cfg = GatewayConfig::for_role(role);

    if let Some(host) = first(layers, |l| &l.host) {
        cfg.host = host;
    }
    if let Some(port) = first(layers, |l| &l.port) {
        cfg.port = port.parse::<u16>().c(d!(format!("invalid port: {}", port)))?;
    }
    if let Some(msp_id) = first(layers, |l| &l.msp_id) {
        cfg.msp_id = msp_id;
    }
    cfg.cert_path = first(layers, |l| &l.cert_path);
    if let Some(channel) = first(layers, |l| &l.channel) {
        cfg.channel = channel;
    }
    if let Some(chaincode) = first(layers, |l| &l.chaincode) {
        cfg.chaincode = chaincode;
    }

    cfg.backend = match (
        first(layers, |l| &l.ledger_dir),
        first(layers, |l| &l.local).unwrap_or(false),
    ) {
        (Some(dir), _) => Backend::Sled(dir),
        (None, true) => Backend::Memory,
        (None, false) => Backend::Remote(
            first(layers, |l| &l.peer_endpoint)
                .unwrap_or_else(|| DEFAULT_PEER_ENDPOINT.to_owned()),
        ),
    };

    Ok(cfg)
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

// "0" and "false" switch a flag variable off, anything else on.
fn flag(value: &str) -> bool {
    value != "0" && !value.eq_ignore_ascii_case("false")
}

pub mod peer_cfg {
    use super::PeerConfig;
    #[cfg(not(test))]
    use super::{env_var, flag, DEFAULT_PEER_HOST, DEFAULT_PEER_PORT};
    #[cfg(not(test))]
    use clap::{crate_authors, App};
    use lazy_static::lazy_static;
    use ruc::*;

    lazy_static! {
        /// Configuration of the running `traced` process.
        pub static ref CFG: PeerConfig = pnk!(get_config());
    }

    #[cfg(test)]
    fn get_config() -> Result<PeerConfig> {
        Ok(PeerConfig::default())
    }

    #[cfg(not(test))]
    fn get_config() -> Result<PeerConfig> {
        let m = App::new("traced")
            .version(env!("CARGO_PKG_VERSION"))
            .author(crate_authors!())
            .about("Ledger host serving the toma-trace asset contract.")
            .arg_from_usage("--host=[IP] 'listening address of the peer API'")
            .arg_from_usage("--port=[Port] 'listening port of the peer API'")
            .arg_from_usage("-d, --ledger-dir=[Path] 'keep the world state in a sled database here'")
            .arg_from_usage("--init-ledger 'seed the sample assets on start-up'")
            .get_matches();

        let host = m
            .value_of("host")
            .map(|v| v.to_owned())
            .or_else(|| env_var("PEER_HOST"))
            .unwrap_or_else(|| DEFAULT_PEER_HOST.to_owned());
        let port = match m
            .value_of("port")
            .map(|v| v.to_owned())
            .or_else(|| env_var("PEER_PORT"))
        {
            Some(p) => p.parse::<u16>().c(d!())?,
            None => DEFAULT_PEER_PORT,
        };
        let ledger_dir = m
            .value_of("ledger-dir")
            .map(|v| v.to_owned())
            .or_else(|| env_var("LEDGER_DIR"));
        let init_ledger = m.is_present("init-ledger")
            || env_var("INIT_LEDGER").map(|v| flag(&v)).unwrap_or(false);

        Ok(PeerConfig {
            host,
            port,
            ledger_dir,
            init_ledger,
        })
    }
}

pub mod gateway_cfg {
    use super::GatewayConfig;
    #[cfg(not(test))]
    use super::{env_var, resolve, GatewayLayer};
    #[cfg(not(test))]
    use clap::{crate_authors, App};
    use lazy_static::lazy_static;
    use ruc::*;
    #[cfg(not(test))]
    use std::path::Path;

    lazy_static! {
        /// Configuration of the running gateway process.
        pub static ref CFG: GatewayConfig = pnk!(get_config());
    }

    #[cfg(test)]
    fn get_config() -> Result<GatewayConfig> {
        Ok(GatewayConfig::default())
    }

    #[cfg(not(test))]
    fn get_config() -> Result<GatewayConfig> {
        let m = App::new("trace-gateway")
            .version(env!("CARGO_PKG_VERSION"))
            .author(crate_authors!())
            .about("REST gateway for one toma-trace organization.")
            .arg_from_usage("-r, --role=[Role] 'farmer, wholesaler or retailer'")
            .arg_from_usage("-c, --config=[Path] 'TOML file with gateway settings'")
            .arg_from_usage("--host=[IP] 'listening address'")
            .arg_from_usage("--port=[Port] 'listening port, defaults by role'")
            .arg_from_usage("--peer-endpoint=[URL] 'base URL of the traced peer API'")
            .arg_from_usage("--msp-id=[MSPID] 'organization the gateway acts for'")
            .arg_from_usage("--cert-path=[Path] 'PEM certificate of the gateway identity'")
            .arg_from_usage("--channel=[Name]")
            .arg_from_usage("--chaincode=[Name]")
            .arg_from_usage("-d, --ledger-dir=[Path] 'embed a ledger host persisted here'")
            .arg_from_usage("--local 'embed an in-memory ledger host'")
            .get_matches();

        let opt = |k: &str| m.value_of(k).map(|v| v.to_owned());
        let cli = GatewayLayer {
            role: opt("role"),
            host: opt("host"),
            port: opt("port"),
            peer_endpoint: opt("peer-endpoint"),
            msp_id: opt("msp-id"),
            cert_path: opt("cert-path"),
            channel: opt("channel"),
            chaincode: opt("chaincode"),
            ledger_dir: opt("ledger-dir"),
            local: if m.is_present("local") { Some(true) } else { None },
        };
        let env = GatewayLayer::from_env_with(env_var);
        let file = match opt("config").or_else(|| env_var("GATEWAY_CONFIG")) {
            Some(path) => GatewayLayer::from_file(Path::new(&path)).c(d!())?,
            None => GatewayLayer::default(),
        };

        resolve(&[&cli, &env, &file]).c(d!())
    }
}
