//! Command-line collaborators for address and geo lookups

use std::net::IpAddr;
use std::process::Command;

use tracing::debug;

use super::{AddressSource, GeoLookup};
use crate::error::{Result, WeatherError};

/// Public address probe backed by an external command such as `dig`
#[derive(Debug, Clone)]
pub struct CommandAddressSource {
    name: &'static str,
    program: String,
    args: Vec<String>,
}

impl CommandAddressSource {
    pub fn new(name: &'static str, program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            name,
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// OpenDNS `myip` A record
    pub fn opendns() -> Self {
        Self::new(
            "opendns",
            "dig",
            &["+short", "myip.opendns.com", "@resolver1.opendns.com"],
        )
    }

    /// Google `o-o.myaddr` TXT record, answered with a quoted address
    pub fn google_txt() -> Self {
        Self::new(
            "google",
            "dig",
            &["TXT", "+short", "o-o.myaddr.l.google.com", "@ns1.google.com"],
        )
    }
}

impl AddressSource for CommandAddressSource {
    fn name(&self) -> &str {
        self.name
    }

    fn public_address(&self) -> Option<String> {
        let output = Command::new(&self.program).args(&self.args).output();
        match output {
            Ok(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                parse_address(&stdout)
            }
            Ok(output) => {
                debug!(source = self.name, status = %output.status, "Address probe exited unsuccessfully");
                None
            }
            Err(e) => {
                debug!(source = self.name, error = %e, "Address probe could not run");
                None
            }
        }
    }
}

/// First line of probe output as an IP address, quotes stripped
pub fn parse_address(output: &str) -> Option<String> {
    let line = output.lines().map(str::trim).find(|l| !l.is_empty())?;
    let candidate = line.trim_matches('"');
    candidate
        .parse::<IpAddr>()
        .ok()
        .map(|ip| ip.to_string())
}

/// `geoiplookup` with the city database installed
#[derive(Debug, Clone)]
pub struct GeoIpCommand {
    program: String,
}

impl GeoIpCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GeoIpCommand {
    fn default() -> Self {
        Self::new("geoiplookup")
    }
}

impl GeoLookup for GeoIpCommand {
    fn lookup(&self, address: &str) -> Result<String> {
        let output = Command::new(&self.program)
            .arg(address)
            .output()
            .map_err(|e| WeatherError::location(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(WeatherError::location(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| WeatherError::location(format!("{} output is not UTF-8", self.program)))
    }
}
