//!
//! Client identity presented to the ledger host
//!

use ruc::*;
use std::{fs, path::Path};

const PEM_CERT_HEADER: &str = "-----BEGIN CERTIFICATE-----";

/// The organization a gateway acts for, optionally backed by a PEM certificate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity {
    pub msp_id: String,
    pub certificate: Option<String>,
}

impl Identity {
    pub fn new(msp_id: &str) -> Self {
        Identity {
            msp_id: msp_id.to_owned(),
            certificate: None,
        }
    }

    /// Reads the signing certificate at `cert_path` when one is configured.
    pub fn load(msp_id: &str, cert_path: Option<&str>) -> Result<Self> {
        if msp_id.is_empty() {
            return Err(eg!("MSP id must not be empty"));
        }
        let certificate = match cert_path {
            Some(path) => Some(
                read_certificate(Path::new(path))
                    .c(d!(format!("certificate {}", path)))?,
            ),
            None => None,
        };
        Ok(Identity {
            msp_id: msp_id.to_owned(),
            certificate,
        })
    }
}

fn read_certificate(path: &Path) -> Result<String> {
    let pem = fs::read_to_string(path).c(d!())?;
    if !pem.contains(PEM_CERT_HEADER) {
        return Err(eg!("not a PEM certificate"));
    }
    Ok(pem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env::temp_dir, time::SystemTime};

    fn temp_file(body: &str) -> std::path::PathBuf {
        let time = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = temp_dir();
        path.push(format!("trace-cert-{}.pem", time));
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn load_identity() {
        let id = Identity::load("Org3MSP", None).unwrap();
        assert_eq!(id, Identity::new("Org3MSP"));
        assert!(Identity::load("", None).is_err());

        let pem = format!("{}\nMIIB\n-----END CERTIFICATE-----\n", PEM_CERT_HEADER);
        let path = temp_file(&pem);
        let id = Identity::load("Org1MSP", path.to_str()).unwrap();
        assert_eq!(id.certificate.as_deref(), Some(pem.as_str()));
        let _ = fs::remove_file(&path);

        let path = temp_file("garbage");
        assert!(Identity::load("Org1MSP", path.to_str()).is_err());
        let _ = fs::remove_file(&path);

        assert!(Identity::load("Org1MSP", Some("/nonexistent/cert.pem")).is_err());
    }
}
