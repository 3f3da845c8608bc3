// Certificate Parser - Turn DER bytes presented by a peer into owned certificates

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use x509_parser::error::X509Error;
use x509_parser::nom;
use x509_parser::prelude::*;

/// One parsed X.509 certificate, owned by the result that contains it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub subject: String,
    pub issuer: String,
    pub serial_number: String,
    pub not_before: String,
    pub not_after: String,
    pub signature_algorithm: String,
    pub san: Vec<String>, // Subject Alternative Names (DNS names and IP addresses)
    pub is_ca: bool,
    pub fingerprint_sha256: String, // Colon-separated uppercase hex of the DER encoding
    #[serde(skip)]
    pub der_bytes: Vec<u8>,
}

/// Error returned by the DER parser
pub type ParseError = nom::Err<X509Error>;

impl Certificate {
    /// Parse a single certificate from DER bytes
    pub fn from_der(der_bytes: &[u8]) -> Result<Self, ParseError> {
        let (_, cert) = X509Certificate::from_der(der_bytes)?;

        let mut san = Vec::new();
        if let Ok(Some(ext)) = cert.subject_alternative_name() {
            for name in &ext.value.general_names {
                match name {
                    GeneralName::DNSName(dns) => san.push(dns.to_string()),
                    GeneralName::IPAddress(ip) => san.push(format!("IP:{}", format_ip(ip))),
                    _ => {}
                }
            }
        }

        let is_ca = cert
            .basic_constraints()
            .map(|bc| bc.map(|ext| ext.value.ca).unwrap_or(false))
            .unwrap_or(false);

        Ok(Self {
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            serial_number: cert.raw_serial_as_string(),
            not_before: cert.validity().not_before.to_string(),
            not_after: cert.validity().not_after.to_string(),
            signature_algorithm: cert.signature_algorithm.algorithm.to_id_string(),
            san,
            is_ca,
            fingerprint_sha256: fingerprint_sha256(der_bytes),
            der_bytes: der_bytes.to_vec(),
        })
    }

    /// Whether subject and issuer are the same name
    pub fn is_self_issued(&self) -> bool {
        self.subject == self.issuer
    }
}

/// SHA256 of the DER encoding, formatted like "44:69:4E:E4:..."
pub fn fingerprint_sha256(der_bytes: &[u8]) -> String {
    Sha256::digest(der_bytes)
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

fn format_ip(raw: &[u8]) -> String {
    match raw.len() {
        4 => {
            let octets: [u8; 4] = [raw[0], raw[1], raw[2], raw[3]];
            IpAddr::V4(Ipv4Addr::from(octets)).to_string()
        }
        16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(raw);
            IpAddr::V6(Ipv6Addr::from(octets)).to_string()
        }
        _ => hex::encode(raw),
    }
}
