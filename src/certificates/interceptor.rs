// Chain Interceptor - Certificate verifier that records the presented chain instead of judging it
//
// Installed through rustls' dangerous() API. Trust, hostname and validity are
// never checked: observing what a server presents is the whole point.

use crate::certificates::parser::Certificate;
use crate::error::HarvestError;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{CertificateError, DigitallySignedStruct, SignatureScheme};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// What the interceptor saw during one handshake
#[derive(Debug, Default)]
pub struct CapturedChain {
    /// Certificates parsed so far, leaf first
    pub certificates: Vec<Certificate>,
    /// First parse failure; parsing stopped there
    pub failure: Option<HarvestError>,
}

/// Verifier owned by exactly one probe
///
/// The mutex only exists because rustls requires verifiers to be `Sync`;
/// no other probe ever holds a reference to it.
#[derive(Debug)]
pub struct ChainInterceptor {
    schemes: Vec<SignatureScheme>,
    captured: Mutex<CapturedChain>,
}

impl ChainInterceptor {
    /// Create an interceptor advertising every scheme the provider can verify
    pub fn new(provider: &CryptoProvider) -> Self {
        Self {
            schemes: provider
                .signature_verification_algorithms
                .supported_schemes(),
            captured: Mutex::new(CapturedChain::default()),
        }
    }

    /// Parse a presented chain in order, stopping at the first malformed entry
    ///
    /// Replaces whatever an earlier handshake on this interceptor recorded.
    pub fn observe<'a, I>(&self, presented: I) -> Result<(), CertificateError>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut capture = CapturedChain::default();
        let mut outcome = Ok(());

        for (index, der) in presented.into_iter().enumerate() {
            match Certificate::from_der(der) {
                Ok(cert) => capture.certificates.push(cert),
                Err(e) => {
                    debug!("Certificate {} failed to parse: {}", index, e);
                    capture.failure = Some(HarvestError::CertificateParse {
                        index,
                        details: e.to_string(),
                    });
                    outcome = Err(CertificateError::BadEncoding);
                    break;
                }
            }
        }

        *self.captured.lock().unwrap_or_else(PoisonError::into_inner) = capture;
        outcome
    }

    /// Take the recorded chain, leaving an empty capture behind
    pub fn take(&self) -> CapturedChain {
        std::mem::take(&mut *self.captured.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl ServerCertVerifier for ChainInterceptor {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        let presented = std::iter::once(end_entity)
            .chain(intermediates)
            .map(|der| der.as_ref());

        // A malformed certificate aborts the handshake; the probe reports the
        // recorded parse failure rather than the resulting TLS alert.
        self.observe(presented)
            .map_err(rustls::Error::InvalidCertificate)?;

        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.schemes.clone()
    }
}
