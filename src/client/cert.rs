// File: ./src/client/cert.rs
// TLS configuration for the API connector
use crate::client::error::ApiError;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds the rustls config. With `insecure` the certificate chain is not
/// checked (self-hosted servers with self-signed certs), but handshake
/// signatures still are. Plain-http endpoints tolerate an empty root store.
pub fn tls_config(insecure: bool, https: bool) -> Result<ClientConfig, ApiError> {
    let builder = ClientConfig::builder();

    if insecure {
        warn!("Certificate verification disabled for API connections");
        let provider = builder.crypto_provider().clone();
        return Ok(builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(SkipChainVerification { provider }))
            .with_no_client_auth());
    }

    let mut roots = RootCertStore::empty();
    let native = rustls_native_certs::load_native_certs();
    for err in &native.errors {
        warn!("Could not load a system certificate: {}", err);
    }
    let (added, ignored) = roots.add_parsable_certificates(native.certs);
    debug!("Loaded {} system certificates ({} ignored)", added, ignored);

    if roots.is_empty() && https {
        return Err(ApiError::Tls("No valid system certificates found.".to_string()));
    }

    Ok(builder.with_root_certificates(roots).with_no_client_auth())
}

#[derive(Debug)]
struct SkipChainVerification {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for SkipChainVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
