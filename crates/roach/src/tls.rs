//! OpenSSL connector for TLS-enabled clusters.

use openssl::ssl::{SslConnector, SslFiletype, SslMethod, SslVerifyMode};
use postgres_openssl::MakeTlsConnector;
use roach_config::{SslConfig, SslMode};

#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("must provide both sslcert and sslkey, but only provided {0}")]
    IncompleteClientCert(&'static str),

    #[error("{path}: {source}")]
    File {
        path: String,
        source: openssl::error::ErrorStack,
    },

    #[error(transparent)]
    OpenSsl(#[from] openssl::error::ErrorStack),
}

/// Build a TLS connector for the given settings.
///
/// `require` encrypts without checking the server certificate unless a root
/// certificate is configured, `verify-ca` checks the chain but not the host
/// name, `verify-full` checks both.
pub fn make_tls(ssl: &SslConfig) -> Result<MakeTlsConnector, TlsError> {
    let mut builder = SslConnector::builder(SslMethod::tls_client())?;

    let (verify_mode, verify_hostname) = match ssl.mode {
        SslMode::Disable => (SslVerifyMode::NONE, false),
        SslMode::Require => match ssl.rootcert {
            Some(_) => (SslVerifyMode::PEER, false),
            None => (SslVerifyMode::NONE, false),
        },
        SslMode::VerifyCa => (SslVerifyMode::PEER, false),
        SslMode::VerifyFull => (SslVerifyMode::PEER, true),
    };
    builder.set_verify(verify_mode);

    match (&ssl.cert, &ssl.key) {
        (Some(cert), Some(key)) => {
            builder
                .set_certificate_file(cert, SslFiletype::PEM)
                .map_err(|source| file_error(cert, source))?;
            builder
                .set_private_key_file(key, SslFiletype::PEM)
                .map_err(|source| file_error(key, source))?;
        }
        (None, Some(_)) => return Err(TlsError::IncompleteClientCert("sslkey")),
        (Some(_), None) => return Err(TlsError::IncompleteClientCert("sslcert")),
        (None, None) => {}
    }
    if let Some(rootcert) = &ssl.rootcert {
        builder
            .set_ca_file(rootcert)
            .map_err(|source| file_error(rootcert, source))?;
    }

    let mut connector = MakeTlsConnector::new(builder.build());
    if verify_mode == SslVerifyMode::PEER && !verify_hostname {
        connector.set_callback(|connect, _| {
            connect.set_verify_hostname(false);
            Ok(())
        });
    }

    Ok(connector)
}

fn file_error(path: &str, source: openssl::error::ErrorStack) -> TlsError {
    TlsError::File {
        path: path.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ssl(mode: SslMode) -> SslConfig {
        SslConfig {
            mode,
            rootcert: None,
            cert: None,
            key: None,
        }
    }

    #[test]
    fn require_without_files() {
        assert!(make_tls(&ssl(SslMode::Require)).is_ok());
    }

    #[test]
    fn client_key_needs_cert() {
        let mut config = ssl(SslMode::VerifyFull);
        config.key = Some("/nonexistent/client.key".into());
        let err = make_tls(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "must provide both sslcert and sslkey, but only provided sslkey"
        );
    }

    #[test]
    fn missing_root_cert_names_the_file() {
        let mut config = ssl(SslMode::VerifyCa);
        config.rootcert = Some("/nonexistent/ca.crt".into());
        let err = make_tls(&config).unwrap_err();
        assert!(err.to_string().starts_with("/nonexistent/ca.crt: "));
    }
}
