use std::{str::FromStr, sync::Arc};

use hyper::Uri;
use hyper_util::{client::legacy::connect::HttpConnector, rt::TokioExecutor};
use tokio_rustls::rustls::{crypto::aws_lc_rs, ClientConfig, RootCertStore};

use crate::error::StdError;

/// Type alias for internal channel type
pub type ChannelType = hyper_util::client::legacy::Client<
    hyper_rustls::HttpsConnector<HttpConnector>,
    tonic::body::BoxBody,
>;

/// Which certificates to trust when talking to the backend.
#[derive(Debug, Default)]
pub enum TlsTrust {
    /// The Mozilla root program, as bundled by `webpki-roots`
    #[default]
    WebPkiRoots,
    /// Your own roots, for example a private CA in front of a proxy
    Roots(RootCertStore),
}

impl TlsTrust {
    fn into_root_store(self) -> RootCertStore {
        match self {
            TlsTrust::WebPkiRoots => RootCertStore {
                roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
            },
            TlsTrust::Roots(roots) => roots,
        }
    }
}

/// Build an HTTP/2 grpc channel to `endpoint` and hand it to a generated client's `with_origin`.
///
/// ```
/// # use gearmetrics::downstream::{get_client, TlsTrust};
/// # use gearmetrics::proto::monitoring::metric_service_client::MetricServiceClient;
/// let client = get_client(
///     "https://monitoring.googleapis.com",
///     TlsTrust::WebPkiRoots,
///     MetricServiceClient::with_origin,
/// );
/// assert!(client.is_ok());
/// ```
pub fn get_client<WithOrigin, U>(
    endpoint: &str,
    tls_trust: TlsTrust,
    with_origin: WithOrigin,
) -> Result<U, StdError>
where
    WithOrigin: FnOnce(ChannelType, Uri) -> U,
{
    let uri = Uri::from_str(endpoint)?;
    let tls = ClientConfig::builder_with_provider(Arc::new(aws_lc_rs::default_provider()))
        .with_safe_default_protocol_versions()?
        .with_root_certificates(tls_trust.into_root_store())
        .with_no_client_auth();

    let mut http_connector = HttpConnector::new();
    http_connector.enforce_http(false);
    let https_connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_tls_config(tls)
        .https_or_http()
        .enable_http2()
        .wrap_connector(http_connector);

    let https_client = hyper_util::client::legacy::Client::builder(TokioExecutor::new())
        .http2_only(true)
        .build(https_connector);

    // `with_origin` lets the client set the scheme and authority from the endpoint
    Ok(with_origin(https_client, uri))
}
