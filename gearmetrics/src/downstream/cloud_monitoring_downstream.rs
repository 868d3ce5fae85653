use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue};

use crate::{
    error::{PushError, StdError},
    proto::monitoring::{metric_service_client::MetricServiceClient, CreateTimeSeriesRequest},
};

use super::{get_client, ChannelType, Downstream, TlsTrust};

/// Where Cloud Monitoring accepts grpc writes.
pub const CLOUD_MONITORING_ENDPOINT: &str = "https://monitoring.googleapis.com";

/// A downstream that writes time series to Cloud Monitoring.
///
/// Authentication is up to you: pass whatever header your credentials need,
/// usually `authorization: Bearer <token>`.
pub struct CloudMonitoringDownstream<TChannel> {
    client: MetricServiceClient<TChannel>,
    header: Option<(AsciiMetadataKey, AsciiMetadataValue)>,
}

impl CloudMonitoringDownstream<ChannelType> {
    /// Connect to the public Cloud Monitoring endpoint, authenticating with a bearer token.
    pub fn connect(bearer_token: Option<&str>) -> Result<Self, StdError> {
        Self::connect_to(CLOUD_MONITORING_ENDPOINT, TlsTrust::WebPkiRoots, bearer_token)
    }

    /// Connect to a specific endpoint.
    pub fn connect_to(
        endpoint: &str,
        tls_trust: TlsTrust,
        bearer_token: Option<&str>,
    ) -> Result<Self, StdError> {
        let client = get_client(endpoint, tls_trust, MetricServiceClient::with_origin)?;
        let header = match bearer_token {
            Some(token) => Some((
                AsciiMetadataKey::from_static("authorization"),
                format!("Bearer {token}").parse::<AsciiMetadataValue>()?,
            )),
            None => None,
        };
        Ok(Self::new(client, header))
    }
}

impl<TChannel> CloudMonitoringDownstream<TChannel> {
    /// Create a new sender from a grpc client, with an optional header sent on every request
    pub fn new(
        client: MetricServiceClient<TChannel>,
        header: Option<(AsciiMetadataKey, AsciiMetadataValue)>,
    ) -> Self {
        Self { client, header }
    }

    fn request<T>(&self, request: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(request);
        if let Some((header, value)) = self.header.as_ref() {
            request.metadata_mut().insert(header.clone(), value.clone());
        }
        request
    }
}

impl<TChannel> Downstream<CreateTimeSeriesRequest> for CloudMonitoringDownstream<TChannel>
where
    TChannel: tonic::client::GrpcService<tonic::body::BoxBody>,
    TChannel::Error: Into<StdError>,
    TChannel::ResponseBody: http_body::Body<Data = bytes::Bytes> + Send + 'static,
    <TChannel::ResponseBody as http_body::Body>::Error: Into<StdError> + Send,
{
    async fn send(&mut self, batch: CreateTimeSeriesRequest) -> Result<(), PushError> {
        let series = batch.time_series.len();
        let request = self.request(batch);
        match self.client.create_time_series(request).await {
            Ok(_) => {
                log::debug!("wrote {series} time series");
                Ok(())
            }
            Err(status) => {
                if !status.metadata().is_empty() {
                    log::error!(
                        "failed to write time series: {status}. Metadata: {:?}",
                        status.metadata()
                    );
                }
                Err(status.into())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{
        downstream::{Downstream, TlsTrust},
        error::PushError,
        proto::monitoring::CreateTimeSeriesRequest,
    };

    use super::CloudMonitoringDownstream;

    #[test_log::test(tokio::test)]
    async fn unreachable_backend_is_a_push_error() {
        let mut downstream = CloudMonitoringDownstream::connect_to(
            "http://127.0.0.1:1",
            TlsTrust::WebPkiRoots,
            Some("token"),
        )
        .expect("the endpoint parses");

        let result = downstream
            .send(CreateTimeSeriesRequest {
                name: "projects/test".to_string(),
                time_series: vec![],
            })
            .await;

        assert!(matches!(result, Err(PushError::Rejected(_))), "{result:?}");
    }

    #[test_log::test]
    fn bearer_token_must_be_a_header_value() {
        let downstream = CloudMonitoringDownstream::connect_to(
            "http://127.0.0.1:1",
            TlsTrust::default(),
            Some("bad\ntoken"),
        );
        assert!(downstream.is_err());
    }
}
