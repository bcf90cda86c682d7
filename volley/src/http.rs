//! A [`Probe`] backed by `reqwest`.
use reqwest::{Client, Method};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use volley_core::{Headers, Probe, ProbeError, ProbeResponse, TargetDescriptor};

/// Issues each descriptor as a plain HTTP request.
///
/// The client is reused across invocations, so one probe should be shared by every
/// worker of a run.
#[derive(Clone, Debug, Default)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::new(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Probe for HttpProbe {
    fn invoke(
        &self,
        request: &TargetDescriptor,
    ) -> impl Future<Output = Result<ProbeResponse, ProbeError>> + Send {
        async move {
            let method = Method::from_bytes(request.method.as_bytes())
                .map_err(|_| ProbeError::new(format!("invalid method {:?}", request.method)))?;

            let mut builder = self.client.request(method, &request.target);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            let start = Instant::now();
            let res = builder
                .send()
                .await
                .map_err(|e| ProbeError::new(e.to_string()))?;

            let status = res.status().as_u16();
            let headers: Headers = res
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = res.text().await.map_err(|e| ProbeError::new(e.to_string()))?;

            Ok(ProbeResponse {
                status,
                body,
                headers,
                latency: start.elapsed(),
            })
        }
    }
}
