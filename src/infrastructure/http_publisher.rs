//! 通过 HTTP 把实体投递给下游的发布端

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::infrastructure::publisher::{Channel, Envelope, Message, Publisher};

/// `POST {base_url}/{channel}`，请求体为 `{key, payload}` 信封（批量时为数组）
pub struct HttpPublisher {
    client: Client,
    base_url: String,
}

impl HttpPublisher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("无法创建 HTTP 客户端: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, channel: Channel) -> String {
        format!("{}/{}", self.base_url, channel.name())
    }

    async fn post<B: Serialize + ?Sized>(&self, channel: Channel, body: &B) -> AppResult<()> {
        let url = self.endpoint(channel);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::publish_failed(channel.name(), e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::publish_failed(
                channel.name(),
                format!("HTTP {}: {}", status, text),
            ));
        }
        Ok(())
    }
}

impl Publisher for HttpPublisher {
    async fn publish<M: Message + Sync>(&self, message: &M) -> AppResult<()> {
        debug!("发布到 {}: {}", M::CHANNEL, message.key());
        self.post(M::CHANNEL, &Envelope::wrap(message)).await
    }

    async fn publish_batch<M: Message + Sync>(&self, messages: &[M]) -> AppResult<()> {
        if messages.is_empty() {
            return Ok(());
        }
        debug!("批量发布到 {}: {} 条", M::CHANNEL, messages.len());
        let envelopes: Vec<Envelope<'_, M>> = messages.iter().map(Envelope::wrap).collect();
        self.post(M::CHANNEL, &envelopes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Source, University};
    use serde_json::{json, Value as JsonValue};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn university(id: u32) -> University {
        University {
            id,
            title: "Тестовый университет".to_string(),
            source: Source::Gosuslugi,
            url: format!("https://www.gosuslugi.ru/vuznavigator/universities/{}", id),
        }
    }

    async fn server_responding(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/publish/universities"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn single_message_is_posted_as_envelope() {
        let server = server_responding(200).await;
        let publisher = HttpPublisher::new(format!("{}/publish", server.uri()), Duration::from_secs(5)).unwrap();

        publisher.publish(&university(43)).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: JsonValue = requests[0].body_json().unwrap();
        assert_eq!(body["key"], "43");
        assert_eq!(body["payload"]["id"], 43);
        assert_eq!(body["payload"]["source"], "GOSUSLUGI");
    }

    #[tokio::test]
    async fn batch_is_posted_as_array_of_envelopes() {
        let server = server_responding(204).await;
        let publisher = HttpPublisher::new(format!("{}/publish", server.uri()), Duration::from_secs(5)).unwrap();

        publisher.publish_batch(&[university(1), university(2)]).await.unwrap();
        publisher.publish_batch::<University>(&[]).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: JsonValue = requests[0].body_json().unwrap();
        let keys: Vec<&JsonValue> = body.as_array().unwrap().iter().map(|e| &e["key"]).collect();
        assert_eq!(keys, vec![&json!("1"), &json!("2")]);
    }

    #[tokio::test]
    async fn non_success_status_is_a_publish_error() {
        let server = server_responding(503).await;
        let publisher = HttpPublisher::new(format!("{}/publish", server.uri()), Duration::from_secs(5)).unwrap();

        let err = publisher.publish(&university(43)).await.unwrap_err();

        assert!(matches!(err, AppError::Publish { ref channel, .. } if channel == "universities"));
        assert!(err.to_string().contains("503"));
        assert!(err.is_infrastructure());
    }

    #[tokio::test]
    async fn unreachable_sink_is_a_publish_error() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let publisher =
            HttpPublisher::new(format!("http://127.0.0.1:{}/publish", port), Duration::from_secs(2)).unwrap();

        let err = publisher.publish(&university(43)).await.unwrap_err();

        assert!(matches!(err, AppError::Publish { .. }));
    }

    #[test]
    fn endpoint_joins_base_and_channel() {
        let publisher = HttpPublisher::new("http://queue.local/publish/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            publisher.endpoint(Channel::Applicants),
            "http://queue.local/publish/applicants"
        );
    }
}
