use std::time::Duration;

use rdkafka::{admin::AdminClient, client::DefaultClientContext, ClientConfig};

use super::errors::{ClientError, ClientResult};
use super::{AdminConnector, TopicMetadata};

/// [`AdminConnector`] that allocates a short-lived [`AdminClient`] for every request.
///
/// The client is dropped (and its connections closed) when the request returns,
/// on success as well as on failure.
pub struct KafkaAdminConnector {
    admin_client_config: ClientConfig,
}

impl KafkaAdminConnector {
    /// Create a new [`KafkaAdminConnector`]
    ///
    /// # Arguments
    ///
    /// * `admin_client_config` - Kafka admin client configuration (brokers, security, ...)
    pub fn new(admin_client_config: ClientConfig) -> Self {
        Self {
            admin_client_config,
        }
    }
}

impl AdminConnector for KafkaAdminConnector {
    fn fetch_topic_metadata(
        &self,
        topic: &str,
        timeout: Duration,
    ) -> ClientResult<Option<TopicMetadata>> {
        let admin_client: AdminClient<DefaultClientContext> =
            self.admin_client_config.create().map_err(ClientError::Creation)?;

        let metadata = admin_client.inner().fetch_metadata(Some(topic), timeout)?;

        let topic_metadata = metadata
            .topics()
            .iter()
            .filter(|mt| mt.name() == topic)
            .find(|mt| match mt.error() {
                None => true,
                Some(e) => {
                    debug!("Metadata of Topic '{topic}' reports error: {:?}", e);
                    false
                },
            })
            .map(|mt| TopicMetadata {
                name: mt.name().to_owned(),
                partitions: mt.partitions().iter().map(|p| p.id() as u32).collect(),
            });

        trace!("Fetched:\n{:#?}", topic_metadata);
        Ok(topic_metadata)
    }
}
