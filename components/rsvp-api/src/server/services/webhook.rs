//! Best-effort announcement of RSVP submissions to outbound webhooks.

use std::{sync::Arc,
          time::Duration};

use async_trait::async_trait;
use chrono::{DateTime,
             Utc};
use futures::future;
use uuid::Uuid;

use rsvp_core::http_client::HttpClient;

use crate::{config::WebhookCfg,
            server::error::{Error,
                            Result}};

/// One guest's answer, as announced after a successful submission.
#[derive(Clone, Debug, Serialize)]
pub struct RsvpEvent {
    pub submission_id: Uuid,
    pub group_id:      Uuid,
    pub first_name:    Option<String>,
    pub last_name:     Option<String>,
    pub attending:     bool,
    pub dietary:       Option<String>,
    pub submitted_at:  DateTime<Utc>,
}

/// Handles hook deliveries
#[async_trait]
pub trait Hook: Send + Sync {
    async fn deliver(&self, event_data: &str) -> Result<()>;
}

/// A Webhook
#[derive(Clone)]
pub struct Webhook {
    pub endpoint: String,
    client:       HttpClient,
}

impl Webhook {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Webhook> {
        let client = HttpClient::new(HttpClient::json_headers(), timeout)?;
        Ok(Webhook { endpoint: endpoint.to_owned(),
                     client })
    }
}

#[async_trait]
impl Hook for Webhook {
    async fn deliver(&self, event_data: &str) -> Result<()> {
        debug!("Webhook push url = {}", self.endpoint);

        let resp = match self.client
                             .post(&self.endpoint)
                             .body(event_data.to_string())
                             .send()
                             .await
        {
            Ok(resp) => resp,
            Err(err) => {
                error!("Webhook delivery failed, err={}", err);
                return Err(Error::WebhookDelivery(err.to_string()));
            }
        };

        if resp.status().is_success() {
            Ok(())
        } else {
            error!("Webhook push non-success status: {:?}", resp.status());
            Err(Error::WebhookDelivery(format!("Webhook returned status {}", resp.status())))
        }
    }
}

/// A hub is a registry of hooks
#[derive(Clone, Default)]
pub struct Hub {
    hooks: Vec<Arc<dyn Hook>>,
}

impl Hub {
    pub fn new() -> Hub { Hub::default() }

    pub fn from_config(config: &WebhookCfg) -> Result<Hub> {
        let mut hub = Hub::new();
        if let Some(ref url) = config.url {
            info!("Announcing submissions to webhook {}", url);
            hub.add(Arc::new(Webhook::new(url, Duration::from_secs(config.timeout_sec))?));
        }
        Ok(hub)
    }

    /// add a hook to list of hooks
    pub fn add(&mut self, hook: Arc<dyn Hook>) { self.hooks.push(hook); }

    pub fn is_empty(&self) -> bool { self.hooks.is_empty() }

    /// Delivers every guest's event to every hook at once. Nothing is retried; the
    /// returned list names each guest whose delivery failed, in submission order.
    pub async fn announce(&self, events: &[(Uuid, RsvpEvent)]) -> Vec<String> {
        if self.hooks.is_empty() {
            return Vec::new();
        }

        let deliveries = events.iter().map(|(guest_id, event)| {
                                          async move {
                                              let data = match serde_json::to_string(event) {
                                                  Ok(data) => data,
                                                  Err(err) => {
                                                      error!("Unable to serialize event, err={}",
                                                             err);
                                                      return Some(*guest_id);
                                                  }
                                              };
                                              let results =
                                                  future::join_all(self.hooks
                                                                       .iter()
                                                                       .map(|hook| {
                                                                           hook.deliver(&data)
                                                                       }))
                                                  .await;
                                              if results.iter().all(|r| r.is_ok()) {
                                                  debug!("Delivery Success, guest={}", guest_id);
                                                  None
                                              } else {
                                                  Some(*guest_id)
                                              }
                                          }
                                      });

        future::join_all(deliveries).await
                                    .into_iter()
                                    .flatten()
                                    .map(|guest_id| format!("Webhook failed for guest {}", guest_id))
                                    .collect()
    }
}
