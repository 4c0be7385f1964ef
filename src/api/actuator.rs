use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::core::config::ActuatorConfig;
use crate::core::ActuatorError;

/// The IoT endpoint pulsed when a new listing shows up.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Actuator: Send + Sync {
    async fn trigger(&self) -> Result<(), ActuatorError>;
}

pub struct HttpActuator {
    client: Client,
    command_url: String,
}

impl HttpActuator {
    pub fn new(config: &ActuatorConfig) -> Result<Self, ActuatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            command_url: config.command_url.clone(),
        })
    }
}

#[async_trait]
impl Actuator for HttpActuator {
    async fn trigger(&self) -> Result<(), ActuatorError> {
        let response = self.client.get(&self.command_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ActuatorError::Status(status.as_u16()));
        }
        Ok(())
    }
}
