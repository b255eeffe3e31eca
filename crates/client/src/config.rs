//! AWS SDK client setup (Imperative Shell).

use aws_config::ConfigLoader;
use aws_sdk_dynamodb::Client;

/// AWS client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsConfig {
    /// Custom endpoint URL (for local DynamoDB).
    pub endpoint_url: Option<String>,
    /// AWS region. `None` leaves it to the environment and shared config.
    pub region: Option<String>,
    /// Shared-config profile.
    pub profile: Option<String>,
}

impl AwsConfig {
    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        let target = match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!(
                "AWS DynamoDB (region: {})",
                self.region.as_deref().unwrap_or("default")
            ),
        };
        match &self.profile {
            Some(profile) => format!("{} [profile: {}]", target, profile),
            None => target,
        }
    }
}

/// SDK config loader with explicit settings layered over the default chain.
fn sdk_loader(config: &AwsConfig) -> ConfigLoader {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }

    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    loader
}

/// Creates a DynamoDB client with the given configuration.
pub async fn create_client(config: &AwsConfig) -> Client {
    let sdk_config = sdk_loader(config).load().await;
    Client::new(&sdk_config)
}
