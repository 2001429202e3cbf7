//! Profile location and caching.

use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::NetworkConfig;
use crate::profile::parser::parse_profile;
use crate::profile::types::{NetworkProfile, ProfileError, ProfileResult};

/// Loads connection profiles once per organization and caches them.
#[derive(Debug)]
pub struct ProfileLoader {
    config: NetworkConfig,
    cache: DashMap<String, Arc<NetworkProfile>>,
}

impl ProfileLoader {
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            cache: DashMap::new(),
        }
    }

    /// Where the profile for `organization` is expected.
    ///
    /// An explicit entry in `network.profiles` wins; otherwise the layout
    /// produced by the Fabric sample network scripts is assumed.
    pub fn profile_path(&self, organization: &str) -> PathBuf {
        if let Some(path) = self.config.profiles.get(organization) {
            return path.clone();
        }
        self.config
            .profiles_dir
            .join("peerOrganizations")
            .join(format!("{}.{}", organization, self.config.domain))
            .join(format!("connection-{}.json", organization))
    }

    /// Load (or return the cached) profile for `organization`.
    pub async fn load(&self, organization: &str) -> ProfileResult<Arc<NetworkProfile>> {
        if let Some(profile) = self.cache.get(organization) {
            return Ok(profile.value().clone());
        }

        let path = self.profile_path(organization);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| ProfileError::NotFound {
                organization: organization.to_string(),
                path: path.clone(),
                source,
            })?;

        let profile = Arc::new(parse_profile(organization, &self.config.domain, &bytes)?);
        tracing::info!(
            organization = %organization,
            path = %path.display(),
            msp_id = %profile.msp_id,
            ca = %profile.certificate_authority.name,
            peers = profile.peers.len(),
            "Network profile loaded"
        );

        // A concurrent first load may have won; keep whichever landed first.
        let cached = self
            .cache
            .entry(organization.to_string())
            .or_insert(profile)
            .value()
            .clone();
        Ok(cached)
    }
}
