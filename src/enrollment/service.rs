//! Enrollment service: admin bootstrap and user registration.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::ca::{CaClient, RegistrationRequest};
use crate::config::CaConfig;
use crate::enrollment::types::{
    CaStage, ProvisionOutcome, ProvisionReport, ProvisioningError, ProvisioningResult,
};
use crate::observability::metrics;
use crate::profile::ProfileLoader;
use crate::wallet::{validate_label, CredentialRecord, IdentityStore, WalletError};

/// Wallet label of an organization's admin identity.
pub fn admin_label(organization: &str) -> String {
    format!("admin-{}", organization)
}

/// Provisions identities into an [`IdentityStore`].
pub struct EnrollmentService {
    store: Arc<dyn IdentityStore>,
    profiles: Arc<ProfileLoader>,
    ca: Arc<dyn CaClient>,
    config: CaConfig,
    /// Per-label guards serializing provisioning within this process.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Holds a label's provisioning lock; prunes the map entry on release when
/// no other task is waiting for it.
struct LabelGuard<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    label: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for LabelGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks
            .remove_if(&self.label, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl EnrollmentService {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        profiles: Arc<ProfileLoader>,
        ca: Arc<dyn CaClient>,
        config: CaConfig,
    ) -> Self {
        Self {
            store,
            profiles,
            ca,
            config,
            locks: DashMap::new(),
        }
    }

    async fn lock_label(&self, label: &str) -> LabelGuard<'_> {
        let lock = self.locks.entry(label.to_string()).or_default().value().clone();
        LabelGuard {
            locks: &self.locks,
            label: label.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Enroll the organization's admin with the CA bootstrap credentials.
    ///
    /// A no-op returning [`ProvisionOutcome::AlreadyEnrolled`] when the admin
    /// is already in the store.
    #[tracing::instrument(skip(self))]
    pub async fn bootstrap_admin(&self, organization: &str) -> ProvisioningResult<ProvisionOutcome> {
        let result = self.bootstrap_admin_inner(organization).await;
        record("admin", &result);
        result
    }

    async fn bootstrap_admin_inner(&self, organization: &str) -> ProvisioningResult<ProvisionOutcome> {
        let label = admin_label(organization);
        validate_label(&label)?;

        if self.store.exists(&label).await? {
            tracing::info!(label = %label, "Admin identity already enrolled");
            return Ok(ProvisionOutcome::AlreadyEnrolled);
        }

        let _guard = self.lock_label(&label).await;
        if self.store.exists(&label).await? {
            return Ok(ProvisionOutcome::AlreadyEnrolled);
        }

        let profile = self.profiles.load(organization).await?;
        let secret = self.config.resolved_bootstrap_secret();
        let enrollment = self
            .ca
            .enroll(
                &profile.certificate_authority,
                &self.config.bootstrap_enrollment_id,
                &secret,
            )
            .await
            .map_err(|source| ProvisioningError::Ca {
                stage: CaStage::Enroll,
                label: label.clone(),
                registered: false,
                source,
            })?;

        let record = CredentialRecord::x509(
            label.clone(),
            enrollment.certificate,
            enrollment.private_key,
            profile.msp_id.clone(),
        );
        self.store.put(record).await?;

        tracing::info!(label = %label, msp_id = %profile.msp_id, "Admin identity enrolled");
        Ok(ProvisionOutcome::Enrolled)
    }

    /// Register `label` with the CA under the admin's authority, enroll it,
    /// and store the credential.
    ///
    /// Requires the admin to be enrolled already; this never bootstraps it.
    #[tracing::instrument(skip(self))]
    pub async fn register_and_enroll_user(
        &self,
        organization: &str,
        label: &str,
    ) -> ProvisioningResult<ProvisionOutcome> {
        let result = self.register_and_enroll_inner(organization, label).await;
        record("user", &result);
        result
    }

    async fn register_and_enroll_inner(
        &self,
        organization: &str,
        label: &str,
    ) -> ProvisioningResult<ProvisionOutcome> {
        validate_label(label)?;

        if self.store.exists(label).await? {
            tracing::info!(label = %label, "Identity already enrolled");
            return Ok(ProvisionOutcome::AlreadyEnrolled);
        }

        let _guard = self.lock_label(label).await;
        if self.store.exists(label).await? {
            return Ok(ProvisionOutcome::AlreadyEnrolled);
        }

        // 1. Registrar
        let registrar_label = admin_label(organization);
        let registrar = match self.store.get(&registrar_label).await {
            Ok(record) => record,
            Err(WalletError::NotFound(_)) => {
                return Err(ProvisioningError::AdminMissing {
                    organization: organization.to_string(),
                    label: registrar_label,
                })
            }
            Err(e) => return Err(e.into()),
        };

        let profile = self.profiles.load(organization).await?;
        let ca = &profile.certificate_authority;

        // 2. Register
        let secret = self
            .ca
            .register(ca, &RegistrationRequest::client(label), &registrar)
            .await
            .map_err(|source| ProvisioningError::Ca {
                stage: CaStage::Register,
                label: label.to_string(),
                registered: false,
                source,
            })?;

        // 3. Enroll
        let enrollment = match self.ca.enroll(ca, label, &secret).await {
            Ok(enrollment) => enrollment,
            Err(source) => {
                tracing::warn!(
                    label = %label,
                    error = %source,
                    "Identity is registered with the CA but enrollment failed; \
                     its one-time secret is unused"
                );
                return Err(ProvisioningError::Ca {
                    stage: CaStage::Enroll,
                    label: label.to_string(),
                    registered: true,
                    source,
                });
            }
        };

        // 4. Store
        let record = CredentialRecord::x509(
            label,
            enrollment.certificate,
            enrollment.private_key,
            profile.msp_id.clone(),
        );
        self.store.put(record).await?;

        tracing::info!(label = %label, msp_id = %profile.msp_id, "Identity registered and enrolled");
        Ok(ProvisionOutcome::Enrolled)
    }

    /// Bootstrap the admin, then register and enroll `label`.
    pub async fn provision(&self, organization: &str, label: &str) -> ProvisioningResult<ProvisionReport> {
        let admin = self.bootstrap_admin(organization).await?;
        let user = self.register_and_enroll_user(organization, label).await?;
        Ok(ProvisionReport { admin, user })
    }
}

fn record(kind: &'static str, result: &ProvisioningResult<ProvisionOutcome>) {
    let outcome = match result {
        Ok(outcome) => outcome.as_str(),
        Err(_) => "error",
    };
    metrics::record_provisioning(kind, outcome);
}
