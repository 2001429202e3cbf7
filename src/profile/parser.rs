//! Fabric connection profile parsing.
//!
//! Only the parts of the profile this gateway needs are modeled; unknown
//! fields are ignored.

use serde::Deserialize;
use std::collections::HashMap;

use crate::profile::types::{CaInfo, NetworkProfile, PeerInfo, ProfileError, ProfileResult};

#[derive(Debug, Deserialize)]
struct RawProfile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    client: Option<RawClient>,
    #[serde(default)]
    organizations: HashMap<String, RawOrganization>,
    #[serde(default)]
    peers: HashMap<String, RawPeer>,
    #[serde(rename = "certificateAuthorities", default)]
    certificate_authorities: HashMap<String, RawCa>,
}

#[derive(Debug, Deserialize)]
struct RawClient {
    organization: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOrganization {
    mspid: Option<String>,
    #[serde(default)]
    peers: Vec<String>,
    #[serde(rename = "certificateAuthorities", default)]
    certificate_authorities: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawPeer {
    url: Option<String>,
    #[serde(rename = "tlsCACerts")]
    tls_ca_certs: Option<RawPem>,
    #[serde(rename = "grpcOptions", default)]
    grpc_options: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawCa {
    url: Option<String>,
    #[serde(rename = "caName")]
    ca_name: Option<String>,
    #[serde(rename = "tlsCACerts")]
    tls_ca_certs: Option<RawPem>,
    #[serde(rename = "httpOptions")]
    http_options: Option<RawHttpOptions>,
}

#[derive(Debug, Deserialize)]
struct RawPem {
    pem: Option<PemField>,
}

/// `pem` is a single string in peer sections and usually an array for CAs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PemField {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct RawHttpOptions {
    #[serde(default)]
    verify: bool,
}

fn pems(raw: Option<RawPem>) -> Vec<String> {
    let pems = match raw.and_then(|r| r.pem) {
        Some(PemField::One(pem)) => vec![pem],
        Some(PemField::Many(pems)) => pems,
        None => Vec::new(),
    };
    pems.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

/// Parse a connection profile for `organization`.
///
/// `domain` is used to find the conventional `ca.<org>.<domain>` entry.
pub fn parse_profile(organization: &str, domain: &str, bytes: &[u8]) -> ProfileResult<NetworkProfile> {
    let mut raw: RawProfile = serde_json::from_slice(bytes)
        .map_err(|e| ProfileError::malformed(organization, format!("invalid JSON: {}", e)))?;

    let org_key = select_organization(organization, &raw)?;
    let org = org_key.as_ref().and_then(|k| raw.organizations.remove(k));

    let msp_id = org
        .as_ref()
        .and_then(|o| o.mspid.clone())
        .unwrap_or_else(|| format!("{}MSP", organization));

    let conventional_ca = format!("ca.{}.{}", organization, domain);
    let ca_key = if raw.certificate_authorities.contains_key(&conventional_ca) {
        conventional_ca
    } else if let Some(first) = org
        .as_ref()
        .and_then(|o| o.certificate_authorities.first())
        .filter(|k| raw.certificate_authorities.contains_key(*k))
    {
        first.clone()
    } else if raw.certificate_authorities.len() == 1 {
        raw.certificate_authorities.keys().next().cloned().unwrap_or_default()
    } else {
        return Err(ProfileError::malformed(
            organization,
            format!("no certificate authority entry for '{}'", conventional_ca),
        ));
    };

    let raw_ca = raw
        .certificate_authorities
        .remove(&ca_key)
        .ok_or_else(|| ProfileError::malformed(organization, "certificate authority entry vanished"))?;
    let certificate_authority = build_ca(organization, ca_key, raw_ca)?;

    let peer_names: Vec<String> = match org.as_ref().filter(|o| !o.peers.is_empty()) {
        Some(o) => o.peers.clone(),
        None => {
            let mut names: Vec<String> = raw.peers.keys().cloned().collect();
            names.sort();
            names
        }
    };

    let mut peers = Vec::with_capacity(peer_names.len());
    for name in peer_names {
        let Some(raw_peer) = raw.peers.remove(&name) else {
            tracing::warn!(organization = %organization, peer = %name, "Peer listed but not defined in profile");
            continue;
        };
        let Some(url) = raw_peer.url else {
            return Err(ProfileError::malformed(
                organization,
                format!("peer '{}' has no url", name),
            ));
        };
        let ssl_target_name_override = raw_peer
            .grpc_options
            .get("ssl-target-name-override")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        peers.push(PeerInfo {
            name,
            url,
            tls_ca_certs: pems(raw_peer.tls_ca_certs),
            ssl_target_name_override,
        });
    }

    Ok(NetworkProfile {
        name: raw.name,
        organization: organization.to_string(),
        msp_id,
        certificate_authority,
        peers,
    })
}

fn select_organization(organization: &str, raw: &RawProfile) -> ProfileResult<Option<String>> {
    if let Some(declared) = raw.client.as_ref().and_then(|c| c.organization.as_ref()) {
        if raw.organizations.contains_key(declared) {
            return Ok(Some(declared.clone()));
        }
    }
    if let Some(key) = raw
        .organizations
        .keys()
        .find(|k| k.eq_ignore_ascii_case(organization))
    {
        return Ok(Some(key.clone()));
    }
    match raw.organizations.len() {
        0 => Ok(None),
        1 => Ok(raw.organizations.keys().next().cloned()),
        _ => Err(ProfileError::malformed(
            organization,
            "several organizations declared and none matches",
        )),
    }
}

fn build_ca(organization: &str, name: String, raw: RawCa) -> ProfileResult<CaInfo> {
    let url = raw
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ProfileError::malformed(organization, format!("CA '{}' has no url", name)))?;
    url::Url::parse(&url).map_err(|e| {
        ProfileError::malformed(organization, format!("CA '{}' url '{}' is invalid: {}", name, url, e))
    })?;
    let ca_name = raw
        .ca_name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ProfileError::malformed(organization, format!("CA '{}' has no caName", name)))?;
    let tls_ca_certs = pems(raw.tls_ca_certs);
    if tls_ca_certs.is_empty() {
        return Err(ProfileError::malformed(
            organization,
            format!("CA '{}' has no tlsCACerts.pem", name),
        ));
    }

    Ok(CaInfo {
        name,
        url,
        ca_name,
        tls_ca_certs,
        verify: raw.http_options.map(|o| o.verify).unwrap_or(false),
    })
}
