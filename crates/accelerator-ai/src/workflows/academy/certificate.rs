use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::domain::UserProfile;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of the random part of a certificate id.
pub const CERTIFICATE_PREFIX_LEN: usize = 9;

/// Source of the random certificate id prefix.
pub trait CertificateIdSource: Send + Sync + fmt::Debug {
    fn prefix(&self) -> String;
}

/// Nine uniformly drawn base-36 characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCertificateIds;

impl CertificateIdSource for RandomCertificateIds {
    fn prefix(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..CERTIFICATE_PREFIX_LEN)
            .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCertificateIds(pub String);

impl CertificateIdSource for FixedCertificateIds {
    fn prefix(&self) -> String {
        self.0.clone()
    }
}

/// Upper-case base-36 rendering of `value`.
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

/// `PREFIX-TIMESTAMP`, the timestamp being the issue instant in epoch
/// milliseconds rendered in base 36.
pub fn certificate_id(prefix: &str, issued_at: DateTime<Utc>) -> String {
    let millis = u64::try_from(issued_at.timestamp_millis()).unwrap_or_default();
    format!("{prefix}-{}", to_base36(millis))
}

/// Completion certificate for the whole curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub recipient: String,
    pub startup_name: String,
    pub industry: String,
    pub levels_completed: usize,
    pub issued_at: DateTime<Utc>,
    pub issued_on: String,
}

impl Certificate {
    pub fn issue(
        user: &UserProfile,
        levels_completed: usize,
        ids: &dyn CertificateIdSource,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: certificate_id(&ids.prefix(), issued_at),
            recipient: user.name.clone(),
            startup_name: user.startup_name.clone(),
            industry: user.industry.clone(),
            levels_completed,
            issued_at,
            issued_on: issued_at.format("%B %-d, %Y").to_string(),
        }
    }
}
