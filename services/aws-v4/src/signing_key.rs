use crate::constants::AWS4_REQUEST;
use apisign_core::hash::hmac_sha256;
use apisign_core::time::{format_date, DateTime};

/// Credential scope: "20220313/<region>/<service>/aws4_request"
///
/// Only the date part of `time` is used, the full timestamp never appears here.
pub fn credential_scope(time: DateTime, region: &str, service: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        format_date(time),
        region,
        service,
        AWS4_REQUEST
    )
}

/// Derive the signing key scoped to the date of `time`, `region` and `service`.
pub fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    derive_signing_key(secret, &format_date(time), region, service)
}

/// Derive the signing key from an explicit `yyyyMMdd` date stamp.
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date_stamp)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
pub fn derive_signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), AWS4_REQUEST.as_bytes())
}
