
use apisign_aws_v4::{RequestSigner, SigningContext};
use chrono::{TimeZone, Utc};
use http::{header, Request};

pub const SECRET_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

/// Signing context shared by the SigV4 test suite cases.
pub fn suite_context() -> SigningContext {
    SigningContext::new(
        Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap(),
        "us-east-1",
        "service",
        "AKIDEXAMPLE",
        SECRET_KEY,
    )
}

/// Build a suite request carrying the `host` and `x-amz-date` every case shares.
pub fn suite_request(path_and_query: &str, extra: &[(&str, &str)]) -> Request<Vec<u8>> {
    let mut builder = Request::builder()
        .uri(format!("https://example.amazonaws.com{path_and_query}"))
        .header("Host", "example.amazonaws.com")
        .header("X-Amz-Date", "20150830T123600Z");
    for (k, v) in extra {
        builder = builder.header(*k, *v);
    }
    builder.body(Vec::new()).expect("request must be valid")
}

/// Sign `req` and return the hex signature from its `Authorization` header.
pub fn sign_and_extract(signer: &RequestSigner, req: &mut Request<Vec<u8>>) -> String {
    let _ = env_logger::builder().is_test(true).try_init();

    signer
        .sign(req, &suite_context())
        .expect("sign request must succeed");
    req.headers()[header::AUTHORIZATION]
        .to_str()
        .expect("authorization must be ascii")
        .rsplit("Signature=")
        .next()
        .expect("signature must exist")
        .to_string()
}
