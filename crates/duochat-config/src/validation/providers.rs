//! Provider section validation (models, URLs, regions, timeouts).

use crate::schema::DuochatConfig;

use super::helpers::{validate_http_url, validate_non_empty, validate_range, validate_range_f64};

/// Upper bound for both connect and request timeouts, in seconds.
const MAX_TIMEOUT_SECS: u64 = 600;

pub(crate) fn validate_openai(errors: &mut Vec<String>, config: &DuochatConfig) {
    let openai = &config.openai;
    validate_non_empty(errors, "openai.model", &openai.model);

    validate_http_url(errors, "openai.base_url", &openai.base_url);

    if let Some(temperature) = openai.temperature {
        validate_range_f64(errors, "openai.temperature", temperature, 0.0, 2.0);
    }

    validate_range(
        errors,
        "openai.connect_timeout_secs",
        openai.connect_timeout_secs,
        1,
        MAX_TIMEOUT_SECS,
    );
    validate_range(
        errors,
        "openai.request_timeout_secs",
        openai.request_timeout_secs,
        1,
        MAX_TIMEOUT_SECS,
    );
}

pub(crate) fn validate_gemini(errors: &mut Vec<String>, config: &DuochatConfig) {
    let gemini = &config.gemini;
    validate_non_empty(errors, "gemini.location", &gemini.location);
    if !gemini
        .location
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        errors.push(format!(
            "gemini.location = {:?} may only contain ASCII letters, digits and '-'",
            gemini.location
        ));
    }

    if let Some(ref project) = gemini.project {
        validate_non_empty(errors, "gemini.project", project);
    }

    if let Some(ref api_root) = gemini.api_root {
        validate_http_url(errors, "gemini.api_root", api_root);
    }

    validate_range(
        errors,
        "gemini.connect_timeout_secs",
        gemini.connect_timeout_secs,
        1,
        MAX_TIMEOUT_SECS,
    );
    validate_range(
        errors,
        "gemini.request_timeout_secs",
        gemini.request_timeout_secs,
        1,
        MAX_TIMEOUT_SECS,
    );
}
