// Response classification.
//
// Cameras answer 200 for most failures and put the real error in the body,
// either as an HTML comment or a `# error:` style line. Everything that
// reaches the caller goes through `classify` first.

use std::sync::LazyLock;

use bytes::Bytes;
use regex::Regex;
use reqwest::header::HeaderMap;

use crate::error::Error;
use crate::request::Expect;
use crate::transport::RawResponse;

/// HTML comments; the first one mentioning "error" is the highest-priority marker.
static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").expect("html comment marker"));

/// Line markers, in priority order after HTML comments.
static LINE_MARKERS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?im)^#\s*error:[ \t]*(.*?)\s*$").expect("error line marker"),
        Regex::new(r"(?im)^#\s*request failed:[ \t]*(.*?)\s*$").expect("request failed marker"),
    ]
});

/// Result of one round-trip, decided from status and body.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success(Bytes),
    /// The device reported a problem in-band.
    DeviceError(String),
    /// 404: the command does not exist on this firmware.
    NotSupported(String),
    /// Any other non-2xx status.
    TransportFailure {
        status: u16,
        message: String,
        headers: HeaderMap,
    },
}

impl Outcome {
    /// Convert into the crate's error taxonomy.
    ///
    /// `command` and `url` only feed diagnostics.
    pub fn into_result(self, command: &str, url: &str) -> Result<Bytes, Error> {
        match self {
            Self::Success(body) => Ok(body),
            Self::DeviceError(message) => Err(Error::Device {
                command: command.to_owned(),
                message,
            }),
            Self::NotSupported(command) => Err(Error::NotSupported { command }),
            Self::TransportFailure {
                status,
                message,
                headers,
            } => Err(Error::Status {
                status,
                message,
                url: url.to_owned(),
                headers,
            }),
        }
    }
}

/// Classify a raw response produced by `command`.
pub fn classify(response: RawResponse, command: &str, expect: Expect) -> Outcome {
    if !response.is_success() {
        if response.status == 404 {
            return Outcome::NotSupported(command.to_owned());
        }
        return Outcome::TransportFailure {
            status: response.status,
            message: response.reason,
            headers: response.headers,
        };
    }

    let scan = match expect {
        Expect::Text => true,
        Expect::Binary => response.is_text(),
    };
    if scan {
        if let Some(message) = find_error_marker(&String::from_utf8_lossy(&response.body)) {
            return Outcome::DeviceError(message);
        }
    }

    Outcome::Success(response.body)
}

/// First in-band error message in `body`, if any.
pub fn find_error_marker(body: &str) -> Option<String> {
    let comment = HTML_COMMENT
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|text| text.to_lowercase().contains("error"));
    if let Some(text) = comment {
        return Some(text.trim().to_owned());
    }

    LINE_MARKERS.iter().find_map(|re| {
        re.captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_owned())
    })
}
