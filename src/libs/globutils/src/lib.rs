//!
//! # Global common utils
//!

#![deny(missing_docs)]

pub mod logging;

use {serde::Serialize, std::result::Result as StdResult};

/// Perform a synchronize http get request with attohttpc,
/// and parse the response as a String
#[inline(always)]
pub fn http_get_request(query: &str) -> StdResult<String, attohttpc::Error> {
    attohttpc::get(query).send()?.error_for_status()?.text()
}

/// Post `body` as JSON with extra headers; returns the status code and raw body
/// without treating non-2xx statuses as errors.
pub fn http_post_json<T: Serialize>(
    url: &str,
    headers: &[(&'static str, String)],
    body: &T,
) -> StdResult<(u16, Vec<u8>), attohttpc::Error> {
    let mut req = attohttpc::post(url);
    for (name, value) in headers.iter() {
        req = req.header(*name, value.as_str());
    }
    let resp = req.json(body)?.send()?;
    let status = resp.status().as_u16();
    resp.bytes().map(|b| (status, b))
}

/// Naming of the HTTP routes served by an API.
pub trait NetworkRoute {
    /// Path of the route, with a leading slash.
    fn route(&self) -> String;

    /// Route followed by one path segment.
    fn with_arg(&self, arg: &dyn std::fmt::Display) -> String {
        let mut endpoint = self.route();
        endpoint += &("/".to_owned() + &arg.to_string());
        endpoint
    }

    /// e.g. `Routes::GetEntry.with_arg_template("id") = "/getEntry/{id}"`
    fn with_arg_template(&self, arg: &str) -> String {
        let mut endpoint = self.route();
        endpoint += &("/".to_owned() + &"{".to_owned() + arg + &"}".to_owned());
        endpoint
    }
}
