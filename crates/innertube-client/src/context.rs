//! Client identity sent with every browse call.
//!
//! The upstream shapes its response by these fields, so they are sent
//! verbatim on both requests of a lookup.

use serde::Serialize;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/85.0.4183.102 Safari/537.36";

pub const BROWSER_ACCEPT: &str = "text/html, application/xhtml+xml, application/xml;q=0.9, */*;q=0.8";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientIdentity {
    pub hl: &'static str,
    pub user_agent: &'static str,
    pub client_name: &'static str,
    pub client_version: &'static str,
    pub os_name: &'static str,
    pub browser_name: &'static str,
    pub browser_version: &'static str,
    pub screen_height_points: u32,
    pub screen_pixel_density: u32,
    pub screen_width_points: u32,
}

/// Desktop web client, Chrome 85 on Windows.
pub const WEB_CLIENT: ClientIdentity = ClientIdentity {
    hl: "en",
    user_agent: BROWSER_USER_AGENT,
    client_name: "WEB",
    client_version: "2.20200922.02.00",
    os_name: "Windows",
    browser_name: "Chrome",
    browser_version: "85.0.4183.102",
    screen_height_points: 767,
    screen_pixel_density: 1,
    screen_width_points: 1536,
};
