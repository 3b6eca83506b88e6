//! Normalization of raw browse payloads into a [`ChannelRecord`].
//!
//! The upstream JSON is deeply nested and shifts shape between channel
//! types, so every field is optional here: a missing path yields an empty
//! value, never an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

static NULL: Value = Value::Null;

/// Canonical channel record returned to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub avatar: Vec<Thumbnail>,
    pub banner: Vec<Thumbnail>,
    pub subscriber_count: Option<String>,
    pub is_verified: bool,
    pub is_family_safe: Option<bool>,
    pub keywords: Option<String>,
    pub vanity_url: Option<String>,
    pub view_count: Option<String>,
    pub joined_date: Option<String>,
    pub country: Option<String>,
    pub links: Vec<ChannelLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: Option<u64>,
    #[serde(default)]
    pub height: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelLink {
    pub title: String,
    pub url: String,
}

/// Map the featured and about payloads into a [`ChannelRecord`].
pub fn normalize(featured: &Value, about: &Value) -> ChannelRecord {
    let metadata = &featured["metadata"]["channelMetadataRenderer"];
    let header = &featured["header"]["c4TabbedHeaderRenderer"];
    let about_meta = find_about_renderer(about).unwrap_or(&NULL);

    let channel_id = str_field(header, "channelId")
        .or_else(|| str_field(metadata, "externalId"))
        .or_else(|| str_field(about_meta, "channelId"))
        .unwrap_or_default();

    let title = str_field(header, "title")
        .or_else(|| str_field(metadata, "title"))
        .or_else(|| text(&about_meta["title"]))
        .unwrap_or_default();

    let description = text(&about_meta["description"])
        .or_else(|| str_field(metadata, "description"))
        .unwrap_or_default();

    let mut avatar = thumbnails(&header["avatar"]);
    if avatar.is_empty() {
        avatar = thumbnails(&metadata["avatar"]);
    }

    ChannelRecord {
        channel_id,
        title,
        description,
        avatar,
        banner: thumbnails(&header["banner"]),
        subscriber_count: text(&header["subscriberCountText"]),
        is_verified: is_verified(&header["badges"]),
        is_family_safe: metadata["isFamilySafe"].as_bool(),
        keywords: str_field(metadata, "keywords").filter(|k| !k.is_empty()),
        vanity_url: str_field(metadata, "vanityChannelUrl"),
        view_count: text(&about_meta["viewCountText"]),
        joined_date: text(&about_meta["joinedDateText"]),
        country: text(&about_meta["country"]),
        links: links(&about_meta["primaryLinks"]),
    }
}

/// Locate `channelAboutFullMetadataRenderer` inside the about payload's tabs.
fn find_about_renderer(about: &Value) -> Option<&Value> {
    let tabs = about["contents"]["twoColumnBrowseResultsRenderer"]["tabs"].as_array()?;
    tabs.iter()
        .filter_map(|tab| {
            tab["tabRenderer"]["content"]["sectionListRenderer"]["contents"].as_array()
        })
        .flatten()
        .filter_map(|section| section["itemSectionRenderer"]["contents"].as_array())
        .flatten()
        .map(|item| &item["channelAboutFullMetadataRenderer"])
        .find(|renderer| renderer.is_object())
}

fn str_field(obj: &Value, key: &str) -> Option<String> {
    obj[key].as_str().map(str::to_string)
}

/// Read a text node in either `simpleText` or `runs` form.
fn text(node: &Value) -> Option<String> {
    if let Some(s) = node.as_str() {
        return Some(s.to_string());
    }
    if let Some(s) = node["simpleText"].as_str() {
        return Some(s.to_string());
    }
    let runs = node["runs"].as_array()?;
    let joined: String = runs.iter().filter_map(|r| r["text"].as_str()).collect();
    Some(joined)
}

fn thumbnails(node: &Value) -> Vec<Thumbnail> {
    node["thumbnails"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

fn is_verified(badges: &Value) -> bool {
    badges.as_array().is_some_and(|badges| {
        badges.iter().any(|badge| {
            matches!(
                badge["metadataBadgeRenderer"]["style"].as_str(),
                Some("BADGE_STYLE_TYPE_VERIFIED" | "BADGE_STYLE_TYPE_VERIFIED_ARTIST")
            )
        })
    })
}

fn links(node: &Value) -> Vec<ChannelLink> {
    let Some(items) = node.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let url = item["navigationEndpoint"]["urlEndpoint"]["url"].as_str()?;
            Some(ChannelLink {
                title: text(&item["title"]).unwrap_or_default(),
                url: unwrap_redirect(url),
            })
        })
        .collect()
}

/// Outbound links are wrapped as `https://www.youtube.com/redirect?q=<target>`.
fn unwrap_redirect(raw: &str) -> String {
    let Ok(url) = Url::parse(raw) else {
        return raw.to_string();
    };
    let is_redirect = url
        .host_str()
        .is_some_and(|host| host.ends_with("youtube.com"))
        && url.path() == "/redirect";
    if !is_redirect {
        return raw.to_string();
    }
    url.query_pairs()
        .find(|(k, _)| k == "q")
        .map(|(_, v)| v.into_owned())
        .unwrap_or_else(|| raw.to_string())
}
