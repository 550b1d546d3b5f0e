// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · multistatus
// ──────────────────────────────────────────────────────────────────────────────
// WebDAV XML: request bodies (PROPFIND, PROPPATCH, REPORT) and the
// `d:multistatus` response parser.
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::{NcResult, NextcloudError};
use nextcloud_types::{DavResource, DavResourceType};
use percent_encoding::percent_decode_str;
use quick_xml::events::Event;
use quick_xml::Reader;

const PROPS: &str = r#"  <d:prop>
    <d:displayname/>
    <d:getcontenttype/>
    <d:getcontentlength/>
    <d:getetag/>
    <d:getlastmodified/>
    <d:resourcetype/>
    <oc:fileid/>
    <oc:owner-id/>
    <oc:owner-display-name/>
    <oc:permissions/>
    <oc:checksums/>
    <nc:has-preview/>
    <oc:favorite/>
    <oc:comments-count/>
    <oc:size/>
  </d:prop>"#;

/// PROPFIND body asking for the properties [`parse_multistatus_xml`] reads.
pub fn propfind_body() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<d:propfind xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns" xmlns:nc="http://nextcloud.org/ns">
{PROPS}
</d:propfind>"#
    )
}

/// PROPFIND body asking for every live and dead property.
pub fn propfind_allprop_body() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<d:propfind xmlns:d="DAV:">
  <d:allprop/>
</d:propfind>"#
        .to_string()
}

/// PROPPATCH body setting or clearing the favorite flag.
pub fn proppatch_favorite_body(favorite: bool) -> String {
    let val = if favorite { "1" } else { "0" };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<d:propertyupdate xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns">
  <d:set>
    <d:prop>
      <oc:favorite>{val}</oc:favorite>
    </d:prop>
  </d:set>
</d:propertyupdate>"#
    )
}

/// REPORT body listing favorites below the addressed folder.
pub fn filter_favorites_body() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<oc:filter-files xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns" xmlns:nc="http://nextcloud.org/ns">
{PROPS}
  <oc:filter-rules>
    <oc:favorite>1</oc:favorite>
  </oc:filter-rules>
</oc:filter-files>"#
    )
}

/// Parse a WebDAV multistatus XML body into `DavResource` entries.
pub fn parse_multistatus_xml(xml: &str) -> NcResult<Vec<DavResource>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut resources: Vec<DavResource> = Vec::new();
    let mut current: Option<DavResource> = None;
    let mut current_tag: Option<String> = None;
    let mut buf = Vec::new();
    let mut is_collection = false;
    let mut in_resourcetype = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let local = local_name(e.name().as_ref());
                match local.as_str() {
                    "response" => {
                        current = Some(DavResource::default());
                        is_collection = false;
                    }
                    "resourcetype" => in_resourcetype = true,
                    "collection" if in_resourcetype => is_collection = true,
                    "href" | "displayname" | "getcontenttype" | "getcontentlength"
                    | "getetag" | "getlastmodified" | "fileid" | "owner-id"
                    | "owner-display-name" | "permissions" | "checksums" | "has-preview"
                    | "favorite" | "comments-count" | "size" => {
                        current_tag = Some(local);
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                if in_resourcetype && local_name(e.name().as_ref()) == "collection" {
                    is_collection = true;
                }
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(tag), Some(res)) = (current_tag.as_deref(), current.as_mut()) {
                    let text = e
                        .unescape()
                        .map_err(|err| NextcloudError::Xml(err.to_string()))?
                        .into_owned();
                    apply_property(res, tag, text);
                }
            }
            Ok(Event::End(ref e)) => {
                let local = local_name(e.name().as_ref());
                match local.as_str() {
                    "response" => {
                        if let Some(mut res) = current.take() {
                            if is_collection {
                                res.resource_type = DavResourceType::Folder;
                            }
                            if res.display_name.is_empty() {
                                res.display_name = display_name_from_href(&res.href);
                            }
                            resources.push(res);
                        }
                    }
                    "resourcetype" => in_resourcetype = false,
                    _ => {
                        if current_tag.as_deref() == Some(local.as_str()) {
                            current_tag = None;
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(NextcloudError::Xml(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(resources)
}

fn apply_property(res: &mut DavResource, tag: &str, text: String) {
    match tag {
        "href" => res.href = text,
        "displayname" => res.display_name = text,
        "getcontenttype" => res.content_type = Some(text),
        "getcontentlength" => res.content_length = text.parse().ok(),
        "getetag" => res.etag = Some(text.trim_matches('"').to_string()),
        "getlastmodified" => res.last_modified = Some(text),
        "fileid" => res.file_id = text.parse().ok(),
        "owner-id" => res.owner_id = Some(text),
        "owner-display-name" => res.owner_display_name = Some(text),
        "permissions" => res.permissions = Some(text),
        "checksums" => res.checksum = Some(text),
        "has-preview" => res.has_preview = Some(text == "true" || text == "1"),
        "favorite" => res.favorite = Some(text == "1"),
        "comments-count" => res.comments_count = text.parse().ok(),
        "size" => res.size = text.parse().ok(),
        _ => {}
    }
}

/// Extract the local name from a possibly-namespaced XML tag.
fn local_name(raw: &[u8]) -> String {
    let s = String::from_utf8_lossy(raw);
    match s.rfind(':') {
        Some(pos) => s[pos + 1..].to_string(),
        None => s.into_owned(),
    }
}

/// Last path segment of an href, percent-decoded.
fn display_name_from_href(href: &str) -> String {
    let trimmed = href.trim_end_matches('/');
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    percent_decode_str(last).decode_utf8_lossy().into_owned()
}
