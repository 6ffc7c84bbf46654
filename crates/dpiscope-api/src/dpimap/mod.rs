//! Traffic category/application name maps and their extractor.
//!
//! The controller reports DPI stats with bare integer ids. The id→name
//! mappings are not exposed by any documented endpoint; the web console
//! ships them inside a versioned, minified script asset. The extractor
//! here fetches that asset without authentication, normalizes its layout,
//! locates the two embedded object-literal fragments (categories first,
//! applications second) and parses them into [`TrafficMap`]s.
//!
//! Extraction is all-or-nothing: any stage failure is fatal and nothing
//! is cached or partially returned. Raw id-only stats remain usable
//! without the maps.

mod beautify;

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::error::{Error, ExtractionError};
use crate::transport::TransportConfig;
use beautify::beautify;

/// Asset version identifier known to work. The controller rotates this
/// string on console upgrades, so callers should override it when the
/// asset fetch starts returning 404.
pub const DEFAULT_BUILD_ID: &str = "g9491db021";

/// Sentinel name for ids absent from an extracted map.
pub const UNLISTED: &str = "__unlisted__";

/// One named entry in a traffic map. Fields beyond `name` are kept
/// verbatim under `extra`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficEntry {
    pub name: String,
    pub extra: Map<String, Value>,
}

impl TrafficEntry {
    /// Entry with a name and nothing else.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// Mapping from integer traffic id to entry metadata.
///
/// Category ids are a small, mostly-stable enumeration; application ids
/// are a large server-controlled set. Lookups never fail:
/// [`TrafficMap::name_or_unlisted`] resolves unknown ids to [`UNLISTED`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficMap {
    entries: BTreeMap<u32, TrafficEntry>,
}

impl TrafficMap {
    pub fn insert(&mut self, id: u32, entry: TrafficEntry) {
        self.entries.insert(id, entry);
    }

    pub fn get(&self, id: u32) -> Option<&TrafficEntry> {
        self.entries.get(&id)
    }

    /// Resolved name for an id, if the map knows it.
    pub fn name_for(&self, id: u32) -> Option<&str> {
        self.entries.get(&id).map(|entry| entry.name.as_str())
    }

    /// Resolved name for an id, falling back to the [`UNLISTED`] sentinel.
    pub fn name_or_unlisted(&self, id: u32) -> &str {
        self.name_for(id).unwrap_or(UNLISTED)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    /// The well-known category table, usable when asset extraction is
    /// unavailable. Ids 2, 16, 21 and 22 have never been observed in the
    /// wild; 255 is the controller's own catch-all.
    pub fn builtin_categories() -> Self {
        let table: [(u32, &str); 22] = [
            (0, "Instant messaging"),
            (1, "P2P"),
            (3, "File Transfer"),
            (4, "Streaming Media"),
            (5, "Mail and Collaboration"),
            (6, "Voice over IP"),
            (7, "Database"),
            (8, "Games"),
            (9, "Network Management"),
            (10, "Remote Access Terminals"),
            (11, "Bypass Proxies and Tunnels"),
            (12, "Stock Market"),
            (13, "Web"),
            (14, "Security Update"),
            (15, "Web IM"),
            (17, "Business"),
            (18, "Network Protocols"),
            (19, "Network Protocols"),
            (20, "Network Protocols"),
            (23, "Private Protocol"),
            (24, "Social Network"),
            (255, "Unknown"),
        ];
        Self {
            entries: table
                .into_iter()
                .map(|(id, name)| (id, TrafficEntry::named(name)))
                .collect(),
        }
    }
}

impl FromIterator<(u32, TrafficEntry)> for TrafficMap {
    fn from_iter<I: IntoIterator<Item = (u32, TrafficEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Fetches and parses the console's DPI name maps.
pub struct TrafficMapExtractor {
    http: reqwest::Client,
    base_url: Url,
    build_id: String,
}

impl TrafficMapExtractor {
    /// Extractor bound to a controller base URL, using the default asset
    /// version. The asset is public, so no session is involved.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            build_id: DEFAULT_BUILD_ID.to_owned(),
        })
    }

    /// Override the asset version identifier.
    pub fn with_build_id(mut self, build_id: impl Into<String>) -> Self {
        self.build_id = build_id.into();
        self
    }

    /// `{base}/manage/angular/{build_id}/js/dynamic.dpi.js`
    pub fn asset_url(&self) -> Result<Url, Error> {
        Ok(self
            .base_url
            .join(&format!("manage/angular/{}/js/dynamic.dpi.js", self.build_id))?)
    }

    /// Fetch the asset and extract `(category_map, application_map)`.
    ///
    /// A non-200 asset response is fatal
    /// ([`ExtractionError::AssetStatus`]); so is any extraction failure.
    pub async fn fetch_maps(&self) -> Result<(TrafficMap, TrafficMap), Error> {
        let url = self.asset_url()?;
        debug!(%url, "fetching dpi name asset");

        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(ExtractionError::AssetStatus {
                endpoint: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let source = resp.text().await?;
        let maps = Self::extract_from_source(url.as_str(), &source)?;
        debug!(
            categories = maps.0.len(),
            applications = maps.1.len(),
            "extracted dpi name maps"
        );
        Ok(maps)
    }

    /// Extract the two maps from raw asset text.
    ///
    /// The asset must contain exactly two anchored object-literal
    /// fragments, a `categories:` block followed by an `applications:`
    /// block. Zero, one, or more than two fragments fails with
    /// [`ExtractionError::FragmentCount`]; two fragments in the wrong
    /// shape fail with [`ExtractionError::FragmentOrder`]. The first
    /// fragment populates the category map, the second the application
    /// map.
    pub fn extract_from_source(
        asset: &str,
        source: &str,
    ) -> Result<(TrafficMap, TrafficMap), ExtractionError> {
        let text = beautify(source);
        let fragments = find_fragments(&text);

        if fragments.len() != 2 {
            return Err(ExtractionError::FragmentCount {
                asset: asset.to_owned(),
                found: fragments.len(),
            });
        }
        let (first_kind, categories_text) = fragments[0];
        let (second_kind, applications_text) = fragments[1];
        if first_kind != FragmentKind::Categories || second_kind != FragmentKind::Applications {
            return Err(ExtractionError::FragmentOrder {
                asset: asset.to_owned(),
            });
        }

        let categories = parse_fragment(asset, "categories", categories_text)?;
        let applications = parse_fragment(asset, "applications", applications_text)?;
        Ok((categories, applications))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FragmentKind {
    Categories,
    Applications,
}

/// Anchored object-literal fragments, in order of appearance. An anchor
/// only counts when it sits in key position and is followed by a brace
/// block.
fn find_fragments(text: &str) -> Vec<(FragmentKind, &str)> {
    let mut found: Vec<(usize, FragmentKind, &str)> = Vec::new();

    for (kind, anchor) in [
        (FragmentKind::Categories, "categories:"),
        (FragmentKind::Applications, "applications:"),
    ] {
        for (pos, _) in text.match_indices(anchor) {
            if !is_key_position(text, pos) {
                continue;
            }
            let after = pos + anchor.len();
            let Some(open) = next_nonspace(text, after) else {
                continue;
            };
            if text.as_bytes()[open] != b'{' {
                continue;
            }
            if let Some(block) = balanced_block(text, open) {
                found.push((pos, kind, block));
            }
        }
    }

    found.sort_by_key(|(pos, _, _)| *pos);
    found
        .into_iter()
        .map(|(_, kind, block)| (kind, block))
        .collect()
}

/// True when the byte before `pos` cannot be part of an identifier or a
/// string, i.e. the anchor really is a bare key.
fn is_key_position(text: &str, pos: usize) -> bool {
    match text[..pos].bytes().next_back() {
        None => true,
        Some(b) => !(b.is_ascii_alphanumeric() || b == b'_' || b == b'"' || b == b'\''),
    }
}

fn next_nonspace(text: &str, from: usize) -> Option<usize> {
    text[from..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| from + i)
}

/// The string-aware balanced `{...}` block starting at byte `open`.
fn balanced_block(text: &str, open: usize) -> Option<&str> {
    let mut depth: usize = 0;
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text[open..].char_indices() {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                in_string = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => in_string = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open..=open + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse one normalized object-literal fragment into a [`TrafficMap`].
///
/// After normalization the fragment is a valid flow-style YAML mapping,
/// which tolerates the unquoted keys the asset uses.
fn parse_fragment(
    asset: &str,
    fragment: &'static str,
    text: &str,
) -> Result<TrafficMap, ExtractionError> {
    let parse_err = |message: String| ExtractionError::Parse {
        asset: asset.to_owned(),
        fragment,
        message,
    };

    let value: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| parse_err(e.to_string()))?;
    let serde_yaml::Value::Mapping(mapping) = value else {
        return Err(parse_err("fragment is not a keyed mapping".to_owned()));
    };

    let mut map = TrafficMap::default();
    for (key, record) in &mapping {
        let id = yaml_key_to_id(key)
            .ok_or_else(|| parse_err(format!("non-integer id key {key:?}")))?;
        let serde_yaml::Value::Mapping(fields) = record else {
            return Err(parse_err(format!("entry {id} is not a record")));
        };

        let mut name = None;
        let mut extra = Map::new();
        for (field_key, field_value) in fields {
            let field_key = field_key
                .as_str()
                .ok_or_else(|| parse_err(format!("entry {id} has a non-string field key")))?;
            if field_key == "name" {
                name = Some(
                    field_value
                        .as_str()
                        .ok_or_else(|| parse_err(format!("entry {id} name is not a string")))?
                        .to_owned(),
                );
            } else {
                extra.insert(field_key.to_owned(), yaml_to_json(field_value).map_err(&parse_err)?);
            }
        }

        let name = name.ok_or_else(|| parse_err(format!("entry {id} has no name field")))?;
        map.insert(id, TrafficEntry { name, extra });
    }
    Ok(map)
}

fn yaml_key_to_id(key: &serde_yaml::Value) -> Option<u32> {
    if let Some(id) = key.as_u64() {
        return u32::try_from(id).ok();
    }
    key.as_str().and_then(|s| s.parse().ok())
}

fn yaml_to_json(value: &serde_yaml::Value) -> Result<Value, String> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                let f = n.as_f64().ok_or_else(|| format!("unrepresentable number {n}"))?;
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("non-finite number {n}"))?
            }
        }
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.iter().map(yaml_to_json).collect::<Result<_, _>>()?)
        }
        serde_yaml::Value::Mapping(fields) => {
            let mut object = Map::new();
            for (k, v) in fields {
                let k = if let Some(s) = k.as_str() {
                    s.to_owned()
                } else if let Some(u) = k.as_u64() {
                    u.to_string()
                } else if let Some(i) = k.as_i64() {
                    i.to_string()
                } else {
                    return Err(format!("unsupported mapping key {k:?}"));
                };
                object.insert(k, yaml_to_json(v)?);
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value)?,
    })
}
