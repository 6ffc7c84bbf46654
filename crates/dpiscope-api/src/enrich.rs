//! In-place name resolution for raw DPI stat responses.

use serde_json::Value;

use crate::dpimap::{TrafficMap, UNLISTED};

/// Annotate a raw by-application DPI response with resolved names.
///
/// Walks every `by_app` entry under `data` and inserts two derived
/// fields next to the raw ids: `x_cat` (category name) and `x_app`
/// (application name). Category ids missing from the extracted map fall
/// back to the builtin table, then to the [`UNLISTED`] sentinel;
/// application ids have no builtin table and go straight to the
/// sentinel. Entries without an integer `cat` or `app` field are left
/// untouched. The rest of the response is not modified.
pub fn enrich_dpi_stats(stats: &mut Value, categories: &TrafficMap, applications: &TrafficMap) {
    let builtin = TrafficMap::builtin_categories();

    let Some(devices) = stats.get_mut("data").and_then(Value::as_array_mut) else {
        return;
    };
    for device in devices {
        let Some(entries) = device.get_mut("by_app").and_then(Value::as_array_mut) else {
            continue;
        };
        for entry in entries {
            let Some(record) = entry.as_object_mut() else {
                continue;
            };

            if let Some(cat) = id_field(record.get("cat")) {
                let name = categories
                    .name_for(cat)
                    .or_else(|| builtin.name_for(cat))
                    .unwrap_or(UNLISTED);
                record.insert("x_cat".to_owned(), Value::String(name.to_owned()));
            }
            if let Some(app) = id_field(record.get("app")) {
                let name = applications.name_or_unlisted(app);
                record.insert("x_app".to_owned(), Value::String(name.to_owned()));
            }
        }
    }
}

fn id_field(value: Option<&Value>) -> Option<u32> {
    value
        .and_then(Value::as_u64)
        .and_then(|id| u32::try_from(id).ok())
}
