//! Standalone HTML documents.
//!
//! The page pulls the Vega runtime from the jsDelivr CDN and embeds the chart
//! spec inline, so it renders with no server round trip after load.

use phipsi_core::{PhipsiError, Result};

use crate::item::ChartItem;

/// CDN scripts, in load order.
pub const CDN_SCRIPTS: [&str; 3] = [
    "https://cdn.jsdelivr.net/npm/vega@5",
    "https://cdn.jsdelivr.net/npm/vega-lite@5",
    "https://cdn.jsdelivr.net/npm/vega-embed@6",
];

/// Escape text for use in HTML element content or a quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make JSON safe to place inside a `<script>` element. `<` only occurs
/// inside JSON strings, where the `\u003c` escape decodes to the same
/// character.
fn script_safe_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}

pub(crate) fn standalone_document(item: &ChartItem) -> Result<String> {
    let spec = serde_json::to_string(&item.spec)
        .map_err(|e| PhipsiError::Other(format!("chart serialization failed: {}", e)))?;
    let target = item.target_id.as_deref().unwrap_or(&item.root_id);
    let target = escape_html(target);

    let scripts: String = CDN_SCRIPTS
        .iter()
        .map(|src| format!("    <script src=\"{}\"></script>\n", src))
        .collect();

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>{title}</title>
{scripts}  </head>
  <body>
    <div id="{target}"></div>
    <script type="text/javascript">
      const spec = {spec};
      vegaEmbed(document.getElementById("{target}"), spec, {{ renderer: "svg", actions: false }})
        .catch(console.error);
    </script>
  </body>
</html>
"#,
        title = escape_html(item.title()),
        scripts = scripts,
        target = target,
        spec = script_safe_json(&spec),
    ))
}
