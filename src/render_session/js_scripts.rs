//! JavaScript evaluation scripts
//!
//! Probes return plain strings so a missing element comes back as `""`
//! rather than a `null` remote object.

/// Document state used by the readiness wait loop
pub const READINESS_SCRIPT: &str = r#"
    (() => ({
        readyState: document.readyState,
        href: location.href
    }))()
"#;

/// Text of every JSON-LD block on the page
pub const STRUCTURED_DATA_SCRIPT: &str = r#"
    (() => Array.from(document.querySelectorAll('script[type="application/ld+json"]'))
        .map(script => script.textContent || ''))()
"#;

/// Text content of the first element matching `selector`
#[must_use]
pub fn text_content_script(selector: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({sel}); return el ? (el.textContent || '') : ''; }})()",
        sel = js_string(selector)
    )
}

/// Attribute value of the first element matching `selector`
#[must_use]
pub fn attribute_script(selector: &str, name: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({sel}); return el ? (el.getAttribute({attr}) || '') : ''; }})()",
        sel = js_string(selector),
        attr = js_string(name)
    )
}

/// Quote a Rust string as a JavaScript string literal
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "''".to_string())
}
