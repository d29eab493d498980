//! Static documentation site used across harnesses.
//!
//! ```text
//! design (root)
//! ├── DisplayData
//! │   ├── Table        [grid, tabular]
//! │   └── List         [rows]
//! ├── Inputs
//! │   ├── Text Field   [input, form]
//! │   └── Button       [action, cta]
//! └── Feedback
//!     ├── Alert        [notice]
//!     └── Dialog       [modal]
//! ```

/// Nested manifest for the site above.
pub const MANIFEST_NESTED: &str = r#"{
  "root": {
    "title": "design", "url": "/",
    "children": [
      {"title": "DisplayData", "url": "DisplayData", "children": [
        {"title": "Table", "url": "DisplayData/Table", "children": null, "meta": {"keywords": ["grid", "tabular"]}},
        {"title": "List", "url": "DisplayData/List", "meta": {"keywords": ["rows"]}}
      ]},
      {"title": "Inputs", "url": "Inputs", "children": [
        {"title": "Text Field", "url": "Inputs/Text Field", "meta": {"keywords": ["input", "form"]}},
        {"title": "Button", "url": "Inputs/Button", "meta": {"keywords": ["action", "cta"]}}
      ]},
      {"title": "Feedback", "url": "Feedback", "children": [
        {"title": "Alert", "url": "Feedback/Alert", "meta": {"keywords": ["notice"]}},
        {"title": "Dialog", "url": "Feedback/Dialog", "meta": {"keywords": ["modal"]}}
      ]}
    ]
  }
}"#;

/// The same site as a flat listing inside a JSEND envelope.
pub const MANIFEST_FLAT_ENVELOPE: &str = r#"{
  "status": "success",
  "data": {"nodes": [
    {"title": "design", "url": "/"},
    {"title": "DisplayData", "url": "DisplayData"},
    {"title": "Table", "url": "DisplayData/Table", "keywords": ["grid", "tabular"]},
    {"title": "List", "url": "DisplayData/List", "keywords": ["rows"]},
    {"title": "Inputs", "url": "Inputs"},
    {"title": "Text Field", "url": "Inputs/Text Field", "keywords": ["input", "form"]},
    {"title": "Button", "url": "Inputs/Button", "keywords": ["action", "cta"]},
    {"title": "Feedback", "url": "Feedback"},
    {"title": "Alert", "url": "Feedback/Alert", "keywords": ["notice"]},
    {"title": "Dialog", "url": "Feedback/Dialog", "keywords": ["modal"]}
  ]}
}"#;

/// Full outline of the unfiltered site.
pub const FULL_OUTLINE: &str = "\
- DisplayData
  - Table
  - List
- Inputs
  - Text Field
  - Button
- Feedback
  - Alert
  - Dialog
";

/// HTML fragment for a node: heading, one paragraph, and its keywords.
pub fn page(title: &str, keywords: &[&str]) -> String {
    let items: String = keywords
        .iter()
        .map(|k| format!(r#"<li class="keyword">{k}</li>"#))
        .collect();
    format!("<article><h1>{title}</h1><p>About {title}.</p><ul>{items}</ul></article>")
}

/// `(node url, html)` for every page of the site.
pub fn pages() -> Vec<(&'static str, String)> {
    vec![
        ("DisplayData", page("DisplayData", &[])),
        ("DisplayData/Table", page("Table", &["grid", "tabular"])),
        ("DisplayData/List", page("List", &["rows"])),
        ("Inputs", page("Inputs", &[])),
        ("Inputs/Text Field", page("Text Field", &["input", "form"])),
        ("Inputs/Button", page("Button", &["action", "cta"])),
        ("Feedback", page("Feedback", &[])),
        ("Feedback/Alert", page("Alert", &["notice"])),
        ("Feedback/Dialog", page("Dialog", &["modal"])),
    ]
}
