//! JavaScript snippet generation (async fetch)
//!
//! The generated program runs as-is under Node 18+ or in a browser console.

use super::escape::{canonical_json, js_string, query_separator, split_fragment};
use crate::errors::Result;
use crate::spec::{Body, ParamMap, RequestSpec};

/// Generate a JavaScript program that performs the request with `fetch`
pub fn generate_javascript(spec: &RequestSpec) -> Result<String> {
    let mut sections: Vec<String> = Vec::new();

    if spec.query_params().is_empty() {
        sections.push(format!("// API request\nconst url = {};", js_string(spec.url())));
    } else {
        let (base, fragment) = split_fragment(spec.url());
        let mut url_expr = String::from("baseUrl");
        match query_separator(base) {
            "" => {}
            separator => {
                url_expr.push_str(" + ");
                url_expr.push_str(&js_string(separator));
            }
        }
        url_expr.push_str(" + params.toString()");
        if let Some(fragment) = fragment {
            url_expr.push_str(" + ");
            url_expr.push_str(&js_string(&format!("#{}", fragment)));
        }

        sections.push(format!(
            "// API request\nconst baseUrl = {};\nconst params = new URLSearchParams({});\nconst url = {};",
            js_string(base),
            object_literal(spec.query_params()),
            url_expr,
        ));
    }

    let mut options: Vec<String> = vec![format!("method: {}", js_string(spec.method().as_str()))];

    if !spec.headers().is_empty() {
        sections.push(format!("const headers = {};", object_literal(spec.headers())));
        options.push("headers".to_string());
    }

    // fetch() rejects a GET request that carries a body
    let sends_body = !spec.method().is_default();

    let body_decl = match spec.body() {
        Some(Body::Json { value, .. }) => Some(format!("const body = JSON.stringify({});", canonical_json(value)?)),
        Some(Body::Raw(text)) => Some(format!("const body = {};", js_string(text))),
        None => None,
    };

    if let Some(decl) = body_decl {
        if sends_body {
            sections.push(decl);
            options.push("body".to_string());
        } else {
            sections.push(format!("// fetch() cannot send a body with GET; it is not passed below\n{}", decl));
        }
    }

    let mut main = String::from("async function main() {\n  const response = await fetch(url, {\n");
    for option in &options {
        main.push_str("    ");
        main.push_str(option);
        main.push_str(",\n");
    }
    main.push_str("  });\n");
    main.push_str("  const text = await response.text();\n");
    main.push_str("  let data;\n");
    main.push_str("  try {\n    data = JSON.parse(text);\n  } catch {\n    data = text;\n  }\n");
    main.push_str("  console.log(response.status, data);\n");
    main.push('}');
    sections.push(main);

    sections.push("main().catch((error) => console.error(\"Error:\", error));".to_string());

    let mut code = sections.join("\n\n");
    code.push('\n');
    Ok(code)
}

/// String-valued object literal with quoted keys, one entry per line
fn object_literal(map: &ParamMap) -> String {
    let entries: Vec<String> = map
        .iter()
        .map(|(k, v)| format!("  {}: {}", js_string(k), js_string(v)))
        .collect();
    format!("{{\n{}\n}}", entries.join(",\n"))
}
