//! Python snippet generation (requests library)

use super::escape::{python_literal, python_string};
use crate::errors::Result;
use crate::spec::{Body, ParamMap, RequestSpec};

/// Generate a Python program that performs the request with `requests`
pub fn generate_python(spec: &RequestSpec) -> Result<String> {
    let mut sections: Vec<String> = vec![
        "import requests".to_string(),
        format!("url = {}", python_string(spec.url())),
    ];
    let mut call_args: Vec<&str> = vec!["url"];

    if !spec.headers().is_empty() {
        sections.push(format!("headers = {}", dict_literal(spec.headers())));
        call_args.push("headers=headers");
    }

    if !spec.query_params().is_empty() {
        sections.push(format!("params = {}", dict_literal(spec.query_params())));
        call_args.push("params=params");
    }

    match spec.body() {
        Some(Body::Json { value, .. }) => {
            sections.push(format!("json_data = {}", python_literal(value)));
            call_args.push("json=json_data");
        }
        Some(Body::Raw(text)) => {
            sections.push(format!("data = {}", python_string(text)));
            call_args.push("data=data");
        }
        None => {}
    }

    sections.push(format!(
        "response = requests.request({}, {})",
        python_string(spec.method().as_str()),
        call_args.join(", ")
    ));
    sections.push("print(response.status_code)\nprint(response.text)".to_string());

    let mut code = sections.join("\n\n");
    code.push('\n');
    Ok(code)
}

/// String-to-string dict, one entry per line
fn dict_literal(map: &ParamMap) -> String {
    let entries: Vec<String> = map
        .iter()
        .map(|(k, v)| format!("  {}: {}", python_string(k), python_string(v)))
        .collect();
    format!("{{\n{}\n}}", entries.join(",\n"))
}
