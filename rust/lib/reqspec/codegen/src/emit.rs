//! JSON emitter: the shipped `SpecEmitter`.

use reqspec_ir::{ResolvedRequestSpec, SpecEmitter};
use reqspec_resolve::ResolutionReport;
use serde_json::{json, Value};

/// Emits each spec as a JSON object.
pub struct JsonEmitter;

impl SpecEmitter for JsonEmitter {
    type Output = Value;
    type Error = serde_json::Error;

    fn emit(&self, spec: &ResolvedRequestSpec) -> Result<Value, serde_json::Error> {
        let mut value = serde_json::to_value(spec)?;
        value["template"] = json!(spec.url_template());
        value["standard"] = json!(spec.is_standard_method());
        Ok(value)
    }
}

/// The report of one root type.
pub fn report_json(report: &ResolutionReport) -> Result<Value, serde_json::Error> {
    let specs = JsonEmitter.emit_all(&report.specs)?;
    let duplicates: Vec<String> = report
        .duplicate_signatures()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    Ok(json!({
        "root": report.root,
        "specs": specs,
        "duplicates": duplicates,
        "failures": report.failures.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "typeErrors": report.type_errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
    }))
}

/// All reports as one JSON document.
pub fn render(reports: &[ResolutionReport], pretty: bool) -> Result<String, serde_json::Error> {
    let doc = Value::Array(reports.iter().map(report_json).collect::<Result<_, _>>()?);
    if pretty {
        serde_json::to_string_pretty(&doc)
    } else {
        serde_json::to_string(&doc)
    }
}
