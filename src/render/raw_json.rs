use crate::error::RenderError;
use crate::model::JobRecord;

/// Raw record dump, the introspection contract for other tooling: field
/// names are stable and `parse(render(records)) == records` for any valid
/// list, including the empty one.
pub fn render(records: &[JobRecord]) -> Result<String, RenderError> {
    let mut out = serde_json::to_string_pretty(records)?;
    out.push('\n');
    Ok(out)
}

pub fn parse(s: &str) -> Result<Vec<JobRecord>, RenderError> {
    Ok(serde_json::from_str(s)?)
}
