// Analysis result parsing for the --result flag
//
// Each flag value is `PARAMETER=VALUE[:UNIT[:LIMIT]]`.
// Example: Nitrate=12:mg/L:50 becomes
// { "parameter": "Nitrate", "value": "12", "unit": "mg/L", "limit": "50" }

use anyhow::{anyhow, Result};
use aquacert_core::AnalysisResult;

/// Parses a list of result strings into analysis results.
///
/// - `pH=7.4` -> value only
/// - `Nitrate=12:mg/L` -> value and unit
/// - `pH=7.4::6.5-9.5` -> value and limit, no unit
/// - `Nitrate=12:mg/L:50` -> value, unit and limit
///
/// # Arguments
/// * `args` - A vector of strings in the format above
///
/// # Returns
/// * `Ok(Vec<AnalysisResult>)` - Results in the order given
/// * `Err` - If any argument is malformed
pub fn parse_results(args: Vec<String>) -> Result<Vec<AnalysisResult>> {
    args.iter().map(|arg| parse_result(arg)).collect()
}

/// Parses a single "parameter=value[:unit[:limit]]" string.
fn parse_result(arg: &str) -> Result<AnalysisResult> {
    let (parameter, rest) = arg.split_once('=').ok_or_else(|| {
        anyhow!(
            "Invalid result format: '{}'. Expected 'PARAMETER=VALUE[:UNIT[:LIMIT]]'",
            arg
        )
    })?;

    let parameter = parameter.trim();
    if parameter.is_empty() {
        return Err(anyhow!("Empty parameter in result: '{}'", arg));
    }

    let mut parts = rest.splitn(3, ':').map(str::trim);
    let value = parts.next().unwrap_or_default();
    if value.is_empty() {
        return Err(anyhow!("Empty value for parameter '{}'", parameter));
    }

    let mut result = AnalysisResult::new(parameter, value);
    if let Some(unit) = parts.next().filter(|u| !u.is_empty()) {
        result = result.with_unit(unit);
    }
    if let Some(limit) = parts.next().filter(|l| !l.is_empty()) {
        result = result.with_limit(limit);
    }

    Ok(result)
}
