use anyhow::{Context, Result, bail};
use chrono::Utc;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse a comma-separated cadence list such as `1,7,14`.
pub fn parse_cadences(raw: &str) -> Result<Vec<u32>> {
    let tokens = split_csv(raw);
    if tokens.is_empty() {
        bail!("no cadences given in '{raw}'");
    }
    tokens
        .iter()
        .map(|token| {
            token
                .parse::<u32>()
                .with_context(|| format!("invalid cadence '{token}'"))
        })
        .collect()
}

pub fn report_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
