use regex::Regex;

/// A port shape such as `80xx`: digits (any Unicode numeric character) are
/// literal and any other character stands for one or more digits. Matching is unanchored, so `80xx` also
/// accepts `18050`.
#[derive(Debug, Clone)]
pub struct PortPattern {
    source: String,
    regex: Regex,
}

impl PortPattern {
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let expression: String = pattern
            .chars()
            .map(|c| {
                if c.is_numeric() {
                    regex::escape(c.encode_utf8(&mut [0; 4]))
                } else {
                    "[0-9]+".to_string()
                }
            })
            .collect();

        Ok(Self {
            source: pattern.to_string(),
            regex: Regex::new(&expression)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, port: i64) -> bool {
        self.regex.is_match(&port.to_string())
    }

    pub fn filter(&self, candidates: &[i64]) -> Vec<i64> {
        candidates
            .iter()
            .copied()
            .filter(|&port| self.matches(port))
            .collect()
    }
}

/// Keeps the candidates matching `pattern`. An empty pattern keeps everything;
/// a pattern that fails to compile keeps nothing.
pub fn filter_ports(candidates: &[i64], pattern: &str) -> Vec<i64> {
    if pattern.is_empty() {
        return candidates.to_vec();
    }

    match PortPattern::compile(pattern) {
        Ok(pattern) => pattern.filter(candidates),
        Err(_) => Vec::new(),
    }
}
