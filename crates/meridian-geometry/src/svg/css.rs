//! Minimal CSS support: `<style>` rule blocks and inline `style` attributes.

use ahash::AHashMap;

/// Property name to value.
pub type Declarations = AHashMap<String, String>;

/// Rules collected from the document's `<style>` elements, keyed by selector.
///
/// Only plain selectors are matched by the loader (`.class` and `#id`).
/// Later rules for the same selector override earlier properties.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    rules: AHashMap<String, Declarations>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every rule found in `text`.
    pub fn parse(&mut self, text: &str) {
        let text = strip_comments(text);
        for block in text.split('}') {
            let Some((selectors, body)) = block.split_once('{') else {
                continue;
            };
            let declarations = parse_declarations(body);
            if declarations.is_empty() {
                continue;
            }
            for selector in selectors.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let entry = self.rules.entry(selector.to_string()).or_default();
                for (name, value) in &declarations {
                    entry.insert(name.clone(), value.clone());
                }
            }
        }
    }

    pub fn rule(&self, selector: &str) -> Option<&Declarations> {
        self.rules.get(selector)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Parse `name: value; name: value` pairs. Empty values are dropped.
pub fn parse_declarations(body: &str) -> Declarations {
    body.split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim();
            let value = value.trim().trim_end_matches("!important").trim();
            (!name.is_empty() && !value.is_empty())
                .then(|| (name.to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}
