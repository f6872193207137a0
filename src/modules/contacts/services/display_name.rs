//! Display-name options offered for a contact.
//!
//! Each format lists its placeholder values and which of them must be
//! present. Formats missing a required value are skipped; the rest are
//! rendered by substituting placeholders in order, trimming after every
//! substitution and collapsing whitespace runs. A value is present when it
//! is non-empty, so a blank `" "` still counts, and a rendered label may be
//! empty.

use serde::{Deserialize, Serialize};

/// Name parts a display name can be built from
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayNameParts<'a> {
    pub salutation: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub company_name: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayNameOption {
    pub label: String,
}

struct DisplayNameFormat<'a> {
    pattern: &'static str,
    values: Vec<Option<&'a str>>,
    /// 1-based positions that must be present
    required: &'static [usize],
}

pub fn display_name_options(parts: DisplayNameParts<'_>) -> Vec<DisplayNameOption> {
    let salutation = present(parts.salutation);
    let first_name = present(parts.first_name);
    let last_name = present(parts.last_name);
    let company_name = present(parts.company_name);

    let formats = [
        DisplayNameFormat {
            pattern: "{1} {2} {3}",
            values: vec![salutation, first_name, last_name],
            required: &[1],
        },
        DisplayNameFormat {
            pattern: "{1} {2}",
            values: vec![first_name, last_name],
            required: &[],
        },
        DisplayNameFormat {
            pattern: "{1}, {2}",
            values: vec![first_name, last_name],
            required: &[1, 2],
        },
        DisplayNameFormat {
            pattern: "{1}",
            values: vec![company_name],
            required: &[1],
        },
    ];

    formats
        .iter()
        .filter(|format| {
            format
                .required
                .iter()
                .all(|&position| format.values[position - 1].is_some())
        })
        .map(render)
        .map(|label| DisplayNameOption { label })
        .collect()
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn render(format: &DisplayNameFormat<'_>) -> String {
    let mut label = format.pattern.to_string();

    for (idx, value) in format.values.iter().enumerate() {
        let placeholder = format!("{{{}}}", idx + 1);
        label = label
            .replacen(&placeholder, value.unwrap_or(""), 1)
            .trim()
            .to_string();
    }

    label.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Default display name: the first option with a non-empty label
pub fn default_display_name(parts: DisplayNameParts<'_>) -> Option<String> {
    display_name_options(parts)
        .into_iter()
        .map(|option| option.label)
        .find(|label| !label.is_empty())
}
