//! Recipient records read back from the identifier file
//!
//! A mailer downstream of the crawl consumes `{email, name, line}` records.

use crate::output::traits::OutputResult;
use std::path::Path;

/// One address from the identifier file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub email: String,

    /// Display name guessed from the local part
    pub name: String,

    /// 1-based line number in the source file
    pub line: usize,
}

impl Recipient {
    /// The domain part of the address, as written
    pub fn domain(&self) -> &str {
        self.email.rsplit_once('@').map(|(_, d)| d).unwrap_or("")
    }
}

/// Reads recipients from an identifier file
///
/// Every non-empty line containing `@` becomes a record; other lines are
/// skipped.
///
/// # Returns
///
/// * `Ok(Vec<Recipient>)` - Records in file order
/// * `Err(OutputError)` - The file could not be read
pub fn load_recipients(path: impl AsRef<Path>) -> OutputResult<Vec<Recipient>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    let recipients: Vec<Recipient> = content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let email = line.trim();
            if email.is_empty() || !email.contains('@') {
                return None;
            }
            Some(Recipient {
                email: email.to_string(),
                name: name_from_email(email),
                line: index + 1,
            })
        })
        .collect();

    tracing::info!("Loaded {} recipients from {}", recipients.len(), path.display());
    Ok(recipients)
}

/// Keeps recipients on `only_domain` (if given) and not on any excluded domain
///
/// Domains compare case-insensitively.
pub fn filter_recipients(
    recipients: Vec<Recipient>,
    only_domain: Option<&str>,
    exclude_domains: &[String],
) -> Vec<Recipient> {
    recipients
        .into_iter()
        .filter(|r| {
            let domain = r.domain();
            let included = only_domain.map_or(true, |d| domain.eq_ignore_ascii_case(d));
            let excluded = exclude_domains
                .iter()
                .any(|d| domain.eq_ignore_ascii_case(d));
            included && !excluded
        })
        .collect()
}

/// Derives a display name: `first.last@x` becomes `First Last`
///
/// The local part is split on `.`, `_` and `-`; each word is title-cased.
pub fn name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or("");

    local
        .split(['.', '_', '-'])
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
