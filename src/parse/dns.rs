// ABOUTME: Parser for the line-oriented `system dns list` output.
// ABOUTME: A leading `*` marks the default domain.

use crate::model::DnsDomain;

const DEFAULT_MARKER: char = '*';

/// Parse DNS domain lines. Only the first marked line is taken as default.
pub fn parse_dns_domains(output: &str) -> Vec<DnsDomain> {
    let mut seen_default = false;
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (domain, marked) = match line.strip_prefix(DEFAULT_MARKER) {
                Some(rest) => (rest.trim(), true),
                None => (line, false),
            };
            if domain.is_empty() {
                return None;
            }
            let is_default = marked && !seen_default;
            seen_default |= is_default;
            Some(DnsDomain {
                domain: domain.to_string(),
                is_default,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_line_is_default() {
        let domains = parse_dns_domains("*example.com\nother.com\n");
        assert_eq!(
            domains,
            vec![
                DnsDomain {
                    domain: "example.com".into(),
                    is_default: true
                },
                DnsDomain {
                    domain: "other.com".into(),
                    is_default: false
                },
            ]
        );
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert!(parse_dns_domains("\n   \n").is_empty());
    }

    #[test]
    fn only_first_marker_wins() {
        let domains = parse_dns_domains("* a.test\n*b.test\n");
        assert!(domains[0].is_default);
        assert!(!domains[1].is_default);
        assert_eq!(domains[1].domain, "b.test");
    }
}
