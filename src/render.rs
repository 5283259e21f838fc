//! Result presentation.
//!
//! Pure templating over [`AnalysisResult`]: the six fixed fields in
//! order, a muted placeholder for anything the service could not find,
//! and the compliance-notes list only when it is non-empty.

use console::style;

use crate::classify::Failure;
use crate::models::AnalysisResult;

/// Placeholder shown for fields the service could not locate.
pub const NOT_FOUND_PLACEHOLDER: &str = "not found";

/// Render the result as plain text (no styling).
pub fn render_plain(result: &AnalysisResult) -> String {
    let mut out = String::new();
    for (label, value) in result.fields() {
        let shown = value.unwrap_or(NOT_FOUND_PLACEHOLDER);
        out.push_str(&format!("{:<20} {}\n", format!("{}:", label), shown));
    }
    if result.has_compliance_notes() {
        out.push('\n');
        out.push_str("Compliance Notes\n");
        for note in &result.compliance_notes {
            out.push_str(&format!("  - {}\n", note));
        }
    }
    out
}

/// Print the result to stdout with styling.
pub fn print_result(result: &AnalysisResult) {
    let separator = "─".repeat(70);

    println!();
    println!("{}", style("Document Analysis").bold());
    println!("{}", separator);

    for (label, value) in result.fields() {
        match value {
            Some(value) => println!("  {:<20} {}", format!("{}:", label), value),
            None => println!(
                "  {:<20} {}",
                format!("{}:", label),
                style(NOT_FOUND_PLACEHOLDER).dim()
            ),
        }
    }

    if result.has_compliance_notes() {
        println!();
        println!("{}", style("COMPLIANCE NOTES").cyan().bold());
        for note in &result.compliance_notes {
            println!("  - {}", note);
        }
    }

    println!("{}", separator);
}

/// Print a classified failure to stdout with styling.
pub fn print_failure(failure: &Failure) {
    println!(
        "{} {}",
        style(format!("[{}]", failure.kind.as_str())).red().bold(),
        failure.message
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_from(json: &str) -> AnalysisResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_missing_fields_marked_not_found() {
        let result = result_from(r#"{"effective_date": "2024-01-01", "insured_party": "J. Doe"}"#);
        let text = render_plain(&result);

        assert!(text.contains("Effective Date:"));
        assert!(text.contains("2024-01-01"));
        assert!(text.contains("J. Doe"));
        // Exactly the four absent fields carry the placeholder.
        assert_eq!(text.matches(NOT_FOUND_PLACEHOLDER).count(), 4);
    }

    #[test]
    fn test_compliance_section_omitted_when_empty() {
        let result = result_from(r#"{"effective_date": "2024-01-01"}"#);
        let text = render_plain(&result);
        assert!(!text.contains("Compliance Notes"));
    }

    #[test]
    fn test_compliance_notes_render_in_order() {
        let result = result_from(
            r#"{"compliance_notes": ["first note", "second note", "third note"]}"#,
        );
        let text = render_plain(&result);

        assert!(text.contains("Compliance Notes"));
        let first = text.find("first note").unwrap();
        let second = text.find("second note").unwrap();
        let third = text.find("third note").unwrap();
        assert!(first < second && second < third);
        assert_eq!(text.matches("  - ").count(), 3);
    }

    #[test]
    fn test_all_fields_present_no_placeholder() {
        let result = result_from(
            r#"{
                "effective_date": "2023-06-15",
                "insured_party": "Jane Roe",
                "underwriter": "First American",
                "legal_description": "Lot 4, Block 2",
                "exceptions": "Easement of record",
                "policy_amount": "$410,000"
            }"#,
        );
        let text = render_plain(&result);
        assert!(!text.contains(NOT_FOUND_PLACEHOLDER));
    }
}
