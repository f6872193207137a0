// Display name options offered when creating customers and vendors

use ledgerdesk::modules::contacts::services::{
    default_display_name, display_name_options, DisplayNameParts,
};

fn labels(parts: DisplayNameParts<'_>) -> Vec<String> {
    display_name_options(parts)
        .into_iter()
        .map(|option| option.label)
        .collect()
}

#[test]
fn test_first_and_last_name_only() {
    let parts = DisplayNameParts {
        first_name: Some("Ahmed"),
        last_name: Some("Bouhuolia"),
        ..DisplayNameParts::default()
    };

    // Salutation format needs a salutation, company format needs a company
    assert_eq!(labels(parts), vec!["Ahmed Bouhuolia", "Ahmed, Bouhuolia"]);
}

#[test]
fn test_salutation_without_names() {
    let parts = DisplayNameParts {
        salutation: Some("Dr."),
        ..DisplayNameParts::default()
    };

    // The name format is still offered, rendered empty
    assert_eq!(labels(parts), vec!["Dr.", ""]);
    assert_eq!(default_display_name(parts).as_deref(), Some("Dr."));
}

#[test]
fn test_comma_format_requires_both_names() {
    let parts = DisplayNameParts {
        last_name: Some("Bouhuolia"),
        company_name: Some("Bigcapital"),
        ..DisplayNameParts::default()
    };

    assert_eq!(labels(parts), vec!["Bouhuolia", "Bigcapital"]);
}

#[test]
fn test_blank_parts_count_as_present() {
    let parts = DisplayNameParts {
        salutation: Some("   "),
        first_name: Some("  Sara "),
        last_name: Some(""),
        company_name: None,
    };

    // A blank salutation keeps the salutation format; an empty last name
    // still drops the comma format
    assert_eq!(labels(parts), vec!["Sara", "Sara"]);
}

#[test]
fn test_whitespace_is_collapsed() {
    let parts = DisplayNameParts {
        salutation: Some("Ms."),
        first_name: Some("Mary  Ann"),
        last_name: Some("Smith"),
        company_name: None,
    };

    assert_eq!(labels(parts)[0], "Ms. Mary Ann Smith");
}

#[test]
fn test_company_only_defaults_to_company() {
    let parts = DisplayNameParts {
        company_name: Some("Acme Corp"),
        ..DisplayNameParts::default()
    };

    assert_eq!(default_display_name(parts).as_deref(), Some("Acme Corp"));
}

#[test]
fn test_nothing_to_offer() {
    assert_eq!(default_display_name(DisplayNameParts::default()), None);
}
