use taches_api::validation::{
    missing_fields, parse_due_date, validate_board_title, validate_card, validate_list_title,
    validate_login, validate_registration,
};

// --- Missing-fields pass (aggregates ALL missing fields in one message) ---

#[test]
fn missing_fields_reports_every_missing_field_at_once() {
    // Omitting both titre and tableauId must yield one message naming both,
    // not just the first.
    let message = missing_fields(&[("tableauId", None), ("titre", None)]).unwrap();

    assert!(message.contains("tableauId"));
    assert!(message.contains("titre"));
    assert_eq!(message, "Champs manquants : tableauId, titre.");
}

#[test]
fn missing_fields_treats_empty_string_as_missing() {
    let message = missing_fields(&[("titre", Some("")), ("tableauId", Some("abc"))]).unwrap();

    assert!(message.contains("titre"));
    assert!(!message.contains("tableauId"));
}

#[test]
fn missing_fields_passes_when_everything_is_present() {
    assert!(missing_fields(&[("titre", Some("Tableau")), ("tableauId", Some("abc"))]).is_none());
}

// --- Schema pass (first violated rule wins, no aggregation) ---

#[test]
fn registration_reports_only_the_first_violation() {
    // Both the name and the password are invalid; only the name rule fires.
    let err = validate_registration("ab", "valide@exemple.com", "123", "123").unwrap_err();
    assert_eq!(err, "Le nom doit contenir entre 3 et 50 caractères");
}

#[test]
fn registration_rejects_bad_email_shape() {
    let err = validate_registration("Jean", "pas-un-courriel", "123456", "123456").unwrap_err();
    assert!(err.contains("courriel"));
}

#[test]
fn registration_rejects_mismatched_confirmation() {
    let err = validate_registration("Jean", "jean@exemple.com", "123456", "654321").unwrap_err();
    assert_eq!(
        err,
        "Le motDePasseConfirmation doit être identique à motDePasse"
    );
}

#[test]
fn registration_accepts_a_valid_payload() {
    assert!(validate_registration("Jean", "jean@exemple.com", "123456", "123456").is_ok());
}

#[test]
fn login_rejects_short_password() {
    let err = validate_login("jean@exemple.com", "12345").unwrap_err();
    assert_eq!(err, "Le mot de passe doit contenir entre 6 et 50 caractères");
}

#[test]
fn board_title_bounds() {
    assert!(validate_board_title("T").is_ok());
    assert!(validate_board_title("").is_err());
    assert!(validate_board_title(&"x".repeat(51)).is_err());
}

#[test]
fn list_title_is_checked_trimmed() {
    assert!(validate_list_title("  Liste  ").is_ok());
    assert!(validate_list_title("   ").is_err());
}

#[test]
fn card_rejects_oversized_description() {
    let err = validate_card("Carte", &"d".repeat(501)).unwrap_err();
    assert_eq!(err, "La description ne doit pas dépasser 500 caractères");
}

// --- Due-date parsing ---

#[test]
fn due_date_absent_or_null_literal_means_no_date() {
    assert_eq!(parse_due_date(None).unwrap(), None);
    assert_eq!(parse_due_date(Some("null")).unwrap(), None);
    assert_eq!(parse_due_date(Some("")).unwrap(), None);
}

#[test]
fn due_date_parses_rfc3339() {
    let parsed = parse_due_date(Some("2026-01-15T10:00:00Z")).unwrap();
    assert!(parsed.is_some());
}

#[test]
fn due_date_rejects_garbage() {
    let err = parse_due_date(Some("demain")).unwrap_err();
    assert_eq!(err, "La dateLimite doit être valide.");
}
