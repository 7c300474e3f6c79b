use chrono::{DateTime, Utc};

// Field validation for the REST payloads.
//
// Two deliberately different aggregation policies coexist here:
// - `missing_fields` runs first and reports ALL absent fields in one message;
// - the schema functions run second and report only the FIRST violated rule.
// The client-facing messages are the French wire contract.

/// missing_fields
///
/// Checks that every named field is present and non-empty. Returns a single
/// aggregated message naming all missing fields, e.g.
/// `"Champs manquants : titre, tableauId."`, or `None` when everything is there.
pub fn missing_fields(fields: &[(&str, Option<&str>)]) -> Option<String> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_none_or(|v| v.is_empty()))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(format!("Champs manquants : {}.", missing.join(", ")))
    }
}

fn is_valid_email(email: &str) -> bool {
    // Same pragmatic shape check the original relied on: one '@' with a dotted
    // domain part, no whitespace.
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// validate_registration
///
/// Schema for POST /inscription. First violated rule wins.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    password_confirmation: &str,
) -> Result<(), String> {
    if name.len() < 3 || name.len() > 50 {
        return Err("Le nom doit contenir entre 3 et 50 caractères".to_string());
    }
    if !is_valid_email(email) || email.len() > 50 {
        return Err(
            "Le courriel doit être valide, est obligatoire et ne doit pas dépasser 50 caractères"
                .to_string(),
        );
    }
    if password.len() < 6 || password.len() > 50 {
        return Err("Le mot de passe doit contenir entre 6 et 50 caractères".to_string());
    }
    if password_confirmation != password {
        return Err("Le motDePasseConfirmation doit être identique à motDePasse".to_string());
    }
    Ok(())
}

/// validate_login
///
/// Schema for POST /connexion.
pub fn validate_login(email: &str, password: &str) -> Result<(), String> {
    if !is_valid_email(email) || email.len() > 50 {
        return Err(
            "Le courriel doit être valide, est obligatoire et ne doit pas dépasser 50 caractères"
                .to_string(),
        );
    }
    if password.len() < 6 || password.len() > 50 {
        return Err("Le mot de passe doit contenir entre 6 et 50 caractères".to_string());
    }
    Ok(())
}

/// validate_board_title
pub fn validate_board_title(title: &str) -> Result<(), String> {
    if title.is_empty() || title.len() > 50 {
        return Err("Le titre du tableau doit contenir entre 1 et 50 caractères".to_string());
    }
    Ok(())
}

/// validate_list_title
pub fn validate_list_title(title: &str) -> Result<(), String> {
    let trimmed = title.trim();
    if trimmed.is_empty() || trimmed.len() > 50 {
        return Err("La liste du tableau doit contenir entre 1 et 50 caractères".to_string());
    }
    Ok(())
}

/// validate_card
///
/// Schema for card creation/update: title 1-50 (trimmed), description up to 500.
pub fn validate_card(title: &str, description: &str) -> Result<(), String> {
    let trimmed = title.trim();
    if trimmed.is_empty() || trimmed.len() > 50 {
        // Wording kept as shipped.
        return Err("La titre doit contenir entre 1 et 50 caractères.".to_string());
    }
    if description.len() > 500 {
        return Err("La description ne doit pas dépasser 500 caractères".to_string());
    }
    Ok(())
}

/// parse_due_date
///
/// A due date arrives as an RFC 3339 string, the literal string "null" (the
/// front-end's encoding of "no date"), or not at all. Anything else is a
/// validation failure.
pub fn parse_due_date(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, String> {
    match raw {
        None | Some("null") | Some("") => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|d| Some(d.with_timezone(&Utc)))
            .map_err(|_| "La dateLimite doit être valide.".to_string()),
    }
}
