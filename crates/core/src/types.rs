/// Monitored entities (SAP Cloud Connector subaccounts) are identified by an
/// opaque, free-text string.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Check that an entity id can be embedded in a quoted local-check service
/// name. Returns the reason when it cannot.
pub fn check_entity_id(entity_id: &str) -> Result<(), &'static str> {
    if entity_id.trim().is_empty() {
        return Err("must not be empty");
    }
    if entity_id.contains('"') {
        return Err("must not contain double quotes");
    }
    if entity_id.chars().any(char::is_control) {
        return Err("must not contain control characters or line breaks");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ids_are_accepted() {
        assert_eq!(check_entity_id("SA1"), Ok(()));
        assert_eq!(check_entity_id("my subaccount (eu10)"), Ok(()));
    }

    #[test]
    fn ids_that_break_the_service_line_are_rejected() {
        assert_eq!(check_entity_id("  "), Err("must not be empty"));
        assert_eq!(check_entity_id("SA1\" x"), Err("must not contain double quotes"));
        assert!(check_entity_id("SA1\n2 FORGED").is_err());
        assert!(check_entity_id("SA1\r").is_err());
        assert!(check_entity_id("SA1\tx").is_err());
    }
}
