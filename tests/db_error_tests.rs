//! Repository error construction, context propagation and retryability.

use inkbook::db::repository::{ErrorContext, RepositoryError};

#[test]
fn test_transient_constructors_are_retryable() {
    assert!(RepositoryError::connection("pool exhausted").is_retryable());
    assert!(RepositoryError::timeout("query took too long").is_retryable());
}

#[test]
fn test_permanent_constructors_are_not_retryable() {
    assert!(!RepositoryError::query("bad sql").is_retryable());
    assert!(!RepositoryError::not_found("appointment 9").is_retryable());
    assert!(!RepositoryError::validation("negative duration").is_retryable());
    assert!(!RepositoryError::configuration("missing url").is_retryable());
    assert!(!RepositoryError::internal("bug").is_retryable());
    assert!(!RepositoryError::transaction("rollback failed").is_retryable());
}

#[test]
fn test_query_with_retryable_context_is_retryable() {
    let err = RepositoryError::query_with_context(
        "serialization failure",
        ErrorContext::new("update_appointment").retryable(),
    );
    assert!(err.is_retryable());
}

#[test]
fn test_context_display_joins_fields() {
    let context = ErrorContext::new("store_appointment")
        .with_entity("appointment")
        .with_entity_id(42)
        .with_details("constraint violated")
        .retryable();
    assert_eq!(
        context.to_string(),
        "[operation=store_appointment, entity=appointment, id=42, details=constraint violated, retryable=true]"
    );

    assert_eq!(ErrorContext::default().to_string(), "[]");
}

#[test]
fn test_error_display_carries_message_and_context() {
    let err = RepositoryError::not_found_with_context(
        "appointment 42 not found",
        ErrorContext::new("get_appointment").with_entity_id(42),
    );
    let rendered = err.to_string();
    assert!(rendered.contains("Not found: appointment 42 not found"));
    assert!(rendered.contains("operation=get_appointment"));
    assert!(rendered.contains("id=42"));
}

#[test]
fn test_with_operation_stamps_the_context() {
    let err = RepositoryError::query("bad sql").with_operation("appointments_on");
    assert_eq!(err.context().operation.as_deref(), Some("appointments_on"));

    // Stamping again overwrites.
    let err = err.with_operation("list_appointments");
    assert_eq!(err.context().operation.as_deref(), Some("list_appointments"));
}
