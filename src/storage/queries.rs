//! SQL query builders.
//!
//! Generates parameterized queries for scan persistence. Actual execution is
//! handled by the host application, which must run the history insert and all
//! result inserts inside a single transaction so a summary never references
//! partial data.

/// Columns for the mqtt_scan_histories table.
///
/// Returns tuples of (column_name, parameter_placeholder).
pub fn scan_history_columns() -> Vec<(&'static str, &'static str)> {
    vec![
        ("id", "$1"),
        ("user_id", "$2"),
        ("target", "$3"),
        ("started_at", "$4"),
        ("completed_at", "$5"),
        ("duration", "$6"),
        ("status", "$7"),
        ("total_targets", "$8"),
        ("reachable_count", "$9"),
        ("unreachable_count", "$10"),
        ("vulnerable_count", "$11"),
        ("error_message", "$12"),
    ]
}

/// Columns for the mqtt_scan_results table.
pub fn scan_result_columns() -> Vec<(&'static str, &'static str)> {
    vec![
        ("scan_history_id", "$1"),
        ("user_id", "$2"),
        ("ip", "$3"),
        ("port", "$4"),
        ("status", "$5"),
        ("classification", "$6"),
        ("outcome", "$7"),
        ("auth_required", "$8"),
        ("anonymous_allowed", "$9"),
        ("tls", "$10"),
        // Certificate
        ("cert_subject", "$11"),
        ("cert_issuer", "$12"),
        ("cert_not_before", "$13"),
        ("cert_not_after", "$14"),
        ("cert_error", "$15"),
        // Topic statistics
        ("sys_topic_count", "$16"),
        ("regular_topic_count", "$17"),
        ("retained_count", "$18"),
        // JSON text columns
        ("topics", "$19"),
        ("publishers", "$20"),
        // Diagnostics
        ("error", "$21"),
        ("response_time", "$22"),
    ]
}

/// Build the INSERT for mqtt_scan_histories.
pub fn build_history_insert() -> String {
    build_insert("mqtt_scan_histories", &scan_history_columns())
}

/// Build the INSERT for mqtt_scan_results.
pub fn build_result_insert() -> String {
    build_insert("mqtt_scan_results", &scan_result_columns())
}

/// Build the terminal-state update for mqtt_scan_histories.
///
/// Only a running row may be updated; terminal states never transition.
pub fn build_history_finalize() -> &'static str {
    r#"
    UPDATE mqtt_scan_histories
    SET status = $2, completed_at = $3, duration = $4,
        total_targets = $5, reachable_count = $6,
        unreachable_count = $7, vulnerable_count = $8,
        error_message = $9
    WHERE id = $1 AND status = 'running'
    "#
}

/// Build the owner-scoped select for one scan run.
pub fn build_history_select() -> &'static str {
    "SELECT * FROM mqtt_scan_histories WHERE id = $1 AND user_id = $2"
}

/// Build the ordered select for a run's results.
pub fn build_results_select() -> &'static str {
    "SELECT * FROM mqtt_scan_results WHERE scan_history_id = $1 ORDER BY id"
}

fn build_insert(table: &str, columns: &[(&str, &str)]) -> String {
    let col_names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    let placeholders: Vec<&str> = columns.iter().map(|(_, ph)| *ph).collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        col_names.join(", "),
        placeholders.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_insert_query() {
        let query = build_history_insert();
        assert!(query.contains("INSERT INTO mqtt_scan_histories"));
        assert!(query.contains("vulnerable_count"));
        assert!(query.contains("$12"));
    }

    #[test]
    fn test_result_insert_query() {
        let query = build_result_insert();
        assert!(query.contains("INSERT INTO mqtt_scan_results"));
        assert!(query.contains("scan_history_id"));
        assert!(query.contains("publishers"));
    }

    #[test]
    fn test_result_column_count() {
        assert_eq!(scan_result_columns().len(), 22);
    }

    #[test]
    fn test_finalize_guards_terminal_states() {
        assert!(build_history_finalize().contains("status = 'running'"));
    }
}
