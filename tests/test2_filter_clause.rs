use viewproc::filter::{FilterSpec, build_filter_clause, select_statement};
use viewproc::types::RowValues;

#[test]
fn absent_values_are_dropped() {
    // RequestType came in as empty-string, meaning "no constraint".
    let spec = FilterSpec::new().field("RoleID", 12).field("RequestType", "");
    let filter = build_filter_clause(&spec);

    assert_eq!(filter.clause, "WHERE RoleID = :RoleID");
    assert_eq!(filter.params.len(), 1);
    assert_eq!(filter.params.get("RoleID"), Some(&RowValues::Int(12)));
    assert_eq!(filter.params.get("RequestType"), None);
}

#[test]
fn null_values_are_dropped_too() {
    let spec = FilterSpec::new()
        .field("RoleID", RowValues::Null)
        .field("TargetName", "Alavi");
    let filter = build_filter_clause(&spec);

    assert_eq!(filter.clause, "WHERE TargetName = :TargetName");
    assert_eq!(filter.params.len(), 1);
}

#[test]
fn empty_spec_selects_everything() {
    let filter = build_filter_clause(&FilterSpec::new());

    assert!(filter.clause.is_empty());
    assert!(filter.params.is_empty());
    assert_eq!(
        select_statement("V_HR_RoleTarget", &filter),
        "SELECT * FROM V_HR_RoleTarget"
    );
}

#[test]
fn predicates_join_with_and_in_insertion_order() {
    let spec = FilterSpec::new()
        .field("RoleID", 12)
        .field("RequestType", 4)
        .field("TeamCode", "T01");
    let filter = build_filter_clause(&spec);

    assert_eq!(
        filter.clause,
        "WHERE RoleID = :RoleID AND RequestType = :RequestType AND TeamCode = :TeamCode"
    );
    assert_eq!(
        select_statement("V_HR_RoleTarget", &filter),
        "SELECT * FROM V_HR_RoleTarget \
         WHERE RoleID = :RoleID AND RequestType = :RequestType AND TeamCode = :TeamCode"
    );
}

#[test]
fn values_are_bound_never_spliced() {
    let spec = FilterSpec::new().field("RoleID", 12);
    let filter = build_filter_clause(&spec);

    assert!(filter.clause.contains(":RoleID"));
    assert!(!filter.clause.contains("12"));
}
