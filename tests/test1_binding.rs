use viewproc::binding::{PlaceholderStyle, bind_named};
use viewproc::params::ParamSet;
use viewproc::procs::build_call_statement;
use viewproc::types::RowValues;

#[test]
fn mssql_placeholders_are_rewritten_positionally() {
    let params = ParamSet::new()
        .set("nc", "0012345678")
        .set("active", true);
    let bound = bind_named(
        "SELECT * FROM Users WHERE NationalCode = :nc AND Active = :active",
        &params,
        PlaceholderStyle::Mssql,
    )
    .unwrap();

    assert_eq!(
        bound.sql,
        "SELECT * FROM Users WHERE NationalCode = @P1 AND Active = @P2"
    );
    assert_eq!(bound.params.len(), 2);
    assert_eq!(bound.params[0].0, "nc");
    assert_eq!(bound.params[1].1, RowValues::Bool(true));
}

#[test]
fn sqlite_placeholders_keep_their_names() {
    let params = ParamSet::new().set("nc", "0012345678");
    let sql = "SELECT * FROM Users WHERE NationalCode = :nc";
    let bound = bind_named(sql, &params, PlaceholderStyle::Sqlite).unwrap();

    assert_eq!(bound.sql, sql);
    assert_eq!(bound.params.len(), 1);
}

#[test]
fn extra_parameter_keys_are_inert() {
    let params = ParamSet::new()
        .set("nc", "0012345678")
        .set("unused", 99);
    let bound = bind_named(
        "SELECT * FROM Users WHERE NationalCode = :nc",
        &params,
        PlaceholderStyle::Mssql,
    )
    .unwrap();

    assert_eq!(bound.params.len(), 1);
    assert_eq!(bound.params[0].0, "nc");
}

#[test]
fn missing_parameter_key_fails_the_statement() {
    let err = bind_named(
        "SELECT * FROM Users WHERE NationalCode = :missing",
        &ParamSet::new(),
        PlaceholderStyle::Mssql,
    )
    .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains(":missing"), "unexpected message: {msg}");
}

#[test]
fn placeholders_in_literals_comments_and_brackets_are_skipped() {
    let params = ParamSet::new().set("a", 1);

    let bound = bind_named(
        "SELECT ':nope' AS x FROM t WHERE a = :a",
        &params,
        PlaceholderStyle::Mssql,
    )
    .unwrap();
    assert_eq!(bound.sql, "SELECT ':nope' AS x FROM t WHERE a = @P1");
    assert_eq!(bound.params.len(), 1);

    let bound = bind_named(
        "SELECT 1 FROM t -- :commented\nWHERE a = :a",
        &params,
        PlaceholderStyle::Mssql,
    )
    .unwrap();
    assert_eq!(bound.sql, "SELECT 1 FROM t -- :commented\nWHERE a = @P1");

    let bound = bind_named(
        "SELECT [odd:name] FROM t /* :blocked */ WHERE a = :a",
        &params,
        PlaceholderStyle::Mssql,
    )
    .unwrap();
    assert_eq!(
        bound.sql,
        "SELECT [odd:name] FROM t /* :blocked */ WHERE a = @P1"
    );
}

#[test]
fn repeated_placeholder_reuses_one_ordinal() {
    let params = ParamSet::new().set("x", 5);
    let bound = bind_named(
        "SELECT * FROM t WHERE a = :x OR b = :x",
        &params,
        PlaceholderStyle::Mssql,
    )
    .unwrap();

    assert_eq!(bound.sql, "SELECT * FROM t WHERE a = @P1 OR b = @P1");
    assert_eq!(bound.params.len(), 1);
}

#[test]
fn procedure_call_renders_named_arguments() {
    let params = ParamSet::new().set("RoleId", 3).set("TeamCode", "T01");
    let sql = build_call_statement("HR_GetTeamManager", &params);
    assert_eq!(
        sql,
        "EXEC HR_GetTeamManager @RoleId = :RoleId, @TeamCode = :TeamCode"
    );

    // Bound for SQL Server, both named arguments become positional markers.
    let bound = bind_named(&sql, &params, PlaceholderStyle::Mssql).unwrap();
    assert_eq!(
        bound.sql,
        "EXEC HR_GetTeamManager @RoleId = @P1, @TeamCode = @P2"
    );
    assert_eq!(bound.params[0].1, RowValues::Int(3));
    assert_eq!(bound.params[1].1, RowValues::Text("T01".to_string()));
}

#[test]
fn empty_parameter_set_renders_a_bare_call() {
    assert_eq!(
        build_call_statement("dbo.HR_RefreshTargets", &ParamSet::new()),
        "EXEC dbo.HR_RefreshTargets"
    );
}
