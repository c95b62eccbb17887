//! Stored-procedure call rendering.
//!
//! A call is rendered as `EXEC <name> @Key = :Key, ...` with every argument
//! parameter-bound by name; the procedure name is a trusted identifier from
//! the routing layer, never raw end-user text. Argument order follows the
//! parameter set's insertion order but is semantically irrelevant since the
//! backend matches arguments by name.

use crate::params::ParamSet;

/// Render the call statement for a stored procedure.
///
/// An empty parameter set produces a bare `EXEC <name>`. The rendered text
/// still contains `:Key` placeholders; binding happens per backend at
/// execution time.
///
/// ```rust
/// use viewproc::params::ParamSet;
/// use viewproc::procs::build_call_statement;
///
/// let params = ParamSet::new().set("RoleId", 3).set("TeamCode", "T01");
/// assert_eq!(
///     build_call_statement("dbo.HR_GetTeamManager", &params),
///     "EXEC dbo.HR_GetTeamManager @RoleId = :RoleId, @TeamCode = :TeamCode",
/// );
/// ```
#[must_use]
pub fn build_call_statement(procedure: &str, params: &ParamSet) -> String {
    if params.is_empty() {
        return format!("EXEC {procedure}");
    }
    let args = params
        .iter()
        .map(|(name, _)| format!("@{name} = :{name}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("EXEC {procedure} {args}")
}
