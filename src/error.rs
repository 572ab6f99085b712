// Resolves the §9 open question: an RPC error on an outbound RequestAccess
// is ambiguous in the source system. `Lenient` reproduces the source's
// behavior (count it as a non-grant, proceed anyway, just warn); `Strict`
// aborts the attempt back to RELEASED instead of proceeding without a
// unanimous grant set.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrantPolicy {
    #[default]
    Lenient,
    Strict,
}

impl FromStr for GrantPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lenient" => Ok(GrantPolicy::Lenient),
            "strict" => Ok(GrantPolicy::Strict),
            other => Err(format!("unknown grant policy `{other}`, expected lenient or strict")),
        }
    }
}
