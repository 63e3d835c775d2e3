//! Column discovery: matching table headers to semantic roles.

use tracing::{debug, warn};

use crate::error::BatchError;
use crate::models::config::RoleAliases;
use crate::models::receipt::{BoundColumn, ColumnBinding, SemanticRole};

/// Roles that matched no header, plus the headers that were seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError {
    pub missing: Vec<SemanticRole>,
    pub headers: Vec<String>,
}

impl From<ResolveError> for BatchError {
    fn from(err: ResolveError) -> Self {
        BatchError::MissingColumns {
            missing: err.missing,
            headers: err.headers,
        }
    }
}

/// Find the first header matching any alias of a role.
///
/// Aliases are tried in priority order and, for each alias, headers in table
/// order. A header matches when it contains the alias, ignoring case and
/// surrounding whitespace. Blank aliases never match.
pub fn find_column(headers: &[String], aliases: &[String]) -> Option<BoundColumn> {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    for alias in aliases {
        let alias = alias.trim().to_lowercase();
        if alias.is_empty() {
            continue;
        }

        if let Some(index) = lowered.iter().position(|h| h.contains(&alias)) {
            return Some(BoundColumn {
                header: headers[index].clone(),
                index,
            });
        }
    }

    None
}

/// Bind every semantic role to a header, or report all roles left unbound.
pub fn resolve_columns(
    headers: &[String],
    aliases: &RoleAliases,
) -> Result<ColumnBinding, ResolveError> {
    let payee = find_column(headers, aliases.for_role(SemanticRole::Payee));
    let amount = find_column(headers, aliases.for_role(SemanticRole::Amount));
    let work = find_column(headers, aliases.for_role(SemanticRole::Work));

    match (payee, amount, work) {
        (Some(payee), Some(amount), Some(work)) => {
            let binding = ColumnBinding { payee, amount, work };
            warn_on_shared_columns(&binding);
            debug!(
                "Bound columns: payee={:?}, amount={:?}, work={:?}",
                binding.payee.header, binding.amount.header, binding.work.header
            );
            Ok(binding)
        }
        (payee, amount, work) => {
            let missing = [
                (SemanticRole::Payee, payee.is_none()),
                (SemanticRole::Amount, amount.is_none()),
                (SemanticRole::Work, work.is_none()),
            ]
            .into_iter()
            .filter_map(|(role, is_missing)| is_missing.then_some(role))
            .collect();

            Err(ResolveError {
                missing,
                headers: headers.to_vec(),
            })
        }
    }
}

fn warn_on_shared_columns(binding: &ColumnBinding) {
    for (i, a) in SemanticRole::ALL.iter().enumerate() {
        for b in &SemanticRole::ALL[i + 1..] {
            if binding.column(*a).index == binding.column(*b).index {
                warn!(
                    "Column {:?} serves both {} and {}",
                    binding.column(*a).header,
                    a,
                    b
                );
            }
        }
    }
}
