//! Role assignment: the one mutation a symbol ever receives.

use crate::grammar::RoleDefinition;
use crate::symbol::{Symbol, UNKNOWN_ROLE};

/// Stamps symbols with the name of the first role whose path pattern matches.
///
/// Patterns are compiled when the [`RoleDefinition`]s are built, so an
/// assigner only borrows them.
#[derive(Debug, Clone, Copy)]
pub struct RoleAssigner<'a> {
    roles: &'a [RoleDefinition],
}

impl<'a> RoleAssigner<'a> {
    /// Creates an assigner over ordered role definitions.
    #[must_use]
    pub fn new(roles: &'a [RoleDefinition]) -> Self {
        Self { roles }
    }

    /// Returns the role name for a path, or [`UNKNOWN_ROLE`].
    #[must_use]
    pub fn role_for(&self, path: &str) -> &'a str {
        self.roles
            .iter()
            .find(|role| role.matches(path))
            .map_or(UNKNOWN_ROLE, RoleDefinition::name)
    }

    /// Consumes unassigned symbols and returns them with roles set.
    #[must_use]
    pub fn assign(&self, symbols: Vec<Symbol>) -> Vec<Symbol> {
        symbols
            .into_iter()
            .map(|mut symbol| {
                symbol.role = self.role_for(&symbol.path).to_string();
                symbol
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;

    fn roles() -> Vec<RoleDefinition> {
        vec![
            RoleDefinition::new("SERVICE", r"\.service\.ts$").unwrap(),
            RoleDefinition::new("DOMAIN", "^src/domain/").unwrap(),
        ]
    }

    #[test]
    fn first_match_wins() {
        let roles = roles();
        let assigner = RoleAssigner::new(&roles);
        // Matches both patterns; SERVICE is declared first.
        assert_eq!(assigner.role_for("src/domain/user.service.ts"), "SERVICE");
        assert_eq!(assigner.role_for("src/domain/user.ts"), "DOMAIN");
    }

    #[test]
    fn unmatched_paths_are_unknown() {
        let roles = roles();
        let assigner = RoleAssigner::new(&roles);
        assert_eq!(assigner.role_for("scripts/build.ts"), UNKNOWN_ROLE);
    }

    #[test]
    fn reordering_roles_changes_the_winner() {
        let mut roles = roles();
        roles.reverse();
        let assigner = RoleAssigner::new(&roles);
        assert_eq!(assigner.role_for("src/domain/user.service.ts"), "DOMAIN");
    }

    #[test]
    fn assignment_is_deterministic() {
        let roles = roles();
        let assigner = RoleAssigner::new(&roles);
        let symbols = || {
            vec![
                Symbol::new("src/domain/a.ts", "A", SymbolKind::Class),
                Symbol::new("src/app/b.service.ts", "B", SymbolKind::Class),
                Symbol::new("lib/c.ts", "c", SymbolKind::File),
            ]
        };
        let first = assigner.assign(symbols());
        let second = assigner.assign(symbols());
        assert_eq!(first, second);
        let assigned: Vec<&str> = first.iter().map(|s| s.role.as_str()).collect();
        assert_eq!(assigned, vec!["DOMAIN", "SERVICE", "UNKNOWN"]);
    }

    #[test]
    fn no_roles_means_everything_unknown() {
        let assigner = RoleAssigner::new(&[]);
        let out = assigner.assign(vec![Symbol::new("src/a.ts", "a", SymbolKind::Const)]);
        assert_eq!(out[0].role, UNKNOWN_ROLE);
    }
}
