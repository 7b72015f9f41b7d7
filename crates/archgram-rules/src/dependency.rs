//! Dependency rules: forbidden edges, required edges and cycles.
//!
//! All three checks share one file graph built from the symbols. Nodes are
//! distinct symbol paths in first-seen order; edges are dependency paths
//! that resolve to a node. Unresolved dependencies are ignored.

use std::collections::HashMap;

use archgram_core::grammar::RoleEdge;
use archgram_core::{RoleSelector, Symbol, TypedRule, ValidationContext, Validator, Violation};

/// Evaluates `forbidden`, `required` and circular `forbidden` rules.
#[derive(Debug, Clone, Default)]
pub struct DependencyValidator {
    forbidden: Vec<TypedRule<RoleEdge>>,
    required: Vec<TypedRule<RoleEdge>>,
    circular: Vec<TypedRule<RoleSelector>>,
}

impl DependencyValidator {
    /// Creates an empty validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets role-targeted `forbidden` rules.
    #[must_use]
    pub fn forbidden(mut self, rules: Vec<TypedRule<RoleEdge>>) -> Self {
        self.forbidden = rules;
        self
    }

    /// Sets `required` rules.
    #[must_use]
    pub fn required(mut self, rules: Vec<TypedRule<RoleEdge>>) -> Self {
        self.required = rules;
        self
    }

    /// Sets circular `forbidden` rules; each carries its `from` selector.
    #[must_use]
    pub fn circular(mut self, rules: Vec<TypedRule<RoleSelector>>) -> Self {
        self.circular = rules;
        self
    }

    fn check_forbidden(&self, graph: &FileGraph<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        for node in &graph.nodes {
            for &target in &node.edges {
                let target = &graph.nodes[target];
                let Some(rule) = self.forbidden.iter().find(|rule| {
                    rule.body.from.matches(node.role) && rule.body.to.matches(target.role)
                }) else {
                    continue;
                };
                let finding = format!(
                    "{} '{}' must not depend on {} '{}'",
                    node.role, node.path, target.role, target.path
                );
                violations.push(
                    rule.meta
                        .violation(node.path, &finding)
                        .with_roles(node.role, target.role)
                        .with_dependency(target.path),
                );
            }
        }
        violations
    }

    fn check_required(&self, graph: &FileGraph<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        for rule in &self.required {
            for node in graph.nodes.iter().filter(|n| rule.body.from.matches(n.role)) {
                let satisfied = node
                    .edges
                    .iter()
                    .any(|&t| rule.body.to.matches(graph.nodes[t].role));
                if satisfied {
                    continue;
                }
                let finding = format!(
                    "{} '{}' must depend on at least one {}",
                    node.role, node.path, rule.body.to
                );
                violations.push(
                    rule.meta
                        .violation(node.path, &finding)
                        .with_roles(node.role, rule.body.to.to_string()),
                );
            }
        }
        violations
    }

    fn check_circular(&self, graph: &FileGraph<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();
        for rule in &self.circular {
            for cycle in find_cycles(graph, &rule.body) {
                let first = &graph.nodes[cycle[0]];
                let description = cycle
                    .iter()
                    .chain(std::iter::once(&cycle[0]))
                    .map(|&i| graph.nodes[i].path)
                    .collect::<Vec<_>>()
                    .join(" -> ");
                let finding = format!("circular dependency: {description}");
                violations.push(
                    rule.meta
                        .violation(first.path, &finding)
                        .with_from_role(first.role)
                        .with_dependency(description),
                );
            }
        }
        violations
    }
}

impl Validator for DependencyValidator {
    fn name(&self) -> &'static str {
        "dependency"
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Violation> {
        let graph = FileGraph::build(ctx.symbols);
        let mut violations = self.check_forbidden(&graph);
        violations.extend(self.check_required(&graph));
        violations.extend(self.check_circular(&graph));
        violations
    }
}

// ────────────────────────────────────────────
// File graph
// ────────────────────────────────────────────

#[derive(Debug)]
struct FileNode<'a> {
    path: &'a str,
    role: &'a str,
    /// Indices of resolved dependency nodes, in first-seen order.
    edges: Vec<usize>,
}

#[derive(Debug)]
struct FileGraph<'a> {
    nodes: Vec<FileNode<'a>>,
}

impl<'a> FileGraph<'a> {
    fn build(symbols: &'a [Symbol]) -> Self {
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut nodes = Vec::new();
        for symbol in symbols {
            index.entry(symbol.path.as_str()).or_insert_with(|| {
                nodes.push(FileNode {
                    path: symbol.path.as_str(),
                    role: symbol.role.as_str(),
                    edges: Vec::new(),
                });
                nodes.len() - 1
            });
        }

        // Symbols of one file share its imports; union them per node.
        for symbol in symbols {
            let from = index[symbol.path.as_str()];
            for dep in &symbol.dependencies {
                if let Some(&to) = index.get(dep.as_str()) {
                    if !nodes[from].edges.contains(&to) {
                        nodes[from].edges.push(to);
                    }
                }
            }
        }

        Self { nodes }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    OnStack,
    Done,
}

/// Finds cycles in the subgraph of nodes whose role matches `scope`.
///
/// Iterative three-color DFS, one pass per unvisited node in node order.
/// Each cycle is returned once as the ordered path from its entry node; its
/// nodes are then marked done so no other start point reports them again.
fn find_cycles(graph: &FileGraph<'_>, scope: &RoleSelector) -> Vec<Vec<usize>> {
    let in_scope = |i: usize| scope.matches(graph.nodes[i].role);
    let mut color = vec![Color::Unvisited; graph.nodes.len()];
    let mut cycles = Vec::new();

    for start in 0..graph.nodes.len() {
        if color[start] != Color::Unvisited || !in_scope(start) {
            continue;
        }

        // (node, next edge to follow); `path` mirrors the node column.
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        let mut path: Vec<usize> = vec![start];
        color[start] = Color::OnStack;

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let Some(&next) = graph.nodes[node].edges.get(frame.1) else {
                stack.pop();
                path.pop();
                color[node] = Color::Done;
                continue;
            };
            frame.1 += 1;

            if !in_scope(next) {
                continue;
            }
            match color[next] {
                Color::Unvisited => {
                    color[next] = Color::OnStack;
                    stack.push((next, 0));
                    path.push(next);
                }
                Color::OnStack => {
                    if let Some(pos) = path.iter().position(|&p| p == next) {
                        let cycle = path[pos..].to_vec();
                        for &member in &cycle {
                            color[member] = Color::Done;
                        }
                        cycles.push(cycle);
                    }
                }
                Color::Done => {}
            }
        }
    }

    cycles
}
