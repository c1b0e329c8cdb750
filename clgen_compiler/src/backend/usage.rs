//! Unused item and state detection

use crate::ast::{AbstractSyntaxTree, Check, CheckKind, ItemTable, VisitResult, Visitor};
use crate::logging::codes;
use crate::{log_success, log_warning};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct ItemUsage {
    count: usize,
    states: BTreeMap<String, usize>,
}

/// Counts how often each item and state is checked
///
/// Warnings are produced when the tree walk finishes, sorted by item name
/// and then state name. States of an unused item are not reported
/// separately.
#[derive(Debug, Default)]
pub struct UsageAnalyzer {
    usage: BTreeMap<String, ItemUsage>,
    warnings: Vec<String>,
}

impl UsageAnalyzer {
    pub fn new(items: &ItemTable) -> Self {
        let usage = items
            .iter()
            .map(|item| {
                let states = item
                    .states()
                    .iter()
                    .map(|state| (state.name.clone(), 0))
                    .collect();
                (item.name.clone(), ItemUsage { count: 0, states })
            })
            .collect();
        Self {
            usage,
            warnings: Vec::new(),
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl Visitor for UsageAnalyzer {
    fn enter_check(&mut self, check: &Check) -> VisitResult {
        if let CheckKind::Normal { item, state } = &check.kind {
            if let Some(usage) = self.usage.get_mut(&item.name) {
                usage.count += 1;
                if let Some(count) = usage.states.get_mut(&state.name) {
                    *count += 1;
                }
            }
        }
        Ok(())
    }

    fn exit_tree(&mut self, _tree: &AbstractSyntaxTree) -> VisitResult {
        for (item, usage) in &self.usage {
            if usage.count == 0 {
                let message = format!("item '{}' is not used in any checklist", item);
                log_warning!(codes::usage::UNUSED_ITEM, &message, "item" => item);
                self.warnings.push(message);
                continue;
            }
            for (state, _) in usage.states.iter().filter(|(_, count)| **count == 0) {
                let message = format!("state '{}' in item '{}' is not used", state, item);
                log_warning!(codes::usage::UNUSED_STATE, &message, "item" => item, "state" => state);
                self.warnings.push(message);
            }
        }

        log_success!(
            codes::success::USAGE_ANALYSIS_COMPLETE,
            "Usage analysis completed",
            "items" => self.usage.len(),
            "warnings" => self.warnings.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Check, Checklist, Item, State, Visitable};
    use std::rc::Rc;

    fn table() -> ItemTable {
        let mut table = ItemTable::new();
        let mut gear = Item::new("Gear");
        for state in ["UP", "DOWN", "TRANSIT"] {
            gear.add_state(State::new(state));
        }
        table.insert(gear);
        let mut beacon = Item::new("Beacon");
        beacon.add_state(State::new("ON"));
        table.insert(beacon);
        table
    }

    fn analyze(table: &ItemTable, checks: Vec<Check>) -> UsageAnalyzer {
        let mut checklist = Checklist::new("Landing");
        for check in checks {
            checklist.add_check(check);
        }
        let tree = AbstractSyntaxTree {
            checklists: vec![checklist],
            ..AbstractSyntaxTree::default()
        };
        let mut analyzer = UsageAnalyzer::new(table);
        tree.accept(&mut analyzer).unwrap();
        analyzer
    }

    fn check(table: &ItemTable, item: &str, state: &str) -> Check {
        let item: Rc<Item> = table.get(item).unwrap();
        let state = item.state(state).unwrap();
        Check::new(item, state, vec![])
    }

    #[test]
    fn reports_unused_states_of_used_items() {
        let table = table();
        let analyzer = analyze(&table, vec![check(&table, "Gear", "DOWN")]);
        assert_eq!(
            analyzer.warnings(),
            &[
                "item 'Beacon' is not used in any checklist",
                "state 'TRANSIT' in item 'Gear' is not used",
                "state 'UP' in item 'Gear' is not used",
            ]
        );
    }

    #[test]
    fn one_of_three_states_used_gives_two_warnings() {
        let table = table();
        let analyzer = analyze(
            &table,
            vec![check(&table, "Gear", "UP"), check(&table, "Beacon", "ON")],
        );
        assert_eq!(analyzer.warning_count(), 2);
        assert!(analyzer.warnings().iter().all(|w| w.starts_with("state ")));
    }

    #[test]
    fn layout_checks_are_not_counted() {
        let table = table();
        let analyzer = analyze(
            &table,
            vec![Check::spacer(), Check::subtitle("Gear"), Check::subtitle("Beacon")],
        );
        assert_eq!(
            analyzer.warnings(),
            &[
                "item 'Beacon' is not used in any checklist",
                "item 'Gear' is not used in any checklist",
            ]
        );
    }
}
