//! Identity-scoped rule injection.
//!
//! Per-user data (play counts, likes) lives in the interactions table, keyed
//! by user. Clients cannot author the scoping rule themselves, so the server
//! appends it to every group before compiling.

use crate::rule::{Rule, RuleGroup, RuleTree};
use tracing::debug;

/// Field that ties interaction rows to a user.
pub const USER_SCOPE_FIELD: &str = "interactions.user_id";

/// Return a copy of `tree` with `interactions.user_id is [user_id]` appended
/// as the last rule of every group.
///
/// User-authored rules keep their order. Each call appends again, so invoke
/// this once per compilation.
///
/// The scope rule compiles to its own `exists` subquery, separate from any
/// other `interactions.*` rule in the group. A rule such as
/// `interactions.play_count isGreaterThan 10` can therefore be satisfied by
/// another user's interaction row, as long as this user has some interaction
/// with the song.
pub fn inject_user_rules(tree: &RuleTree, user_id: i64) -> RuleTree {
    let groups: Vec<RuleGroup> = tree
        .groups()
        .iter()
        .map(|g| g.clone().with_rule(Rule::is(USER_SCOPE_FIELD, user_id)))
        .collect();

    debug!(user_id, groups = groups.len(), "injected user scope rules");
    RuleTree::new(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;
    use serde_json::json;
    use smartlist_proto::{RawRule, Value};

    fn two_group_tree() -> RuleTree {
        RuleTree::from_json(
            r#"[
                {"rules": [
                    {"model": "interactions.play_count", "operator": "isGreaterThan", "value": [10]},
                    {"model": "title", "operator": "contains", "value": ["Love"]}
                ]},
                {"rules": [{"model": "interactions.liked", "operator": "is", "value": [true]}]}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_one_rule_per_group() {
        let tree = two_group_tree();
        let injected = inject_user_rules(&tree, 42);

        assert_eq!(injected.groups().len(), 2);
        assert_eq!(injected.rule_count(), tree.rule_count() + 2);

        for (before, after) in tree.groups().iter().zip(injected.groups()) {
            assert_eq!(after.len(), before.len() + 1);
            assert_eq!(&after.rules()[..before.len()], before.rules());

            let last = after.rules().last().unwrap();
            assert_eq!(last.field(), USER_SCOPE_FIELD);
            assert_eq!(last.operator(), Operator::Is);
            assert_eq!(last.values(), &[Value::Int(42)]);
        }
    }

    #[test]
    fn test_input_tree_is_untouched() {
        let tree = two_group_tree();
        let snapshot = tree.clone();
        let _ = inject_user_rules(&tree, 1);
        assert_eq!(tree, snapshot);
    }

    #[test]
    fn test_raw_shape_of_injected_rule() {
        let injected = inject_user_rules(&two_group_tree(), 7).to_raw();
        assert_eq!(
            injected.groups[0].rules[2],
            RawRule::new("interactions.user_id", "is", vec![json!(7)])
        );
    }

    #[test]
    fn test_injecting_twice_appends_twice() {
        let tree = two_group_tree();
        let twice = inject_user_rules(&inject_user_rules(&tree, 3), 3);
        assert_eq!(twice.rule_count(), tree.rule_count() + 4);
    }

    #[test]
    fn test_empty_tree_stays_empty() {
        let injected = inject_user_rules(&RuleTree::default(), 3);
        assert!(injected.is_empty());
    }
}
